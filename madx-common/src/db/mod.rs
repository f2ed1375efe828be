//! Database initialization for the local campaign mirror

pub mod init;

pub use init::{create_mirror_tables, init_database};
