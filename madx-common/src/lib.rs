//! # madx common library
//!
//! Shared code for the madx crates:
//! - Error type used by configuration and database helpers
//! - TOML + environment configuration loading
//! - Root folder resolution
//! - SQLite initialization for the local campaign mirror

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
