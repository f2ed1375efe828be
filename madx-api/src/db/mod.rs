//! Mirror queries for madx-api
//!
//! Schema creation lives in `madx_common::db`; this module reads and writes
//! rows.

pub mod campaigns;

pub use campaigns::{list_campaigns, store_tree, MirrorStats, MirroredCampaign};
