//! HTTP API handlers for madx-api

pub mod advice;
pub mod campaigns;
pub mod health;
pub mod mirror;
pub mod provisioning;

pub use advice::advice_routes;
pub use campaigns::campaign_routes;
pub use health::health_routes;
pub use mirror::mirror_routes;
pub use provisioning::provisioning_routes;
