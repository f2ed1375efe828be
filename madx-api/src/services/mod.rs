//! Service layer: traversal, provisioning, advice, summary, refresh

pub mod advisor;
pub mod campaign_tree;
pub mod provisioning;
pub mod refresher;
pub mod summary;

pub use advisor::{recommend_action, AdvisorConfig, AdvisorError, CompletionService, OpenAiClient};
pub use campaign_tree::{fetch_campaign_tree, CampaignTreeAggregator, TraversalOptions};
pub use refresher::{refresh_once, spawn_refresh_loop, RefreshReport, RefreshSchedule};
pub use summary::{safe_ratio, PortfolioSummary, SummaryGoals};
