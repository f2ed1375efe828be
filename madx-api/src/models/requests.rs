//! Provisioning request payloads accepted by the HTTP surface

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCampaignRequest {
    pub account_id: String,
    pub name: String,
    pub objective: String,
    pub status: String,
    #[serde(default)]
    pub special_ad_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdSetRequest {
    pub account_id: String,
    pub campaign_id: String,
    pub name: String,
    pub daily_budget: i64,
    pub optimization_goal: String,
    pub billing_event: String,
    pub bid_amount: i64,
    /// Targeting spec forwarded untouched
    pub targeting: Value,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdRequest {
    pub account_id: String,
    pub adset_id: String,
    pub creative_id: String,
    pub name: String,
    #[serde(default = "default_ad_status")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAdCreativeRequest {
    pub account_id: String,
    pub name: String,
    pub title: String,
    pub body: String,
    pub object_url: String,
    pub image_hash: String,
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    /// Campaign data as the dashboard holds it (any JSON)
    pub campaign: Value,
}

fn default_ad_status() -> String {
    "PAUSED".to_string()
}

/// Campaign objectives and the optimization goals the dashboard offers for each
pub const OBJECTIVE_OPTIMIZATION_GOALS: &[(&str, &[&str])] = &[
    ("OUTCOME_SALES", &["CONVERSIONS", "VALUE", "LANDING_PAGE_VIEWS"]),
    ("OUTCOME_TRAFFIC", &["LINK_CLICKS", "LANDING_PAGE_VIEWS"]),
    ("OUTCOME_ENGAGEMENT", &["POST_ENGAGEMENT", "PAGE_LIKES"]),
    ("OUTCOME_LEADS", &["LEAD_GENERATION", "CONVERSIONS"]),
    ("OUTCOME_APP_PROMOTION", &["APP_INSTALLS", "VALUE"]),
    ("OUTCOME_AWARENESS", &["REACH", "IMPRESSIONS"]),
];

/// Optimization goals for an objective, `None` for unknown objectives
pub fn optimization_goals(objective: &str) -> Option<&'static [&'static str]> {
    OBJECTIVE_OPTIMIZATION_GOALS
        .iter()
        .find(|(name, _)| *name == objective)
        .map(|(_, goals)| *goals)
}
