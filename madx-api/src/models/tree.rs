//! Campaign tree returned by the aggregator
//!
//! Field names are part of the dashboard contract: children live under
//! `campaigns`, `adsets` and `ads`; enrichment adds `spend`, `revenue` and
//! `roas` directly on the campaign object.

use serde::{Deserialize, Serialize};

/// One ad account with its campaigns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountTree {
    pub account_id: String,
    pub campaigns: Vec<CampaignNode>,
}

/// Campaign with optional spend/ROAS enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    /// Present only when insights were requested
    #[serde(flatten)]
    pub insights: Option<CampaignInsights>,
    #[serde(default)]
    pub adsets: Vec<AdSetNode>,
}

/// Spend and purchase ROAS from the campaign's first insight record
///
/// `revenue` is NOT a currency amount. It holds the purchase ROAS ratio and
/// keeps its historical name because existing dashboards read it; new
/// consumers should read `roas`, which always carries the same value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CampaignInsights {
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
}

impl CampaignInsights {
    pub fn new(spend: f64, roas: f64) -> Self {
        Self {
            spend,
            revenue: roas,
            roas,
        }
    }
}

/// Ad-set with its ads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdSetNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub ads: Vec<AdNode>,
}

/// Leaf ad, passed through as the platform listed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Node counts for logging and refresh reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeCounts {
    pub accounts: usize,
    pub campaigns: usize,
    pub adsets: usize,
    pub ads: usize,
}

impl TreeCounts {
    pub fn of(tree: &[AccountTree]) -> Self {
        let mut counts = TreeCounts {
            accounts: tree.len(),
            ..TreeCounts::default()
        };
        for campaign in tree.iter().flat_map(|a| &a.campaigns) {
            counts.campaigns += 1;
            counts.adsets += campaign.adsets.len();
            counts.ads += campaign.adsets.iter().map(|s| s.ads.len()).sum::<usize>();
        }
        counts
    }
}
