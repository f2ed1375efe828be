//! Portfolio totals and goal progress for the dashboard header

use serde::{Deserialize, Serialize};

use crate::models::AccountTree;

/// Ratio that is 0.0 whenever the denominator is not positive
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 && numerator.is_finite() {
        numerator / denominator
    } else {
        0.0
    }
}

/// Targets the progress bars are measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryGoals {
    pub value: f64,
    pub spend: f64,
    pub roas: f64,
}

impl Default for SummaryGoals {
    fn default() -> Self {
        Self {
            value: 100_000.0,
            spend: 50_000.0,
            roas: 2.0,
        }
    }
}

/// Progress toward each goal, clamped to `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub value: f64,
    pub spend: f64,
    pub roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub campaigns: usize,
    /// Campaigns that carried spend/ROAS enrichment
    pub enriched_campaigns: usize,
    pub total_spend: f64,
    /// Σ spend × roas over enriched campaigns
    pub attributed_value: f64,
    /// attributed_value / total_spend
    pub blended_roas: f64,
    pub goals: SummaryGoals,
    pub progress: GoalProgress,
}

impl PortfolioSummary {
    pub fn from_tree(tree: &[AccountTree], goals: SummaryGoals) -> Self {
        let mut campaigns = 0;
        let mut enriched_campaigns = 0;
        let mut total_spend = 0.0;
        let mut attributed_value = 0.0;

        for campaign in tree.iter().flat_map(|a| &a.campaigns) {
            campaigns += 1;
            if let Some(insights) = campaign.insights {
                enriched_campaigns += 1;
                total_spend += insights.spend;
                attributed_value += insights.spend * insights.roas;
            }
        }

        let blended_roas = safe_ratio(attributed_value, total_spend);
        let progress = GoalProgress {
            value: clamp_unit(safe_ratio(attributed_value, goals.value)),
            spend: clamp_unit(safe_ratio(total_spend, goals.spend)),
            roas: clamp_unit(safe_ratio(blended_roas, goals.roas)),
        };

        Self {
            campaigns,
            enriched_campaigns,
            total_spend,
            attributed_value,
            blended_roas,
            goals,
            progress,
        }
    }
}

fn clamp_unit(ratio: f64) -> f64 {
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CampaignInsights, CampaignNode};

    fn campaign(id: &str, insights: Option<CampaignInsights>) -> CampaignNode {
        CampaignNode {
            id: id.into(),
            name: None,
            objective: None,
            insights,
            adsets: vec![],
        }
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(10.0, 4.0), 2.5);
        assert_eq!(safe_ratio(10.0, 0.0), 0.0);
        assert_eq!(safe_ratio(10.0, -1.0), 0.0);
    }

    #[test]
    fn test_summary_totals_and_progress() {
        let tree = vec![AccountTree {
            account_id: "1".into(),
            campaigns: vec![
                campaign("c1", Some(CampaignInsights::new(100.0, 2.0))),
                campaign("c2", Some(CampaignInsights::new(300.0, 4.0))),
                campaign("c3", None),
            ],
        }];

        let goals = SummaryGoals { value: 1000.0, spend: 800.0, roas: 2.0 };
        let summary = PortfolioSummary::from_tree(&tree, goals);

        assert_eq!(summary.campaigns, 3);
        assert_eq!(summary.enriched_campaigns, 2);
        assert_eq!(summary.total_spend, 400.0);
        assert_eq!(summary.attributed_value, 1400.0);
        assert_eq!(summary.blended_roas, 3.5);
        assert_eq!(summary.progress.value, 1.0);
        assert_eq!(summary.progress.spend, 0.5);
        assert_eq!(summary.progress.roas, 1.0);
    }

    #[test]
    fn test_empty_tree_is_all_zero() {
        let summary = PortfolioSummary::from_tree(&[], SummaryGoals::default());
        assert_eq!(summary.campaigns, 0);
        assert_eq!(summary.blended_roas, 0.0);
        assert_eq!(summary.progress, GoalProgress { value: 0.0, spend: 0.0, roas: 0.0 });
    }
}
