//! Campaign tree endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::warn;

use crate::graph::GraphError;
use crate::models::AccountTree;
use crate::services::{fetch_campaign_tree, PortfolioSummary};
use crate::{ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct CampaignsQuery {
    #[serde(default)]
    pub include_insights: bool,
}

/// GET /campaigns?include_insights=bool
///
/// Returns one entry per ad account. With insights, each campaign carries
/// `spend`, `roas`, and `revenue`. `revenue` is the purchase ROAS ratio
/// under its historical name, not a currency amount.
pub async fn list_campaign_tree(
    State(state): State<AppState>,
    Query(query): Query<CampaignsQuery>,
) -> ApiResult<Json<Vec<AccountTree>>> {
    let tree = load_tree(&state, query.include_insights).await?;
    Ok(Json(tree))
}

/// GET /campaigns/summary
///
/// Always fetches insights; totals need spend and ROAS.
pub async fn campaign_summary(State(state): State<AppState>) -> ApiResult<Json<PortfolioSummary>> {
    let tree = load_tree(&state, true).await?;
    Ok(Json(PortfolioSummary::from_tree(&tree, state.goals)))
}

async fn load_tree(state: &AppState, enrich: bool) -> Result<Vec<AccountTree>, GraphError> {
    match fetch_campaign_tree(&state.graph, state.traversal, enrich).await {
        Ok(tree) => {
            *state.last_error.write().await = None;
            Ok(tree)
        }
        Err(e) => {
            warn!(kind = %e.kind, error = %e.message, "Campaign tree fetch failed");
            *state.last_error.write().await = Some(format!("Campaign tree fetch failed: {}", e));
            Err(e)
        }
    }
}

pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaign_tree))
        .route("/campaigns/summary", get(campaign_summary))
}
