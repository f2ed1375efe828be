//! Local mirror endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use crate::db::{list_campaigns, MirroredCampaign};
use crate::graph::GraphError;
use crate::services::{refresh_once, RefreshReport};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct SyncQuery {
    /// Overrides the refresher's `include_insights` setting
    pub include_insights: Option<bool>,
}

/// GET /mirror/campaigns
pub async fn mirrored_campaigns(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MirroredCampaign>>> {
    Ok(Json(list_campaigns(&state.db).await?))
}

/// POST /sync
///
/// Runs one refresh now and returns its report.
pub async fn sync_now(
    State(state): State<AppState>,
    Query(query): Query<SyncQuery>,
) -> ApiResult<Json<RefreshReport>> {
    let include_insights = query.include_insights.unwrap_or(state.refresh.include_insights);

    match refresh_once(&state.graph, &state.db, state.traversal, include_insights).await {
        Ok(report) => {
            *state.last_error.write().await = None;
            Ok(Json(report))
        }
        Err(e) => {
            error!(error = %e, "Manual sync failed");
            *state.last_error.write().await = Some(format!("Manual sync failed: {}", e));
            Err(match e.downcast::<GraphError>() {
                Ok(graph_error) => ApiError::Graph(graph_error),
                Err(other) => ApiError::Other(other),
            })
        }
    }
}

pub fn mirror_routes() -> Router<AppState> {
    Router::new()
        .route("/mirror/campaigns", get(mirrored_campaigns))
        .route("/sync", post(sync_now))
}
