//! Campaign recommendation endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;

use crate::models::RecommendRequest;
use crate::services::{recommend_action, AdvisorError};
use crate::{ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendation: String,
}

/// POST /recommend
///
/// **Request:** `{"campaign": {...}}`
/// **Response:** `{"recommendation": "..."}`
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let advisor = state
        .advisor
        .clone()
        .ok_or_else(|| AdvisorError::NotConfigured("OPENAI_API_KEY is not set".to_string()))?;

    let recommendation = recommend_action(advisor.as_ref(), &req.campaign).await?;
    Ok(Json(RecommendResponse { recommendation }))
}

pub fn advice_routes() -> Router<AppState> {
    Router::new().route("/recommend", post(recommend))
}
