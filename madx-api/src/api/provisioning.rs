//! Provisioning endpoints
//!
//! Success returns the platform's response body unchanged (usually `{"id"}`
//! or the `images` map for uploads). Failures go through [`ApiError::Graph`].

use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};

use crate::graph::ImageUpload;
use crate::models::{
    optimization_goals, CreateAdCreativeRequest, CreateAdRequest, CreateAdSetRequest,
    CreateCampaignRequest, OBJECTIVE_OPTIMIZATION_GOALS,
};
use crate::services::provisioning;
use crate::{ApiError, ApiResult, AppState};

/// POST /create_campaign
pub async fn create_campaign(
    State(state): State<AppState>,
    Json(req): Json<CreateCampaignRequest>,
) -> ApiResult<Json<Value>> {
    let api = state.graph.api()?;
    Ok(Json(provisioning::create_campaign(api.as_ref(), &req).await?))
}

/// POST /create_adset
pub async fn create_adset(
    State(state): State<AppState>,
    Json(req): Json<CreateAdSetRequest>,
) -> ApiResult<Json<Value>> {
    let api = state.graph.api()?;
    Ok(Json(provisioning::create_adset(api.as_ref(), &req).await?))
}

/// POST /create_ad
pub async fn create_ad(
    State(state): State<AppState>,
    Json(req): Json<CreateAdRequest>,
) -> ApiResult<Json<Value>> {
    let api = state.graph.api()?;
    Ok(Json(provisioning::create_ad(api.as_ref(), &req).await?))
}

/// POST /create_adcreative (also served as /create_creative)
pub async fn create_adcreative(
    State(state): State<AppState>,
    Json(req): Json<CreateAdCreativeRequest>,
) -> ApiResult<Json<Value>> {
    let api = state.graph.api()?;
    let outcome =
        provisioning::create_adcreative(api.as_ref(), &req, state.page_id.as_deref()).await?;
    Ok(Json(outcome))
}

/// POST /upload_ad_image
///
/// Multipart with an `account_id` text field and a `file` part.
pub async fn upload_ad_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut account_id: Option<String> = None;
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "account_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable account_id: {}", e)))?;
                account_id = Some(text.trim().to_string());
            }
            "file" => {
                let filename = field.file_name().unwrap_or("upload.jpg").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Unreadable file part: {}", e)))?;
                upload = Some(ImageUpload::jpeg(filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let account_id = account_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing account_id field".to_string()))?;
    let upload = upload.ok_or_else(|| ApiError::BadRequest("Missing file part".to_string()))?;

    let api = state.graph.api()?;
    Ok(Json(provisioning::upload_ad_image(api.as_ref(), &account_id, upload).await?))
}

/// GET /objectives
///
/// Objective → optimization goals offered for it.
pub async fn list_objectives() -> Json<Value> {
    let catalogue = OBJECTIVE_OPTIMIZATION_GOALS
        .iter()
        .map(|(objective, goals)| (objective.to_string(), Value::from(goals.to_vec())))
        .collect::<Map<String, Value>>();
    Json(Value::Object(catalogue))
}

/// GET /objectives/:objective
pub async fn objective_goals(Path(objective): Path<String>) -> ApiResult<Json<Vec<&'static str>>> {
    optimization_goals(&objective)
        .map(|goals| Json(goals.to_vec()))
        .ok_or_else(|| ApiError::NotFound(format!("Unknown objective: {}", objective)))
}

pub fn provisioning_routes() -> Router<AppState> {
    Router::new()
        .route("/create_campaign", post(create_campaign))
        .route("/create_adset", post(create_adset))
        .route("/create_ad", post(create_ad))
        .route("/create_adcreative", post(create_adcreative))
        .route("/create_creative", post(create_adcreative))
        .route("/upload_ad_image", post(upload_ad_image))
        .route("/objectives", get(list_objectives))
        .route("/objectives/:objective", get(objective_goals))
}
