//! Campaign, ad-set, ad, creative and image provisioning
//!
//! Each operation is one request with the payload layout the platform
//! integration has always used:
//! - campaigns and creatives: form-encoded, credential as a form field
//! - ad-sets and ads: JSON body, credential as a query parameter
//! - images: multipart, credential as a form field

use serde_json::{json, Value};
use tracing::info;

use crate::graph::{GraphApi, GraphError, GraphOutcome, ImageUpload};
use crate::models::{
    CreateAdCreativeRequest, CreateAdRequest, CreateAdSetRequest, CreateCampaignRequest,
};

fn account_path(account_id: &str, edge: &str) -> String {
    format!("act_{}/{}", account_id, edge)
}

/// POST `act_{account}/campaigns`
///
/// `special_ad_categories` travels as a JSON-encoded array string.
pub async fn create_campaign(api: &dyn GraphApi, req: &CreateCampaignRequest) -> GraphOutcome {
    let categories = serde_json::to_string(&req.special_ad_categories).map_err(|e| {
        GraphError::transport(format!("Failed to encode special_ad_categories: {}", e), None)
    })?;

    let fields = vec![
        ("name".to_string(), req.name.clone()),
        ("objective".to_string(), req.objective.clone()),
        ("status".to_string(), req.status.clone()),
        ("special_ad_categories".to_string(), categories),
    ];

    let outcome = api
        .post_form(&account_path(&req.account_id, "campaigns"), fields)
        .await;
    log_created("campaign", &req.account_id, &outcome);
    outcome
}

/// POST `act_{account}/adsets`
pub async fn create_adset(api: &dyn GraphApi, req: &CreateAdSetRequest) -> GraphOutcome {
    let body = json!({
        "name": req.name,
        "campaign_id": req.campaign_id,
        "daily_budget": req.daily_budget,
        "optimization_goal": req.optimization_goal,
        "billing_event": req.billing_event,
        "bid_amount": req.bid_amount,
        "targeting": req.targeting,
        "status": req.status,
    });

    let outcome = api.post_json(&account_path(&req.account_id, "adsets"), body).await;
    log_created("adset", &req.account_id, &outcome);
    outcome
}

/// POST `act_{account}/ads` referencing an existing creative
pub async fn create_ad(api: &dyn GraphApi, req: &CreateAdRequest) -> GraphOutcome {
    let body = json!({
        "name": req.name,
        "adset_id": req.adset_id,
        "creative": { "creative_id": req.creative_id },
        "status": req.status,
    });

    let outcome = api.post_json(&account_path(&req.account_id, "ads"), body).await;
    log_created("ad", &req.account_id, &outcome);
    outcome
}

/// POST `act_{account}/adimages`; the response carries the image hash
pub async fn upload_ad_image(api: &dyn GraphApi, account_id: &str, upload: ImageUpload) -> GraphOutcome {
    let outcome = api
        .post_multipart(&account_path(account_id, "adimages"), upload)
        .await;
    log_created("adimage", account_id, &outcome);
    outcome
}

/// POST `act_{account}/adcreatives` as a link ad built from an image hash
///
/// `page_id` is serialized as `null` inside `object_story_spec` when unset.
pub async fn create_adcreative(
    api: &dyn GraphApi,
    req: &CreateAdCreativeRequest,
    page_id: Option<&str>,
) -> GraphOutcome {
    let story = object_story_spec(req, page_id);

    let fields = vec![
        ("name".to_string(), req.name.clone()),
        ("title".to_string(), req.title.clone()),
        ("body".to_string(), req.body.clone()),
        ("object_story_spec".to_string(), story.to_string()),
    ];

    let outcome = api
        .post_form(&account_path(&req.account_id, "adcreatives"), fields)
        .await;
    log_created("adcreative", &req.account_id, &outcome);
    outcome
}

fn object_story_spec(req: &CreateAdCreativeRequest, page_id: Option<&str>) -> Value {
    json!({
        "page_id": page_id,
        "link_data": {
            "message": req.body,
            "link": req.object_url,
            "image_hash": req.image_hash,
        },
    })
}

fn log_created(object: &str, account_id: &str, outcome: &GraphOutcome) {
    match outcome {
        Ok(body) => {
            let id = body.get("id").and_then(Value::as_str).unwrap_or("");
            info!(object, account_id = %account_id, id, "Graph object created");
        }
        Err(e) => info!(
            object,
            account_id = %account_id,
            kind = %e.kind,
            error = %e.message,
            "Graph object creation rejected"
        ),
    }
}
