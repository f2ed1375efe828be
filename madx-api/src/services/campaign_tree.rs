//! Campaign tree aggregation
//!
//! Walks accounts → campaigns → ad-sets → ads with one Graph request per
//! node, optionally enriching campaigns with spend and purchase ROAS.
//!
//! Each level fans out concurrently and keeps the platform's ordering. One
//! semaphore shared by every level caps the Graph requests in flight for the
//! whole traversal. A failed fetch never aborts the walk: the node's
//! children default to empty and enrichment defaults to zeros. Only a missing
//! credential or an expired overall deadline fails the call.

use futures::stream::{self, StreamExt};
use madx_common::config::TraversalSection;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::graph::{GraphApi, GraphError, GraphHandle};
use crate::models::{AccountTree, AdNode, AdSetNode, CampaignInsights, CampaignNode, TreeCounts};

const CAMPAIGN_FIELDS: &str = "id,name,objective";
const INSIGHT_FIELDS: &str = "spend,purchase_roas";
const NODE_FIELDS: &str = "id,name";

/// Fan-out and deadline settings for one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Graph requests in flight across the whole traversal (minimum 1)
    pub concurrency: usize,
    /// Overall deadline; `None` waits for every request
    pub deadline: Option<Duration>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self::from(&TraversalSection::default())
    }
}

impl From<&TraversalSection> for TraversalOptions {
    fn from(section: &TraversalSection) -> Self {
        Self {
            concurrency: section.concurrency.max(1),
            deadline: (section.deadline_secs > 0).then(|| Duration::from_secs(section.deadline_secs)),
        }
    }
}

/// Builds campaign trees from the Graph API
#[derive(Clone)]
pub struct CampaignTreeAggregator {
    api: Arc<dyn GraphApi>,
    options: TraversalOptions,
    limiter: Arc<Semaphore>,
}

impl CampaignTreeAggregator {
    pub fn new(api: Arc<dyn GraphApi>, options: TraversalOptions) -> Self {
        let concurrency = options.concurrency.max(1);
        Self {
            api,
            options: TraversalOptions {
                concurrency,
                ..options
            },
            limiter: Arc::new(Semaphore::new(concurrency)),
        }
    }

    /// Fetch the full tree for every account visible to the credential
    pub async fn aggregate(&self, enrich: bool) -> Result<Vec<AccountTree>, GraphError> {
        let started = Instant::now();

        let tree = match self.options.deadline {
            Some(limit) => tokio::time::timeout(limit, self.collect_accounts(enrich))
                .await
                .map_err(|_| {
                    warn!(deadline_ms = limit.as_millis() as u64, "Campaign tree traversal deadline exceeded");
                    GraphError::transport(
                        format!("Campaign tree traversal exceeded its {}s deadline", limit.as_secs()),
                        None,
                    )
                })?,
            None => self.collect_accounts(enrich).await,
        };

        let counts = TreeCounts::of(&tree);
        info!(
            accounts = counts.accounts,
            campaigns = counts.campaigns,
            adsets = counts.adsets,
            ads = counts.ads,
            enrich,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Campaign tree aggregated"
        );

        Ok(tree)
    }

    async fn collect_accounts(&self, enrich: bool) -> Vec<AccountTree> {
        let accounts = with_ids(self.fetch_collection("me/adaccounts", None).await);
        let walker = self.clone();

        stream::iter(accounts)
            .map(move |(account_id, _)| {
                let walker = walker.clone();
                async move { walker.account_tree(account_id, enrich).await }
            })
            .buffered(self.options.concurrency)
            .collect::<Vec<_>>()
            .await
    }

    async fn account_tree(&self, account_id: String, enrich: bool) -> AccountTree {
        let path = format!("{}/campaigns", account_id);
        let campaigns = with_ids(self.fetch_collection(&path, Some(CAMPAIGN_FIELDS)).await);
        debug!(account_id = %account_id, campaigns = campaigns.len(), "Walking account");

        let walker = self.clone();
        let campaigns = stream::iter(campaigns)
            .map(move |(campaign_id, raw)| {
                let walker = walker.clone();
                async move { walker.campaign_node(campaign_id, raw, enrich).await }
            })
            .buffered(self.options.concurrency)
            .collect::<Vec<_>>()
            .await;

        AccountTree {
            account_id,
            campaigns,
        }
    }

    async fn campaign_node(&self, campaign_id: String, raw: Value, enrich: bool) -> CampaignNode {
        let insights = async {
            if enrich {
                Some(self.fetch_insights(&campaign_id).await)
            } else {
                None
            }
        };
        let (insights, adsets) = tokio::join!(insights, self.adset_nodes(&campaign_id));

        CampaignNode {
            name: string_field(&raw, "name"),
            objective: string_field(&raw, "objective"),
            id: campaign_id,
            insights,
            adsets,
        }
    }

    async fn fetch_insights(&self, campaign_id: &str) -> CampaignInsights {
        let path = format!("{}/insights", campaign_id);
        let records = self.fetch_collection(&path, Some(INSIGHT_FIELDS)).await;
        insights_from_record(records.first())
    }

    async fn adset_nodes(&self, campaign_id: &str) -> Vec<AdSetNode> {
        let path = format!("{}/adsets", campaign_id);
        let adsets = with_ids(self.fetch_collection(&path, Some(NODE_FIELDS)).await);

        let walker = self.clone();
        stream::iter(adsets)
            .map(move |(adset_id, raw)| {
                let walker = walker.clone();
                async move { walker.adset_node(adset_id, raw).await }
            })
            .buffered(self.options.concurrency)
            .collect::<Vec<_>>()
            .await
    }

    async fn adset_node(&self, adset_id: String, raw: Value) -> AdSetNode {
        let path = format!("{}/ads", adset_id);
        let ads = self
            .fetch_collection(&path, Some(NODE_FIELDS))
            .await
            .iter()
            .map(|ad| AdNode {
                id: node_id(ad),
                name: string_field(ad, "name"),
            })
            .collect::<Vec<_>>();

        AdSetNode {
            name: string_field(&raw, "name"),
            id: adset_id,
            ads,
        }
    }

    /// GET a collection and return its `data` array, empty on any failure
    async fn fetch_collection(&self, path: &str, fields: Option<&str>) -> Vec<Value> {
        let params: Vec<(&str, &str)> = fields.map(|f| vec![("fields", f)]).unwrap_or_default();

        // The limiter is never closed, so the permit is always granted
        let permit = self.limiter.acquire().await.ok();
        let outcome = self.api.get(path, &params).await;
        drop(permit);

        match outcome {
            Ok(body) => body
                .get("data")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                warn!(
                    path = %path,
                    kind = %e.kind,
                    status = e.status_code,
                    error = %e.message,
                    "Graph collection fetch failed, continuing with no children"
                );
                Vec::new()
            }
        }
    }
}

/// Fetch the tree through a startup-resolved handle
///
/// An unconfigured handle fails with `config_error` before any request.
pub async fn fetch_campaign_tree(
    graph: &GraphHandle,
    options: TraversalOptions,
    enrich: bool,
) -> Result<Vec<AccountTree>, GraphError> {
    let api = graph.api()?;
    CampaignTreeAggregator::new(api, options).aggregate(enrich).await
}

/// Spend and ROAS from the first insight record; zeros when there is none
pub fn insights_from_record(record: Option<&Value>) -> CampaignInsights {
    let Some(record) = record else {
        return CampaignInsights::default();
    };

    let spend = coerce_f64(record.get("spend"));
    let roas = record
        .get("purchase_roas")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .map(|entry| coerce_f64(entry.get("value")))
        .unwrap_or(0.0);

    CampaignInsights::new(spend, roas)
}

/// Lenient numeric read: numbers and numeric strings, else 0.0
pub fn coerce_f64(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Non-empty node identifier (platform ids are strings, numbers tolerated)
pub fn node_id(node: &Value) -> Option<String> {
    match node.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(str::to_string)
}

fn with_ids(nodes: Vec<Value>) -> Vec<(String, Value)> {
    nodes
        .into_iter()
        .filter_map(|node| node_id(&node).map(|id| (id, node)))
        .collect()
}
