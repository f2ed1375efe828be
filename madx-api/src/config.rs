//! Runtime configuration for madx-api
//!
//! Merges environment variables over the TOML file into the explicit configs
//! each component is built from. Secrets follow ENV → TOML priority.

use madx_common::config::{
    resolve_secret, TomlConfig, DEFAULT_ADVISOR_BASE_URL, DEFAULT_ADVISOR_MODEL,
    DEFAULT_GRAPH_BASE_URL, ENV_ACCESS_TOKEN, ENV_ADVISOR_KEY, ENV_GRAPH_BASE_URL, ENV_PAGE_ID,
};
use std::time::Duration;
use tracing::{info, warn};

use crate::graph::GraphConfig;
use crate::services::{AdvisorConfig, RefreshSchedule, TraversalOptions};

/// Everything the service needs besides the database
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub graph: GraphConfig,
    pub advisor: AdvisorConfig,
    pub traversal: TraversalOptions,
    pub refresh: RefreshSchedule,
}

impl ServiceConfig {
    pub fn resolve(toml: &TomlConfig) -> Self {
        let access_token = resolve_secret(
            "Graph access token",
            ENV_ACCESS_TOKEN,
            toml.graph.access_token.as_deref(),
        );
        if access_token.is_none() {
            warn!(
                "Graph access token not found. Set {} or [graph].access_token in madx.toml",
                ENV_ACCESS_TOKEN
            );
        }

        let page_id = resolve_secret("Graph page id", ENV_PAGE_ID, toml.graph.page_id.as_deref());

        let base_url = std::env::var(ENV_GRAPH_BASE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| toml.graph.base_url.clone())
            .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string());
        info!(base_url = %base_url, "Graph API base URL resolved");

        let mut graph = GraphConfig::new(access_token)
            .with_base_url(base_url)
            .with_page_id(page_id);
        if let Some(secs) = toml.graph.request_timeout_secs {
            graph.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = toml.graph.connect_timeout_secs {
            graph.connect_timeout = Duration::from_secs(secs);
        }

        let advisor = AdvisorConfig {
            api_key: resolve_secret(
                "Advisor API key",
                ENV_ADVISOR_KEY,
                toml.advisor.api_key.as_deref(),
            ),
            model: toml
                .advisor
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string()),
            base_url: toml
                .advisor
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ADVISOR_BASE_URL.to_string()),
        };

        Self {
            graph,
            advisor,
            traversal: TraversalOptions::from(&toml.traversal),
            refresh: RefreshSchedule::from(&toml.refresher),
        }
    }
}
