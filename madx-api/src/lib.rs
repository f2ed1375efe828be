//! madx-api library interface
//!
//! Exposes the router, state and services for the binaries and for
//! integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::graph::GraphHandle;
use crate::services::{CompletionService, RefreshSchedule, SummaryGoals, TraversalOptions};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Mirror database pool
    pub db: SqlitePool,
    /// Graph access resolved at startup
    pub graph: GraphHandle,
    /// Completion backend; `None` when no key is configured
    pub advisor: Option<Arc<dyn CompletionService>>,
    pub traversal: TraversalOptions,
    pub refresh: RefreshSchedule,
    pub goals: SummaryGoals,
    /// Page referenced by new creatives
    pub page_id: Option<String>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(db: SqlitePool, graph: GraphHandle) -> Self {
        Self {
            db,
            graph,
            advisor: None,
            traversal: TraversalOptions::default(),
            refresh: RefreshSchedule::default(),
            goals: SummaryGoals::default(),
            page_id: None,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn CompletionService>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalOptions) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_refresh(mut self, refresh: RefreshSchedule) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn with_page_id(mut self, page_id: Option<String>) -> Self {
        self.page_id = page_id;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::campaign_routes())
        .merge(api::provisioning_routes())
        .merge(api::advice_routes())
        .merge(api::mirror_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
