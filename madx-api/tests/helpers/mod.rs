//! Test Helper Utilities
//!
//! Shared utilities for testing madx-api

#![allow(dead_code, unused_imports)]

pub mod mock_graph;
pub mod mock_server;

pub use mock_graph::{scenario_graph, MockGraph, RecordedCall};
pub use mock_server::{form_pairs, start_mock_server, CapturedRequest, MockServer};

use madx_api::graph::{GraphError, GraphHandle};
use madx_api::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// In-memory mirror database with the full schema
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    madx_common::db::create_mirror_tables(&pool).await.unwrap();
    pool
}

/// App state with no Graph credential
pub async fn unconfigured_state() -> AppState {
    let graph = GraphHandle::Unconfigured(GraphError::config("META_ACCESS_TOKEN is not set"));
    AppState::new(create_test_db().await, graph)
}
