//! Periodic mirror refresh
//!
//! Fetches the campaign tree on a fixed interval and stores it in the local
//! mirror. The first run happens one interval after startup; `POST /sync`
//! runs the same refresh on demand.

use chrono::{DateTime, Utc};
use madx_common::config::RefresherSection;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::{store_tree, MirrorStats};
use crate::graph::GraphHandle;
use crate::models::TreeCounts;
use crate::services::campaign_tree::{fetch_campaign_tree, TraversalOptions};
use crate::AppState;

/// When and how the background refresh runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    pub enabled: bool,
    pub interval: Duration,
    pub include_insights: bool,
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::from(&RefresherSection::default())
    }
}

impl From<&RefresherSection> for RefreshSchedule {
    fn from(section: &RefresherSection) -> Self {
        Self {
            enabled: section.enabled,
            interval: Duration::from_secs(section.interval_secs.max(1)),
            include_insights: section.include_insights,
        }
    }
}

/// Outcome of one refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshReport {
    pub run_id: Uuid,
    pub include_insights: bool,
    pub counts: TreeCounts,
    pub stored: MirrorStats,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Fetch the tree and write it to the mirror
pub async fn refresh_once(
    graph: &GraphHandle,
    db: &SqlitePool,
    options: TraversalOptions,
    include_insights: bool,
) -> anyhow::Result<RefreshReport> {
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    info!(%run_id, include_insights, "Mirror refresh started");

    let tree = fetch_campaign_tree(graph, options, include_insights).await?;
    let counts = TreeCounts::of(&tree);
    let stored = store_tree(db, &tree).await?;

    let report = RefreshReport {
        run_id,
        include_insights,
        counts,
        stored,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        %run_id,
        campaigns = stored.campaigns,
        adsets = stored.adsets,
        ads = stored.ads,
        "Mirror refresh complete"
    );

    Ok(report)
}

/// Spawn the refresh loop; it exits when `cancel` fires
///
/// Failures are logged and kept in `state.last_error` for `/health` until the
/// next successful refresh; the loop keeps running.
pub fn spawn_refresh_loop(
    state: AppState,
    schedule: RefreshSchedule,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + schedule.interval, schedule.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = schedule.interval.as_secs(),
            include_insights = schedule.include_insights,
            "Mirror refresher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Mirror refresher stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let result = refresh_once(
                        &state.graph,
                        &state.db,
                        state.traversal,
                        schedule.include_insights,
                    )
                    .await;

                    match result {
                        Ok(_) => *state.last_error.write().await = None,
                        Err(e) => {
                            error!(error = %e, "Mirror refresh failed");
                            *state.last_error.write().await = Some(format!("Mirror refresh failed: {}", e));
                        }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_from_section() {
        let schedule = RefreshSchedule::default();
        assert!(schedule.enabled);
        assert_eq!(schedule.interval, Duration::from_secs(3600));
        assert!(!schedule.include_insights);

        let zero = RefreshSchedule::from(&RefresherSection {
            enabled: false,
            interval_secs: 0,
            include_insights: true,
        });
        assert!(!zero.enabled);
        assert_eq!(zero.interval, Duration::from_secs(1));
        assert!(zero.include_insights);
    }
}
