//! Local mirror of the campaign tree
//!
//! Upserts keyed by platform id. The platform is the source of truth: every
//! refresh overwrites names and parents. Spend and ROAS are only overwritten
//! when the refresh carried insights, so an un-enriched sync keeps the last
//! known metrics.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::models::{AccountTree, AdSetNode, CampaignNode};

/// Rows written by one [`store_tree`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorStats {
    pub campaigns: usize,
    pub adsets: usize,
    pub ads: usize,
}

/// Campaign row with child counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MirroredCampaign {
    pub id: String,
    pub account_id: String,
    pub name: Option<String>,
    pub objective: Option<String>,
    pub spend: Option<f64>,
    pub roas: Option<f64>,
    pub synced_at: String,
    pub adset_count: i64,
    pub ad_count: i64,
}

/// Store a full tree in one transaction
pub async fn store_tree(pool: &SqlitePool, tree: &[AccountTree]) -> Result<MirrorStats> {
    let synced_at = Utc::now().to_rfc3339();
    let mut stats = MirrorStats::default();
    let mut tx = pool.begin().await?;

    for account in tree {
        for campaign in &account.campaigns {
            upsert_campaign(&mut tx, &account.account_id, campaign, &synced_at).await?;
            stats.campaigns += 1;

            for adset in &campaign.adsets {
                upsert_adset(&mut tx, &campaign.id, adset, &synced_at).await?;
                stats.adsets += 1;
                stats.ads += upsert_ads(&mut tx, adset, &synced_at).await?;
            }
        }
    }

    tx.commit().await?;

    tracing::info!(
        campaigns = stats.campaigns,
        adsets = stats.adsets,
        ads = stats.ads,
        "Campaign tree stored in mirror"
    );

    Ok(stats)
}

async fn upsert_campaign(
    tx: &mut Transaction<'_, Sqlite>,
    account_id: &str,
    campaign: &CampaignNode,
    synced_at: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO campaigns (id, account_id, name, objective, spend, roas, synced_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            account_id = excluded.account_id,
            name = excluded.name,
            objective = excluded.objective,
            spend = COALESCE(excluded.spend, campaigns.spend),
            roas = COALESCE(excluded.roas, campaigns.roas),
            synced_at = excluded.synced_at
        "#,
    )
    .bind(&campaign.id)
    .bind(account_id)
    .bind(&campaign.name)
    .bind(&campaign.objective)
    .bind(campaign.insights.map(|i| i.spend))
    .bind(campaign.insights.map(|i| i.roas))
    .bind(synced_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn upsert_adset(
    tx: &mut Transaction<'_, Sqlite>,
    campaign_id: &str,
    adset: &AdSetNode,
    synced_at: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO adsets (id, campaign_id, name, synced_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            campaign_id = excluded.campaign_id,
            name = excluded.name,
            synced_at = excluded.synced_at
        "#,
    )
    .bind(&adset.id)
    .bind(campaign_id)
    .bind(&adset.name)
    .bind(synced_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Ads without an id cannot be keyed and are skipped
async fn upsert_ads(
    tx: &mut Transaction<'_, Sqlite>,
    adset: &AdSetNode,
    synced_at: &str,
) -> Result<usize> {
    let mut stored = 0;

    for ad in &adset.ads {
        let Some(ad_id) = ad.id.as_deref() else {
            continue;
        };

        sqlx::query(
            r#"
            INSERT INTO ads (id, adset_id, name, synced_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                adset_id = excluded.adset_id,
                name = excluded.name,
                synced_at = excluded.synced_at
            "#,
        )
        .bind(ad_id)
        .bind(&adset.id)
        .bind(&ad.name)
        .bind(synced_at)
        .execute(&mut **tx)
        .await?;

        stored += 1;
    }

    Ok(stored)
}

/// All mirrored campaigns ordered by account then id
pub async fn list_campaigns(pool: &SqlitePool) -> Result<Vec<MirroredCampaign>> {
    let rows = sqlx::query(
        r#"
        SELECT
            c.id, c.account_id, c.name, c.objective, c.spend, c.roas,
            CAST(c.synced_at AS TEXT) AS synced_at,
            (SELECT COUNT(*) FROM adsets s WHERE s.campaign_id = c.id) AS adset_count,
            (SELECT COUNT(*) FROM ads a JOIN adsets s ON a.adset_id = s.id
                WHERE s.campaign_id = c.id) AS ad_count
        FROM campaigns c
        ORDER BY c.account_id, c.id
        "#,
    )
    .fetch_all(pool)
    .await?;

    let campaigns = rows
        .into_iter()
        .map(|row| MirroredCampaign {
            id: row.get("id"),
            account_id: row.get("account_id"),
            name: row.get("name"),
            objective: row.get("objective"),
            spend: row.get("spend"),
            roas: row.get("roas"),
            synced_at: row.get("synced_at"),
            adset_count: row.get("adset_count"),
            ad_count: row.get("ad_count"),
        })
        .collect();

    Ok(campaigns)
}
