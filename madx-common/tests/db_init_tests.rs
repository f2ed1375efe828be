//! Unit tests for database initialization

use madx_common::db::init_database;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("nested").join("madx.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("madx.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await;
    assert!(pool2.is_ok(), "Failed to open existing database: {:?}", pool2.err());
}

#[tokio::test]
async fn test_mirror_tables_created() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("madx.db")).await.unwrap();

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in ["ads", "adsets", "campaigns"] {
        assert!(
            tables.iter().any(|t| t == expected),
            "missing table {expected}, found {tables:?}"
        );
    }
}

#[tokio::test]
async fn test_adsets_cascade_with_campaign() {
    let dir = tempfile::tempdir().unwrap();
    let pool = init_database(&dir.path().join("madx.db")).await.unwrap();

    sqlx::query("INSERT INTO campaigns (id, account_id) VALUES ('c1', '1')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO adsets (id, campaign_id) VALUES ('s1', 'c1')")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("DELETE FROM campaigns WHERE id = 'c1'")
        .execute(&pool)
        .await
        .unwrap();

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM adsets")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}
