use crate::models::HistoryRecord;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when writing search history
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
}

/// Append-only sink for search history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn record(&self, record: &HistoryRecord) -> Result<(), HistoryError>;

    async fn health_check(&self) -> bool {
        true
    }
}

/// Search history kept in PostgreSQL
pub struct PostgresHistory {
    pool: PgPool,
}

impl PostgresHistory {
    /// Connect and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_secs: u64,
        idle_timeout_secs: u64,
    ) -> Result<Self, HistoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(idle_timeout_secs))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, HistoryError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            acquire_timeout_secs.unwrap_or(5),
            idle_timeout_secs.unwrap_or(600),
        )
        .await
    }
}

#[async_trait]
impl HistoryStore for PostgresHistory {
    async fn record(&self, record: &HistoryRecord) -> Result<(), HistoryError> {
        let query = r#"
            INSERT INTO search_history (id, user_id, query, filters, created_at)
            VALUES ($1, $2, $3, $4, $5)
        "#;

        sqlx::query(query)
            .bind(record.id)
            .bind(&record.user_id)
            .bind(&record.query)
            .bind(Json(&record.filters))
            .bind(record.created_at)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Recorded search history {} for user {}", record.id, record.user_id);

        Ok(())
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}
