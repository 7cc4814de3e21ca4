use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    error::AppResult,
    models::{Sentiment, StoredReview},
    services::reviews::ReviewStore,
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Reads stored reviews from the `reviews` table
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ReviewStore for PgReviewStore {
    async fn reviews_for_title(&self, title: &str) -> AppResult<Vec<StoredReview>> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT content, sentiment
            FROM reviews
            WHERE lower(movie_title) = lower($1)
            ORDER BY id
            "#,
        )
        .bind(title.trim())
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(title = %title, reviews = rows.len(), "Loaded stored reviews");

        Ok(rows
            .into_iter()
            .map(|(content, sentiment)| StoredReview {
                content,
                sentiment: Sentiment::from_stored(&sentiment),
            })
            .collect())
    }
}
