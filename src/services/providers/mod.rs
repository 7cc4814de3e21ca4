/// Movie metadata provider abstraction
///
/// The service never depends on a provider for recommendations or sentiment.
/// Provider data only enriches movie pages and backs the metadata proxy
/// endpoints, so every failure here is recoverable.
use serde_json::Value;

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text movie search, returned as the provider's JSON payload
    async fn search_movies(&self, query: &str) -> AppResult<Value>;

    /// Movie details by provider ID
    async fn movie_details(&self, movie_id: u64) -> AppResult<Value>;

    /// Cast and crew by provider movie ID
    async fn movie_credits(&self, movie_id: u64) -> AppResult<Value>;

    /// Person details by provider ID
    async fn person_details(&self, person_id: u64) -> AppResult<Value>;

    /// YouTube key of the best trailer for an IMDB title, if any
    async fn find_trailer(&self, imdb_id: &str) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
