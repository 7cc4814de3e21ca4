use std::sync::Arc;

use crate::{
    artifacts::ArtifactStore,
    config::Config,
    db::{create_pool, create_redis_client, Cache, CacheWriterHandle, PgReviewStore},
    error::AppResult,
    services::{
        InMemoryReviewStore, MetadataProvider, MovieDetailsService, RecommendationEngine,
        ReviewStore, SentimentClassifier, TmdbProvider,
    },
};

/// Shared application state
///
/// Everything here is immutable once built, so handlers clone it freely.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ArtifactStore>,
    pub engine: RecommendationEngine,
    pub classifier: Arc<SentimentClassifier>,
    pub details: MovieDetailsService,
    pub metadata: Arc<dyn MetadataProvider>,
}

impl AppState {
    /// Builds the state from an artifact store and the two collaborators.
    ///
    /// Loads every artifact first, so a missing or corrupt one fails here
    /// rather than on the first request.
    pub async fn new(
        store: Arc<ArtifactStore>,
        metadata: Arc<dyn MetadataProvider>,
        reviews: Arc<dyn ReviewStore>,
    ) -> AppResult<Self> {
        store.preload().await?;

        let engine = RecommendationEngine::from_store(&store).await?;
        let classifier = Arc::new(SentimentClassifier::from_store(&store).await?);
        let details = MovieDetailsService::new(classifier.clone(), metadata.clone(), reviews);

        Ok(Self {
            store,
            engine,
            classifier,
            details,
            metadata,
        })
    }

    /// Wires the production collaborators from configuration.
    ///
    /// Redis and Postgres are optional: without them provider responses are
    /// not cached and no stored reviews are shown.
    pub async fn from_config(config: &Config) -> anyhow::Result<(Self, CacheWriterHandle)> {
        let (cache, cache_handle) = match &config.redis_url {
            Some(url) => {
                tracing::info!("Redis cache enabled");
                Cache::new(create_redis_client(url)?)
            }
            None => {
                tracing::info!("REDIS_URL not set; provider responses are not cached");
                Cache::disabled()
            }
        };

        let reviews: Arc<dyn ReviewStore> = match &config.database_url {
            Some(url) => {
                let pool = create_pool(url).await?;
                tracing::info!("Stored reviews served from PostgreSQL");
                Arc::new(PgReviewStore::new(pool))
            }
            None => {
                tracing::info!("DATABASE_URL not set; no stored reviews");
                Arc::new(InMemoryReviewStore::new())
            }
        };

        let metadata: Arc<dyn MetadataProvider> = Arc::new(TmdbProvider::new(
            cache,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        ));

        let store = Arc::new(ArtifactStore::new(config.artifacts_dir.clone()));
        let state = Self::new(store, metadata, reviews).await?;

        Ok((state, cache_handle))
    }
}
