/// TMDB API provider
///
/// Backs the metadata proxy endpoints and trailer lookup.
///
/// Trailer flow:
/// 1. `/find/{imdb_id}?external_source=imdb_id` → TMDB movie ID
/// 2. `/movie/{id}/videos` → YouTube videos, best one picked by type
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{TmdbFindResponse, TmdbVideo, TmdbVideosResponse},
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde_json::Value;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const TRAILER_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(cache: Cache, api_key: Option<String>, api_url: String) -> Self {
        if api_key.is_none() {
            tracing::warn!("TMDB_API_KEY not set; metadata proxies and trailers are disabled");
        }
        tracing::debug!(cached = cache.is_enabled(), "TMDB provider configured");

        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        }
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::ExternalApi("TMDB_API_KEY is not configured".to_string()))
    }

    /// GETs `path` with the API key and extra query parameters
    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let api_key = self.api_key()?;
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", api_key)])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {} for {}: {}",
                status, path, body
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_trailer(&self, imdb_id: &str) -> AppResult<Option<String>> {
        let found: TmdbFindResponse = self
            .get(
                &format!("/find/{}", imdb_id),
                &[("external_source", "imdb_id")],
            )
            .await?;

        let Some(movie) = found.movie_results.first() else {
            tracing::debug!(imdb_id = %imdb_id, "No TMDB movie for IMDB ID");
            return Ok(None);
        };

        let videos: TmdbVideosResponse =
            self.get(&format!("/movie/{}/videos", movie.id), &[]).await?;

        let key = pick_trailer(&videos.results);
        tracing::info!(
            imdb_id = %imdb_id,
            tmdb_id = movie.id,
            videos = videos.results.len(),
            found = key.is_some(),
            provider = "tmdb",
            "Trailer lookup completed"
        );

        Ok(key)
    }
}

/// Picks a YouTube video: the first trailer, else the first teaser, else
/// the first YouTube video of any type
pub fn pick_trailer(videos: &[TmdbVideo]) -> Option<String> {
    let youtube: Vec<&TmdbVideo> = videos.iter().filter(|v| v.site == "YouTube").collect();

    ["Trailer", "Teaser"]
        .iter()
        .find_map(|wanted| youtube.iter().find(|v| v.video_type == *wanted))
        .or_else(|| youtube.first())
        .map(|v| v.key.clone())
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn search_movies(&self, query: &str) -> AppResult<Value> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch(query.to_string()),
            SEARCH_CACHE_TTL,
            async move { self.get("/search/movie", &[("query", query)]).await }
        )
    }

    async fn movie_details(&self, movie_id: u64) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move { self.get(&format!("/movie/{}", movie_id), &[]).await }
        )
    }

    async fn movie_credits(&self, movie_id: u64) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::MovieCredits(movie_id),
            DETAILS_CACHE_TTL,
            async move { self.get(&format!("/movie/{}/credits", movie_id), &[]).await }
        )
    }

    async fn person_details(&self, person_id: u64) -> AppResult<Value> {
        cached!(
            self.cache,
            CacheKey::Person(person_id),
            DETAILS_CACHE_TTL,
            async move { self.get(&format!("/person/{}", person_id), &[]).await }
        )
    }

    async fn find_trailer(&self, imdb_id: &str) -> AppResult<Option<String>> {
        if self.api_key.is_none() {
            tracing::error!("TMDB_API_KEY not found; skipping trailer lookup");
            return Ok(None);
        }

        cached!(
            self.cache,
            CacheKey::Trailer(imdb_id.to_string()),
            TRAILER_CACHE_TTL,
            self.fetch_trailer(imdb_id)
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
