use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    artifacts::ArtifactStatus,
    error::AppResult,
    middleware::RequestId,
    models::{MovieDetails, MovieDetailsRequest, Sentiment},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct SimilarityRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SimilarityResponse {
    pub title: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SentimentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SentimentResponse {
    pub sentiment: Sentiment,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub artifacts: Vec<ArtifactStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

// Handlers

/// Liveness plus per-artifact load state
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        artifacts: state.store.status(),
    })
}

/// Every catalog title, for autocomplete
pub async fn get_titles(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.engine.titles())
}

/// Titles most similar to the requested one
pub async fn similarity(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SimilarityRequest>,
) -> AppResult<Json<SimilarityResponse>> {
    tracing::info!(request_id = %request_id, title = %request.name, "Processing similarity request");

    let recommendations = state.engine.recommend(&request.name)?;

    tracing::info!(
        request_id = %request_id,
        results = recommendations.len(),
        "Similarity request completed"
    );

    Ok(Json(SimilarityResponse {
        title: request.name,
        recommendations,
    }))
}

/// Classifies a single review text
pub async fn sentiment(
    State(state): State<AppState>,
    Json(request): Json<SentimentRequest>,
) -> Json<SentimentResponse> {
    Json(SentimentResponse {
        sentiment: state.classifier.classify(&request.text),
    })
}

/// Assembles the movie page: cards, cast, trailer and classified reviews
pub async fn movie_details(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<MovieDetailsRequest>,
) -> Json<MovieDetails> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        reviews = request.reviews.len(),
        "Assembling movie details"
    );

    Json(state.details.assemble(request).await)
}

pub async fn tmdb_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.metadata.search_movies(&params.query).await?))
}

pub async fn tmdb_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.metadata.movie_details(movie_id).await?))
}

pub async fn tmdb_credits(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.metadata.movie_credits(movie_id).await?))
}

pub async fn tmdb_person(
    State(state): State<AppState>,
    Path(person_id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.metadata.person_details(person_id).await?))
}
