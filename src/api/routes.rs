use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Outermost first: the request ID must exist before the trace span opens.
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/titles", get(handlers::get_titles))
        .route("/similarity", post(handlers::similarity))
        .route("/sentiment", post(handlers::sentiment))
        .route("/movies/details", post(handlers::movie_details))
        // Metadata proxies
        .route("/tmdb/search", get(handlers::tmdb_search))
        .route("/tmdb/movie/:id", get(handlers::tmdb_movie))
        .route("/tmdb/movie/:id/credits", get(handlers::tmdb_credits))
        .route("/tmdb/person/:id", get(handlers::tmdb_person))
}
