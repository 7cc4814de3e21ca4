use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned when a requested title is not in the catalog.
pub const MOVIE_NOT_AVAILABLE: &str = "Sorry! The movie you requested for is not available.";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Requested title is not in the catalog. Expected and user-facing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A persisted model artifact is missing, corrupt or inconsistent
    /// with the others. Recommendation and sentiment requests cannot be
    /// served until this is resolved.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// Boundary data (list-encoded form fields, parallel sequences) could
    /// not be interpreted.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Not-found error carrying the fixed user-facing message.
    pub fn movie_not_available() -> Self {
        AppError::NotFound(MOVIE_NOT_AVAILABLE.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ModelUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            AppError::MalformedInput(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::Cache(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::HttpClient(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::movie_not_available().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_model_unavailable_maps_to_503() {
        let response = AppError::ModelUnavailable("catalog.json missing".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_malformed_input_maps_to_422() {
        let response = AppError::MalformedInput("3 names, 2 ids".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_not_available_message() {
        let err = AppError::movie_not_available();
        assert_eq!(
            err.to_string(),
            "Not found: Sorry! The movie you requested for is not available."
        );
    }
}
