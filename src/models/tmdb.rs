//! TMDB response fragments the service reads directly. Search, details,
//! credits and person payloads are passed through as JSON.

use serde::{Deserialize, Serialize};

/// Response of `/find/{imdb_id}?external_source=imdb_id`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbFindResponse {
    #[serde(default)]
    pub movie_results: Vec<TmdbFindResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbFindResult {
    pub id: u64,
}

/// Response of `/movie/{id}/videos`
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideosResponse {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_response_deserialization() {
        let json = r#"{
            "movie_results": [{"id": 27205, "title": "Inception"}],
            "tv_results": []
        }"#;
        let response: TmdbFindResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.movie_results[0].id, 27205);
    }

    #[test]
    fn test_videos_response_deserialization() {
        let json = r#"{
            "id": 27205,
            "results": [
                {"key": "YoHD9XEInc0", "site": "YouTube", "type": "Trailer", "name": "Official Trailer"}
            ]
        }"#;
        let response: TmdbVideosResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].video_type, "Trailer");
    }
}
