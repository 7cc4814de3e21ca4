use serde::{Deserialize, Serialize};

use super::Sentiment;

/// A list-valued field that may arrive either as a JSON array or as the
/// stringified `["a","b"]` form produced by the browser client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ListField {
    Native(Vec<String>),
    Encoded(String),
}

impl Default for ListField {
    fn default() -> Self {
        ListField::Native(Vec::new())
    }
}

/// Movie page assembly request. The movie fields come from the metadata
/// provider via the client; the list fields are list-encoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetailsRequest {
    pub title: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub genres: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub vote_count: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rec_movies: ListField,
    #[serde(default)]
    pub rec_posters: ListField,
    /// Bracketed numeric list, e.g. `[6193,24045]`
    #[serde(default)]
    pub cast_ids: String,
    #[serde(default)]
    pub cast_names: ListField,
    #[serde(default)]
    pub cast_chars: ListField,
    #[serde(default)]
    pub cast_profiles: ListField,
    #[serde(default)]
    pub cast_bdays: ListField,
    #[serde(default)]
    pub cast_places: ListField,
    #[serde(default)]
    pub cast_bios: ListField,
    /// Review texts already extracted from a third-party page
    #[serde(default)]
    pub reviews: Vec<String>,
}

/// A recommended movie with its poster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieCard {
    pub title: String,
    pub poster: String,
}

/// Cast member as shown on the movie page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastMember {
    pub name: String,
    pub id: u64,
    pub character: String,
    pub profile: String,
}

/// Cast member with biography details
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CastDetail {
    pub name: String,
    pub id: u64,
    pub profile: String,
    pub birthday: String,
    pub place_of_birth: String,
    pub biography: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewEntry {
    pub text: String,
    pub sentiment: Sentiment,
}

/// Assembled movie page
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetails {
    pub title: String,
    pub imdb_id: Option<String>,
    pub poster: Option<String>,
    pub genres: Option<String>,
    pub overview: Option<String>,
    pub rating: Option<String>,
    pub vote_count: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<String>,
    pub status: Option<String>,
    pub movie_cards: Vec<MovieCard>,
    pub casts: Vec<CastMember>,
    pub cast_details: Vec<CastDetail>,
    pub trailer_key: Option<String>,
    pub reviews: Vec<ReviewEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_field_accepts_array_or_string() {
        let native: ListField = serde_json::from_str(r#"["Heat", "Ronin"]"#).unwrap();
        assert_eq!(
            native,
            ListField::Native(vec!["Heat".to_string(), "Ronin".to_string()])
        );

        let encoded: ListField = serde_json::from_str(r#""[\"Heat\",\"Ronin\"]""#).unwrap();
        assert_eq!(encoded, ListField::Encoded(r#"["Heat","Ronin"]"#.to_string()));
    }

    #[test]
    fn test_details_request_defaults() {
        let request: MovieDetailsRequest =
            serde_json::from_str(r#"{"title": "Heat"}"#).unwrap();
        assert_eq!(request.title, "Heat");
        assert_eq!(request.rec_movies, ListField::default());
        assert!(request.cast_ids.is_empty());
        assert!(request.reviews.is_empty());
    }
}
