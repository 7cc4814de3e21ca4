use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod movie;
pub mod tmdb;

pub use movie::{
    CastDetail, CastMember, ListField, MovieCard, MovieDetails, MovieDetailsRequest, ReviewEntry,
};
pub use tmdb::{TmdbFindResponse, TmdbVideo, TmdbVideosResponse};

/// Binary review sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    /// Maps a classifier label: 1 is positive, anything else negative
    pub fn from_label(label: i64) -> Self {
        if label == 1 {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }

    /// Parses a label persisted by the review store ("Good"/"Bad" or
    /// "positive"/"negative", any case). Unrecognized labels are negative.
    pub fn from_stored(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "good" | "positive" | "1" => Sentiment::Positive,
            _ => Sentiment::Negative,
        }
    }
}

impl Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A review already persisted for a title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredReview {
    pub content: String,
    pub sentiment: Sentiment,
}
