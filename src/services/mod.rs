pub mod lists;
pub mod movie_details;
pub mod providers;
pub mod recommendations;
pub mod reviews;
pub mod sentiment;

pub use movie_details::MovieDetailsService;
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::RecommendationEngine;
pub use reviews::{InMemoryReviewStore, ReviewStore};
pub use sentiment::SentimentClassifier;
