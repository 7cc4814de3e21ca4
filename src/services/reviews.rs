use std::collections::HashMap;

use crate::{
    artifacts::catalog::normalize_title,
    error::AppResult,
    models::StoredReview,
};

/// Read access to reviews users have already written
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ReviewStore: Send + Sync {
    /// Stored reviews for a title (case-insensitive match), oldest first
    async fn reviews_for_title(&self, title: &str) -> AppResult<Vec<StoredReview>>;
}

/// Review store held in memory, keyed by normalized title
#[derive(Debug, Default, Clone)]
pub struct InMemoryReviewStore {
    reviews: HashMap<String, Vec<StoredReview>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, title: &str, review: StoredReview) {
        self.reviews
            .entry(normalize_title(title))
            .or_default()
            .push(review);
    }
}

#[async_trait::async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn reviews_for_title(&self, title: &str) -> AppResult<Vec<StoredReview>> {
        Ok(self
            .reviews
            .get(&normalize_title(title))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    #[tokio::test]
    async fn test_in_memory_lookup_ignores_case() {
        let mut store = InMemoryReviewStore::new();
        store.insert(
            "Heat",
            StoredReview {
                content: "Best shootout ever".to_string(),
                sentiment: Sentiment::Positive,
            },
        );
        store.insert(
            "HEAT",
            StoredReview {
                content: "Too long".to_string(),
                sentiment: Sentiment::Negative,
            },
        );

        let reviews = store.reviews_for_title(" heat ").await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].content, "Best shootout ever");
        assert!(store.reviews_for_title("Ronin").await.unwrap().is_empty());
    }
}
