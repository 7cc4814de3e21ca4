use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{MovieDetails, MovieDetailsRequest, ReviewEntry},
    services::{
        lists::{build_cast, build_cast_details, build_movie_cards, parse_id_list, parse_list},
        providers::MetadataProvider,
        reviews::ReviewStore,
        sentiment::SentimentClassifier,
    },
};

/// Assembles the movie page from client-supplied metadata
///
/// Only the sentiment classifier is required. Cards, cast, trailer and
/// stored reviews are best-effort: a failure is logged and the section is
/// left empty.
#[derive(Clone)]
pub struct MovieDetailsService {
    classifier: Arc<SentimentClassifier>,
    metadata: Arc<dyn MetadataProvider>,
    reviews: Arc<dyn ReviewStore>,
}

impl MovieDetailsService {
    pub fn new(
        classifier: Arc<SentimentClassifier>,
        metadata: Arc<dyn MetadataProvider>,
        reviews: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            classifier,
            metadata,
            reviews,
        }
    }

    pub async fn assemble(&self, request: MovieDetailsRequest) -> MovieDetails {
        let movie_cards = best_effort(
            "movie_cards",
            build_movie_cards(
                parse_list(&request.rec_movies),
                parse_list(&request.rec_posters),
            ),
        );

        let names = parse_list(&request.cast_names);
        let ids = parse_id_list(&request.cast_ids);
        let profiles = parse_list(&request.cast_profiles);

        let casts = best_effort(
            "casts",
            build_cast(
                names.clone(),
                ids.clone(),
                parse_list(&request.cast_chars),
                profiles.clone(),
            ),
        );
        let cast_details = best_effort(
            "cast_details",
            build_cast_details(
                names,
                ids,
                profiles,
                parse_list(&request.cast_bdays),
                parse_list(&request.cast_places),
                parse_list(&request.cast_bios),
            ),
        );

        let trailer_key = match request.imdb_id.as_deref() {
            Some(imdb_id) if !imdb_id.trim().is_empty() => {
                self.metadata.find_trailer(imdb_id).await.unwrap_or_else(|e| {
                    tracing::warn!(
                        imdb_id = %imdb_id,
                        provider = self.metadata.name(),
                        error = %e,
                        "Trailer lookup failed"
                    );
                    None
                })
            }
            _ => None,
        };

        let reviews = self.collect_reviews(&request.title, &request.reviews).await;

        MovieDetails {
            title: request.title,
            imdb_id: request.imdb_id,
            poster: request.poster,
            genres: request.genres,
            overview: request.overview,
            rating: request.rating,
            vote_count: request.vote_count,
            release_date: request.release_date,
            runtime: request.runtime,
            status: request.status,
            movie_cards,
            casts,
            cast_details,
            trailer_key,
            reviews,
        }
    }

    /// Stored reviews first, then freshly classified texts
    async fn collect_reviews(&self, title: &str, fresh: &[String]) -> Vec<ReviewEntry> {
        let stored = self.reviews.reviews_for_title(title).await.unwrap_or_else(|e| {
            tracing::warn!(title = %title, error = %e, "Stored review lookup failed");
            Vec::new()
        });

        let mut entries: Vec<ReviewEntry> = stored
            .into_iter()
            .map(|review| ReviewEntry {
                text: review.content,
                sentiment: review.sentiment,
            })
            .collect();

        for text in fresh {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            entries.push(ReviewEntry {
                text: text.to_string(),
                sentiment: self.classifier.classify(text),
            });
        }

        entries
    }
}

fn best_effort<T>(section: &str, result: AppResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(section = %section, error = %e, "Dropping movie page section");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        artifacts::{SentimentModel, Vectorizer},
        error::AppError,
        models::{ListField, Sentiment, StoredReview},
        services::{providers::MockMetadataProvider, reviews::MockReviewStore},
    };
    use mockall::predicate::eq;
    use std::collections::HashMap;

    fn classifier() -> Arc<SentimentClassifier> {
        let vocabulary: HashMap<String, usize> = [("great", 0), ("dull", 1)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        let model = SentimentModel::Linear {
            classes: vec![0, 1],
            coef: vec![1.0, -1.0],
            intercept: 0.0,
        };
        Arc::new(
            SentimentClassifier::new(
                Arc::new(Vectorizer::new(vocabulary).unwrap()),
                Arc::new(model),
            )
            .unwrap(),
        )
    }

    fn encoded(raw: &str) -> ListField {
        ListField::Encoded(raw.to_string())
    }

    fn request() -> MovieDetailsRequest {
        MovieDetailsRequest {
            title: "Heat".to_string(),
            imdb_id: Some("tt0113277".to_string()),
            rec_movies: encoded(r#"["Ronin","Collateral"]"#),
            rec_posters: encoded(r#"["/ronin.jpg","/collateral.jpg"]"#),
            cast_ids: "[1158,380]".to_string(),
            cast_names: encoded(r#"["Al Pacino","Robert De Niro"]"#),
            cast_chars: encoded(r#"["Vincent Hanna","Neil McCauley"]"#),
            cast_profiles: encoded(r#"["/pacino.jpg","/deniro.jpg"]"#),
            cast_bdays: encoded(r#"["1940-04-25","1943-08-17"]"#),
            cast_places: encoded(r#"["New York","New York"]"#),
            cast_bios: encoded(r#"["Actor.\nDirector.","Actor."]"#),
            reviews: vec![
                "A great heist film".to_string(),
                "   ".to_string(),
                "dull and long".to_string(),
            ],
            ..Default::default()
        }
    }

    fn stored_reviews() -> MockReviewStore {
        let mut store = MockReviewStore::new();
        store
            .expect_reviews_for_title()
            .with(eq("Heat"))
            .returning(|_| {
                Ok(vec![StoredReview {
                    content: "Saw it twice".to_string(),
                    sentiment: Sentiment::Positive,
                }])
            });
        store
    }

    #[tokio::test]
    async fn test_assemble_full_page() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_find_trailer()
            .with(eq("tt0113277"))
            .times(1)
            .returning(|_| Ok(Some("2GfZl4kuVNI".to_string())));
        metadata.expect_name().return_const("mock");

        let service =
            MovieDetailsService::new(classifier(), Arc::new(metadata), Arc::new(stored_reviews()));
        let details = service.assemble(request()).await;

        assert_eq!(details.title, "Heat");
        assert_eq!(details.movie_cards.len(), 2);
        assert_eq!(details.movie_cards[1].poster, "/collateral.jpg");
        assert_eq!(details.casts.len(), 2);
        assert_eq!(details.casts[0].id, 1158);
        assert_eq!(details.cast_details[0].biography, "Actor.\nDirector.");
        assert_eq!(details.trailer_key.as_deref(), Some("2GfZl4kuVNI"));

        let reviews: Vec<(&str, Sentiment)> = details
            .reviews
            .iter()
            .map(|r| (r.text.as_str(), r.sentiment))
            .collect();
        assert_eq!(
            reviews,
            vec![
                ("Saw it twice", Sentiment::Positive),
                ("A great heist film", Sentiment::Positive),
                ("dull and long", Sentiment::Negative),
            ]
        );
    }

    #[tokio::test]
    async fn test_enrichment_failures_are_dropped() {
        let mut metadata = MockMetadataProvider::new();
        metadata
            .expect_find_trailer()
            .returning(|_| Err(AppError::ExternalApi("TMDB down".to_string())));
        metadata.expect_name().return_const("mock");

        let mut store = MockReviewStore::new();
        store
            .expect_reviews_for_title()
            .returning(|_| Err(AppError::Internal("db down".to_string())));

        let mut request = request();
        request.cast_ids = "[1158]".to_string();
        request.rec_posters = encoded("not a list");

        let service = MovieDetailsService::new(classifier(), Arc::new(metadata), Arc::new(store));
        let details = service.assemble(request).await;

        assert!(details.movie_cards.is_empty());
        assert!(details.casts.is_empty());
        assert!(details.cast_details.is_empty());
        assert_eq!(details.trailer_key, None);
        assert_eq!(details.reviews.len(), 2);
    }

    #[tokio::test]
    async fn test_no_imdb_id_skips_trailer_lookup() {
        let mut metadata = MockMetadataProvider::new();
        metadata.expect_find_trailer().never();

        let mut request = request();
        request.imdb_id = None;

        let service =
            MovieDetailsService::new(classifier(), Arc::new(metadata), Arc::new(stored_reviews()));
        let details = service.assemble(request).await;
        assert_eq!(details.trailer_key, None);
    }
}
