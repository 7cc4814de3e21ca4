use std::sync::Arc;

use crate::{
    artifacts::{ArtifactStore, SentimentModel, Vectorizer},
    error::{AppError, AppResult},
    models::Sentiment,
};

/// Review sentiment inference
///
/// Shares the recommendation pipeline's fitted vectorizer but feeds its
/// sparse output straight to the classifier, with no dimensionality
/// reduction.
#[derive(Clone)]
pub struct SentimentClassifier {
    vectorizer: Arc<Vectorizer>,
    model: Arc<SentimentModel>,
}

impl SentimentClassifier {
    pub fn new(vectorizer: Arc<Vectorizer>, model: Arc<SentimentModel>) -> AppResult<Self> {
        if model.n_features() != vectorizer.vocabulary_size() {
            return Err(AppError::ModelUnavailable(format!(
                "Sentiment model expects {} features but the vectorizer produces {}",
                model.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        Ok(Self { vectorizer, model })
    }

    pub async fn from_store(store: &ArtifactStore) -> AppResult<Self> {
        let vectorizer = store.vectorizer().await?;
        let model = store.sentiment_model().await?;
        Self::new(vectorizer, model)
    }

    /// Label 1 is positive, every other label negative. Empty text is valid
    /// and classified from the model's bias alone.
    pub fn classify(&self, text: &str) -> Sentiment {
        let row = self.vectorizer.transform(text);
        let label = self.model.predict(&row);
        tracing::trace!(terms = row.nnz(), label, "Review classified");
        Sentiment::from_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn classifier(intercept: f64) -> SentimentClassifier {
        let vocabulary: HashMap<String, usize> = [("loved", 0), ("boring", 1), ("plot", 2)]
            .into_iter()
            .map(|(t, i)| (t.to_string(), i))
            .collect();
        let model = SentimentModel::Linear {
            classes: vec![0, 1],
            coef: vec![2.0, -2.0, 0.0],
            intercept,
        };
        SentimentClassifier::new(
            Arc::new(Vectorizer::new(vocabulary).unwrap()),
            Arc::new(model),
        )
        .unwrap()
    }

    #[test]
    fn test_classify_positive_and_negative() {
        let classifier = classifier(0.0);
        assert_eq!(classifier.classify("I loved it"), Sentiment::Positive);
        assert_eq!(classifier.classify("Boring plot, boring cast"), Sentiment::Negative);
    }

    #[test]
    fn test_empty_text_has_defined_label() {
        assert_eq!(classifier(0.5).classify(""), Sentiment::Positive);
        assert_eq!(classifier(-0.5).classify(""), Sentiment::Negative);
        assert_eq!(classifier(0.5).classify("   "), Sentiment::Positive);
    }

    #[test]
    fn test_classify_is_stable() {
        let classifier = classifier(0.0);
        let text = "loved the plot but the ending was boring";
        let first = classifier.classify(text);
        for _ in 0..10 {
            assert_eq!(classifier.classify(text), first);
        }
    }

    #[test]
    fn test_non_binary_labels_map_to_negative() {
        let vocabulary: HashMap<String, usize> =
            [("ok".to_string(), 0)].into_iter().collect();
        let model = SentimentModel::Linear {
            classes: vec![-1, 2],
            coef: vec![1.0],
            intercept: 0.0,
        };
        let classifier = SentimentClassifier::new(
            Arc::new(Vectorizer::new(vocabulary).unwrap()),
            Arc::new(model),
        )
        .unwrap();
        assert_eq!(classifier.classify("ok"), Sentiment::Negative);
    }

    #[test]
    fn test_rejects_width_mismatch() {
        let vocabulary: HashMap<String, usize> =
            [("ok".to_string(), 0)].into_iter().collect();
        let model = SentimentModel::Linear {
            classes: vec![0, 1],
            coef: vec![1.0, 1.0],
            intercept: 0.0,
        };
        let result = SentimentClassifier::new(
            Arc::new(Vectorizer::new(vocabulary).unwrap()),
            Arc::new(model),
        );
        assert!(matches!(result, Err(AppError::ModelUnavailable(_))));
    }
}
