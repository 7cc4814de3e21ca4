//! Fitted binary text classifier over the vectorizer's sparse output.

use serde::Deserialize;

use super::vectorizer::SparseVector;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SentimentModel {
    /// Multinomial naive Bayes: argmax of `class_log_prior + x · feature_log_probᵀ`
    MultinomialNb {
        classes: Vec<i64>,
        class_log_prior: Vec<f64>,
        feature_log_prob: Vec<Vec<f64>>,
    },
    /// Linear decision function: `x · coef + intercept > 0` picks `classes[1]`
    Linear {
        classes: Vec<i64>,
        coef: Vec<f64>,
        intercept: f64,
    },
}

impl SentimentModel {
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let model: SentimentModel = serde_json::from_slice(bytes).map_err(|e| {
            AppError::ModelUnavailable(format!("Failed to parse sentiment model: {}", e))
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> AppResult<()> {
        let n_features = self.n_features();
        match self {
            SentimentModel::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                if classes.is_empty()
                    || class_log_prior.len() != classes.len()
                    || feature_log_prob.len() != classes.len()
                {
                    return Err(AppError::ModelUnavailable(
                        "Naive Bayes parameters disagree on the number of classes".to_string(),
                    ));
                }
                if feature_log_prob.iter().any(|row| row.len() != n_features) {
                    return Err(AppError::ModelUnavailable(
                        "Naive Bayes feature rows have different widths".to_string(),
                    ));
                }
            }
            SentimentModel::Linear { classes, .. } => {
                if classes.len() != 2 {
                    return Err(AppError::ModelUnavailable(format!(
                        "Linear sentiment model needs 2 classes, found {}",
                        classes.len()
                    )));
                }
            }
        }
        if n_features == 0 {
            return Err(AppError::ModelUnavailable(
                "Sentiment model has no features".to_string(),
            ));
        }
        Ok(())
    }

    /// Width of the input space, must match the vectorizer vocabulary
    pub fn n_features(&self) -> usize {
        match self {
            SentimentModel::MultinomialNb {
                feature_log_prob, ..
            } => feature_log_prob.first().map(Vec::len).unwrap_or(0),
            SentimentModel::Linear { coef, .. } => coef.len(),
        }
    }

    /// Predicts the class label of one sparse row
    pub fn predict(&self, row: &SparseVector) -> i64 {
        match self {
            SentimentModel::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                let mut best = 0;
                let mut best_score = f64::NEG_INFINITY;
                for (class, (prior, log_prob)) in
                    class_log_prior.iter().zip(feature_log_prob).enumerate()
                {
                    let score = prior
                        + row
                            .iter()
                            .map(|(column, value)| f64::from(value) * log_prob[column])
                            .sum::<f64>();
                    // Strict comparison: the first class wins ties.
                    if score > best_score {
                        best = class;
                        best_score = score;
                    }
                }
                classes[best]
            }
            SentimentModel::Linear {
                classes,
                coef,
                intercept,
            } => {
                let decision = intercept
                    + row
                        .iter()
                        .map(|(column, value)| f64::from(value) * coef[column])
                        .sum::<f64>();
                if decision > 0.0 {
                    classes[1]
                } else {
                    classes[0]
                }
            }
        }
    }
}
