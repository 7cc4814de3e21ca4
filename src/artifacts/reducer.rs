//! Fitted linear projection from the sparse term space to dense embeddings.

use serde::Deserialize;

use super::vectorizer::SparseVector;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize)]
struct ReducerFile {
    components: Vec<Vec<f32>>,
}

/// Truncated-SVD style projection: `embedding = x · componentsᵀ`
#[derive(Debug, Clone)]
pub struct Reducer {
    n_features: usize,
    n_components: usize,
    /// Row-major `n_components × n_features`
    components: Vec<f32>,
}

impl Reducer {
    /// Builds a reducer from one row per output component
    pub fn new(components: Vec<Vec<f32>>) -> AppResult<Self> {
        let n_components = components.len();
        let n_features = components.first().map(Vec::len).unwrap_or(0);
        if n_components == 0 || n_features == 0 {
            return Err(AppError::ModelUnavailable(
                "Reducer has no components".to_string(),
            ));
        }

        let mut flat = Vec::with_capacity(n_components * n_features);
        for (i, row) in components.into_iter().enumerate() {
            if row.len() != n_features {
                return Err(AppError::ModelUnavailable(format!(
                    "Reducer component {} has {} features, expected {}",
                    i,
                    row.len(),
                    n_features
                )));
            }
            flat.extend(row);
        }

        if let Some(position) = flat.iter().position(|v| !v.is_finite()) {
            return Err(AppError::ModelUnavailable(format!(
                "Reducer value at position {} is not finite",
                position
            )));
        }

        Ok(Self {
            n_features,
            n_components,
            components: flat,
        })
    }

    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let file: ReducerFile = serde_json::from_slice(bytes)
            .map_err(|e| AppError::ModelUnavailable(format!("Failed to parse reducer: {}", e)))?;
        Self::new(file.components)
    }

    /// Input width, must match the vectorizer vocabulary
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Output width, must match the ANN index dimension
    pub fn n_components(&self) -> usize {
        self.n_components
    }

    /// Projects a sparse row, accumulating in f64 and casting the result to f32
    pub fn transform(&self, row: &SparseVector) -> AppResult<Vec<f32>> {
        if let Some(&column) = row.indices.iter().find(|&&c| c >= self.n_features) {
            return Err(AppError::Internal(format!(
                "Sparse column {} exceeds reducer width {}",
                column, self.n_features
            )));
        }

        let embedding = self
            .components
            .chunks_exact(self.n_features)
            .map(|component| {
                row.iter()
                    .map(|(column, value)| f64::from(value) * f64::from(component[column]))
                    .sum::<f64>() as f32
            })
            .collect();

        Ok(embedding)
    }
}
