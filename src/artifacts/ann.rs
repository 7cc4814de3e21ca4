//! Exact inner-product index over L2-normalized embeddings.
//!
//! Entry `i` is the embedding of catalog row `i`. With unit vectors the
//! inner product is the cosine similarity, so the self match of a catalog
//! movie scores 1.0.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Allowed deviation from unit length for stored entries
const UNIT_NORM_TOLERANCE: f32 = 1e-3;

/// One search hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Catalog index of the stored entry
    pub id: usize,
    /// Inner product with the query
    pub score: f32,
}

#[derive(Debug, Deserialize)]
struct AnnIndexFile {
    dimension: usize,
    data: Vec<f32>,
}

/// Flat (brute-force) inner-product index
#[derive(Debug, Clone)]
pub struct AnnIndex {
    dimension: usize,
    /// Row-major `len × dimension`
    data: Vec<f32>,
}

impl AnnIndex {
    /// Builds an index from row-major data. Every entry must be finite and
    /// either unit length or all zeros.
    pub fn new(dimension: usize, data: Vec<f32>) -> AppResult<Self> {
        if dimension == 0 {
            return Err(AppError::ModelUnavailable(
                "ANN index dimension is zero".to_string(),
            ));
        }
        if data.len() % dimension != 0 {
            return Err(AppError::ModelUnavailable(format!(
                "ANN index holds {} floats, not a multiple of dimension {}",
                data.len(),
                dimension
            )));
        }
        if let Some(position) = data.iter().position(|v| !v.is_finite()) {
            return Err(AppError::ModelUnavailable(format!(
                "ANN index value at position {} is not finite",
                position
            )));
        }
        for (id, row) in data.chunks_exact(dimension).enumerate() {
            let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
            if norm != 0.0 && (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
                return Err(AppError::ModelUnavailable(format!(
                    "ANN index entry {} has norm {}, expected a unit vector",
                    id, norm
                )));
            }
        }
        Ok(Self { dimension, data })
    }

    /// Builds an index from raw embeddings, normalizing each one first
    pub fn from_embeddings(dimension: usize, embeddings: Vec<Vec<f32>>) -> AppResult<Self> {
        let mut data = Vec::with_capacity(dimension * embeddings.len());
        for (i, mut embedding) in embeddings.into_iter().enumerate() {
            if embedding.len() != dimension {
                return Err(AppError::ModelUnavailable(format!(
                    "Embedding {} has dimension {}, expected {}",
                    i,
                    embedding.len(),
                    dimension
                )));
            }
            normalize_l2(&mut embedding);
            data.extend(embedding);
        }
        Self::new(dimension, data)
    }

    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let file: AnnIndexFile = serde_json::from_slice(bytes)
            .map_err(|e| AppError::ModelUnavailable(format!("Failed to parse ANN index: {}", e)))?;
        Self::new(file.dimension, file.data)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the `k` entries with the highest inner product, best first.
    /// Equal scores keep ascending id order.
    pub fn search(&self, query: &[f32], k: usize) -> AppResult<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(AppError::Internal(format!(
                "Query dimension {} does not match index dimension {}",
                query.len(),
                self.dimension
            )));
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimension)
            .enumerate()
            .map(|(id, stored)| Neighbor {
                id,
                score: inner_product(query, stored),
            })
            .collect();

        // Stable sort keeps insertion order among equal scores.
        neighbors.sort_by(|a, b| b.score.total_cmp(&a.score));
        neighbors.truncate(k);

        Ok(neighbors)
    }
}

fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Scales `vector` to unit Euclidean length in place. Zero vectors are left as is.
pub fn normalize_l2(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        let inv = 1.0 / norm;
        for value in vector.iter_mut() {
            *value *= inv;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_l2() {
        let mut v = vec![3.0, 4.0];
        normalize_l2(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0];
        normalize_l2(&mut v);
        assert_eq!(v, vec![0.0, 0.0]);
    }

    #[test]
    fn test_search_orders_by_score() {
        let index = AnnIndex::from_embeddings(
            2,
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]],
        )
        .unwrap();
        let hits = index.search(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<usize> = hits.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_search_ties_keep_id_order() {
        let index = AnnIndex::from_embeddings(
            2,
            vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![2.0, 0.0], vec![5.0, 0.0]],
        )
        .unwrap();
        let ids: Vec<usize> = index
            .search(&[1.0, 0.0], 3)
            .unwrap()
            .iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let index = AnnIndex::from_embeddings(1, vec![vec![1.0], vec![2.0]]).unwrap();
        assert_eq!(index.search(&[1.0], 12).unwrap().len(), 2);
    }

    #[test]
    fn test_search_rejects_wrong_dimension() {
        let index = AnnIndex::from_embeddings(2, vec![vec![1.0, 0.0]]).unwrap();
        assert!(index.search(&[1.0], 1).is_err());
    }

    #[test]
    fn test_from_json_rejects_partial_rows() {
        let err = AnnIndex::from_json(br#"{"dimension": 3, "data": [1, 0, 0, 1]}"#).unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn test_from_json_rejects_unnormalized_entries() {
        let err = AnnIndex::from_json(br#"{"dimension": 2, "data": [1, 0, 1, 0, 5, 3]}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn test_from_json_rejects_non_finite_values() {
        let err = AnnIndex::from_json(br#"{"dimension": 2, "data": [1, 0, 1, 0, 0, 1e39]}"#)
            .unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));

        let err = AnnIndex::new(2, vec![1.0, 0.0, f32::NAN, 0.0]).unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn test_zero_and_near_unit_entries_are_accepted() {
        let index = AnnIndex::new(2, vec![0.0, 0.0, 0.8944272, 0.4472136]).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_len() {
        let index = AnnIndex::from_json(br#"{"dimension": 2, "data": [1, 0, 0, 1, 0.6, 0.8]}"#)
            .unwrap();
        assert_eq!(index.len(), 3);
        assert!(!index.is_empty());
    }
}
