//! Fitted bag-of-words vectorizer.
//!
//! The vocabulary, n-gram range, stop words and optional idf weights are
//! learned offline. At query time text is only transformed: terms outside
//! the fitted vocabulary are dropped, so any input (including empty text)
//! maps to a valid, possibly empty, sparse row.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{AppError, AppResult};

/// Row normalization applied after weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// Sparse row vector with strictly increasing column indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    pub indices: Vec<usize>,
    pub values: Vec<f32>,
}

impl SparseVector {
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }
}

/// On-disk shape of `vectorizer.json`. Options this transform does not
/// implement are rejected rather than ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VectorizerFile {
    vocabulary: HashMap<String, usize>,
    #[serde(default = "default_lowercase")]
    lowercase: bool,
    #[serde(default = "default_ngram_range")]
    ngram_range: (usize, usize),
    #[serde(default)]
    stop_words: Option<Vec<String>>,
    #[serde(default)]
    binary: bool,
    #[serde(default)]
    idf: Option<Vec<f32>>,
    #[serde(default)]
    norm: Option<Norm>,
}

fn default_lowercase() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// Term-frequency transform over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct Vectorizer {
    vocabulary: HashMap<String, usize>,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    binary: bool,
    idf: Option<Vec<f32>>,
    norm: Option<Norm>,
}

impl Vectorizer {
    /// Plain count vectorizer: lowercase unigrams, no weighting
    pub fn new(vocabulary: HashMap<String, usize>) -> AppResult<Self> {
        Self::from_parts(VectorizerFile {
            vocabulary,
            lowercase: true,
            ngram_range: (1, 1),
            stop_words: None,
            binary: false,
            idf: None,
            norm: None,
        })
    }

    /// Parses and validates a serialized vectorizer
    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let file: VectorizerFile = serde_json::from_slice(bytes).map_err(|e| {
            AppError::ModelUnavailable(format!("Failed to parse vectorizer: {}", e))
        })?;
        Self::from_parts(file)
    }

    fn from_parts(file: VectorizerFile) -> AppResult<Self> {
        let width = file.vocabulary.len();
        if width == 0 {
            return Err(AppError::ModelUnavailable(
                "Vectorizer vocabulary is empty".to_string(),
            ));
        }

        // Columns must be exactly 0..width so rows line up with the reducer.
        let mut seen = vec![false; width];
        for (term, &column) in &file.vocabulary {
            if column >= width || seen[column] {
                return Err(AppError::ModelUnavailable(format!(
                    "Vectorizer column {} for term {:?} is out of range or duplicated",
                    column, term
                )));
            }
            seen[column] = true;
        }

        let (min_n, max_n) = file.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(AppError::ModelUnavailable(format!(
                "Invalid ngram range ({}, {})",
                min_n, max_n
            )));
        }

        if let Some(idf) = &file.idf {
            if idf.len() != width {
                return Err(AppError::ModelUnavailable(format!(
                    "Vectorizer idf has {} weights for {} terms",
                    idf.len(),
                    width
                )));
            }
            if let Some(column) = idf.iter().position(|w| !w.is_finite()) {
                return Err(AppError::ModelUnavailable(format!(
                    "Vectorizer idf weight for column {} is not finite",
                    column
                )));
            }
        }

        Ok(Self {
            vocabulary: file.vocabulary,
            lowercase: file.lowercase,
            ngram_range: file.ngram_range,
            stop_words: file.stop_words.unwrap_or_default().into_iter().collect(),
            binary: file.binary,
            idf: file.idf,
            norm: file.norm,
        })
    }

    /// Number of columns in the output space
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Transforms a single document into its sparse row
    pub fn transform(&self, text: &str) -> SparseVector {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = tokenize(&text)
            .filter(|token| !self.stop_words.contains(*token))
            .collect();

        let mut counts: BTreeMap<usize, f32> = BTreeMap::new();
        let (min_n, max_n) = self.ngram_range;
        for n in min_n..=max_n {
            for window in tokens.windows(n) {
                let column = if n == 1 {
                    self.vocabulary.get(window[0])
                } else {
                    self.vocabulary.get(&window.join(" "))
                };
                if let Some(&column) = column {
                    *counts.entry(column).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut row = SparseVector {
            indices: Vec::with_capacity(counts.len()),
            values: Vec::with_capacity(counts.len()),
        };
        for (column, count) in counts {
            let mut value = if self.binary { 1.0 } else { count };
            if let Some(idf) = &self.idf {
                value *= idf[column];
            }
            row.indices.push(column);
            row.values.push(value);
        }

        if let Some(norm) = self.norm {
            normalize_row(&mut row.values, norm);
        }

        row
    }
}

/// Splits text into maximal runs of word characters of length two or more
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().nth(1).is_some())
}

fn normalize_row(values: &mut [f32], norm: Norm) {
    let total: f32 = match norm {
        Norm::L1 => values.iter().map(|v| v.abs()).sum(),
        Norm::L2 => values.iter().map(|v| v * v).sum::<f32>().sqrt(),
    };
    if total > 0.0 {
        for value in values.iter_mut() {
            *value /= total;
        }
    }
}
