//! Movie catalog and the normalized-title lookup built from it.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{AppError, AppResult};

/// One catalog row. `catalog_index` is its position in the exported table
/// and the id of its embedding in the ANN index.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub catalog_index: usize,
    pub movie_title: String,
    pub combined_columns: String,
}

/// Exported row; extra columns are ignored
#[derive(Debug, Deserialize)]
struct CatalogRow {
    movie_title: String,
    combined_columns: String,
}

/// Lookup key for a title: surrounding whitespace removed, lowercased
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// First character upper-cased, the rest lower-cased
pub fn capitalize(title: &str) -> String {
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_title: HashMap<String, usize>,
}

impl Catalog {
    /// Builds the catalog from `(movie_title, combined_columns)` rows in
    /// export order. When two titles normalize to the same key the later
    /// row wins the lookup.
    pub fn new<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let entries: Vec<CatalogEntry> = rows
            .into_iter()
            .enumerate()
            .map(|(catalog_index, (movie_title, combined_columns))| CatalogEntry {
                catalog_index,
                movie_title,
                combined_columns,
            })
            .collect();

        let mut by_title = HashMap::with_capacity(entries.len());
        for entry in &entries {
            by_title.insert(normalize_title(&entry.movie_title), entry.catalog_index);
        }

        if by_title.len() < entries.len() {
            tracing::debug!(
                rows = entries.len(),
                distinct_titles = by_title.len(),
                "Catalog contains titles that normalize to the same key"
            );
        }

        Self { entries, by_title }
    }

    pub fn from_json(bytes: &[u8]) -> AppResult<Self> {
        let rows: Vec<CatalogRow> = serde_json::from_slice(bytes)
            .map_err(|e| AppError::ModelUnavailable(format!("Failed to parse catalog: {}", e)))?;
        if rows.is_empty() {
            return Err(AppError::ModelUnavailable("Catalog is empty".to_string()));
        }
        Ok(Self::new(
            rows.into_iter()
                .map(|row| (row.movie_title, row.combined_columns)),
        ))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, catalog_index: usize) -> Option<&CatalogEntry> {
        self.entries.get(catalog_index)
    }

    /// Resolves a user-supplied title, ignoring case and surrounding whitespace
    pub fn lookup(&self, title: &str) -> Option<&CatalogEntry> {
        self.by_title
            .get(&normalize_title(title))
            .and_then(|&i| self.entries.get(i))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(titles: &[&str]) -> Catalog {
        Catalog::new(
            titles
                .iter()
                .map(|t| (t.to_string(), format!("{} text", t.to_lowercase()))),
        )
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  The Dark Knight \n"), "the dark knight");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("the dark KNIGHT"), "The dark knight");
        assert_eq!(capitalize("avatar"), "Avatar");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_indices_follow_row_order() {
        let catalog = catalog(&["Avatar", "Heat", "Up"]);
        let indices: Vec<usize> = catalog.entries().iter().map(|e| e.catalog_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_lookup_is_case_and_whitespace_insensitive() {
        let catalog = catalog(&["Avatar", "Inception"]);
        for query in ["inception", " Inception ", "INCEPTION"] {
            assert_eq!(catalog.lookup(query).unwrap().catalog_index, 1);
        }
        assert!(catalog.lookup("Incep").is_none());
    }

    #[test]
    fn test_duplicate_normalized_titles_last_row_wins() {
        let catalog = catalog(&["Heat", "Avatar", "HEAT "]);
        let entry = catalog.lookup("heat").unwrap();
        assert_eq!(entry.catalog_index, 2);
        assert_eq!(entry.movie_title, "HEAT ");
    }

    #[test]
    fn test_from_json_ignores_extra_columns() {
        let json = r#"[
            {"movie_title": "Avatar", "combined_columns": "sam worthington", "director_name": "James Cameron"},
            {"movie_title": "Heat", "combined_columns": "al pacino"}
        ]"#;
        let catalog = Catalog::from_json(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().combined_columns, "al pacino");
    }

    #[test]
    fn test_from_json_rejects_missing_columns() {
        let err = Catalog::from_json(br#"[{"movie_title": "Avatar"}]"#).unwrap_err();
        assert!(matches!(err, AppError::ModelUnavailable(_)));
    }

    #[test]
    fn test_from_json_rejects_empty_catalog() {
        assert!(Catalog::from_json(b"[]").is_err());
    }
}
