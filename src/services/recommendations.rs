use std::sync::Arc;

use crate::{
    artifacts::{
        catalog::capitalize, normalize_l2, AnnIndex, ArtifactStore, Catalog, Reducer, Vectorizer,
    },
    error::{AppError, AppResult},
};

/// Maximum number of titles returned per query
pub const MAX_RECOMMENDATIONS: usize = 10;

/// Neighbors fetched from the index; two extra to absorb the self match
pub const SEARCH_K: usize = MAX_RECOMMENDATIONS + 2;

/// Content-based "more like this" engine
///
/// Holds shared handles to the catalog, the fitted vectorizer and reducer,
/// and the ANN index. All of them are immutable once built, so queries take
/// no locks.
#[derive(Clone)]
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    vectorizer: Arc<Vectorizer>,
    reducer: Arc<Reducer>,
    index: Arc<AnnIndex>,
}

impl RecommendationEngine {
    /// Builds the engine from already loaded artifacts, checking that their
    /// shapes line up
    pub fn new(
        catalog: Arc<Catalog>,
        vectorizer: Arc<Vectorizer>,
        reducer: Arc<Reducer>,
        index: Arc<AnnIndex>,
    ) -> AppResult<Self> {
        if reducer.n_features() != vectorizer.vocabulary_size() {
            return Err(AppError::ModelUnavailable(format!(
                "Reducer expects {} features but the vectorizer produces {}",
                reducer.n_features(),
                vectorizer.vocabulary_size()
            )));
        }
        if reducer.n_components() != index.dimension() {
            return Err(AppError::ModelUnavailable(format!(
                "Reducer produces {} components but the ANN index has dimension {}",
                reducer.n_components(),
                index.dimension()
            )));
        }
        if index.len() != catalog.len() {
            return Err(AppError::ModelUnavailable(format!(
                "ANN index holds {} entries for {} catalog rows",
                index.len(),
                catalog.len()
            )));
        }

        Ok(Self {
            catalog,
            vectorizer,
            reducer,
            index,
        })
    }

    /// Loads (or reuses) the needed artifacts from the store
    pub async fn from_store(store: &ArtifactStore) -> AppResult<Self> {
        let catalog = store.catalog().await?;
        let vectorizer = store.vectorizer().await?;
        let reducer = store.reducer().await?;
        let index = store.ann_index().await?;

        let engine = Self::new(catalog, vectorizer, reducer, index)?;
        tracing::info!(
            movies = engine.catalog.len(),
            dimension = engine.index.dimension(),
            "Recommendation engine ready"
        );
        Ok(engine)
    }

    /// Returns up to ten titles most similar to `title`, best first.
    ///
    /// The lookup ignores case and surrounding whitespace. An unknown title
    /// is [`AppError::NotFound`]. The queried movie is excluded by catalog
    /// index, so a different row with the same title can still appear.
    pub fn recommend(&self, title: &str) -> AppResult<Vec<String>> {
        let entry = match self.catalog.lookup(title) {
            Some(entry) => entry,
            None => {
                tracing::debug!(title = %title, "Title not in catalog");
                return Err(AppError::movie_not_available());
            }
        };

        let row = self.vectorizer.transform(&entry.combined_columns);
        let mut query = self.reducer.transform(&row)?;
        normalize_l2(&mut query);

        let neighbors = self.index.search(&query, SEARCH_K)?;

        let titles: Vec<String> = neighbors
            .iter()
            .filter(|neighbor| neighbor.id != entry.catalog_index)
            .take(MAX_RECOMMENDATIONS)
            .filter_map(|neighbor| self.catalog.get(neighbor.id))
            .map(|neighbor| neighbor.movie_title.clone())
            .collect();

        tracing::debug!(
            title = %entry.movie_title,
            catalog_index = entry.catalog_index,
            results = titles.len(),
            "Recommendations computed"
        );

        Ok(titles)
    }

    /// Every catalog title in catalog order, capitalized for display
    pub fn titles(&self) -> Vec<String> {
        self.catalog
            .entries()
            .iter()
            .map(|entry| capitalize(&entry.movie_title))
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}
