//! Artifact Store: read-only model artifacts exported by the offline
//! training job, loaded at most once per process and shared through `Arc`.
//!
//! Each artifact kind has its own async single-flight cell. Concurrent first
//! callers wait on the one in-flight load. A failed load leaves the cell
//! empty and surfaces [`AppError::ModelUnavailable`]; the next caller retries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::OnceCell;

use crate::error::{AppError, AppResult};

pub mod ann;
pub mod catalog;
pub mod reducer;
pub mod sentiment_model;
pub mod vectorizer;

pub use ann::{normalize_l2, AnnIndex, Neighbor};
pub use catalog::{Catalog, CatalogEntry};
pub use reducer::Reducer;
pub use sentiment_model::SentimentModel;
pub use vectorizer::{SparseVector, Vectorizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Catalog,
    Vectorizer,
    Reducer,
    AnnIndex,
    SentimentModel,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Catalog,
        ArtifactKind::Vectorizer,
        ArtifactKind::Reducer,
        ArtifactKind::AnnIndex,
        ArtifactKind::SentimentModel,
    ];

    /// File name inside the artifacts directory
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Catalog => "catalog.json",
            ArtifactKind::Vectorizer => "vectorizer.json",
            ArtifactKind::Reducer => "reducer.json",
            ArtifactKind::AnnIndex => "ann_index.json",
            ArtifactKind::SentimentModel => "sentiment_model.json",
        }
    }

    fn slot(&self) -> usize {
        match self {
            ArtifactKind::Catalog => 0,
            ArtifactKind::Vectorizer => 1,
            ArtifactKind::Reducer => 2,
            ArtifactKind::AnnIndex => 3,
            ArtifactKind::SentimentModel => 4,
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArtifactKind::Catalog => "catalog",
            ArtifactKind::Vectorizer => "vectorizer",
            ArtifactKind::Reducer => "reducer",
            ArtifactKind::AnnIndex => "ann_index",
            ArtifactKind::SentimentModel => "sentiment_model",
        };
        write!(f, "{}", name)
    }
}

/// A loaded artifact of any kind
#[derive(Debug, Clone)]
pub enum Artifact {
    Catalog(Arc<Catalog>),
    Vectorizer(Arc<Vectorizer>),
    Reducer(Arc<Reducer>),
    AnnIndex(Arc<AnnIndex>),
    SentimentModel(Arc<SentimentModel>),
}

/// Load state of one artifact kind, reported by the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactStatus {
    pub kind: ArtifactKind,
    pub loaded: bool,
    pub loaded_at: Option<DateTime<Utc>>,
}

pub struct ArtifactStore {
    dir: PathBuf,
    catalog: OnceCell<Arc<Catalog>>,
    vectorizer: OnceCell<Arc<Vectorizer>>,
    reducer: OnceCell<Arc<Reducer>>,
    ann_index: OnceCell<Arc<AnnIndex>>,
    sentiment_model: OnceCell<Arc<SentimentModel>>,
    loaded_at: Mutex<[Option<DateTime<Utc>>; 5]>,
    disk_loads: AtomicUsize,
}

impl ArtifactStore {
    /// Creates a store over `dir`. Nothing is read until first use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            catalog: OnceCell::new(),
            vectorizer: OnceCell::new(),
            reducer: OnceCell::new(),
            ann_index: OnceCell::new(),
            sentiment_model: OnceCell::new(),
            loaded_at: Mutex::new([None; 5]),
            disk_loads: AtomicUsize::new(0),
        }
    }

    /// Returns the cached artifact for `kind`, loading it on first call
    pub async fn load(&self, kind: ArtifactKind) -> AppResult<Artifact> {
        Ok(match kind {
            ArtifactKind::Catalog => Artifact::Catalog(self.catalog().await?),
            ArtifactKind::Vectorizer => Artifact::Vectorizer(self.vectorizer().await?),
            ArtifactKind::Reducer => Artifact::Reducer(self.reducer().await?),
            ArtifactKind::AnnIndex => Artifact::AnnIndex(self.ann_index().await?),
            ArtifactKind::SentimentModel => {
                Artifact::SentimentModel(self.sentiment_model().await?)
            }
        })
    }

    /// Loads every artifact kind, failing on the first unavailable one
    pub async fn preload(&self) -> AppResult<()> {
        for kind in ArtifactKind::ALL {
            self.load(kind).await?;
        }
        tracing::info!(dir = %self.dir.display(), "All model artifacts loaded");
        Ok(())
    }

    /// The catalog, with its normalized-title lookup already built
    pub async fn catalog(&self) -> AppResult<Arc<Catalog>> {
        self.get_or_load(&self.catalog, ArtifactKind::Catalog, Catalog::from_json)
            .await
    }

    pub async fn vectorizer(&self) -> AppResult<Arc<Vectorizer>> {
        self.get_or_load(&self.vectorizer, ArtifactKind::Vectorizer, Vectorizer::from_json)
            .await
    }

    pub async fn reducer(&self) -> AppResult<Arc<Reducer>> {
        self.get_or_load(&self.reducer, ArtifactKind::Reducer, Reducer::from_json)
            .await
    }

    pub async fn ann_index(&self) -> AppResult<Arc<AnnIndex>> {
        self.get_or_load(&self.ann_index, ArtifactKind::AnnIndex, AnnIndex::from_json)
            .await
    }

    pub async fn sentiment_model(&self) -> AppResult<Arc<SentimentModel>> {
        self.get_or_load(
            &self.sentiment_model,
            ArtifactKind::SentimentModel,
            SentimentModel::from_json,
        )
        .await
    }

    /// Per-kind load state
    pub fn status(&self) -> Vec<ArtifactStatus> {
        let loaded_at = self
            .loaded_at
            .lock()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner());

        ArtifactKind::ALL
            .iter()
            .map(|&kind| ArtifactStatus {
                kind,
                loaded: loaded_at[kind.slot()].is_some(),
                loaded_at: loaded_at[kind.slot()],
            })
            .collect()
    }

    /// Number of artifact files read from disk so far
    #[cfg(test)]
    pub(crate) fn disk_loads(&self) -> usize {
        self.disk_loads.load(Ordering::SeqCst)
    }

    async fn get_or_load<T>(
        &self,
        cell: &OnceCell<Arc<T>>,
        kind: ArtifactKind,
        parse: fn(&[u8]) -> AppResult<T>,
    ) -> AppResult<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        cell.get_or_try_init(|| self.read_artifact(kind, parse))
            .await
            .cloned()
    }

    async fn read_artifact<T>(
        &self,
        kind: ArtifactKind,
        parse: fn(&[u8]) -> AppResult<T>,
    ) -> AppResult<Arc<T>>
    where
        T: Send + 'static,
    {
        let path = self.dir.join(kind.file_name());
        let start = Instant::now();
        self.disk_loads.fetch_add(1, Ordering::SeqCst);

        let task_path = path.clone();
        let result = tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&task_path).map_err(|e| {
                AppError::ModelUnavailable(format!("Cannot read {}: {}", task_path.display(), e))
            })?;
            let size = bytes.len();
            parse(&bytes).map(|artifact| (artifact, size))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Artifact load task failed: {}", e)))?;

        match result {
            Ok((artifact, size)) => {
                if let Ok(mut loaded_at) = self.loaded_at.lock() {
                    loaded_at[kind.slot()] = Some(Utc::now());
                }
                tracing::info!(
                    kind = %kind,
                    path = %path.display(),
                    bytes = size,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Artifact loaded"
                );
                Ok(Arc::new(artifact))
            }
            Err(e) => {
                tracing::error!(kind = %kind, path = %path.display(), error = %e, "Artifact load failed");
                Err(e)
            }
        }
    }
}
