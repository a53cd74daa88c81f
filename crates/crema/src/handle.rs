//! Lazily loaded, caller-owned pipeline handle.
//!
//! The artifact is read on first use and shared afterwards; a failed load is
//! not cached, so the next call retries.

use crate::artifact::{ArtifactStore, FileArtifactStore};
use crate::error::Result;
use crate::pipeline::FittedPipeline;
use crema_data::Record;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

/// Shared handle to a persisted pipeline.
pub struct PipelineHandle<S = FileArtifactStore> {
    store: S,
    location: PathBuf,
    pipeline: OnceLock<Arc<FittedPipeline>>,
    load_lock: Mutex<()>,
}

impl PipelineHandle<FileArtifactStore> {
    /// Handle for an artifact file on disk.
    pub fn from_file(location: impl Into<PathBuf>) -> Self {
        Self::new(FileArtifactStore::new(), location)
    }
}

impl<S: ArtifactStore> PipelineHandle<S> {
    /// Handle over an arbitrary store.
    pub fn new(store: S, location: impl Into<PathBuf>) -> Self {
        Self {
            store,
            location: location.into(),
            pipeline: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// Artifact location.
    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Whether the pipeline has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.pipeline.get().is_some()
    }

    /// Already-loaded pipeline, without touching the store.
    pub fn loaded(&self) -> Option<Arc<FittedPipeline>> {
        self.pipeline.get().cloned()
    }

    /// Pipeline, loading it from the store on first call.
    ///
    /// Concurrent first calls perform a single load.
    pub fn get(&self) -> Result<Arc<FittedPipeline>> {
        if let Some(pipeline) = self.pipeline.get() {
            return Ok(Arc::clone(pipeline));
        }

        // poisoned only if a store panicked mid-load; the guard protects no data
        let _guard = self
            .load_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(pipeline) = self.pipeline.get() {
            return Ok(Arc::clone(pipeline));
        }

        debug!("Loading pipeline from {}", self.location.display());
        let loaded = Arc::new(self.store.load(&self.location)?);
        Ok(Arc::clone(self.pipeline.get_or_init(|| loaded)))
    }

    /// Predict one record with the shared pipeline.
    pub fn predict(&self, record: &Record) -> Result<f64> {
        self.get()?.predict(record)
    }
}

impl<S> fmt::Debug for PipelineHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineHandle")
            .field("location", &self.location)
            .field("loaded", &self.pipeline.get().is_some())
            .finish_non_exhaustive()
    }
}
