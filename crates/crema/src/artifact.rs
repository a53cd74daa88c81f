//! Artifact persistence
//!
//! A saved pipeline is a single file:
//!
//! ```text
//! magic (8 bytes "CREMAPL\0") | format version (u32 LE) | bincode payload
//! ```
//!
//! Saves go through a sibling temp file and a rename, so a reader never
//! observes a half-written artifact at the final location.

use crate::error::{PipelineError, Result};
use crate::pipeline::FittedPipeline;
use crema_model::Regressor;
use log::{debug, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Leading bytes of every artifact file.
pub const MAGIC: &[u8; 8] = b"CREMAPL\0";

/// Current artifact layout version.
pub const FORMAT_VERSION: u32 = 1;

const HEADER_LEN: usize = MAGIC.len() + 4;

/// Trait for persisting fitted pipelines
pub trait ArtifactStore: Send + Sync {
    /// Persist a pipeline at `location`, replacing any previous artifact.
    fn save(&self, pipeline: &FittedPipeline, location: &Path) -> Result<()>;

    /// Load the pipeline stored at `location`.
    ///
    /// # Errors
    /// * `ArtifactNotFound` when nothing exists at `location`
    /// * `ArtifactCorrupt` when the bytes do not decode into a valid pipeline
    fn load(&self, location: &Path) -> Result<FittedPipeline>;
}

/// Filesystem-backed artifact store.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileArtifactStore;

impl FileArtifactStore {
    /// Create a file store.
    pub const fn new() -> Self {
        Self
    }
}

impl ArtifactStore for FileArtifactStore {
    fn save(&self, pipeline: &FittedPipeline, location: &Path) -> Result<()> {
        let bytes = encode_artifact(pipeline)?;

        if let Some(parent) = location.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = temp_path(location);
        if let Err(e) = fs::write(&tmp, &bytes).and_then(|()| fs::rename(&tmp, location)) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }

        info!(
            "Saved pipeline artifact to {} ({} bytes)",
            location.display(),
            bytes.len()
        );
        Ok(())
    }

    fn load(&self, location: &Path) -> Result<FittedPipeline> {
        let bytes = match fs::read(location) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PipelineError::ArtifactNotFound(location.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        let pipeline = decode_artifact(&bytes).map_err(|reason| {
            warn!("Rejected artifact at {}: {}", location.display(), reason);
            PipelineError::ArtifactCorrupt {
                path: location.to_path_buf(),
                reason,
            }
        })?;

        info!(
            "Loaded pipeline artifact from {} (trained {}, {} rows)",
            location.display(),
            pipeline.metadata().trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
            pipeline.metadata().n_train_rows
        );
        Ok(pipeline)
    }
}

/// Serialize a pipeline into artifact bytes (header plus payload).
pub fn encode_artifact(pipeline: &FittedPipeline) -> Result<Vec<u8>> {
    let payload =
        bincode::serialize(pipeline).map_err(|e| PipelineError::Serialization(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode artifact bytes, returning a description of the first problem found.
pub fn decode_artifact(bytes: &[u8]) -> std::result::Result<FittedPipeline, String> {
    if bytes.len() < HEADER_LEN {
        return Err(format!("truncated header ({} bytes)", bytes.len()));
    }
    let (magic, rest) = bytes.split_at(MAGIC.len());
    if magic != MAGIC {
        return Err("not a pipeline artifact (bad magic)".to_string());
    }

    let (version, payload) = rest.split_at(4);
    let mut version_bytes = [0u8; 4];
    version_bytes.copy_from_slice(version);
    let version = u32::from_le_bytes(version_bytes);
    if version != FORMAT_VERSION {
        return Err(format!(
            "unsupported format version {} (expected {})",
            version, FORMAT_VERSION
        ));
    }

    let pipeline: FittedPipeline =
        bincode::deserialize(payload).map_err(|e| format!("payload decode failed: {}", e))?;
    pipeline
        .forest()
        .validate()
        .map_err(|e| format!("invalid model: {}", e))?;
    let (encoded, expected) = (pipeline.encoder().n_features(), pipeline.forest().n_features());
    if encoded != expected {
        return Err(format!(
            "encoder emits {} features but the model expects {}",
            encoded, expected
        ));
    }

    Ok(pipeline)
}

fn temp_path(location: &Path) -> PathBuf {
    let mut name = location
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    location.with_file_name(name)
}
