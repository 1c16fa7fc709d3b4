//! Model persistence.
//!
//! One JSON file, written by the trainer and read once at server startup.
//! The payload carries the feature layout it was trained against; loading
//! rejects an artifact whose layout does not match this build. Content is
//! fully deterministic, so identical training runs produce identical bytes.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::features::layout::{self, LayoutInfo, LayoutMismatchError};

use super::booster::GradientBooster;

/// Bump when the artifact schema changes shape.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to decode model file: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unsupported model format version {0}, expected {FORMAT_VERSION}")]
    UnsupportedFormat(u32),
    #[error(transparent)]
    Layout(#[from] LayoutMismatchError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub layout: LayoutInfo,
    pub model: GradientBooster,
}

impl ModelArtifact {
    pub fn new(model: GradientBooster) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            layout: LayoutInfo::current(),
            model,
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ArtifactError> {
        let file = fs::File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let bytes = fs::read(path)?;
        let loaded: Self = serde_json::from_slice(&bytes)?;

        if loaded.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedFormat(loaded.format_version));
        }
        layout::validate_layout(loaded.layout.version, loaded.layout.hash)?;

        Ok(loaded)
    }
}

/// SHA-256 of the artifact file, hex-encoded.
pub fn file_checksum(path: &Path) -> Result<String, ArtifactError> {
    let bytes = fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
