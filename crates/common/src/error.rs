//! Error types shared across QRForge crates.

use std::path::PathBuf;

/// Top-level error type for QRForge operations.
///
/// Only `Validation` and `Encoding` abort a single render call; every
/// other degradation is reported through [`crate::warning::RenderWarning`]
/// and rendering proceeds.
#[derive(Debug, thiserror::Error)]
pub enum QrForgeError {
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Scene error: {message}")]
    Scene { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Raster error: {message}")]
    Raster { message: String },

    #[error("Failed to load asset {url}: {message}")]
    AssetLoad { url: String, message: String },

    #[error("Archive error: {message}")]
    Archive { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Export cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using QrForgeError.
pub type QrForgeResult<T> = Result<T, QrForgeError>;

impl QrForgeError {
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding {
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    pub fn scene(msg: impl Into<String>) -> Self {
        Self::Scene {
            message: msg.into(),
        }
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    pub fn raster(msg: impl Into<String>) -> Self {
        Self::Raster {
            message: msg.into(),
        }
    }

    pub fn asset_load(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::AssetLoad {
            url: url.into(),
            message: msg.into(),
        }
    }

    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether this error should abort a single render call.
    ///
    /// Asset and serialization problems degrade gracefully at the layer
    /// that encounters them; invalid input never renders at all.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Encoding { .. } | Self::Cancelled
        )
    }
}
