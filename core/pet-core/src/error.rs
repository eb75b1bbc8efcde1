//! Error types for pet-core operations.
//!
//! Only the edges (settings, hook writer, statistics) return these. The watcher,
//! state machine and animation engine degrade to "do nothing" instead of failing.

use std::path::PathBuf;

/// All errors that can occur at the I/O edges of pet-core.
#[derive(Debug, thiserror::Error)]
pub enum PetError {
    // ─────────────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("Unknown pet state: {0}")]
    UnknownState(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(PathBuf),

    // ─────────────────────────────────────────────────────────────────────
    // Hook Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("Hook input has no event name")]
    MissingEventName,

    // ─────────────────────────────────────────────────────────────────────
    // I/O Errors
    // ─────────────────────────────────────────────────────────────────────
    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl PetError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        PetError::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        PetError::Json {
            context: context.into(),
            source,
        }
    }
}

/// Convenience type alias for Results using PetError.
pub type Result<T> = std::result::Result<T, PetError>;

/// Reasons a resource could not be turned into playable frames.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Resource contains no frames")]
    NoFrames,
}
