//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every variant is fatal: a run that produces one stops before any
//! comparison. Drift between the two documents is never an error, it is
//! reported through [`crate::compare::SyncReport`].

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Only `std::io::Error` converts implicitly; every other variant carries the
/// document label and is built where the failure is detected.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// An input document does not exist on disk.
    #[from(ignore)]
    #[display("{label} not found at {}", path.display())]
    NotFound {
        /// Human readable name of the document (e.g. `backend/template.yaml`).
        label: String,
        /// Absolute path that was probed.
        path: PathBuf,
    },

    /// An input document is not well-formed YAML, or uses a construct its
    /// loader does not accept.
    #[from(ignore)]
    #[display("Failed to parse {label}: {message}")]
    Parse {
        /// Human readable name of the document.
        label: String,
        /// Parser diagnostic, including the location when available.
        message: String,
    },

    /// A node the pipeline navigates through is absent or has the wrong shape.
    #[from(ignore)]
    #[display("{label}: {detail} at `{key_path}`")]
    Structure {
        /// Human readable name of the document.
        label: String,
        /// Dotted key path up to and including the offending segment.
        key_path: String,
        /// What was wrong with the node (e.g. `missing key`).
        detail: String,
    },
}

impl AppError {
    pub(crate) fn structure(label: &str, key_path: impl Into<String>, detail: &str) -> Self {
        AppError::Structure {
            label: label.to_string(),
            key_path: key_path.into(),
            detail: detail.to_string(),
        }
    }
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
