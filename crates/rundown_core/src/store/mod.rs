//! JSON document storage and schema migration entry points.
//!
//! # Responsibility
//! - Load and save the whole dataset as one pretty-printed JSON document.
//! - Apply schema migrations right after load.
//!
//! # Invariants
//! - Schema version is tracked in the document's `DBVersion` field.
//! - Saves are whole-file and go through a temporary sibling + rename.
//! - Core code must not serve a dataset before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod file;
pub mod migrations;

pub use file::{load_dataset, read_dataset, save_dataset};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
    UnsupportedSchemaVersion {
        file_version: u32,
        latest_supported: u32,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "malformed dataset document: {err}"),
            Self::UnsupportedSchemaVersion {
                file_version,
                latest_supported,
            } => write!(
                f,
                "dataset schema version {file_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
