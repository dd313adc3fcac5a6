//
// error.rs
// Ohif-Viewer-Input-rs
//
// Typed errors for scanning, building, rendering, and storing viewer documents.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use thiserror::Error;

/// Precondition failures of the metadata builder.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no source tree to transform")]
    NoInput,
    #[error("transaction id must not be empty")]
    MissingTransactionId,
}

/// Failures while turning a viewer document into JSON.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize viewer document: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write viewer document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root {0:?} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to walk scan root: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("failed to read scan id map: {0}")]
    Io(#[from] std::io::Error),
    #[error("scan id map is not a JSON object of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("attempt to access document outside store root")]
    OutsideRoot,
    #[error("no stored document for {0:?}")]
    NotFound(String),
}

/// Everything that can stop a scan → build → render run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
