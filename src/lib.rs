//
// lib.rs
// Ohif-Viewer-Input-rs
//
// Exposes the crate's modules and re-exports the builder entry points for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Core transformation: classification table, source tree, output schema, builder.
pub mod builder;
pub mod models;
pub mod sop_class;
pub mod source;

// Collaborators around the core.
pub mod cli;
pub mod dicom_access;
pub mod error;
pub mod json;
pub mod pipeline;
pub mod resolver;
pub mod scan;
pub mod storage;
pub mod summary;
pub mod web;

pub use builder::{build, MetadataBuilder};
pub use cli::{run as run_cli, Cli, Commands};
pub use error::{BuildError, PipelineError, RenderError};
pub use models::{ScanId, ViewerDocument, ViewerInstance, ViewerSeries, ViewerStudy};
pub use resolver::{ScanIdMap, ScanIdResolver};
pub use sop_class::{SopClassTable, MULTI_FRAME_SOP_CLASS_UIDS};
pub use source::PatientRoot;
