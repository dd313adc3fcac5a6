//
// json.rs
// Ohif-Viewer-Input-rs
//
// Renders viewer documents to JSON text or files, and reads them back.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fs;
use std::path::Path;

use crate::error::RenderError;
use crate::models::ViewerDocument;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    #[default]
    Pretty,
    Compact,
}

/// Serialize a document without touching the filesystem.
pub fn to_json_string(document: &ViewerDocument, style: JsonStyle) -> Result<String, RenderError> {
    let text = match style {
        JsonStyle::Pretty => serde_json::to_string_pretty(document)?,
        JsonStyle::Compact => serde_json::to_string(document)?,
    };
    Ok(text)
}

pub fn write_json(
    document: &ViewerDocument,
    output: &Path,
    style: JsonStyle,
) -> Result<(), RenderError> {
    let text = to_json_string(document, style)?;
    fs::write(output, text)?;
    tracing::info!("Viewer document saved to {:?}", output);
    Ok(())
}

pub fn from_json_str(text: &str) -> Result<ViewerDocument, RenderError> {
    Ok(serde_json::from_str(text)?)
}
