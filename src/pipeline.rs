use std::path::Path;

use tracing::debug;

use crate::builder::MetadataBuilder;
use crate::error::PipelineError;
use crate::json::{to_json_string, JsonStyle};
use crate::models::ViewerDocument;
use crate::resolver::ScanIdResolver;
use crate::scan::scan_path;

/// Settings shared by every run against one scan directory.
#[derive(Debug, Clone)]
pub struct ViewerRequest<'a> {
    pub scan_root: &'a Path,
    pub base_url: &'a str,
    pub style: JsonStyle,
    pub parallel: bool,
}

/// Scan the directory and build the viewer document for `transaction_id`.
pub fn generate_document<R>(
    builder: &MetadataBuilder,
    request: &ViewerRequest<'_>,
    transaction_id: &str,
    resolver: &R,
) -> Result<ViewerDocument, PipelineError>
where
    R: ScanIdResolver + Sync + ?Sized,
{
    let root = scan_path(request.scan_root)?;
    let document = if request.parallel {
        builder.build_parallel(transaction_id, Some(&root), resolver, request.base_url)?
    } else {
        builder.build(transaction_id, Some(&root), resolver, request.base_url)?
    };
    Ok(document)
}

/// Scan, build, and render in one go.
pub fn jsonify_study<R>(
    builder: &MetadataBuilder,
    request: &ViewerRequest<'_>,
    transaction_id: &str,
    resolver: &R,
) -> Result<String, PipelineError>
where
    R: ScanIdResolver + Sync + ?Sized,
{
    debug!("Rendering viewer input for transaction {}", transaction_id);
    let document = generate_document(builder, request, transaction_id, resolver)?;
    let text = to_json_string(&document, request.style)?;
    debug!(
        "Rendered {} bytes for transaction {}",
        text.len(),
        transaction_id
    );
    Ok(text)
}
