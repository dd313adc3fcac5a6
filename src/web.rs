//
// web.rs
// Ohif-Viewer-Input-rs
//
// Axum-based HTTP server that generates viewer documents on request and serves stored ones.
//
// Thales Matheus Mendonça Santos - November 2025

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::{
    builder::MetadataBuilder,
    error::{BuildError, PipelineError, ScanError, StoreError},
    json::JsonStyle,
    pipeline::{jsonify_study, ViewerRequest},
    resolver::ScanIdMap,
    storage::{DocumentStore, StoredDocument},
};

/// Everything a request needs to generate a document.
#[derive(Clone)]
pub struct AppState {
    pub scan_root: PathBuf,
    pub base_url: String,
    pub resolver: Arc<ScanIdMap>,
    pub builder: Arc<MetadataBuilder>,
    pub store: DocumentStore,
}

type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/viewer/:transaction_id",
            get(stored_handler).post(generate_handler),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bootstraps the Axum HTTP server and wires up API routes.
pub async fn start_server(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn generate_handler(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    // Scanning reads every file under the root; keep it off the async workers.
    let worker_state = state.clone();
    let worker_id = transaction_id.clone();
    let json = tokio::task::spawn_blocking(move || {
        let request = ViewerRequest {
            scan_root: &worker_state.scan_root,
            base_url: &worker_state.base_url,
            style: JsonStyle::Pretty,
            parallel: true,
        };
        jsonify_study(
            &worker_state.builder,
            &request,
            &worker_id,
            worker_state.resolver.as_ref(),
        )
    })
    .await
    .map_err(internal_error)?
    .map_err(pipeline_error)?;

    let stored = state
        .store
        .save(&transaction_id, &json)
        .map_err(store_error)?;
    info!(
        "Generated viewer document for {} ({})",
        transaction_id, stored.file_name
    );
    json_response(stored)
}

async fn stored_handler(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let stored = state.store.load(&transaction_id).map_err(store_error)?;
    json_response(stored)
}

fn json_response(stored: StoredDocument) -> ApiResult<impl IntoResponse> {
    let etag = HeaderValue::from_str(&format!("\"{}\"", stored.digest)).map_err(internal_error)?;
    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ),
            (header::ETAG, etag),
        ],
        stored.contents,
    ))
}

fn pipeline_error(err: PipelineError) -> (StatusCode, String) {
    match err {
        PipelineError::Scan(ScanError::NotADirectory(_)) => not_found(err),
        PipelineError::Build(BuildError::MissingTransactionId | BuildError::NoInput) => {
            bad_request(err)
        }
        PipelineError::Scan(ScanError::Walk(_)) | PipelineError::Render(_) => internal_error(err),
    }
}

fn store_error(err: StoreError) -> (StatusCode, String) {
    match err {
        StoreError::NotFound(_) | StoreError::OutsideRoot => not_found(err),
        StoreError::Io(_) => internal_error(err),
    }
}

fn bad_request<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: Display>(err: E) -> (StatusCode, String) {
    error!("{}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

fn not_found<E: Display>(err: E) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn state(dir: &TempDir) -> AppState {
        let scan_root = dir.path().join("scans");
        std::fs::create_dir_all(&scan_root).expect("scan root");
        AppState {
            scan_root,
            base_url: "http://localhost/scans".into(),
            resolver: Arc::new(ScanIdMap::new()),
            builder: Arc::new(MetadataBuilder::default()),
            store: DocumentStore::new(dir.path().join("store")).expect("store"),
        }
    }

    async fn send(app: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempdir().expect("tmpdir");
        let (status, body) = send(router(state(&dir)), "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn generated_document_is_stored_and_served() {
        let dir = tempdir().expect("tmpdir");
        let app = router(state(&dir));

        let (status, body) = send(app.clone(), "POST", "/api/viewer/TX-42").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["transactionId"], "TX-42");
        assert_eq!(value["studies"], serde_json::json!([]));

        let (status, stored) = send(app, "GET", "/api/viewer/TX-42").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stored, body);
    }

    #[tokio::test]
    async fn similar_transaction_ids_get_their_own_documents() {
        let dir = tempdir().expect("tmpdir");
        let app = router(state(&dir));

        let (status, _) = send(app.clone(), "POST", "/api/viewer/XNAT.E1").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app.clone(), "POST", "/api/viewer/XNATE1").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(app, "GET", "/api/viewer/XNAT.E1").await;
        assert_eq!(status, StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["transactionId"], "XNAT.E1");
    }

    #[tokio::test]
    async fn unknown_stored_document_is_404() {
        let dir = tempdir().expect("tmpdir");
        let (status, _) = send(router(state(&dir)), "GET", "/api/viewer/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_scan_root_is_404_not_empty_success() {
        let dir = tempdir().expect("tmpdir");
        let mut state = state(&dir);
        state.scan_root = dir.path().join("nowhere");
        let (status, body) = send(router(state), "POST", "/api/viewer/TX").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("not a directory"));
    }
}
