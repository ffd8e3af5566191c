//! Axum web server.
//!
//! Exposes the backend endpoints the diagram frontend consumes: graph
//! scanning, project path management, folder enumeration, and configuration
//! document persistence. Every failure maps to a structured JSON error with
//! an appropriate status code; no handler mutates state when its input is
//! rejected.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::Settings;
use crate::dialect::Dialect;
use crate::graph::types::{Edge, Node};
use crate::persist::{self, ConfigDocument, PersistError, DEFAULT_DOCUMENT};
use crate::scan::{self, ScanError, ScanOptions};

use super::source::{FsSource, GraphSource};

/// Application state shared across handlers.
pub struct AppState {
    /// Active project root, settable at runtime via `/config/path`.
    pub project_dir: RwLock<PathBuf>,
    /// Graph producer, swappable in tests.
    pub source: Box<dyn GraphSource>,
}

impl AppState {
    pub fn new(project_dir: PathBuf) -> Self {
        Self {
            project_dir: RwLock::new(project_dir),
            source: Box::new(FsSource),
        }
    }
}

/// Structured error payload. Handlers never panic and never leave partial
/// state behind; the worst case is an error response and an unchanged view.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotADirectory(_) => ApiError::bad_request(err.to_string()),
            ScanError::Io(_) => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::InvalidFilename(_) => ApiError::bad_request(err.to_string()),
            PersistError::Io(_) | PersistError::Json(_) => ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: err.to_string(),
            },
        }
    }
}

/// Build the axum router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/graph", get(get_graph))
        .route("/graph/filtered", post(get_graph_filtered))
        .route("/config/path", get(get_project_path))
        .route("/config/path", post(set_project_path))
        .route("/scan/folders", post(scan_folders))
        .route("/save", post(save_document))
        .route("/load", get(load_document))
        .route("/config_files", get(list_config_files))
        .route("/files/create", post(create_file))
        .layer(cors)
        .with_state(state)
}

/// Start the web server.
pub async fn serve(
    project_dir: PathBuf,
    settings: &Settings,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState::new(project_dir.clone()));
    let app = router(state);

    let addr = format!("127.0.0.1:{}", settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(url = %format!("http://localhost:{}", settings.server.port), project = %project_dir.display(), "listening");

    if settings.server.open_browser {
        let _ = open::that(format!("http://localhost:{}", settings.server.port));
    }

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Graph scanning
// ============================================================================

#[derive(Deserialize)]
struct GraphQuery {
    dialect: Option<String>,
    #[serde(default)]
    discovery: bool,
}

#[derive(Serialize)]
struct GraphResponse {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

fn parse_dialect(raw: Option<&str>) -> Dialect {
    raw.and_then(|value| value.parse().ok()).unwrap_or_default()
}

/// GET /graph - scan the active project and return the lineage graph.
async fn get_graph(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<GraphResponse>, ApiError> {
    let root = state.project_dir.read().await.clone();
    let options = ScanOptions {
        dialect: parse_dialect(query.dialect.as_deref()),
        discovery: query.discovery,
        subfolders: None,
    };
    let (nodes, edges) = state.source.fetch(&root, options).await?;
    info!(nodes = nodes.len(), edges = edges.len(), "graph scanned");
    Ok(Json(GraphResponse { nodes, edges }))
}

#[derive(Deserialize)]
struct FilteredGraphRequest {
    subfolders: Vec<String>,
    dialect: Option<String>,
    #[serde(default)]
    discovery: bool,
}

/// POST /graph/filtered - scan a subfolder subset of the active project.
async fn get_graph_filtered(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FilteredGraphRequest>,
) -> Result<Json<GraphResponse>, ApiError> {
    let root = state.project_dir.read().await.clone();
    let options = ScanOptions {
        dialect: parse_dialect(req.dialect.as_deref()),
        discovery: req.discovery,
        subfolders: Some(req.subfolders),
    };
    let (nodes, edges) = state.source.fetch(&root, options).await?;
    Ok(Json(GraphResponse { nodes, edges }))
}

// ============================================================================
// Project path
// ============================================================================

#[derive(Serialize, Deserialize)]
struct PathPayload {
    path: String,
}

/// GET /config/path - the active project root.
async fn get_project_path(State(state): State<Arc<AppState>>) -> Json<PathPayload> {
    let path = state.project_dir.read().await.display().to_string();
    Json(PathPayload { path })
}

/// POST /config/path - switch the active project root. Rejected when the
/// directory does not exist; the previous root stays active.
async fn set_project_path(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PathPayload>,
) -> Result<Json<PathPayload>, ApiError> {
    let candidate = PathBuf::from(&req.path);
    if !candidate.is_dir() {
        return Err(ApiError::bad_request(format!(
            "Not a directory: {}",
            req.path
        )));
    }
    *state.project_dir.write().await = candidate;
    info!(path = %req.path, "project path changed");
    Ok(Json(req))
}

/// POST /scan/folders - subfolders of a path containing SQL files.
async fn scan_folders(
    Json(req): Json<PathPayload>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let folders = scan::list_sql_folders(&PathBuf::from(&req.path))?;
    Ok(Json(serde_json::json!({ "folders": folders })))
}

// ============================================================================
// Configuration documents
// ============================================================================

#[derive(Deserialize)]
struct SaveRequest {
    path: Option<String>,
    filename: Option<String>,
    document: ConfigDocument,
}

/// POST /save - persist a named view as a full snapshot.
async fn save_document(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dir = match req.path {
        Some(path) => PathBuf::from(path),
        None => state.project_dir.read().await.clone(),
    };
    let filename = req.filename.unwrap_or_else(|| DEFAULT_DOCUMENT.to_string());
    let written = persist::write_document(&dir, &filename, &req.document)?;
    info!(path = %written.display(), "document saved");
    Ok(Json(serde_json::json!({ "status": "saved", "filename": filename })))
}

#[derive(Deserialize)]
struct LoadQuery {
    path: Option<String>,
    filename: Option<String>,
}

/// GET /load - fetch a named view; a missing file yields the empty document.
async fn load_document(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<ConfigDocument>, ApiError> {
    let dir = match query.path {
        Some(path) => PathBuf::from(path),
        None => state.project_dir.read().await.clone(),
    };
    let filename = query
        .filename
        .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string());
    let doc = persist::read_document(&dir, &filename)?;
    Ok(Json(doc))
}

/// GET /config_files - saved configuration documents for a path.
async fn list_config_files(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let dir = match query.path {
        Some(path) => PathBuf::from(path),
        None => state.project_dir.read().await.clone(),
    };
    let files = persist::list_documents(&dir)?;
    Ok(Json(serde_json::json!({ "files": files })))
}

// ============================================================================
// Ghost node materialization
// ============================================================================

#[derive(Deserialize)]
struct CreateFileRequest {
    path: String,
    content: String,
}

/// POST /files/create - materialize a source file for a ghost node.
///
/// The path is relative to the active project root; escapes and overwrites
/// are rejected before anything is written.
async fn create_file(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFileRequest>,
) -> Result<Json<PathPayload>, ApiError> {
    if req.path.trim().is_empty() || req.path.split(['/', '\\']).any(|part| part == "..") {
        return Err(ApiError::bad_request(format!(
            "Invalid file path: {}",
            req.path
        )));
    }

    let root = state.project_dir.read().await.clone();
    let target = root.join(&req.path);
    if target.exists() {
        return Err(ApiError::bad_request(format!(
            "File already exists: {}",
            req.path
        )));
    }

    if let Some(parent) = target.parent() {
        if let Err(err) = tokio::fs::create_dir_all(parent).await {
            warn!(%err, "failed to create parent directory");
            return Err(ApiError::from(ScanError::Io(err)));
        }
    }
    tokio::fs::write(&target, req.content)
        .await
        .map_err(ScanError::Io)?;

    info!(path = %target.display(), "file created");
    Ok(Json(PathPayload {
        path: target.display().to_string(),
    }))
}
