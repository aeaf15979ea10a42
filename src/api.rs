use crate::document::{DocId, Document, SearchResult};
use crate::handle::EngineHandle;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

const SNIPPET_CHARS: usize = 200;

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: DocId,
    pub filename: String,
    pub total_words: usize,
    pub score: f64,
    pub snippet: String,
}

impl From<SearchResult> for SearchHit {
    fn from(result: SearchResult) -> Self {
        Self {
            snippet: result.snippet(SNIPPET_CHARS),
            id: result.id,
            filename: result.filename,
            total_words: result.total_words,
            score: result.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    pub id: DocId,
    pub filename: String,
    pub total_words: usize,
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        Self {
            id: doc.id,
            filename: doc.filename.clone(),
            total_words: doc.total_words,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_documents: usize,
    pub total_terms: usize,
    pub total_postings: usize,
    pub avg_docs_per_term: f64,
    pub generation: u64,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }
}

impl ApiResponse<()> {
    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.0);
        tracing::error!("API error: {}", message);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<()>::error(message)),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

fn not_found(doc_id: DocId) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(format!(
            "Document with id '{}' not found",
            doc_id
        ))),
    )
        .into_response()
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn search_documents(
    State(handle): State<Arc<EngineHandle>>,
    Query(req): Query<SearchRequest>,
) -> Result<impl IntoResponse, AppError> {
    let engine = handle.get()?;
    tracing::info!(query = %req.q, "Search query");

    let results = engine.search(&req.q);
    let total = results.len();
    let limit = req.limit.unwrap_or(total);

    let response = SearchResponse {
        query: req.q,
        total,
        results: results.into_iter().take(limit).map(SearchHit::from).collect(),
    };

    Ok(Json(ApiResponse::success(response)))
}

async fn list_documents(
    State(handle): State<Arc<EngineHandle>>,
) -> Result<impl IntoResponse, AppError> {
    let engine = handle.get()?;
    let documents: Vec<DocumentSummary> =
        engine.documents().iter().map(DocumentSummary::from).collect();

    Ok(Json(ApiResponse::success(documents)))
}

async fn get_document(
    State(handle): State<Arc<EngineHandle>>,
    Path(id): Path<DocId>,
) -> Result<Response, AppError> {
    let engine = handle.get()?;

    Ok(match engine.get_document(id) {
        Some(doc) => Json(ApiResponse::success(doc.clone())).into_response(),
        None => not_found(id),
    })
}

async fn download_document(
    State(handle): State<Arc<EngineHandle>>,
    Path(id): Path<DocId>,
) -> Result<Response, AppError> {
    let engine = handle.get()?;

    let Some(doc) = engine.get_document(id) else {
        return Ok(not_found(id));
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        doc.filename.replace('"', "")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        doc.content.clone(),
    )
        .into_response())
}

async fn get_stats(
    State(handle): State<Arc<EngineHandle>>,
) -> Result<impl IntoResponse, AppError> {
    let stats = handle.get()?.stats();

    let response = StatsResponse {
        total_documents: stats.total_documents,
        total_terms: stats.total_terms,
        total_postings: stats.total_postings,
        avg_docs_per_term: stats.avg_docs_per_term,
        generation: handle.generation(),
    };

    Ok(Json(ApiResponse::success(response)))
}

async fn rebuild_index(
    State(handle): State<Arc<EngineHandle>>,
) -> Result<impl IntoResponse, AppError> {
    let engine = handle.rebuild()?;
    tracing::info!("Rebuilt index with {} documents", engine.document_count());

    Ok(Json(ApiResponse::success(DocumentCount {
        documents: engine.document_count(),
    })))
}

#[derive(Debug, Serialize)]
struct DocumentCount {
    documents: usize,
}

// ========== Router ==========

pub fn create_router(handle: Arc<EngineHandle>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_documents))
        .route("/documents", get(list_documents))
        .route("/documents/:id", get(get_document))
        .route("/documents/:id/raw", get(download_document))
        .route("/stats", get(get_stats))
        .route("/rebuild", post(rebuild_index))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(handle)
}
