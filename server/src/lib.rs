use anyhow::Result;
use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post}, Json, Router};
use hotel_core::persist::DataPaths;
use hotel_core::{DocId, Document, SearchEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,
    /// Truncate both rankings to the top `k`; everything when absent.
    #[serde(default)]
    pub k: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub matching_docs: Vec<DocView>,
    pub ranked_tf_idf: Vec<ScoredDoc>,
    pub ranked_bm25: Vec<ScoredDoc>,
}

#[derive(Serialize)]
pub struct ScoredDoc {
    pub doc: DocView,
    pub score: f64,
}

/// Display shape of a hotel, as the front end expects it.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocView {
    pub doc_id: DocId,
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub country: Option<String>,
    pub address: Option<String>,
    pub rating: Option<serde_json::Value>,
    pub review_count: Option<serde_json::Value>,
}

impl DocView {
    fn new(doc_id: DocId, doc: &Document) -> Self {
        Self {
            doc_id,
            title: doc.name.clone(),
            image_url: doc.image.clone().unwrap_or_default(),
            description: doc.summary.clone().unwrap_or_else(|| "No description available".to_string()),
            country: doc.country.clone(),
            address: doc.address.clone(),
            rating: doc.rating.clone(),
            review_count: doc.review_count.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
}

pub fn build_app(data_dir: &str) -> Result<Router> {
    // Load corpus and index once at startup
    let engine = SearchEngine::open(&DataPaths::new(data_dir))?;
    Ok(router(Arc::new(engine)))
}

pub fn router(engine: Arc<SearchEngine>) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", post(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(AppState { engine })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let start = std::time::Instant::now();
    let engine = &state.engine;
    let outcome = engine.search(&req.query);

    let view = |doc_id: DocId| engine.document(doc_id).map(|doc| DocView::new(doc_id, doc));
    let scored = |ranked: Vec<(DocId, f64)>| -> Vec<ScoredDoc> {
        ranked
            .into_iter()
            .take(req.k.unwrap_or(usize::MAX))
            .filter_map(|(doc_id, score)| view(doc_id).map(|doc| ScoredDoc { doc, score }))
            .collect()
    };

    let matching_docs = outcome.matching.iter().filter_map(|&id| view(id)).collect();
    let ranked_tf_idf = scored(outcome.tf_idf);
    let ranked_bm25 = scored(outcome.bm25);
    let took_s = start.elapsed().as_secs_f64();
    tracing::info!(query = %req.query, matches = outcome.matching.len(), took_s, "search");
    Json(SearchResponse { query: req.query, took_s, matching_docs, ranked_tf_idf, ranked_bm25 })
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<DocView>, (StatusCode, String)> {
    state
        .engine
        .document(doc_id)
        .map(|doc| Json(DocView::new(doc_id, doc)))
        .ok_or((StatusCode::NOT_FOUND, format!("no document {doc_id}")))
}
