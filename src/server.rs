//! JSON HTTP server for the edition.
//!
//! Serves the query, per-document lookup, and entity-index interfaces over
//! a small JSON API. Template rendering to final pages is a consumer
//! concern; responses carry the display-markup strings verbatim.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/search` | Faceted search with pagination |
//! | `GET`  | `/documents/{id}` | Full rendered document |
//! | `GET`  | `/index` | Alphabetical person and place indices |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses use a single schema:
//!
//! ```json
//! { "error": { "code": "not_found", "message": "document not found: 9" } }
//! ```
//!
//! # Concurrency
//!
//! The corpus is built before the listener binds and shared behind `Arc`;
//! handlers only ever read it, so requests need no coordination.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so a separately hosted
//! frontend can call the API directly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::corpus::Corpus;
use crate::models::Document;
use crate::search::{self, PageLink, QueryParams};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    corpus: Arc<Corpus>,
}

/// Starts the HTTP server over an already loaded corpus.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated.
pub async fn run_server(config: &Config, corpus: Corpus) -> anyhow::Result<()> {
    let state = AppState {
        corpus: Arc::new(corpus),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/search", post(handle_search))
        .route("/documents/{id}", get(handle_get_document))
        .route("/index", get(handle_index))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state.clone());

    println!("Edition server listening on http://{}", config.server.bind);
    println!(
        "  {} documents, {} persons, {} places",
        state.corpus.documents.len(),
        state.corpus.person_keys.len(),
        state.corpus.place_keys.len()
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 404 Not Found error.
fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /search ============

/// Search request body. Every field is optional; `page` accepts a number
/// or a numeric string and anything else falls back to page 1.
#[derive(Deserialize)]
struct SearchRequest {
    #[serde(default)]
    q: String,
    #[serde(default)]
    persons: Vec<String>,
    #[serde(default)]
    places: Vec<String>,
    #[serde(default)]
    page: serde_json::Value,
}

#[derive(Serialize)]
struct SearchResponse {
    results: Vec<DocumentSummary>,
    total: usize,
    total_pages: usize,
    page: usize,
    window: Vec<PageLink>,
}

/// Listing-view projection of a document.
#[derive(Serialize)]
struct DocumentSummary {
    id: String,
    title: String,
    date_place_plain: String,
    summary_short: String,
}

async fn handle_search(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Json<SearchResponse> {
    let params = QueryParams {
        q: request.q,
        persons: request.persons,
        places: request.places,
        page: coerce_page(&request.page),
    };
    let page = search::run_query(&state.corpus.documents, &params);

    Json(SearchResponse {
        results: page.results.into_iter().map(summarize).collect(),
        total: page.total,
        total_pages: page.total_pages,
        page: page.page,
        window: page.window,
    })
}

fn summarize(doc: &Document) -> DocumentSummary {
    DocumentSummary {
        id: doc.id.clone(),
        title: doc.title.clone(),
        date_place_plain: doc.date_place_plain.clone(),
        summary_short: doc.summary_short.clone(),
    }
}

/// Malformed page input is recovered, never surfaced as an error.
fn coerce_page(value: &serde_json::Value) -> i64 {
    match value {
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(1),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(1),
        _ => 1,
    }
}

// ============ GET /documents/{id} ============

async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    state
        .corpus
        .find_document(&id)
        .map(|doc| Json(doc.clone()))
        .ok_or_else(|| not_found(format!("document not found: {}", id)))
}

// ============ GET /index ============

async fn handle_index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "persons": state.corpus.person_index,
        "places": state.corpus.place_index,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_page_accepts_numbers_and_numeric_strings() {
        assert_eq!(coerce_page(&serde_json::json!(3)), 3);
        assert_eq!(coerce_page(&serde_json::json!("4")), 4);
        assert_eq!(coerce_page(&serde_json::json!(" 5 ")), 5);
    }

    #[test]
    fn coerce_page_falls_back_to_one() {
        assert_eq!(coerce_page(&serde_json::Value::Null), 1);
        assert_eq!(coerce_page(&serde_json::json!("three")), 1);
        assert_eq!(coerce_page(&serde_json::json!(2.5)), 1);
        assert_eq!(coerce_page(&serde_json::json!([1])), 1);
    }
}
