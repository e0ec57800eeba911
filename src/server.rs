//! HTTP service: batch rows in, bibliography out.
//!
//! - `GET /health`
//! - `POST /bibliography` with `{"users": [{"user_id": ..., "lang"?: ..., "date_from"?: ..., "date_to"?: ...}]}`

use crate::batch::{BatchRow, UserRequest};
use crate::bibliography::CategoryBlock;
use crate::pipeline;
use crate::source::ResearchmapClient;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

struct AppState {
    client: ResearchmapClient,
    /// One batch at a time, so researchmap never sees overlapping calls
    run_lock: Mutex<()>,
}

/// Build the service routes around a researchmap client.
pub fn router(client: ResearchmapClient) -> Router {
    let app_state = Arc::new(AppState {
        client,
        run_lock: Mutex::new(()),
    });

    Router::new()
        .route("/health", get(health_handler))
        .route("/bibliography", post(bibliography_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Bibliography request body
#[derive(Debug, Deserialize)]
pub struct BibliographyRequest {
    pub users: Vec<BatchRow>,
}

/// Bibliography response
#[derive(Debug, Serialize)]
pub struct BibliographyResponse {
    /// `success`, or `error: <message>`
    pub status: String,
    pub count: usize,
    pub latex: String,
    pub blocks: Vec<CategoryBlock>,
}

impl BibliographyResponse {
    fn error(message: String) -> Self {
        Self {
            status: format!("error: {}", message),
            count: 0,
            latex: String::new(),
            blocks: vec![],
        }
    }
}

/// Bibliography endpoint handler
async fn bibliography_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BibliographyRequest>,
) -> Json<BibliographyResponse> {
    info!(users = req.users.len(), "Bibliography request");

    let requests: Vec<UserRequest> = match req
        .users
        .into_iter()
        .map(UserRequest::try_from)
        .collect::<crate::Result<_>>()
    {
        Ok(requests) => requests,
        Err(e) => return Json(BibliographyResponse::error(e.to_string())),
    };

    let _guard = state.run_lock.lock().await;
    match pipeline::build_bibliography(&state.client, &requests).await {
        Ok(bibliography) => Json(BibliographyResponse {
            status: "success".to_string(),
            count: bibliography.entry_count(),
            latex: bibliography.to_string(),
            blocks: bibliography.blocks,
        }),
        Err(e) => {
            error!(error = %e, "Bibliography run failed");
            Json(BibliographyResponse::error(e.to_string()))
        }
    }
}
