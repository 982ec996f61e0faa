//! Snippet endpoints
//!
//! - `GET /` latest valid snippets
//! - `GET /snippet/view/{id}` one valid snippet
//! - `GET /snippet/create` create form description
//! - `POST /snippet/create` create, then redirect to the view

use std::sync::Arc;

use axum::{extract::State, response::Redirect, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::db::repos::{Snippet, DEFAULT_LATEST_LIMIT};
use crate::http::error::ApiError;
use crate::http::extractors::ValidSnippetId;
use crate::http::server::AppState;
use crate::models::{LifetimeDays, SnippetContent, SnippetTitle, PERMITTED_LIFETIMES};

/// Create snippet request
#[derive(Deserialize)]
pub struct CreateSnippetRequest {
    pub title: String,
    pub content: String,
    /// Lifetime in days, one of [`PERMITTED_LIFETIMES`]
    pub expires: i64,
}

/// Snippet response
#[derive(Debug, Serialize)]
pub struct SnippetResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created: String,
    pub expires: String,
}

impl From<Snippet> for SnippetResponse {
    fn from(s: Snippet) -> Self {
        Self {
            id: s.id,
            title: s.title,
            content: s.content,
            created: s.created.to_rfc3339(),
            expires: s.expires.to_rfc3339(),
        }
    }
}

/// Create form description
#[derive(Debug, Serialize)]
pub struct CreateFormResponse {
    pub fields: &'static [&'static str],
    pub expires_options: &'static [u32],
    pub expires_default: u32,
}

/// GET / - latest valid snippets, newest first
async fn home(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SnippetResponse>>, ApiError> {
    let snippets = state.snippets().latest(DEFAULT_LATEST_LIMIT).await?;
    Ok(Json(snippets.into_iter().map(SnippetResponse::from).collect()))
}

/// GET /snippet/view/{id} - a single valid snippet
async fn view_snippet(
    State(state): State<Arc<AppState>>,
    ValidSnippetId(id): ValidSnippetId,
) -> Result<Json<SnippetResponse>, ApiError> {
    let snippet = state.snippets().get(id).await?;
    Ok(Json(SnippetResponse::from(snippet)))
}

/// GET /snippet/create - what the create endpoint accepts
async fn create_form() -> Json<CreateFormResponse> {
    Json(CreateFormResponse {
        fields: &["title", "content", "expires"],
        expires_options: PERMITTED_LIFETIMES,
        expires_default: 365,
    })
}

/// POST /snippet/create - store a snippet and redirect to it (303)
async fn create_snippet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateSnippetRequest>,
) -> Result<Redirect, ApiError> {
    let title = SnippetTitle::new(&req.title)?;
    let content = SnippetContent::new(req.content)?;
    let lifetime = LifetimeDays::from_form(req.expires)?;

    let id = state.snippets().insert(&title, &content, lifetime).await?;
    tracing::info!(id, "Snippet created");

    Ok(Redirect::to(&format!("/snippet/view/{}", id)))
}

/// Snippet routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/snippet/view/{id}", get(view_snippet))
        .route("/snippet/create", get(create_form).post(create_snippet))
}
