//! Axum route handlers for the planning, editing and rendering API.

use anyhow::Context;
use axum::{extract::State, response::Html, Json};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::document::{Document, EditorEvent, EditorSession};
use crate::errors::AppError;
use crate::planning::pages::{suggest_pages, suggest_subtopics};
use crate::planning::presentation::generate_presentation;
use crate::planning::website::generate_website;
use crate::render::{render, RenderMode};
use crate::state::AppState;

const EDIT_CHANNEL_CAPACITY: usize = 64;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SuggestPagesRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestPagesResponse {
    pub pages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestSubtopicsRequest {
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestSubtopicsResponse {
    pub subtopics: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateWebsiteRequest {
    pub description: String,
    #[serde(default)]
    pub pages: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePresentationRequest {
    pub topic: String,
    #[serde(default)]
    pub subtopics: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub document: Document,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub document: Document,
    #[serde(default)]
    pub events: Vec<EditorEvent>,
}

#[derive(Debug, Serialize)]
pub struct EditResponse {
    pub document: Document,
    pub selection: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub document: Document,
    #[serde(default = "default_render_mode")]
    pub mode: RenderMode,
}

fn default_render_mode() -> RenderMode {
    RenderMode::Export
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/pages/suggest
pub async fn handle_suggest_pages(
    State(state): State<AppState>,
    Json(request): Json<SuggestPagesRequest>,
) -> Result<Json<SuggestPagesResponse>, AppError> {
    let pages = suggest_pages(&state.requester, &request.description).await?;
    Ok(Json(SuggestPagesResponse { pages }))
}

/// POST /api/v1/subtopics/suggest
pub async fn handle_suggest_subtopics(
    State(state): State<AppState>,
    Json(request): Json<SuggestSubtopicsRequest>,
) -> Result<Json<SuggestSubtopicsResponse>, AppError> {
    let subtopics = suggest_subtopics(&state.requester, &request.topic).await?;
    Ok(Json(SuggestSubtopicsResponse { subtopics }))
}

/// POST /api/v1/websites/generate
pub async fn handle_generate_website(
    State(state): State<AppState>,
    Json(request): Json<GenerateWebsiteRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = generate_website(
        &state.requester,
        &state.images,
        &request.description,
        &request.pages,
    )
    .await?;
    Ok(Json(DocumentResponse { document }))
}

/// POST /api/v1/presentations/generate
pub async fn handle_generate_presentation(
    State(state): State<AppState>,
    Json(request): Json<GeneratePresentationRequest>,
) -> Result<Json<DocumentResponse>, AppError> {
    let document = generate_presentation(
        &state.requester,
        &state.images,
        &request.topic,
        &request.subtopics,
    )
    .await?;
    Ok(Json(DocumentResponse { document }))
}

/// POST /api/v1/documents/edit
///
/// Replays `events` in order through an editor session. The first failing
/// event rejects the batch; no partially edited document is returned.
pub async fn handle_edit_document(
    Json(request): Json<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let (tx, rx) = mpsc::channel(EDIT_CHANNEL_CAPACITY);
    let session = tokio::spawn(EditorSession::new(request.document).run(rx));
    let count = request.events.len();

    for event in request.events {
        // a closed channel means the session already stopped on an error
        if tx.send(event).await.is_err() {
            break;
        }
    }
    drop(tx);

    let session = session.await.context("editor session task failed")??;
    info!(
        "Applied {count} editor events to '{}' (selection: {:?})",
        session.document().title(),
        session.selection()
    );
    let (document, selection) = session.into_parts();
    Ok(Json(EditResponse {
        document,
        selection,
    }))
}

/// POST /api/v1/documents/render
pub async fn handle_render_document(Json(request): Json<RenderRequest>) -> Html<String> {
    Html(render(&request.document, request.mode))
}
