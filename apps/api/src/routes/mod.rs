pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::planning::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let images = ServeDir::new(state.images.cache_dir().clone());

    Router::new()
        .route("/health", get(health::health_handler))
        // Suggestions
        .route("/api/v1/pages/suggest", post(handlers::handle_suggest_pages))
        .route(
            "/api/v1/subtopics/suggest",
            post(handlers::handle_suggest_subtopics),
        )
        // Generation
        .route(
            "/api/v1/websites/generate",
            post(handlers::handle_generate_website),
        )
        .route(
            "/api/v1/presentations/generate",
            post(handlers::handle_generate_presentation),
        )
        // Documents (stateless)
        .route("/api/v1/documents/edit", post(handlers::handle_edit_document))
        .route(
            "/api/v1/documents/render",
            post(handlers::handle_render_document),
        )
        // Cached images
        .nest_service("/images", images)
        .with_state(state)
}
