use crate::requester::images::ImageFinder;
use crate::requester::ContentRequester;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no documents: editing and rendering are stateless.
#[derive(Clone)]
pub struct AppState {
    pub requester: ContentRequester,
    pub images: ImageFinder,
}
