// Domain flows: page and subtopic suggestion, website and presentation
// generation. Every upstream call goes through requester::ContentRequester.

pub mod handlers;
pub mod pages;
pub mod presentation;
pub mod prompts;
pub mod website;

use anyhow::Context;
use tracing::debug;
use uuid::Uuid;

use crate::document::convert::Converted;
use crate::document::{Document, PropertyPath};
use crate::errors::AppError;
use crate::requester::images::ImageFinder;

/// Trimmed, non-empty names in their original order.
pub fn clean_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .collect()
}

/// Per-generation prefix for cached image file names.
pub(crate) fn batch_prefix() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Looks up every pending image query of a converted reply and points the
/// image node at the cached file. Lookups never fail a generation; a miss
/// leaves the placeholder in place.
pub(crate) async fn attach_images(
    images: &ImageFinder,
    converted: Converted,
) -> Result<Document, AppError> {
    let Converted {
        mut document,
        image_queries,
    } = converted;
    if image_queries.is_empty() {
        return Ok(document);
    }

    let prefix = batch_prefix();
    debug!("Resolving {} image queries", image_queries.len());
    for pending in image_queries {
        let file_name = format!("{prefix}_{}.jpg", pending.node_id);
        let src = images.resolve(&pending.query, &file_name).await;
        document
            .update_property(&pending.node_id, &PropertyPath::Content, &src)
            .with_context(|| format!("attaching image to '{}'", pending.node_id))?;
    }
    Ok(document)
}
