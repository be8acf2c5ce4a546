//! Presentation generation: topic + subtopics → one page per slide.

use tracing::info;

use crate::document::convert::{presentation_to_document, PresentationReply};
use crate::document::Document;
use crate::errors::AppError;
use crate::planning::pages::validate_topic;
use crate::planning::prompts::presentation_prompt;
use crate::planning::{attach_images, clean_names};
use crate::requester::images::ImageFinder;
use crate::requester::{ContentRequester, Prompt};

const PRESENTATION_TEMPERATURE: f32 = 0.7;

/// `Introduction`, the subtopics in order, then `Conclusion` and `Q&A`.
pub fn slide_titles(subtopics: &[String]) -> Vec<String> {
    let mut titles = Vec::with_capacity(subtopics.len() + 3);
    titles.push("Introduction".to_string());
    titles.extend(subtopics.iter().cloned());
    titles.push("Conclusion".to_string());
    titles.push("Q&A".to_string());
    titles
}

pub async fn generate_presentation(
    requester: &ContentRequester,
    images: &ImageFinder,
    topic: &str,
    subtopics: &[String],
) -> Result<Document, AppError> {
    let topic = validate_topic(topic)?;
    let subtopics = clean_names(subtopics);
    if subtopics.is_empty() {
        return Err(AppError::Validation("at least one subtopic is required".to_string()));
    }

    let slides = slide_titles(&subtopics);
    info!("Generating presentation with {} slides", slides.len());

    let prompt = Prompt::new(presentation_prompt(topic, &slides), PRESENTATION_TEMPERATURE);
    let reply: PresentationReply = requester.request_json(&prompt).await?;

    let converted =
        presentation_to_document(reply).map_err(|e| AppError::MalformedReply(e.to_string()))?;
    attach_images(images, converted).await
}
