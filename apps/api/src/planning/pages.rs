//! Page and subtopic suggestion.

use tracing::info;

use crate::errors::AppError;
use crate::planning::prompts::{suggest_pages_prompt, suggest_subtopics_prompt};
use crate::requester::{ContentRequester, ExpectedShape, ParsedData, Prompt};

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 1000;
pub const MAX_SUGGESTIONS: usize = 8;
pub const MIN_SUBTOPICS: usize = 4;

const DEFAULT_PAGES: [&str; 3] = ["Home", "About", "Contact"];
const SUGGESTION_TEMPERATURE: f32 = 0.5;

/// Trims `description` and checks its length.
pub fn validate_description(description: &str) -> Result<&str, AppError> {
    let description = description.trim();
    let chars = description.chars().count();
    if chars < MIN_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "description must be at least {MIN_DESCRIPTION_CHARS} characters"
        )));
    }
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(description)
}

pub fn validate_topic(topic: &str) -> Result<&str, AppError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation("topic cannot be empty".to_string()));
    }
    if topic.chars().count() > MAX_DESCRIPTION_CHARS {
        return Err(AppError::Validation(format!(
            "topic must be at most {MAX_DESCRIPTION_CHARS} characters"
        )));
    }
    Ok(topic)
}

/// Asks for page names for a site described by `description`.
pub async fn suggest_pages(
    requester: &ContentRequester,
    description: &str,
) -> Result<Vec<String>, AppError> {
    let description = validate_description(description)?;
    let prompt = Prompt::new(suggest_pages_prompt(description), SUGGESTION_TEMPERATURE);

    let names = request_list(requester, &prompt).await?;
    let pages = normalize_pages(names);
    info!("Suggested {} pages", pages.len());
    Ok(pages)
}

/// Fewer than two usable names falls back to the default set; at most
/// `MAX_SUGGESTIONS` are kept.
pub fn normalize_pages(mut names: Vec<String>) -> Vec<String> {
    if names.len() < 2 {
        return DEFAULT_PAGES.iter().map(|p| p.to_string()).collect();
    }
    names.truncate(MAX_SUGGESTIONS);
    names
}

/// Asks for presentation subtopics on `topic`.
pub async fn suggest_subtopics(
    requester: &ContentRequester,
    topic: &str,
) -> Result<Vec<String>, AppError> {
    let topic = validate_topic(topic)?;
    let prompt = Prompt::new(suggest_subtopics_prompt(topic), SUGGESTION_TEMPERATURE);

    let names = request_list(requester, &prompt).await?;
    let subtopics = pad_subtopics(topic, names);
    info!("Suggested {} subtopics", subtopics.len());
    Ok(subtopics)
}

/// Pads to `MIN_SUBTOPICS` with numbered filler and caps at `MAX_SUGGESTIONS`.
pub fn pad_subtopics(topic: &str, mut subtopics: Vec<String>) -> Vec<String> {
    while subtopics.len() < MIN_SUBTOPICS {
        subtopics.push(format!("More Details on {topic} #{}", subtopics.len() + 1));
    }
    subtopics.truncate(MAX_SUGGESTIONS);
    subtopics
}

async fn request_list(requester: &ContentRequester, prompt: &Prompt) -> Result<Vec<String>, AppError> {
    match requester.request(prompt, ExpectedShape::CommaList).await? {
        ParsedData::List(items) => Ok(items),
        other => Err(AppError::MalformedReply(format!(
            "expected a comma-separated list, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backoff::testing::ScriptedTransport;
    use crate::backoff::BackoffClient;
    use crate::config::tests::test_config;
    use crate::requester::testing::completion_body;

    fn requester(transport: Arc<ScriptedTransport>) -> ContentRequester {
        ContentRequester::new(BackoffClient::new(transport), &test_config())
    }

    #[test]
    fn test_description_bounds() {
        assert!(validate_description("too short").is_err());
        assert!(validate_description("   a bakery site   ").is_ok());
        assert!(validate_description(&"x".repeat(1001)).is_err());
        assert_eq!(
            validate_description("  a bakery site ").unwrap(),
            "a bakery site"
        );
    }

    #[test]
    fn test_blank_topic_is_rejected() {
        assert!(matches!(validate_topic("  "), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_single_name_falls_back_to_defaults() {
        assert_eq!(
            normalize_pages(vec!["Landing".into()]),
            vec!["Home", "About", "Contact"]
        );
    }

    #[test]
    fn test_pages_are_capped() {
        let names: Vec<String> = (1..=12).map(|i| format!("P{i}")).collect();
        assert_eq!(normalize_pages(names).len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_subtopics_are_padded_with_numbered_filler() {
        let padded = pad_subtopics("Rust", vec!["Ownership".into(), "Traits".into()]);
        assert_eq!(
            padded,
            vec![
                "Ownership",
                "Traits",
                "More Details on Rust #3",
                "More Details on Rust #4"
            ]
        );
    }

    #[tokio::test]
    async fn test_suggest_pages_end_to_end() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok(completion_body(
            "Home, Menu, \"Catering\", Contact\n",
        ))]);

        let pages = suggest_pages(&requester(transport.clone()), "A family bakery in Lisbon")
            .await
            .unwrap();

        assert_eq!(pages, vec!["Home", "Menu", "Catering", "Contact"]);
        let sent = &transport.requests()[0];
        let body = sent.body.as_ref().unwrap();
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[tokio::test]
    async fn test_invalid_description_makes_no_call() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok(completion_body("x"))]);

        let result = suggest_pages(&requester(transport.clone()), "short").await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_suggest_subtopics_pads_short_reply() {
        let transport = ScriptedTransport::new(vec![ScriptedTransport::ok(completion_body(
            "Memory Safety",
        ))]);

        let subtopics = suggest_subtopics(&requester(transport), "Rust").await.unwrap();

        assert_eq!(subtopics.len(), 4);
        assert_eq!(subtopics[0], "Memory Safety");
        assert_eq!(subtopics[3], "More Details on Rust #4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_upstream_surfaces_as_upstream_error() {
        let transport =
            ScriptedTransport::new(vec![ScriptedTransport::status(503, "unavailable")]);

        let result = suggest_subtopics(&requester(transport.clone()), "Rust").await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
        assert_eq!(transport.call_count(), 3);
    }
}
