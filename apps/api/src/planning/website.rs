//! Website generation: description + page list → validated `Document`.

use tracing::info;

use crate::document::convert::{site_to_document, SiteReply};
use crate::document::Document;
use crate::errors::AppError;
use crate::planning::pages::validate_description;
use crate::planning::prompts::website_prompt;
use crate::planning::{attach_images, clean_names};
use crate::requester::images::ImageFinder;
use crate::requester::{ContentRequester, Prompt};

const WEBSITE_TEMPERATURE: f32 = 0.6;

pub async fn generate_website(
    requester: &ContentRequester,
    images: &ImageFinder,
    description: &str,
    pages: &[String],
) -> Result<Document, AppError> {
    let description = validate_description(description)?;
    let pages = clean_names(pages);
    if pages.is_empty() {
        return Err(AppError::Validation("at least one page is required".to_string()));
    }

    info!("Generating website with {} pages", pages.len());
    let prompt = Prompt::new(website_prompt(description, &pages), WEBSITE_TEMPERATURE);
    let reply: SiteReply = requester.request_json(&prompt).await?;

    let converted =
        site_to_document(reply).map_err(|e| AppError::MalformedReply(e.to_string()))?;
    let document = attach_images(images, converted).await?;
    info!("Website '{}' generated", document.title());
    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backoff::testing::ScriptedTransport;
    use crate::backoff::transport::{TransportFailure, TransportResponse};
    use crate::backoff::BackoffClient;
    use crate::config::tests::test_config;
    use crate::document::{Content, NodeKind};
    use crate::requester::images::PLACEHOLDER_IMAGE;
    use crate::requester::testing::completion_body;

    const SITE: &str = r##"{
        "title": "Crumb & Co",
        "palette": {"primary": "#f59e0b", "background": "#1c1917"},
        "pages": [
            {
                "name": "Home",
                "sections": [{
                    "columns": [
                        {"elements": [
                            {"type": "heading", "content": "Fresh every morning", "style": {"font-size": "3rem", "color": "#fff"}},
                            {"type": "button", "content": "Order", "hoverStyle": {"opacity": "0.8"}}
                        ]},
                        {"elements": [
                            {"type": "image", "query": "sourdough loaf", "alt": "Bread"}
                        ]}
                    ]
                }]
            },
            {"name": "Contact", "sections": []}
        ]
    }"##;

    fn parts(
        script: Vec<Result<TransportResponse, TransportFailure>>,
        with_image_key: bool,
        cache: std::path::PathBuf,
    ) -> (Arc<ScriptedTransport>, ContentRequester, ImageFinder) {
        let transport = ScriptedTransport::new(script);
        let mut config = test_config();
        config.image_cache_dir = cache;
        config.unsplash_access_key = with_image_key.then(|| "access".to_string());
        let client = BackoffClient::new(transport.clone());
        (
            transport,
            ContentRequester::new(client.clone(), &config),
            ImageFinder::new(client, &config),
        )
    }

    fn pages() -> Vec<String> {
        vec!["Home".to_string(), "Contact".to_string()]
    }

    #[tokio::test]
    async fn test_generates_validated_document() {
        let dir = tempfile::tempdir().unwrap();
        let (transport, requester, images) = parts(
            vec![ScriptedTransport::ok(completion_body(SITE))],
            false,
            dir.path().to_path_buf(),
        );

        let doc = generate_website(&requester, &images, "A small artisan bakery", &pages())
            .await
            .unwrap();

        assert_eq!(doc.title(), "Crumb & Co");
        assert_eq!(doc.pages().len(), 2);
        assert_eq!(doc.global_style().get("primary"), Some("#f59e0b"));

        let heading = doc.find_by_id("p1-s1-c1-e1").unwrap();
        assert_eq!(heading.kind, NodeKind::Heading);
        let style: Vec<_> = heading.style.iter().collect();
        assert_eq!(style, vec![("font-size", "3rem"), ("color", "#fff")]);

        let image = doc.find_by_id("p1-s1-c2-e1").unwrap();
        assert_eq!(image.content, Content::image(PLACEHOLDER_IMAGE, "Bread"));

        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_image_queries_are_cached_under_images() {
        let dir = tempfile::tempdir().unwrap();
        let (_, requester, images) = parts(
            vec![
                ScriptedTransport::ok(completion_body(SITE)),
                ScriptedTransport::ok(r#"{"results":[{"urls":{"regular":"http://cdn.test/b.jpg"}}]}"#),
                ScriptedTransport::ok(vec![1u8, 2, 3]),
            ],
            true,
            dir.path().to_path_buf(),
        );

        let doc = generate_website(&requester, &images, "A small artisan bakery", &pages())
            .await
            .unwrap();

        let image = doc.find_by_id("p1-s1-c2-e1").unwrap();
        let Content::Image { src, .. } = &image.content else {
            panic!("expected image content, got {:?}", image.content);
        };
        assert!(src.starts_with("images/"));
        assert!(src.ends_with("_p1-s1-c2-e1.jpg"));
        let file = src.trim_start_matches("images/");
        assert!(dir.path().join(file).exists());
    }

    #[tokio::test]
    async fn test_empty_page_list_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (transport, requester, images) =
            parts(vec![ScriptedTransport::ok("")], false, dir.path().to_path_buf());

        let result = generate_website(
            &requester,
            &images,
            "A small artisan bakery",
            &[" ".to_string()],
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_element_type_rejects_the_whole_reply() {
        let reply = r#"{"title":"X","pages":[{"name":"Home","sections":[{"columns":[{"elements":[
            {"type":"heading","content":"ok"},
            {"type":"carousel","content":"??"}
        ]}]}]}]}"#;
        let dir = tempfile::tempdir().unwrap();
        let (_, requester, images) = parts(
            vec![ScriptedTransport::ok(completion_body(reply))],
            false,
            dir.path().to_path_buf(),
        );

        let result = generate_website(&requester, &images, "A small artisan bakery", &pages()).await;

        assert!(matches!(result, Err(AppError::MalformedReply(_))));
    }

    #[tokio::test]
    async fn test_rejected_reply_makes_no_image_lookups() {
        let reply = r#"{"title":"X","pages":[{"name":"Home","sections":[{"columns":[{"elements":[
            {"type":"image","query":"sourdough loaf"},
            {"type":"carousel","content":"??"}
        ]}]}]}]}"#;
        let dir = tempfile::tempdir().unwrap();
        let (transport, requester, images) = parts(
            vec![
                ScriptedTransport::ok(completion_body(reply)),
                ScriptedTransport::ok(r#"{"results":[{"urls":{"regular":"http://cdn.test/b.jpg"}}]}"#),
                ScriptedTransport::ok(vec![1u8, 2, 3]),
            ],
            true,
            dir.path().to_path_buf(),
        );

        let result = generate_website(&requester, &images, "A small artisan bakery", &pages()).await;

        assert!(matches!(result, Err(AppError::MalformedReply(_))));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_reply_with_trailing_text_is_recovered() {
        let reply = format!("{SITE}\nHope you like it!");
        let dir = tempfile::tempdir().unwrap();
        let (_, requester, images) = parts(
            vec![ScriptedTransport::ok(completion_body(&reply))],
            false,
            dir.path().to_path_buf(),
        );

        let doc = generate_website(&requester, &images, "A small artisan bakery", &pages())
            .await
            .unwrap();
        assert_eq!(doc.pages().len(), 2);
    }
}
