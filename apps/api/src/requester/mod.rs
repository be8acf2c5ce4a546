//! Content Requester: turns a prompt into a completion API call and parses the reply.
//!
//! All completion-API traffic goes through this module; retries are delegated to
//! the Backoff Client. The requester keeps no state between calls.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::backoff::{BackoffClient, BackoffPolicy, RequestAttempt, SendError};
use crate::config::Config;

pub mod extract;
pub mod images;
pub mod prompts;

use extract::{extract_json_object, preview, split_comma_list};

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("upstream call failed: {0}")]
    Upstream(#[from] SendError),

    #[error("malformed reply ({reason}): {raw}")]
    MalformedReply { reason: String, raw: String },

    #[error("completion API returned no text")]
    EmptyReply,
}

/// The shape a reply is expected to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    CommaList,
    JsonObject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedData {
    List(Vec<String>),
    Json(Value),
}

/// A prompt plus its sampling temperature.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub text: String,
    pub temperature: f32,
}

impl Prompt {
    pub fn new(text: impl Into<String>, temperature: f32) -> Self {
        Self {
            text: text.into(),
            temperature,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl CompletionResponse {
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

#[derive(Clone)]
pub struct ContentRequester {
    client: BackoffClient,
    policy: BackoffPolicy,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl ContentRequester {
    pub fn new(client: BackoffClient, config: &Config) -> Self {
        Self {
            client,
            policy: config.backoff,
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.completion_base_url.trim_end_matches('/'),
                config.completion_model
            ),
            api_key: config.gemini_api_key.clone(),
            timeout: config.request_timeout,
        }
    }

    /// Sends `prompt` and parses the reply as `shape`.
    ///
    /// A reply that cannot be parsed is rejected as a whole; nothing partial is returned.
    pub async fn request(
        &self,
        prompt: &Prompt,
        shape: ExpectedShape,
    ) -> Result<ParsedData, RequestError> {
        let text = self
            .complete(prompt, shape == ExpectedShape::JsonObject)
            .await?;
        parse_reply(&text, shape)
    }

    /// Sends `prompt` in JSON mode and deserializes the recovered object into `T`.
    /// Deserializing from the reply text keeps object key order intact.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        prompt: &Prompt,
    ) -> Result<T, RequestError> {
        let text = self.complete(prompt, true).await?;
        let object = extract_json_object(&text)?;
        serde_json::from_str(object).map_err(|e| RequestError::MalformedReply {
            reason: e.to_string(),
            raw: preview(object),
        })
    }

    /// Makes the raw call and returns the first candidate's text.
    async fn complete(&self, prompt: &Prompt, json_mode: bool) -> Result<String, RequestError> {
        let request = RequestAttempt::post_json(
            &self.endpoint,
            build_payload(prompt, json_mode),
            self.timeout,
        )
        .with_query("key", &self.api_key);

        let response = self.client.send(&request, &self.policy).await?;

        let completion: CompletionResponse =
            response.json().map_err(|e| RequestError::MalformedReply {
                reason: format!("unexpected completion envelope: {e}"),
                raw: preview(&response.text()),
            })?;

        let text = completion.text().ok_or(RequestError::EmptyReply)?;
        debug!("Completion returned {} characters", text.len());
        Ok(text.to_string())
    }
}

/// Builds the completion request body.
fn build_payload(prompt: &Prompt, json_mode: bool) -> Value {
    let mut generation_config = json!({ "temperature": prompt.temperature });
    if json_mode {
        generation_config["responseMimeType"] = json!("application/json");
    }

    json!({
        "contents": [{ "parts": [{ "text": prompt.text }] }],
        "generationConfig": generation_config,
    })
}

/// Parses reply text into the expected shape.
pub fn parse_reply(text: &str, shape: ExpectedShape) -> Result<ParsedData, RequestError> {
    match shape {
        ExpectedShape::CommaList => Ok(ParsedData::List(split_comma_list(text))),
        ExpectedShape::JsonObject => {
            let object = extract_json_object(text)?;
            serde_json::from_str(object)
                .map(ParsedData::Json)
                .map_err(|e| RequestError::MalformedReply {
                    reason: e.to_string(),
                    raw: preview(object),
                })
        }
    }
}
