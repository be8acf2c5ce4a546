//! Reply parsing helpers: code-fence stripping, comma lists, and JSON object
//! recovery.

use serde_json::{Map, Value};
use tracing::warn;

use crate::requester::RequestError;

/// Strips a leading ```` ``` ```` fence (with optional language tag such as `json`
/// or `html`) and the matching trailing fence. Unfenced text is only trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };

    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    let rest = rest.trim_start();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}

/// Splits a comma-separated reply into trimmed, non-empty items.
pub fn split_comma_list(text: &str) -> Vec<String> {
    strip_code_fences(text)
        .split(',')
        .map(|item| item.trim().trim_matches('"').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Returns the slice of `text` holding a JSON object.
///
/// If the whole (fence-stripped) reply is not a JSON object, one recovery is
/// attempted: parse the object at the start of the reply and discard whatever
/// trails it. If that also fails, the error from the first parse is returned.
pub fn extract_json_object(text: &str) -> Result<&str, RequestError> {
    let body = strip_code_fences(text);

    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(_) => Ok(body),
        Err(original) => match recover_leading_object(body) {
            Some(recovered) => {
                warn!(
                    "Reply had {} bytes of trailing content after the JSON object; discarded",
                    body.len() - recovered.len()
                );
                Ok(recovered)
            }
            None => Err(RequestError::MalformedReply {
                reason: original.to_string(),
                raw: preview(body),
            }),
        },
    }
}

fn recover_leading_object(body: &str) -> Option<&str> {
    let mut stream = serde_json::Deserializer::from_str(body).into_iter::<Map<String, Value>>();
    match stream.next() {
        Some(Ok(_)) => Some(&body[..stream.byte_offset()]),
        _ => None,
    }
}

/// First 200 characters of a reply, for error messages.
pub fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}
