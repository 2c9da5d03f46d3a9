//! Producing the text value from a task payload.
//!
//! The annotated text comes from upstream as a template (`$field`
//! placeholders resolved against a JSON task payload), optionally base64
//! encoded. This runs once before a render pass; everything downstream
//! only ever sees the resolved flat string.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// How the resolved value is decoded into the text value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// The value is used as-is.
    #[default]
    String,
    /// The value is standard-alphabet base64 holding UTF-8 text.
    Base64,
}

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("task payload has no field named `{0}`")]
    MissingField(String),
    #[error("task field `{0}` is not a text value")]
    NotText(String),
    #[error("failed to decode base64 content: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("decoded content is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Resolves `source` (a template like `"$text"`) against the task payload
/// and decodes it per `encoding`, yielding the text value to render.
pub fn resolve_text(
    task: &serde_json::Value,
    source: &str,
    encoding: Encoding,
) -> Result<String, ContentError> {
    let interpolated = interpolate(task, source)?;
    match encoding {
        Encoding::String => Ok(interpolated),
        Encoding::Base64 => {
            let bytes = STANDARD.decode(interpolated.trim())?;
            Ok(String::from_utf8(bytes)?)
        }
    }
}

/// Replaces every `$field` placeholder with the payload's string value for
/// that field. Fields must exist and hold strings; anything else is an
/// error rather than a silent empty substitution.
fn interpolate(task: &serde_json::Value, source: &str) -> Result<String, ContentError> {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER.get_or_init(|| {
        Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("Invalid placeholder regex")
    });

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for capture in placeholder.captures_iter(source) {
        let whole = capture.get(0).expect("capture 0 always exists");
        let name = &capture[1];

        let value = task
            .get(name)
            .ok_or_else(|| ContentError::MissingField(name.to_string()))?;
        let text = value
            .as_str()
            .ok_or_else(|| ContentError::NotText(name.to_string()))?;

        out.push_str(&source[last..whole.start()]);
        out.push_str(text);
        last = whole.end();
    }
    out.push_str(&source[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_template_interpolates_fields() {
        let task = json!({"text": "the quick brown fox"});
        let resolved = resolve_text(&task, "$text", Encoding::String).unwrap();
        assert_eq!(resolved, "the quick brown fox");
    }

    #[test]
    fn template_mixes_literals_and_fields() {
        let task = json!({"title": "Fox", "body": "jumps over"});
        let resolved = resolve_text(&task, "$title\n$body", Encoding::String).unwrap();
        assert_eq!(resolved, "Fox\njumps over");
    }

    #[test]
    fn missing_field_is_an_error() {
        let task = json!({"text": "hi"});
        let err = resolve_text(&task, "$missing", Encoding::String).unwrap_err();
        assert!(matches!(err, ContentError::MissingField(name) if name == "missing"));
    }

    #[test]
    fn non_string_field_is_an_error() {
        let task = json!({"count": 3});
        let err = resolve_text(&task, "$count", Encoding::String).unwrap_err();
        assert!(matches!(err, ContentError::NotText(name) if name == "count"));
    }

    #[test]
    fn base64_values_are_decoded() {
        // "ab\ncd"
        let task = json!({"text": "YWIKY2Q="});
        let resolved = resolve_text(&task, "$text", Encoding::Base64).unwrap();
        assert_eq!(resolved, "ab\ncd");
    }

    #[test]
    fn invalid_base64_is_an_error() {
        let task = json!({"text": "not base64!"});
        let err = resolve_text(&task, "$text", Encoding::Base64).unwrap_err();
        assert!(matches!(err, ContentError::InvalidBase64(_)));
    }

    #[test]
    fn template_without_placeholders_passes_through() {
        let task = json!({});
        let resolved = resolve_text(&task, "fixed content", Encoding::String).unwrap();
        assert_eq!(resolved, "fixed content");
    }
}
