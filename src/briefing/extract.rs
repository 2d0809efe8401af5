//! Best-effort JSON extraction from model output.
//!
//! Models frequently wrap JSON answers in markdown code fences despite being
//! told not to. The extractor tolerates a leading "json" or bare code fence
//! marker and a trailing fence marker, with surrounding whitespace, and
//! otherwise parses the text as-is.

use serde_json::Value;
use thiserror::Error;

/// Errors produced while turning model output into JSON.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The text (after fence stripping) was not valid JSON.
    #[error("Model response is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Strip optional markdown fencing and parse the remainder as JSON.
pub fn extract_json(raw: &str) -> Result<Value, ExtractError> {
    let text = strip_fences(raw);
    Ok(serde_json::from_str(text)?)
}

fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::{ExtractError, extract_json};
    use serde_json::json;

    #[test]
    fn unfenced_json_parses_as_is() {
        let value = extract_json("{\"brief\": \"done\"}").expect("json");
        assert_eq!(value, json!({ "brief": "done" }));
    }

    #[test]
    fn fenced_json_parses_identically_to_unfenced() {
        let fenced = "```json\n{\"brief\": \"done\"}\n```";
        let unfenced = "{\"brief\": \"done\"}";
        assert_eq!(
            extract_json(fenced).expect("fenced"),
            extract_json(unfenced).expect("unfenced")
        );
    }

    #[test]
    fn bare_fences_and_padding_are_tolerated() {
        let text = "  ```\n  {\"results\": []}\n```  ";
        assert_eq!(extract_json(text).expect("json"), json!({ "results": [] }));
    }

    #[test]
    fn malformed_json_is_a_typed_error() {
        let error = extract_json("```json\nnot json at all\n```").expect_err("malformed");
        assert!(matches!(error, ExtractError::Malformed(_)));
    }
}
