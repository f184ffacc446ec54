//! Reasoning-service response sanitization and JSON-block extraction.
//!
//! The service replies with free text that should contain a single
//! well-formed JSON object, often wrapped in a markdown code block.
//! Responses are sanitized before parsing; if no balanced object can be
//! located, extraction fails and the caller falls back.

use thiserror::Error;

/// Maximum allowed response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Errors from sanitizing or extracting the structured block.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CurationParseError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("No JSON object found in response")]
    NoJsonObject,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Schema validation failed: {0}")]
    Schema(String),
}

/// Sanitizes reasoning-service responses before parsing.
#[derive(Debug, Clone, Default)]
pub struct ResponseSanitizer;

impl ResponseSanitizer {
    /// Creates a new sanitizer.
    pub fn new() -> Self {
        Self
    }

    /// Validates length, strips control characters (keeping newlines and
    /// tabs), and removes prompt-injection markers.
    pub fn sanitize(&self, response: &str) -> Result<String, CurationParseError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(CurationParseError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }

        let cleaned: String = response
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect();

        Ok(strip_injection_markers(&cleaned))
    }
}

/// Common prompt-injection patterns stripped from responses.
const INJECTION_MARKERS: &[&str] = &[
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

fn strip_injection_markers(s: &str) -> String {
    let mut result = s.to_string();
    for marker in INJECTION_MARKERS {
        result = result.replace(marker, "");
    }
    result
}

/// Locates the single well-formed JSON object in a response.
///
/// Prefers a ```json code block; otherwise scans for the first balanced
/// top-level `{ ... }`, respecting string literals and escapes.
pub fn extract_json_object(response: &str) -> Result<String, CurationParseError> {
    let trimmed = response.trim();

    if let Some(block) = extract_from_code_block(trimmed) {
        return Ok(block);
    }

    let start = trimmed.find('{').ok_or(CurationParseError::NoJsonObject)?;
    extract_balanced_object(trimmed, start).ok_or(CurationParseError::NoJsonObject)
}

fn extract_from_code_block(s: &str) -> Option<String> {
    let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

    for pattern in patterns {
        if let Some(start) = s.find(pattern) {
            let body_start = start + pattern.len();
            if let Some(end) = s[body_start..].find("```") {
                let body = s[body_start..body_start + end].trim();
                if body.starts_with('{') {
                    return Some(body.to_string());
                }
            }
        }
    }
    None
}

fn extract_balanced_object(s: &str, start: usize) -> Option<String> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in s[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(s[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sanitizer {
        use super::*;

        #[test]
        fn passes_clean_text_through() {
            let sanitizer = ResponseSanitizer::new();
            assert_eq!(
                sanitizer.sanitize("Hello, world!"),
                Ok("Hello, world!".to_string())
            );
        }

        #[test]
        fn rejects_oversized_responses() {
            let sanitizer = ResponseSanitizer::new();
            let huge = "a".repeat(MAX_RESPONSE_LENGTH + 1);
            assert!(matches!(
                sanitizer.sanitize(&huge),
                Err(CurationParseError::TooLong { .. })
            ));
        }

        #[test]
        fn removes_control_characters() {
            let sanitizer = ResponseSanitizer::new();
            assert_eq!(
                sanitizer.sanitize("Hi\x00there\x07!").unwrap(),
                "Hithere!"
            );
        }

        #[test]
        fn preserves_newlines_and_tabs() {
            let sanitizer = ResponseSanitizer::new();
            assert_eq!(sanitizer.sanitize("a\n\tb").unwrap(), "a\n\tb");
        }

        #[test]
        fn strips_injection_markers() {
            let sanitizer = ResponseSanitizer::new();
            let result = sanitizer
                .sanitize("<|im_start|>пре{\"x\":1}<|im_end|>")
                .unwrap();
            assert!(!result.contains("<|im_start|>"));
        }
    }

    mod json_extraction {
        use super::*;

        #[test]
        fn extracts_from_json_code_block() {
            let response = "Here is the plan:\n```json\n{\"stages\": []}\n```\nEnjoy!";
            assert_eq!(extract_json_object(response).unwrap(), "{\"stages\": []}");
        }

        #[test]
        fn extracts_from_bare_code_block() {
            let response = "```\n{\"a\": 1}\n```";
            assert_eq!(extract_json_object(response).unwrap(), "{\"a\": 1}");
        }

        #[test]
        fn extracts_balanced_object_from_prose() {
            let response = "Sure! {\"a\": {\"b\": 2}} hope that helps";
            assert_eq!(
                extract_json_object(response).unwrap(),
                "{\"a\": {\"b\": 2}}"
            );
        }

        #[test]
        fn braces_inside_strings_do_not_confuse_the_scanner() {
            let response = r#"{"note": "use } sparingly", "n": 1}"#;
            assert_eq!(extract_json_object(response).unwrap(), response);
        }

        #[test]
        fn escaped_quotes_do_not_confuse_the_scanner() {
            let response = r#"{"note": "she said \"hi\"", "n": 1}"#;
            assert_eq!(extract_json_object(response).unwrap(), response);
        }

        #[test]
        fn no_object_is_an_error() {
            assert_eq!(
                extract_json_object("no structure here at all"),
                Err(CurationParseError::NoJsonObject)
            );
        }

        #[test]
        fn unterminated_object_is_an_error() {
            assert_eq!(
                extract_json_object("{\"a\": 1"),
                Err(CurationParseError::NoJsonObject)
            );
        }
    }
}
