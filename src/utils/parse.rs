//! Structured-payload extraction from free-form model output.
//!
//! Completion models are asked for strict JSON but routinely wrap it in
//! prose, markdown fences, or trailing commentary. [`parse_structured`]
//! locates the first well-formed braced or bracketed block in the text and
//! deserializes it into the requested type. Every call site pairs it with a
//! typed fallback value; a parse failure is a degraded outcome, never a
//! panic or a propagated exception.

use serde::de::DeserializeOwned;

/// Failure to locate or deserialize a structured payload.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No balanced `{…}` or `[…]` block present in the text.
    #[error("no structured block found in text")]
    NoStructure,
    /// A balanced block was found but none deserialized into the target type.
    #[error("no block deserialized into target type: {0}")]
    Shape(String),
}

/// Extract and deserialize the first well-formed JSON block embedded in
/// free text.
///
/// The whole text is tried first (models sometimes do return bare JSON),
/// then each balanced block in order of appearance. Blocks that parse as
/// JSON but do not match the target shape are skipped, so a stray `{}` in
/// surrounding prose does not mask the real payload.
pub fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<T>(trimmed) {
        return Ok(value);
    }

    let bytes = trimmed.as_bytes();
    let mut found_block = false;
    let mut last_err = None;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' | b'[' => {
                if let Some(end) = balanced_end(trimmed, pos) {
                    found_block = true;
                    match serde_json::from_str::<T>(&trimmed[pos..=end]) {
                        Ok(value) => return Ok(value),
                        Err(e) => last_err = Some(e),
                    }
                    pos = end + 1;
                } else {
                    // Unterminated block; nothing after it can be balanced.
                    break;
                }
            }
            _ => pos += 1,
        }
    }

    if found_block {
        Err(ParseError::Shape(
            last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        ))
    } else {
        Err(ParseError::NoStructure)
    }
}

/// Byte index of the bracket closing the block opened at `start`, honoring
/// string literals and escapes.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
