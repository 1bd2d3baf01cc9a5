//! Turns raw generator output into a validated structure payload.
//!
//! Three steps with early exit: strip fence markers, parse as JSON, check that
//! `structure` is an array. On success the stripped text is returned verbatim.

use crate::error::CompoundError;
use crate::models::{GenerationResult, StructurePayload};
use serde_json::Value;

/// Opening fence generators put around JSON output.
pub const JSON_FENCE: &str = "```json";
/// Bare fence delimiter.
pub const FENCE: &str = "```";

/// Removes every literal fence token and the surrounding whitespace.
///
/// Plain substring removal: other wrapper styles are left in place.
pub fn strip_fences(raw_text: &str) -> String {
    raw_text
        .trim()
        .replace(JSON_FENCE, "")
        .replace(FENCE, "")
        .trim()
        .to_string()
}

pub fn normalize(raw_text: &str) -> GenerationResult {
    let stripped = strip_fences(raw_text);

    let parsed: Value = serde_json::from_str(&stripped).map_err(|e| {
        tracing::error!(content = %stripped, error = %e, "Generated content is not valid JSON");
        CompoundError::InvalidJson(e.to_string())
    })?;

    check_shape(&parsed)?;

    Ok(StructurePayload { raw_text: stripped })
}

/// The only enforced invariant: `structure` is present and is an array.
fn check_shape(parsed: &Value) -> Result<(), CompoundError> {
    match parsed.get("structure") {
        Some(Value::Array(_)) => Ok(()),
        _ => {
            tracing::warn!("Generated JSON has no array-typed structure field");
            Err(CompoundError::InvalidShape)
        }
    }
}
