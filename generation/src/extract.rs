//! Tolerant JSON extraction from free-text completions
//!
//! The backend is instructed to answer with a single raw JSON object, but
//! it may still wrap it in prose or markdown fences. Parse only the span
//! between the first `{` and the last `}`; everything outside is noise.
//! Used identically by the signal pipeline and the price refresh.

use common::GenerationError;
use serde::de::DeserializeOwned;

/// Parse the outermost brace-delimited span of `text` as `T`
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let start = text.find('{').ok_or(GenerationError::NoJsonPayload)?;
    let end = text.rfind('}').ok_or(GenerationError::NoJsonPayload)?;
    if end < start {
        return Err(GenerationError::NoJsonPayload);
    }
    Ok(serde_json::from_str(&text[start..=end])?)
}
