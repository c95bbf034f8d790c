//! Transport encoding for file content sent to the contents API.
//!
//! GitHub expects standard base64 of the raw bytes. Content is UTF-8 text, so
//! encoding the string's bytes directly keeps every code point intact.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::contract::PublishError;

pub fn encode_content(content: &str) -> String {
    STANDARD.encode(content.as_bytes())
}

/// Decodes content as returned by the contents API, which wraps the base64
/// payload in newlines.
pub fn decode_content(encoded: &str) -> Result<String, PublishError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| PublishError::Decode(format!("invalid base64 content: {e}")))?;
    String::from_utf8(bytes).map_err(|e| PublishError::Decode(format!("content is not UTF-8: {e}")))
}
