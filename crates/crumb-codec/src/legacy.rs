//! Payload interpretation: legacy JSON fallback and modern UTF-8
//!
//! Legacy cookies stored their value as a JSON-encoded token. The historical
//! reader stopped at the first complete JSON value and ignored everything
//! after it — including a trailing newline — so a payload whose bytes are
//! `5\n<garbage>` reads back as `5`, not an error. That truncation quirk is
//! intentionally preserved here, bit-for-bit. Modern cookies can never hit
//! it: they always carry the header and skip this path entirely.

use crumb_core::{DecodeError, DecodeResult};

/// Read a single leading JSON value and ignore all trailing bytes.
///
/// JSON strings decode to their contents; any other leading token (number,
/// boolean, object) decodes to its literal JSON text, matching the
/// historical reader.
pub fn legacy_json_value(bytes: &[u8]) -> DecodeResult<String> {
    let mut stream = serde_json::Deserializer::from_slice(bytes).into_iter::<serde_json::Value>();

    match stream.next() {
        Some(Ok(serde_json::Value::String(s))) => Ok(s),
        Some(Ok(value)) => Ok(value.to_string()),
        Some(Err(e)) => Err(DecodeError::LegacyFallbackParse(e.to_string())),
        None => Err(DecodeError::LegacyFallbackParse(
            "empty legacy payload".into(),
        )),
    }
}

/// Interpret a modern payload as UTF-8, strictly.
pub fn utf8_exact(bytes: &[u8]) -> DecodeResult<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}
