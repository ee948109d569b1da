//! Decode-side error taxonomy.
//!
//! Every variant here is recoverable by contract: the codec boundary
//! normalizes all of them into a single "missing" outcome, and the scope
//! layer deletes the cookie in the response. None of these may escape into
//! the request pipeline as an error.
//!
//! Encode-side failures are a different animal — they only happen when the
//! process is misconfigured (no key material, broken compressor) and are
//! propagated as `anyhow::Error` by the codec crate instead.

use thiserror::Error;

pub type DecodeResult<T> = Result<T, DecodeError>;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cookie value is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("modern marker present but header flag bytes are invalid")]
    Header,

    #[error("AEAD authentication failed")]
    DecryptAuthentication,

    #[error("all cipher suites exhausted")]
    LegacyDecryptExhausted,

    #[error("decompression failed: {0}")]
    Decompress(#[from] std::io::Error),

    #[error("legacy fallback payload did not parse: {0}")]
    LegacyFallbackParse(String),

    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
