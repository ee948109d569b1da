//! Boundary encode/decode and migration-on-read
//!
//! This is the only module the scope layer talks to. `encode` is called
//! before attaching a `Set-Cookie` header; `decode` (or the
//! [`CookieCodec`] facade) after reading an incoming `Cookie` header. The
//! scope layer owns cookie names and attributes, and is responsible for
//! actually deleting a cookie (Max-Age=0) when decode reports missing.
//!
//! Every decode-side error is normalized to the missing outcome here; none
//! propagate. Encode-side errors mean the process is misconfigured and do.

use anyhow::Context;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;

use crumb_core::{CodecConfig, DecodeError, DecodeResult, EnvelopeFlags};

use crate::cipher::CipherSuite;
use crate::encryptor::Encryptor;
use crate::envelope::{self, Classified, HEADER_LEN};
use crate::{compress, legacy};

/// Result of classifying and unwrapping one cookie value.
///
/// Constructed fresh per decode and immutable; migration replaces the cookie
/// with a newly encoded envelope rather than mutating anything in place.
#[derive(Debug)]
pub enum DecodeOutcome {
    /// Headered cookie, unwrapped successfully. `stale_cipher` is set when
    /// only the legacy CBC suite could decrypt it.
    Modern { value: Vec<u8>, stale_cipher: bool },
    /// Unheadered legacy cookie, unwrapped successfully.
    Legacy { value: Vec<u8> },
    /// Unreadable input of any kind. Never carries partial plaintext.
    Failure(DecodeError),
}

impl DecodeOutcome {
    /// Whether a successful read came through an outdated format or cipher
    /// and the response should rewrite the cookie in the current format.
    pub fn needs_rewrite(&self) -> bool {
        matches!(
            self,
            DecodeOutcome::Legacy { .. }
                | DecodeOutcome::Modern {
                    stale_cipher: true,
                    ..
                }
        )
    }
}

/// Encode a payload into a cookie-safe string.
///
/// Applies the flagged transforms in order (compress, then encrypt), always
/// prepends the 3-byte header, and base64url-encodes the result. The output
/// is self-describing: decoding never needs to know the flags out-of-band.
pub fn encode(
    encryptor: &Encryptor,
    value: &[u8],
    flags: EnvelopeFlags,
) -> anyhow::Result<String> {
    let mut body = if flags.compressed {
        compress::compress(value).context("compressing cookie payload")?
    } else {
        value.to_vec()
    };
    if flags.encrypted {
        body = encryptor
            .encrypt(&body)
            .context("encrypting cookie payload")?;
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + body.len());
    buf.extend_from_slice(&envelope::header_bytes(flags));
    buf.extend_from_slice(&body);

    Ok(URL_SAFE_NO_PAD.encode(&buf))
}

/// Decode a cookie string down to payload bytes, tagged by generation.
///
/// Never returns an error: every failure is folded into
/// [`DecodeOutcome::Failure`].
pub fn decode_envelope(
    encryptor: &Encryptor,
    cookie: &str,
    encryption_expected: bool,
) -> DecodeOutcome {
    match try_decode_envelope(encryptor, cookie, encryption_expected) {
        Ok(outcome) => outcome,
        Err(e) => DecodeOutcome::Failure(e),
    }
}

fn try_decode_envelope(
    encryptor: &Encryptor,
    cookie: &str,
    encryption_expected: bool,
) -> DecodeResult<DecodeOutcome> {
    let raw = decode_base64(cookie)?;

    let (flags, payload, modern) = match envelope::classify(&raw, encryption_expected)? {
        Classified::Modern { flags, payload } => (flags, payload, true),
        Classified::Legacy { flags, payload } => (flags, payload, false),
    };

    let mut stale_cipher = false;
    let mut value = if flags.encrypted {
        let (plaintext, suite) = encryptor.decrypt(payload)?;
        stale_cipher = suite == CipherSuite::LegacyCbc;
        plaintext
    } else {
        payload.to_vec()
    };

    if flags.compressed {
        value = compress::decompress(&value)?;
    }

    Ok(if modern {
        DecodeOutcome::Modern {
            value,
            stale_cipher,
        }
    } else {
        DecodeOutcome::Legacy { value }
    })
}

/// Modern cookies are always base64url without padding, but legacy writers
/// used the standard alphabet with padding, so both are accepted.
fn decode_base64(cookie: &str) -> DecodeResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(cookie)
        .or_else(|_| STANDARD.decode(cookie))
        .map_err(DecodeError::Base64)
}

/// Decode one cookie value to its logical string, or `None` for missing.
///
/// `legacy_decode` interprets payload bytes recovered through the legacy
/// path, `utf8_decode` those of a headered cookie. The scope layer deletes
/// the cookie in the response when this returns `None`.
pub fn decode<L, U>(
    encryptor: &Encryptor,
    cookie: &str,
    encryption_expected: bool,
    legacy_decode: L,
    utf8_decode: U,
) -> Option<String>
where
    L: FnOnce(&[u8]) -> DecodeResult<String>,
    U: FnOnce(&[u8]) -> DecodeResult<String>,
{
    let interpreted = match decode_envelope(encryptor, cookie, encryption_expected) {
        DecodeOutcome::Modern { value, .. } => utf8_decode(&value),
        DecodeOutcome::Legacy { value } => legacy_decode(&value),
        DecodeOutcome::Failure(e) => Err(e),
    };

    match interpreted {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!(error = %e, "cookie decode failed, treating as missing");
            None
        }
    }
}

/// A successfully processed incoming cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCookie {
    /// The logical value, or `None` when the cookie is unreadable and the
    /// scope layer should delete it.
    pub value: Option<String>,
    /// When the value was recovered through the legacy format or a stale
    /// cipher: the same value re-encoded in the current format, to be set
    /// as the new cookie in this response.
    pub rewrite: Option<String>,
}

impl DecodedCookie {
    fn missing() -> Self {
        Self {
            value: None,
            rewrite: None,
        }
    }
}

/// Per-field codec facade: an [`Encryptor`] bundled with the field's
/// configured transform flags.
#[derive(Debug, Clone)]
pub struct CookieCodec {
    encryptor: Encryptor,
    flags: EnvelopeFlags,
}

impl CookieCodec {
    pub fn new(encryptor: Encryptor, flags: EnvelopeFlags) -> Self {
        Self { encryptor, flags }
    }

    /// Build the codec for one logical field from loaded configuration.
    pub fn from_config(config: &CodecConfig, field: &str) -> anyhow::Result<Self> {
        anyhow::ensure!(!config.secret.is_empty(), "codec secret is not configured");
        Ok(Self::new(
            Encryptor::from_secret(&config.secret)?,
            config.field_flags(field),
        ))
    }

    pub fn flags(&self) -> EnvelopeFlags {
        self.flags
    }

    /// Encode a logical string value with this field's flags.
    pub fn encode_value(&self, value: &str) -> anyhow::Result<String> {
        encode(&self.encryptor, value.as_bytes(), self.flags)
    }

    /// Decode an incoming cookie value, producing the logical value and, for
    /// legacy or stale-cipher cookies, the migration rewrite.
    ///
    /// Decode failures are folded into a missing result; the only `Err` this
    /// returns is a failure to re-encode the rewrite, which is a fatal
    /// configuration defect just like any other encode failure.
    pub fn decode_value(&self, cookie: &str) -> anyhow::Result<DecodedCookie> {
        let outcome = decode_envelope(&self.encryptor, cookie, self.flags.encrypted);
        let needs_rewrite = outcome.needs_rewrite();

        let interpreted = match outcome {
            DecodeOutcome::Modern { value, .. } => legacy::utf8_exact(&value),
            DecodeOutcome::Legacy { value } => legacy::legacy_json_value(&value),
            DecodeOutcome::Failure(e) => Err(e),
        };

        let value = match interpreted {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "cookie decode failed, treating as missing");
                return Ok(DecodedCookie::missing());
            }
        };

        let rewrite = if needs_rewrite {
            Some(
                self.encode_value(&value)
                    .context("re-encoding migrated cookie")?,
            )
        } else {
            None
        };

        Ok(DecodedCookie {
            value: Some(value),
            rewrite,
        })
    }
}
