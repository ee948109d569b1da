//! crumb-codec: cookie/token envelope codec
//!
//! Turns an arbitrary byte payload (session fragments, CSRF tokens, flash
//! messages) into a cookie-safe string and recovers it later, across format
//! and cipher generations.
//!
//! Encode pipeline: payload → deflate (if flagged) → AES-256-GCM (if flagged)
//! → 3-byte header → base64url.
//!
//! Wire format:
//! ```text
//! EncodedValue = base64url( header(3 bytes) || payload )
//! header[0] = 0xC1 modern-format marker
//! header[1] = compressed flag (0 or 1)
//! header[2] = encrypted flag (0 or 1)
//! ```
//!
//! Anything that decodes without the marker is a legacy cookie: no header,
//! no compression, encrypted only if the field's configuration says so, and
//! its plaintext is base64 of a JSON-encoded value rather than raw UTF-8.
//! Legacy cookies (and modern cookies that only decrypt under the retired
//! CBC suite) are rewritten in the current format the moment they are read.
//!
//! Decode never returns an error across the boundary: unreadable, tampered,
//! or wrong-key input degrades to a "missing" outcome and the scope layer
//! deletes the cookie.

pub mod cipher;
pub mod codec;
pub mod compress;
pub mod encryptor;
pub mod envelope;
pub mod keys;
pub mod legacy;

pub use cipher::CipherSuite;
pub use codec::{decode, decode_envelope, encode, CookieCodec, DecodeOutcome, DecodedCookie};
pub use encryptor::Encryptor;
pub use envelope::{ENVELOPE_MARKER, HEADER_LEN};
pub use keys::CodecKey;
pub use legacy::{legacy_json_value, utf8_exact};

pub use crumb_core::{CodecConfig, DecodeError, EnvelopeFlags};

/// Size of the symmetric codec key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of an AES-GCM nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a GCM authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of the legacy CBC initialization vector
pub const LEGACY_IV_SIZE: usize = 16;
