//! Versioned envelope header: build, parse, classify
//!
//! Header layout (3 bytes, prepended before base64url):
//! ```text
//! [0] = 0xC1  modern-format marker
//! [1] = compressed flag, strictly 0 or 1
//! [2] = encrypted flag, strictly 0 or 1
//! ```
//!
//! Marker choice: legacy cookies decode to JSON text, whose first byte is
//! always ASCII, and 0xC1 additionally never occurs anywhere in UTF-8. The
//! only collision candidates are legacy *encrypted* values (random bytes),
//! where the strict 0/1 flag bytes bound the false-modern probability at
//! 2^-22 per cookie. The value is a compatibility contract: changing it
//! orphans every deployed cookie.
//!
//! Classification is data-driven: the input is tagged modern or legacy by
//! looking at bytes, never by catching a downstream parse failure.

use crumb_core::{DecodeError, DecodeResult, EnvelopeFlags};

/// Reserved first byte of every modern-format cookie value.
pub const ENVELOPE_MARKER: u8 = 0xC1;

/// Fixed header size in bytes.
pub const HEADER_LEN: usize = 3;

/// Serialize envelope flags into the 3-byte header.
pub fn header_bytes(flags: EnvelopeFlags) -> [u8; HEADER_LEN] {
    [
        ENVELOPE_MARKER,
        u8::from(flags.compressed),
        u8::from(flags.encrypted),
    ]
}

/// A decoded buffer tagged by format generation.
#[derive(Debug, PartialEq, Eq)]
pub enum Classified<'a> {
    /// Headered cookie; flags come from the header itself.
    Modern {
        flags: EnvelopeFlags,
        payload: &'a [u8],
    },
    /// Unheadered cookie; flags are inferred from the field's declared
    /// expectations (never compressed, encrypted iff the field says so).
    Legacy {
        flags: EnvelopeFlags,
        payload: &'a [u8],
    },
}

/// Classify a base64-decoded buffer as modern or legacy.
///
/// A buffer starting with the marker must carry valid flag bytes; the marker
/// with anything else in positions 1–2 is a malformed modern cookie, not a
/// legacy one, and fails with [`DecodeError::Header`].
pub fn classify(raw: &[u8], encryption_expected: bool) -> DecodeResult<Classified<'_>> {
    if raw.len() >= HEADER_LEN && raw[0] == ENVELOPE_MARKER {
        let flags = EnvelopeFlags::new(flag_bit(raw[1])?, flag_bit(raw[2])?);
        return Ok(Classified::Modern {
            flags,
            payload: &raw[HEADER_LEN..],
        });
    }

    Ok(Classified::Legacy {
        flags: EnvelopeFlags::new(false, encryption_expected),
        payload: raw,
    })
}

fn flag_bit(byte: u8) -> DecodeResult<bool> {
    match byte {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(DecodeError::Header),
    }
}
