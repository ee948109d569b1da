//! Plain types shared between configuration and the codec.

use serde::{Deserialize, Serialize};

/// Which reversible transforms an envelope carries, fixed at encode time.
///
/// The two booleans map one-to-one onto the second and third header bytes of
/// the wire format. A decoded envelope never needs out-of-band knowledge of
/// the flags it was written with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvelopeFlags {
    /// Deflate-compress the payload before (optional) encryption
    pub compressed: bool,
    /// AEAD-encrypt the (possibly compressed) payload
    pub encrypted: bool,
}

impl EnvelopeFlags {
    pub fn new(compressed: bool, encrypted: bool) -> Self {
        Self {
            compressed,
            encrypted,
        }
    }
}
