//! Encryptor: suite orchestration over the injected key
//!
//! Writes always use the current AEAD suite. Reads try the AEAD first and
//! fall back to the legacy CBC suite, reporting which one succeeded so the
//! caller can rewrite stale-cipher cookies (migration-on-read).
//!
//! The struct is cheap to clone and internally immutable, so concurrent
//! request threads share it without locking. Rotating the key is a
//! point-in-time swap: build a new `Encryptor` and drop the old one.

use zeroize::Zeroize;

use crumb_core::{DecodeError, DecodeResult};

use crate::cipher::{self, CipherSuite};
use crate::keys::{derive_aead_key, derive_legacy_key, CodecKey};
use crate::KEY_SIZE;

#[derive(Clone)]
pub struct Encryptor {
    aead_key: [u8; KEY_SIZE],
    legacy_key: [u8; KEY_SIZE],
}

impl Encryptor {
    /// Build an encryptor from the injected master key.
    pub fn new(master: &CodecKey) -> anyhow::Result<Self> {
        Ok(Self {
            aead_key: derive_aead_key(master)?,
            legacy_key: derive_legacy_key(master)?,
        })
    }

    /// Build an encryptor straight from a configured secret string.
    pub fn from_secret(secret: &str) -> anyhow::Result<Self> {
        Self::new(&CodecKey::from_secret(secret)?)
    }

    /// Encrypt with the current AEAD suite. Never uses the legacy suite.
    pub fn encrypt(&self, plaintext: &[u8]) -> anyhow::Result<Vec<u8>> {
        cipher::aead_seal(&self.aead_key, plaintext)
    }

    /// Decrypt, trying the current AEAD suite first and the legacy CBC suite
    /// on authentication failure. Reports which suite produced the result.
    pub fn decrypt(&self, data: &[u8]) -> DecodeResult<(Vec<u8>, CipherSuite)> {
        match cipher::aead_open(&self.aead_key, data) {
            Ok(plaintext) => Ok((plaintext, CipherSuite::CurrentAead)),
            Err(DecodeError::DecryptAuthentication) => {
                tracing::debug!("AEAD authentication failed, trying legacy CBC suite");
                let plaintext = cipher::cbc_open(&self.legacy_key, data)?;
                Ok((plaintext, CipherSuite::LegacyCbc))
            }
            Err(other) => Err(other),
        }
    }
}

impl Drop for Encryptor {
    fn drop(&mut self) {
        self.aead_key.zeroize();
        self.legacy_key.zeroize();
    }
}

impl std::fmt::Debug for Encryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Encryptor")
            .field("aead_key", &"[REDACTED]")
            .field("legacy_key", &"[REDACTED]")
            .finish()
    }
}
