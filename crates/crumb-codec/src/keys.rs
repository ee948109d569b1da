//! Key material: injected master key → per-suite keys via HKDF domains
//!
//! The master key is explicit configuration handed to the [`Encryptor`], not
//! process-wide state. Key rotation is therefore just building a new
//! `Encryptor` from a new `CodecKey`; cookies written under the old key fail
//! authentication afterwards and degrade to the missing outcome.
//!
//! [`Encryptor`]: crate::encryptor::Encryptor

use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use crate::KEY_SIZE;

/// The single 256-bit symmetric codec key. Zeroized on drop.
#[derive(Clone)]
pub struct CodecKey {
    bytes: [u8; KEY_SIZE],
}

impl CodecKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Derive a codec key from a configured secret string via HKDF-SHA256.
    pub fn from_secret(secret: &str) -> anyhow::Result<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        let hkdf = Hkdf::<Sha256>::new(None, secret.as_bytes());
        hkdf.expand(b"crumb-master-key", &mut bytes)
            .map_err(|e| anyhow::anyhow!("HKDF expand failed: {e}"))?;
        Ok(Self { bytes })
    }

    /// Generate a random codec key (rotation tests, ephemeral deployments).
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self { bytes }
    }
}

impl Drop for CodecKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for CodecKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the AES-256-GCM key from the master key via HKDF-SHA256.
pub(crate) fn derive_aead_key(master: &CodecKey) -> anyhow::Result<[u8; KEY_SIZE]> {
    hkdf_derive(master.as_bytes(), b"crumb-cookie-aead")
}

/// Derive the legacy AES-256-CBC key from the master key via HKDF-SHA256.
pub(crate) fn derive_legacy_key(master: &CodecKey) -> anyhow::Result<[u8; KEY_SIZE]> {
    hkdf_derive(master.as_bytes(), b"crumb-cookie-legacy-cbc")
}

/// HKDF-SHA256 key derivation with a domain-specific info string.
fn hkdf_derive(ikm: &[u8; KEY_SIZE], info: &[u8]) -> anyhow::Result<[u8; KEY_SIZE]> {
    let hkdf = Hkdf::<Sha256>::new(None, ikm);
    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(info, &mut okm)
        .map_err(|e| anyhow::anyhow!("HKDF expand failed: {e}"))?;
    Ok(okm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secret_is_deterministic() {
        let k1 = CodecKey::from_secret("s3cret").unwrap();
        let k2 = CodecKey::from_secret("s3cret").unwrap();
        assert_eq!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_different_secrets_different_keys() {
        let k1 = CodecKey::from_secret("alpha").unwrap();
        let k2 = CodecKey::from_secret("beta").unwrap();
        assert_ne!(k1.as_bytes(), k2.as_bytes());
    }

    #[test]
    fn test_generated_keys_differ() {
        let k1 = CodecKey::generate();
        let k2 = CodecKey::generate();
        assert_ne!(k1.as_bytes(), k2.as_bytes(), "random keys must differ");
    }

    #[test]
    fn test_suite_keys_use_distinct_domains() {
        let master = CodecKey::from_bytes([7u8; KEY_SIZE]);
        let aead = derive_aead_key(&master).unwrap();
        let legacy = derive_legacy_key(&master).unwrap();

        assert_ne!(
            aead, legacy,
            "different domains must produce different keys"
        );
    }

    #[test]
    fn test_debug_redacts_key_bytes() {
        let key = CodecKey::from_bytes([0x42u8; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("66")); // 0x42
    }
}
