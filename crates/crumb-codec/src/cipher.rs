//! Cipher suites: current AEAD and the retired legacy mode
//!
//! Encrypted payload layouts (binary, inside the envelope):
//! ```text
//! CurrentAead: [12 bytes: random nonce][N bytes: ciphertext][16 bytes: GCM tag]
//! LegacyCbc:   [16 bytes: IV][N*16 bytes: ciphertext, PKCS#7 padded]
//! ```
//!
//! `LegacyCbc` exists only so cookies written before the AEAD migration keep
//! decrypting; it is never used for writing and carries no integrity check.
//! A CBC "success" only means the cipher ran — whether the result is real
//! plaintext is judged by whatever parses it downstream.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::RngCore;

use crumb_core::{DecodeError, DecodeResult};

use crate::{KEY_SIZE, LEGACY_IV_SIZE, NONCE_SIZE, TAG_SIZE};

/// The cipher generations this codec understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherSuite {
    /// AES-256-GCM: confidentiality + integrity. The only suite used for writing.
    CurrentAead,
    /// AES-256-CBC, unauthenticated. Decrypt-only.
    LegacyCbc,
}

/// Encrypt with AES-256-GCM under a random nonce.
///
/// Returns `[12-byte nonce][ciphertext + 16-byte tag]`. Failure here is a
/// configuration/programming defect, not recoverable input badness.
pub fn aead_seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> anyhow::Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::thread_rng().fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow::anyhow!("AEAD encryption failed: {e}"))?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt an AES-256-GCM payload, verifying the authentication tag.
pub fn aead_open(key: &[u8; KEY_SIZE], data: &[u8]) -> DecodeResult<Vec<u8>> {
    if data.len() < NONCE_SIZE + TAG_SIZE {
        return Err(DecodeError::DecryptAuthentication);
    }

    let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| DecodeError::DecryptAuthentication)
}

/// Decrypt a legacy AES-256-CBC payload. No integrity check beyond PKCS#7
/// padding shape; this is the terminal fallback, so its failure is
/// [`DecodeError::LegacyDecryptExhausted`].
pub fn cbc_open(key: &[u8; KEY_SIZE], data: &[u8]) -> DecodeResult<Vec<u8>> {
    use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, KeyIvInit};
    type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

    let body_len = data.len().saturating_sub(LEGACY_IV_SIZE);
    if body_len == 0 || body_len % 16 != 0 {
        return Err(DecodeError::LegacyDecryptExhausted);
    }

    let (iv, ciphertext) = data.split_at(LEGACY_IV_SIZE);
    let dec = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| DecodeError::LegacyDecryptExhausted)?;

    dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| DecodeError::LegacyDecryptExhausted)
}

/// CBC writer for tests only. Production code never writes legacy payloads.
#[cfg(test)]
pub(crate) fn cbc_seal(key: &[u8; KEY_SIZE], plaintext: &[u8]) -> Vec<u8> {
    use aes::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};
    type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;

    let mut iv = [0u8; LEGACY_IV_SIZE];
    rand::thread_rng().fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new_from_slices(key, &iv)
        .expect("fixed-size key and IV")
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut result = Vec::with_capacity(LEGACY_IV_SIZE + ciphertext.len());
    result.extend_from_slice(&iv);
    result.extend_from_slice(&ciphertext);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; KEY_SIZE] {
        [0x5Au8; KEY_SIZE]
    }

    #[test]
    fn test_aead_roundtrip() {
        let key = test_key();
        let plaintext = b"session fragment";

        let sealed = aead_seal(&key, plaintext).unwrap();
        let opened = aead_open(&key, &sealed).unwrap();

        assert_eq!(&opened, plaintext);
    }

    #[test]
    fn test_aead_roundtrip_empty() {
        let key = test_key();
        let sealed = aead_seal(&key, b"").unwrap();
        let opened = aead_open(&key, &sealed).unwrap();
        assert_eq!(opened, b"");
    }

    #[test]
    fn test_aead_nonce_is_random() {
        let key = test_key();
        let s1 = aead_seal(&key, b"same input").unwrap();
        let s2 = aead_seal(&key, b"same input").unwrap();
        assert_ne!(s1, s2);
    }

    #[test]
    fn test_aead_sealed_size() {
        let key = test_key();
        let sealed = aead_seal(&key, &[0u8; 100]).unwrap();
        assert_eq!(sealed.len(), NONCE_SIZE + 100 + TAG_SIZE);
    }

    #[test]
    fn test_aead_wrong_key_fails() {
        let sealed = aead_seal(&[0x11u8; KEY_SIZE], b"secret").unwrap();
        let result = aead_open(&[0x22u8; KEY_SIZE], &sealed);
        assert!(matches!(result, Err(DecodeError::DecryptAuthentication)));
    }

    #[test]
    fn test_aead_tampered_ciphertext_fails() {
        let key = test_key();
        let mut sealed = aead_seal(&key, b"secret").unwrap();
        sealed[NONCE_SIZE] ^= 0x01; // first ciphertext byte

        let result = aead_open(&key, &sealed);
        assert!(matches!(result, Err(DecodeError::DecryptAuthentication)));
    }

    #[test]
    fn test_aead_short_input_fails() {
        let result = aead_open(&test_key(), &[0u8; NONCE_SIZE + TAG_SIZE - 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cbc_roundtrip() {
        let key = test_key();
        let sealed = cbc_seal(&key, b"pre-migration cookie payload");
        let opened = cbc_open(&key, &sealed).unwrap();
        assert_eq!(&opened, b"pre-migration cookie payload");
    }

    #[test]
    fn test_cbc_wrong_key_fails_or_garbles() {
        // CBC has no tag: wrong-key decryption either trips the padding
        // check or yields bytes that are not the original plaintext.
        let sealed = cbc_seal(&[0x11u8; KEY_SIZE], b"legacy secret");
        match cbc_open(&[0x22u8; KEY_SIZE], &sealed) {
            Err(DecodeError::LegacyDecryptExhausted) => {}
            Ok(garbage) => assert_ne!(garbage, b"legacy secret"),
            Err(other) => panic!("unexpected error kind: {other}"),
        }
    }

    #[test]
    fn test_cbc_rejects_unaligned_input() {
        let result = cbc_open(&test_key(), &[0u8; LEGACY_IV_SIZE + 17]);
        assert!(matches!(
            result,
            Err(DecodeError::LegacyDecryptExhausted)
        ));
    }

    #[test]
    fn test_cbc_rejects_iv_only_input() {
        let result = cbc_open(&test_key(), &[0u8; LEGACY_IV_SIZE]);
        assert!(result.is_err());
    }
}
