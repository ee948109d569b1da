//! Deflate (zlib) compression for cookie payloads
//!
//! Cookie payloads are tiny by stream-compression standards, so the framing
//! overhead of a zlib stream must not break the trivial cases: zero-length
//! and single-byte inputs round-trip like any other payload.
//!
//! Compression failure on well-formed input means the process is broken and
//! propagates as a fatal error. Decompression failure means the cookie is
//! unreadable and surfaces as [`DecodeError::Decompress`] for the boundary
//! to normalize into the missing outcome.

use std::io::{Read, Write};

use anyhow::Context;
use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use crumb_core::{DecodeError, DecodeResult};

/// Upper bound on decompressed payload size. A cookie is a few KiB at most
/// on the wire; anything inflating past this is hostile input.
pub const MAX_DECOMPRESSED_LEN: usize = 64 * 1024;

/// Deflate-compress a payload.
pub fn compress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).context("deflate compress")?;
    enc.finish().context("deflate finish")
}

/// Decompress a deflate payload, bounded by [`MAX_DECOMPRESSED_LEN`].
pub fn decompress(data: &[u8]) -> DecodeResult<Vec<u8>> {
    let mut out = Vec::new();
    let mut dec = ZlibDecoder::new(data).take(MAX_DECOMPRESSED_LEN as u64 + 1);
    dec.read_to_end(&mut out)?;

    if out.len() > MAX_DECOMPRESSED_LEN {
        return Err(DecodeError::Decompress(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "decompressed payload exceeds size bound",
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_roundtrip_text() {
        let data = b"flash message: your changes have been saved";
        let packed = compress(data).unwrap();
        let unpacked = decompress(&packed).unwrap();
        assert_eq!(unpacked, data);
    }

    #[test]
    fn test_roundtrip_empty() {
        let packed = compress(b"").unwrap();
        let unpacked = decompress(&packed).unwrap();
        assert_eq!(unpacked, b"");
    }

    #[test]
    fn test_roundtrip_single_byte() {
        let packed = compress(b"x").unwrap();
        let unpacked = decompress(&packed).unwrap();
        assert_eq!(unpacked, b"x");
    }

    #[test]
    fn test_decompress_garbage_fails() {
        let result = decompress(b"definitely not a zlib stream");
        assert!(matches!(result, Err(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_decompress_truncated_fails() {
        let packed = compress(b"some payload that compresses").unwrap();
        let result = decompress(&packed[..packed.len() / 2]);
        assert!(result.is_err());
    }

    #[test]
    fn test_size_bound_enforced() {
        // 1 MiB of zeros compresses to almost nothing but must not inflate back
        let bomb = compress(&vec![0u8; 1024 * 1024]).unwrap();
        assert!(bomb.len() < 4096);

        let result = decompress(&bomb);
        assert!(matches!(result, Err(DecodeError::Decompress(_))));
    }

    proptest! {
        #[test]
        fn compress_decompress_roundtrip(
            data in proptest::collection::vec(any::<u8>(), 0..=4096),
        ) {
            let packed = compress(&data).unwrap();
            let unpacked = decompress(&packed).unwrap();
            prop_assert_eq!(unpacked, data);
        }
    }
}
