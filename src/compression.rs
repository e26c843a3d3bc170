//! Opaque compression codec wrapper (spec §1 non-goal: the compression
//! algorithms themselves are out of scope, only the record's choice among
//! them). Matches `headers::record_header::CompressionType`.

use crate::error::{EvioError, Result, Status};
use crate::headers::record_header::CompressionType;
use flate2::read::{GzDecoder, GzEncoder};
use flate2::Compression;
use std::io::Read;

pub fn compress(kind: CompressionType, src: &[u8]) -> Result<Vec<u8>> {
    match kind {
        CompressionType::None => Ok(src.to_vec()),
        CompressionType::Lz4Fast | CompressionType::Lz4Best => Ok(lz4_flex::block::compress_prepend_size(src)),
        CompressionType::Gzip => {
            let mut encoder = GzEncoder::new(src, Compression::default());
            let mut out = Vec::new();
            encoder.read_to_end(&mut out).map_err(|e| EvioError::with_source(Status::CompressionError, "gzip compression failed", e))?;
            Ok(out)
        }
    }
}

pub fn decompress(kind: CompressionType, src: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    match kind {
        CompressionType::None => Ok(src.to_vec()),
        CompressionType::Lz4Fast | CompressionType::Lz4Best => lz4_flex::block::decompress_size_prepended(src)
            .map_err(|e| EvioError::with_source(Status::CompressionError, "lz4 decompression failed", e)),
        CompressionType::Gzip => {
            let mut decoder = GzDecoder::new(src);
            let mut out = Vec::with_capacity(expected_len);
            decoder.read_to_end(&mut out).map_err(|e| EvioError::with_source(Status::CompressionError, "gzip decompression failed", e))?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lz4_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = compress(CompressionType::Lz4Fast, &data).unwrap();
        let decompressed = decompress(CompressionType::Lz4Fast, &compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn gzip_round_trip() {
        let data = b"composite data format strings compress reasonably well".repeat(4);
        let compressed = compress(CompressionType::Gzip, &data).unwrap();
        let decompressed = decompress(CompressionType::Gzip, &compressed, data.len()).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn none_is_passthrough() {
        let data = vec![1u8, 2, 3, 4];
        let compressed = compress(CompressionType::None, &data).unwrap();
        assert_eq!(compressed, data);
    }
}
