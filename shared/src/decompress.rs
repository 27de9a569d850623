//! Archive blob decompression seam
//!
//! The codecs themselves live outside this workspace; decoders only see the
//! trait.

use crate::error::CacheResult;

/// Turns a raw archive blob into de-chunkable bytes
pub trait Decompressor {
    fn decompress(&self, raw: &[u8]) -> CacheResult<Vec<u8>>;
}

/// Pass-through for blobs stored without compression
#[derive(Debug, Clone, Copy, Default)]
pub struct Uncompressed;

impl Decompressor for Uncompressed {
    fn decompress(&self, raw: &[u8]) -> CacheResult<Vec<u8>> {
        Ok(raw.to_vec())
    }
}

impl<F> Decompressor for F
where
    F: Fn(&[u8]) -> CacheResult<Vec<u8>>,
{
    fn decompress(&self, raw: &[u8]) -> CacheResult<Vec<u8>> {
        self(raw)
    }
}
