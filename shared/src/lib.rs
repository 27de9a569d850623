//! Shared types for the runecache decoders
//!
//! This crate provides the pieces used by both `runecache-index` and
//! `runecache-model`:
//!
//! - [`Reader`] - big-endian cursor with the cache's smart encodings
//! - [`CacheError`] / [`Stage`] - fatal decode errors
//! - [`NameLookup`] - injected hash to name resolution
//! - [`Decompressor`] - injected archive decompression
//!
//! Everything here is synchronous and owns no global state.

mod decompress;
mod error;
mod names;
mod reader;

pub use decompress::{Decompressor, Uncompressed};
pub use error::{CacheError, CacheResult, Stage};
pub use names::{NameLookup, NameTable, NoNames, name_hash};
pub use reader::Reader;
