//! runecache-index: cache directory decoding and archive de-chunking
//!
//! A cache store is described by an index listing its archives, each of
//! which holds one or more files. Archives are stored as compressed blobs;
//! once decompressed, a multi-file blob interleaves its files in chunks.
//!
//! # Usage
//!
//! ```ignore
//! use runecache_index::decode_index_with_names;
//! use runecache_shared::{NameTable, Uncompressed};
//!
//! let names: NameTable = ["logo", "title"].into_iter().collect();
//! let mut index = decode_index_with_names(&index_bytes, &names)?;
//!
//! let archive = index.archive_mut(7).unwrap();
//! archive.load_compressed(&blob, &Uncompressed)?;
//! for file in &archive.files {
//!     println!("{} -> {} bytes", file.id, file.content.as_ref().map_or(0, Vec::len));
//! }
//! ```

mod archive;
mod index;

pub use archive::{ArchiveEntry, FileEntry, dechunk_archive};
pub use index::{
    CacheIndex, FLAG_NAMED, PROTOCOL_BIG_SMART, PROTOCOL_REVISIONED, decode_index,
    decode_index_with_names,
};
