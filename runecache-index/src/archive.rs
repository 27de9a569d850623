//! Archive entries and de-chunking
//!
//! A multi-file archive blob (after decompression) interleaves its files in
//! chunks and ends with a size table:
//!
//! # Layout
//! ```text
//! data   chunk 0: file 0 bytes, file 1 bytes, ... file n-1 bytes
//!        chunk 1: file 0 bytes, ...
//!        ...
//! table  chunks x files x i32        chunk-major, file-minor size deltas
//! chunks u8
//! ```
//!
//! Within a chunk the deltas are summed across files, starting from zero
//! for every chunk; the running value after file `i` is that file's size in
//! the chunk. A single-file archive has no table at all.

use runecache_shared::{CacheError, CacheResult, Decompressor, Reader, Stage};

/// One file inside an archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    /// File id, increasing within its archive
    pub id: u32,
    pub name_hash: Option<i32>,
    pub name: Option<String>,
    /// File bytes, populated once the archive is loaded
    pub content: Option<Vec<u8>>,
}

impl FileEntry {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// One archive of a cache index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Cache-assigned archive id
    pub id: u32,
    pub name_hash: Option<i32>,
    pub name: Option<String>,
    pub crc: i32,
    pub revision: i32,
    /// Files in declaration order
    pub files: Vec<FileEntry>,
}

impl ArchiveEntry {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// File by id
    pub fn file(&self, id: u32) -> Option<&FileEntry> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Whether every file has its content
    pub fn is_loaded(&self) -> bool {
        self.files.iter().all(|f| f.content.is_some())
    }

    /// Split a decompressed archive blob into this archive's files
    ///
    /// Contents are only assigned when the whole blob de-chunks cleanly.
    pub fn load_files(&mut self, data: &[u8]) -> CacheResult<()> {
        let contents = dechunk_archive(data, self.files.len())?;
        for (file, content) in self.files.iter_mut().zip(contents) {
            file.content = Some(content);
        }
        Ok(())
    }

    /// Decompress a raw archive blob, then split it into files
    pub fn load_compressed(&mut self, raw: &[u8], decompressor: &dyn Decompressor) -> CacheResult<()> {
        let data = decompressor.decompress(raw)?;
        self.load_files(&data)
    }
}

/// Reassemble the contents of `file_count` files from an archive blob
///
/// Returns one byte vector per file, in file order.
pub fn dechunk_archive(data: &[u8], file_count: usize) -> CacheResult<Vec<Vec<u8>>> {
    match file_count {
        0 => return Ok(Vec::new()),
        1 => return Ok(vec![data.to_vec()]),
        _ => {}
    }

    let Some(&chunks) = data.last() else {
        return Err(CacheError::InvalidOffset {
            stage: Stage::Archive,
            offset: -1,
        });
    };
    let chunks = usize::from(chunks);

    let table_len = chunks
        .checked_mul(file_count)
        .and_then(|n| n.checked_mul(4))
        .ok_or(CacheError::InvalidOffset {
            stage: Stage::Archive,
            offset: i64::MIN,
        })?;
    let table_start = data.len() as i64 - 1 - table_len as i64;
    if table_start < 0 {
        return Err(CacheError::InvalidOffset {
            stage: Stage::Archive,
            offset: table_start,
        });
    }
    let data_len = table_start as usize;

    // sizes[chunk][file]
    let mut r = Reader::at(data, data_len, Stage::Archive);
    let mut sizes = vec![vec![0usize; file_count]; chunks];
    let mut consumed = 0usize;
    for row in &mut sizes {
        let mut chunk_size = 0i32;
        for size in row.iter_mut() {
            let entry_offset = r.position();
            chunk_size = chunk_size.wrapping_add(r.read_i32()?);
            if chunk_size < 0 {
                return Err(CacheError::InvalidOffset {
                    stage: Stage::Archive,
                    offset: entry_offset as i64,
                });
            }
            *size = chunk_size as usize;
            consumed = consumed.saturating_add(*size);
        }
    }

    if consumed != data_len {
        return Err(CacheError::InconsistentChunkTable {
            expected: data_len,
            consumed,
        });
    }

    let mut files: Vec<Vec<u8>> = (0..file_count)
        .map(|id| Vec::with_capacity(sizes.iter().map(|row| row[id]).sum()))
        .collect();

    let mut r = Reader::new(&data[..data_len], Stage::Archive);
    for row in &sizes {
        for (file, &size) in files.iter_mut().zip(row) {
            file.extend_from_slice(r.read_bytes(size)?);
        }
    }

    tracing::trace!(
        "De-chunked {} files from {} chunks ({} bytes)",
        file_count,
        chunks,
        data_len
    );

    Ok(files)
}
