//! Cache index (archive directory) decoding
//!
//! # Layout
//! ```text
//! protocol u8
//! revision i32                       (protocol >= 6)
//! flags    u8                        bit 0: archives and files are named
//! count    u16 | big smart           (big smart from protocol 7)
//! ids      count x delta             i16 | big smart, running sum from 0
//! names    count x i32               (named)
//! crcs     count x i32
//! revs     count x i32
//! files    count x (u16 | big smart)
//! file ids per archive, files x delta    u16 | big smart, sum reset per archive
//! file names per archive, files x i32    (named)
//! ```
//!
//! Every metadata block walks the archives in the order their ids were
//! declared.

use runecache_shared::{CacheResult, NameLookup, NoNames, Reader, Stage};

use crate::archive::{ArchiveEntry, FileEntry};

/// First protocol carrying an index revision
pub const PROTOCOL_REVISIONED: u8 = 6;

/// First protocol using big smarts for counts and ids
pub const PROTOCOL_BIG_SMART: u8 = 7;

/// Flags bit marking a named index
pub const FLAG_NAMED: u8 = 0x01;

/// Decoded directory of one cache store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheIndex {
    /// Format protocol, selects the sub-format
    pub protocol: u8,
    /// Index revision (protocol 6 and later)
    pub revision: Option<i32>,
    /// Whether archives and files carry name hashes
    pub named: bool,
    /// Archives in declaration order
    pub archives: Vec<ArchiveEntry>,
}

impl CacheIndex {
    /// Number of archives
    pub fn len(&self) -> usize {
        self.archives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archives.is_empty()
    }

    /// Archive by cache-assigned id
    pub fn archive(&self, id: u32) -> Option<&ArchiveEntry> {
        self.archives.iter().find(|a| a.id == id)
    }

    pub fn archive_mut(&mut self, id: u32) -> Option<&mut ArchiveEntry> {
        self.archives.iter_mut().find(|a| a.id == id)
    }

    /// Archive by resolved name
    pub fn archive_named(&self, name: &str) -> Option<&ArchiveEntry> {
        self.archives
            .iter()
            .find(|a| a.name.as_deref() == Some(name))
    }

    /// Archive ids in declaration order
    pub fn archive_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.archives.iter().map(|a| a.id)
    }
}

/// Decode an index without resolving names
pub fn decode_index(data: &[u8]) -> CacheResult<CacheIndex> {
    decode_index_with_names(data, &NoNames)
}

/// Decode an index, resolving archive and file name hashes through `names`
///
/// A hash missing from `names` leaves the name unset. Truncated input fails
/// the whole decode.
pub fn decode_index_with_names(data: &[u8], names: &dyn NameLookup) -> CacheResult<CacheIndex> {
    let mut r = Reader::new(data, Stage::Index);

    let protocol = r.read_u8()?;
    let revision = if protocol >= PROTOCOL_REVISIONED {
        Some(r.read_i32()?)
    } else {
        None
    };

    let flags = r.read_u8()?;
    let named = flags & FLAG_NAMED != 0;
    let big_smarts = protocol >= PROTOCOL_BIG_SMART;

    let count = read_count(&mut r, big_smarts)?;

    // Archive ids: running sum, never reset
    let mut archives = Vec::with_capacity(count.min(r.remaining()));
    let mut last_id = 0i32;
    for _ in 0..count {
        let delta = if big_smarts {
            r.read_big_smart()? as i32
        } else {
            i32::from(r.read_i16()?)
        };
        last_id = last_id.wrapping_add(delta);
        archives.push(ArchiveEntry::new(last_id as u32));
    }

    if named {
        for archive in &mut archives {
            let hash = r.read_i32()?;
            archive.name_hash = Some(hash);
            archive.name = names.lookup(hash).map(str::to_owned);
        }
    }

    for archive in &mut archives {
        archive.crc = r.read_i32()?;
    }

    for archive in &mut archives {
        archive.revision = r.read_i32()?;
    }

    let mut file_counts = Vec::with_capacity(archives.len());
    for archive in &archives {
        let files = read_count(&mut r, big_smarts)?;
        if files == 0 {
            tracing::warn!("Archive {} declares no files", archive.id);
        }
        file_counts.push(files);
    }

    // File ids: running sum, reset per archive
    for (archive, &files) in archives.iter_mut().zip(&file_counts) {
        archive.files.reserve(files.min(r.remaining()));
        let mut last_id = 0u32;
        for _ in 0..files {
            let delta = if big_smarts {
                r.read_big_smart()?
            } else {
                u32::from(r.read_u16()?)
            };
            last_id = last_id.wrapping_add(delta);
            archive.files.push(FileEntry::new(last_id));
        }
    }

    if named {
        for archive in &mut archives {
            for file in &mut archive.files {
                let hash = r.read_i32()?;
                file.name_hash = Some(hash);
                file.name = names.lookup(hash).map(str::to_owned);
            }
        }
    }

    if r.remaining() > 0 {
        tracing::debug!(
            "Index decoded with {} trailing bytes (protocol {})",
            r.remaining(),
            protocol
        );
    }

    Ok(CacheIndex {
        protocol,
        revision,
        named,
        archives,
    })
}

/// Archive or file count: u16 before protocol 7, big smart after
fn read_count(r: &mut Reader<'_>, big_smarts: bool) -> CacheResult<usize> {
    if big_smarts {
        Ok(r.read_big_smart()? as usize)
    } else {
        Ok(usize::from(r.read_u16()?))
    }
}
