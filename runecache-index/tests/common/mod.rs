//! Byte builders for index and archive fixtures

#![allow(dead_code)]

use runecache_shared::name_hash;

pub struct ArchiveFixture {
    pub id: u32,
    pub name: Option<&'static str>,
    pub crc: i32,
    pub revision: i32,
    pub files: Vec<(u32, Option<&'static str>)>,
}

impl ArchiveFixture {
    pub fn new(id: u32, file_ids: &[u32]) -> Self {
        Self {
            id,
            name: None,
            crc: id as i32 * 1000,
            revision: 1,
            files: file_ids.iter().map(|&f| (f, None)).collect(),
        }
    }
}

fn write_big_smart(out: &mut Vec<u8>, value: u32) {
    if value < 0x8000 {
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else {
        out.extend_from_slice(&(value | 0x8000_0000).to_be_bytes());
    }
}

fn write_count(out: &mut Vec<u8>, protocol: u8, value: u32) {
    if protocol >= 7 {
        write_big_smart(out, value);
    } else {
        out.extend_from_slice(&(value as u16).to_be_bytes());
    }
}

fn hash_of(name: Option<&str>) -> i32 {
    name.map_or(0, name_hash)
}

/// Encode an index the way the cache stores it
pub fn encode_index(protocol: u8, revision: i32, named: bool, archives: &[ArchiveFixture]) -> Vec<u8> {
    let mut out = vec![protocol];
    if protocol >= 6 {
        out.extend_from_slice(&revision.to_be_bytes());
    }
    out.push(u8::from(named));
    write_count(&mut out, protocol, archives.len() as u32);

    let mut last = 0u32;
    for archive in archives {
        let delta = archive.id - last;
        if protocol >= 7 {
            write_big_smart(&mut out, delta);
        } else {
            out.extend_from_slice(&(delta as i16).to_be_bytes());
        }
        last = archive.id;
    }

    if named {
        for archive in archives {
            out.extend_from_slice(&hash_of(archive.name).to_be_bytes());
        }
    }
    for archive in archives {
        out.extend_from_slice(&archive.crc.to_be_bytes());
    }
    for archive in archives {
        out.extend_from_slice(&archive.revision.to_be_bytes());
    }
    for archive in archives {
        write_count(&mut out, protocol, archive.files.len() as u32);
    }
    for archive in archives {
        let mut last = 0u32;
        for &(file, _) in &archive.files {
            write_count(&mut out, protocol, file - last);
            last = file;
        }
    }
    if named {
        for archive in archives {
            for &(_, name) in &archive.files {
                out.extend_from_slice(&hash_of(name).to_be_bytes());
            }
        }
    }
    out
}

/// Encode an archive blob from per-file chunk payloads
///
/// `files[file][chunk]` holds the bytes of one file in one chunk; every
/// file must have the same number of chunks.
pub fn encode_chunked(files: &[Vec<Vec<u8>>]) -> Vec<u8> {
    let chunks = files.first().map_or(0, Vec::len);
    let mut data = Vec::new();
    for chunk in 0..chunks {
        for file in files {
            data.extend_from_slice(&file[chunk]);
        }
    }
    for chunk in 0..chunks {
        let mut previous = 0i32;
        for file in files {
            let size = file[chunk].len() as i32;
            data.extend_from_slice(&(size - previous).to_be_bytes());
            previous = size;
        }
    }
    data.push(chunks as u8);
    data
}
