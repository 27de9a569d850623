//! Name hash resolution
//!
//! Archive and file names are stored only as 32-bit hashes. Resolving them
//! needs a table of known names, supplied by the caller.

use hashbrown::HashMap;

/// Read-only hash to name lookup
pub trait NameLookup {
    /// Name for `hash`, if known
    fn lookup(&self, hash: i32) -> Option<&str>;
}

/// Lookup that never resolves anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameLookup for NoNames {
    fn lookup(&self, _hash: i32) -> Option<&str> {
        None
    }
}

/// Hash a name the way the cache does
///
/// Java-style string hash over the lower-cased bytes, with wrapping
/// arithmetic.
pub fn name_hash(name: &str) -> i32 {
    name.bytes().fold(0i32, |hash, b| {
        hash.wrapping_mul(31)
            .wrapping_add(i32::from(b.to_ascii_lowercase()))
    })
}

/// In-memory name table
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: HashMap<i32, String>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain name, keyed by its hash
    pub fn insert(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.names.insert(name_hash(&name), name);
    }

    /// Add a name under an explicit hash (for pre-cracked hash lists)
    pub fn insert_hashed(&mut self, hash: i32, name: impl Into<String>) {
        self.names.insert(hash, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for NameTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut table = Self::new();
        for name in iter {
            table.insert(name);
        }
        table
    }
}

impl NameLookup for NameTable {
    fn lookup(&self, hash: i32) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }
}

impl NameLookup for HashMap<i32, String> {
    fn lookup(&self, hash: i32) -> Option<&str> {
        self.get(&hash).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_hash() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 97);
        assert_eq!(name_hash("ab"), 97 * 31 + 98);
        // Case-insensitive
        assert_eq!(name_hash("Logo"), name_hash("logo"));
    }

    #[test]
    fn test_name_hash_wraps() {
        let long = "title_background_animated";
        let expected = long
            .bytes()
            .fold(0i64, |h, b| (h * 31 + i64::from(b)) as i32 as i64);
        assert_eq!(i64::from(name_hash(long)), expected);
    }

    #[test]
    fn test_name_table_lookup() {
        let table: NameTable = ["logo", "title"].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(name_hash("logo")), Some("logo"));
        assert_eq!(table.lookup(name_hash("missing")), None);
        assert_eq!(NoNames.lookup(name_hash("logo")), None);
    }
}
