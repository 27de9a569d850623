//! Error types for cache decoding

use std::fmt;

use thiserror::Error;

/// Decode stage an error was raised in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading a cache store's archive directory
    Index,
    /// Splitting an archive blob into its files
    Archive,
    /// Parsing a model definition
    Model,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => write!(f, "index"),
            Self::Archive => write!(f, "archive"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// Fatal decode errors
///
/// Recoverable conditions (unknown format markers, dangling references,
/// archives without files) are logged instead of returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A read or computed segment runs past the end of the buffer
    #[error("{stage}: truncated input at offset {offset} (needed {needed} bytes, buffer is {len})")]
    TruncatedInput {
        stage: Stage,
        offset: usize,
        needed: usize,
        len: usize,
    },

    /// An offset computation went below zero
    #[error("{stage}: offset {offset} is outside the buffer")]
    InvalidOffset { stage: Stage, offset: i64 },

    /// De-chunked byte accounting does not match the data region
    #[error("archive: chunk table covers {consumed} bytes but data region is {expected} bytes")]
    InconsistentChunkTable { expected: usize, consumed: usize },

    /// The injected decompressor rejected an archive blob
    #[error("archive: decompression failed: {0}")]
    Decompression(String),
}

impl CacheError {
    /// Stage the error belongs to
    pub fn stage(&self) -> Stage {
        match self {
            Self::TruncatedInput { stage, .. } | Self::InvalidOffset { stage, .. } => *stage,
            Self::InconsistentChunkTable { .. } | Self::Decompression(_) => Stage::Archive,
        }
    }
}

/// Result alias used by every decoder
pub type CacheResult<T> = Result<T, CacheError>;
