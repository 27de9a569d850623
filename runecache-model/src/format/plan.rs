//! Segment plans
//!
//! Every layout stores its attributes as consecutive segments whose lengths
//! come from the trailing header. A layout lists its segments in storage
//! order; one fold over the list yields the offset of each.

use runecache_shared::{CacheError, CacheResult, Stage};

/// Attribute segments across all layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    TextureRenderTypes,
    VertexFlags,
    FaceRenderTypes,
    FaceTypes,
    FacePriorities,
    FaceSkins,
    PackedRenderTypes,
    VertexSkins,
    FaceAlphas,
    FaceIndices,
    FaceTextures,
    TextureCoords,
    FaceColors,
    VerticesX,
    VerticesY,
    VerticesZ,
    SimpleTextures,
    ProjectedTextures,
    TextureScales,
    TextureRotations,
    TextureDirections,
    TextureTranslations,
}

impl Segment {
    pub const COUNT: usize = 22;
}

/// Ordered `(segment, length)` list for one model
#[derive(Debug, Clone, Default)]
pub struct SegmentPlan {
    entries: Vec<(Segment, usize)>,
}

impl SegmentPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, segment: Segment, len: usize) -> Self {
        self.entries.push((segment, len));
        self
    }

    /// Push a segment that only occupies bytes when `present`
    pub fn push_if(self, present: bool, segment: Segment, len: usize) -> Self {
        self.push(segment, if present { len } else { 0 })
    }

    pub fn entries(&self) -> &[(Segment, usize)] {
        &self.entries
    }

    /// Fold the plan into offsets
    pub fn offsets(&self) -> SegmentOffsets {
        let mut offsets = [0usize; Segment::COUNT];
        let end = self.entries.iter().fold(0usize, |at, &(segment, len)| {
            offsets[segment as usize] = at;
            at + len
        });
        SegmentOffsets { offsets, end }
    }

    /// Fold the plan and check it ends before `limit` (the trailing header)
    pub fn offsets_within(&self, limit: usize, buffer_len: usize) -> CacheResult<SegmentOffsets> {
        let offsets = self.offsets();
        if offsets.end > limit {
            return Err(CacheError::TruncatedInput {
                stage: Stage::Model,
                offset: limit,
                needed: offsets.end - limit,
                len: buffer_len,
            });
        }
        Ok(offsets)
    }
}

/// Byte offset of every segment of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOffsets {
    offsets: [usize; Segment::COUNT],
    end: usize,
}

impl SegmentOffsets {
    /// Start of `segment`; segments missing from the plan report 0
    pub fn offset(&self, segment: Segment) -> usize {
        self.offsets[segment as usize]
    }

    /// First byte past the last segment
    pub fn end(&self) -> usize {
        self.end
    }
}
