//! Model binary layouts
//!
//! Four generations of the model format exist. The newest three end with a
//! two byte marker; anything else is the original layout.
//!
//! ```text
//! ... segments ... | trailing header | marker
//!                                      ff fd  V3
//!                                      ff fe  V2
//!                                      ff ff  V1
//!                                      other  legacy (no marker)
//! ```
//!
//! Each layout turns its header into a [`SegmentPlan`]; the segments are
//! then read by one shared set of decoders.

mod header;
mod legacy;
mod plan;
mod segments;
mod v1;
mod v2;
mod v3;

#[cfg(test)]
mod tests;

pub use header::{LegacyHeader, PER_FACE_PRIORITY, V1Header, V2Header, V3Header};
pub use plan::{Segment, SegmentOffsets, SegmentPlan};

use runecache_shared::{CacheError, CacheResult, Stage};

use crate::definition::ModelDefinition;

/// Model layout generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    V3,
    V2,
    V1,
    Legacy,
}

impl ModelFormat {
    /// Pick the layout from the last two bytes
    pub fn detect(data: &[u8]) -> CacheResult<Self> {
        let [.., second_last, last] = data else {
            return Err(CacheError::InvalidOffset {
                stage: Stage::Model,
                offset: data.len() as i64 - 2,
            });
        };

        Ok(match (*second_last as i8, *last as i8) {
            (-1, -3) => ModelFormat::V3,
            (-1, -2) => ModelFormat::V2,
            (-1, -1) => ModelFormat::V1,
            (a, b) => {
                tracing::debug!("No format marker ({}, {}), using legacy layout", a, b);
                ModelFormat::Legacy
            }
        })
    }

    /// Size of the trailing header, marker included
    pub fn header_size(self) -> usize {
        match self {
            ModelFormat::V3 => V3Header::SIZE,
            ModelFormat::V2 => V2Header::SIZE,
            ModelFormat::V1 => V1Header::SIZE,
            ModelFormat::Legacy => LegacyHeader::SIZE,
        }
    }
}

/// Decode a model without any post-processing
pub fn decode_definition(data: &[u8], id: u32) -> CacheResult<ModelDefinition> {
    let format = ModelFormat::detect(data)?;
    let mut model = match format {
        ModelFormat::V3 => v3::decode(data, id)?,
        ModelFormat::V2 => v2::decode(data, id)?,
        ModelFormat::V1 => v1::decode(data, id)?,
        ModelFormat::Legacy => legacy::decode(data, id)?,
    };
    clear_missing_references(&mut model);

    tracing::trace!(
        "Decoded model {} ({:?}): {} vertices, {} faces, {} texture triangles",
        id,
        format,
        model.vertex_count,
        model.face_count,
        model.texture_triangles.len()
    );
    Ok(model)
}

/// Locate and parse a layout's trailing header
///
/// Returns the header and the offset it starts at.
fn trailing_header<H>(
    data: &[u8],
    size: usize,
    parse: fn(&[u8]) -> Option<H>,
) -> CacheResult<(H, usize)> {
    let start = data.len().checked_sub(size).ok_or(CacheError::InvalidOffset {
        stage: Stage::Model,
        offset: data.len() as i64 - size as i64,
    })?;
    let header = parse(&data[start..]).ok_or(CacheError::TruncatedInput {
        stage: Stage::Model,
        offset: start,
        needed: size,
        len: data.len(),
    })?;
    Ok((header, start))
}

/// Replace references that point nowhere
///
/// Face vertices past the vertex table become 0. Texture coordinates past
/// the triangle table, or on untextured faces, become -1.
fn clear_missing_references(model: &mut ModelDefinition) {
    let id = model.id;
    let vertex_count = model.vertex_count;

    for indices in [&mut model.face_a, &mut model.face_b, &mut model.face_c] {
        for (face, vertex) in indices.iter_mut().enumerate() {
            if *vertex as usize >= vertex_count {
                tracing::warn!(
                    "Model {}: face {} references vertex {} of {}",
                    id,
                    face,
                    *vertex as i32,
                    vertex_count
                );
                *vertex = 0;
            }
        }
    }

    let triangle_count = model.texture_triangles.len();
    if let Some(coords) = model.texture_coords.as_mut() {
        for (face, coord) in coords.iter_mut().enumerate() {
            if *coord == -1 {
                continue;
            }
            let textured = model
                .face_textures
                .as_ref()
                .and_then(|t| t.get(face))
                .is_some_and(|&t| t != -1);
            let in_range = usize::try_from(*coord).is_ok_and(|c| c < triangle_count);
            if !textured || !in_range {
                tracing::warn!(
                    "Model {}: face {} texture coordinate {} cleared ({} triangles)",
                    id,
                    face,
                    coord,
                    triangle_count
                );
                *coord = -1;
            }
        }
    }
}
