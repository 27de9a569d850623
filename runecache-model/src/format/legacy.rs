//! Original unmarked layout
//!
//! Used for any buffer whose last two bytes match no known marker.

use runecache_shared::CacheResult;

use super::header::{LegacyHeader, PER_FACE_PRIORITY};
use super::plan::{Segment, SegmentPlan};
use super::segments::{Layout, RenderTypes, decode_segments};
use super::trailing_header;
use crate::definition::ModelDefinition;

pub(crate) fn plan(header: &LegacyHeader) -> SegmentPlan {
    let vertices = usize::from(header.vertex_count);
    let faces = usize::from(header.face_count);

    SegmentPlan::new()
        .push(Segment::VertexFlags, vertices)
        .push(Segment::FaceTypes, faces)
        .push_if(header.priority == PER_FACE_PRIORITY, Segment::FacePriorities, faces)
        .push_if(header.has_face_skins, Segment::FaceSkins, faces)
        .push_if(header.has_packed_render, Segment::PackedRenderTypes, faces)
        .push_if(header.has_vertex_skins, Segment::VertexSkins, vertices)
        .push_if(header.has_alphas, Segment::FaceAlphas, faces)
        .push(Segment::FaceIndices, usize::from(header.face_index_len))
        .push(Segment::FaceColors, faces * 2)
        .push(Segment::SimpleTextures, usize::from(header.texture_triangles) * 6)
        .push(Segment::VerticesX, usize::from(header.x_len))
        .push(Segment::VerticesY, usize::from(header.y_len))
        .push(Segment::VerticesZ, usize::from(header.z_len))
}

pub(super) fn decode(data: &[u8], id: u32) -> CacheResult<ModelDefinition> {
    let (header, header_start) =
        trailing_header(data, LegacyHeader::SIZE, LegacyHeader::from_bytes)?;
    let offsets = plan(&header).offsets_within(header_start, data.len())?;

    let layout = Layout {
        vertex_count: usize::from(header.vertex_count),
        face_count: usize::from(header.face_count),
        render_types: if header.has_packed_render {
            RenderTypes::Packed
        } else {
            RenderTypes::Absent
        },
        priority: header.priority,
        has_alphas: header.has_alphas,
        has_face_skins: header.has_face_skins,
        has_textures: false,
        has_texture_coords: false,
        has_vertex_skins: header.has_vertex_skins,
        has_skin_weights: false,
        texture_render_types: vec![0; usize::from(header.texture_triangles)],
        has_trailer: false,
    };
    decode_segments(data, id, &layout, &offsets)
}
