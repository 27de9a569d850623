//! First marked layout (marker `ff ff`)
//!
//! Same segment order as V3, but vertex skins are a fixed byte per vertex
//! and there are no skin weights.

use runecache_shared::CacheResult;

use super::header::{PER_FACE_PRIORITY, V1Header};
use super::plan::{Segment, SegmentPlan};
use super::segments::{Layout, RenderTypes, TextureCounts, decode_segments, read_texture_render_types};
use super::trailing_header;
use crate::definition::ModelDefinition;

pub(crate) fn plan(header: &V1Header, textures: TextureCounts) -> SegmentPlan {
    let vertices = usize::from(header.vertex_count);
    let faces = usize::from(header.face_count);

    SegmentPlan::new()
        .push(Segment::TextureRenderTypes, usize::from(header.texture_triangles))
        .push(Segment::VertexFlags, vertices)
        .push_if(header.has_render_types, Segment::FaceRenderTypes, faces)
        .push(Segment::FaceTypes, faces)
        .push_if(header.priority == PER_FACE_PRIORITY, Segment::FacePriorities, faces)
        .push_if(header.has_face_skins, Segment::FaceSkins, faces)
        .push_if(header.has_vertex_skins, Segment::VertexSkins, vertices)
        .push_if(header.has_alphas, Segment::FaceAlphas, faces)
        .push(Segment::FaceIndices, usize::from(header.face_index_len))
        .push_if(header.has_textures, Segment::FaceTextures, faces * 2)
        .push(Segment::TextureCoords, usize::from(header.texture_coord_len))
        .push(Segment::FaceColors, faces * 2)
        .push(Segment::VerticesX, usize::from(header.x_len))
        .push(Segment::VerticesY, usize::from(header.y_len))
        .push(Segment::VerticesZ, usize::from(header.z_len))
        .push(Segment::SimpleTextures, textures.simple * 6)
        .push(Segment::ProjectedTextures, textures.projected * 6)
        .push(Segment::TextureScales, textures.projected * 6)
        .push(Segment::TextureRotations, textures.projected * 2)
        .push(Segment::TextureDirections, textures.projected)
        .push(
            Segment::TextureTranslations,
            textures.projected * 2 + textures.cylindrical * 2,
        )
}

pub(super) fn decode(data: &[u8], id: u32) -> CacheResult<ModelDefinition> {
    let (header, header_start) = trailing_header(data, V1Header::SIZE, V1Header::from_bytes)?;

    let texture_render_types =
        read_texture_render_types(data, usize::from(header.texture_triangles))?;
    let textures = TextureCounts::from_render_types(&texture_render_types);
    let offsets = plan(&header, textures).offsets_within(header_start, data.len())?;

    let layout = Layout {
        vertex_count: usize::from(header.vertex_count),
        face_count: usize::from(header.face_count),
        render_types: if header.has_render_types {
            RenderTypes::Plain
        } else {
            RenderTypes::Absent
        },
        priority: header.priority,
        has_alphas: header.has_alphas,
        has_face_skins: header.has_face_skins,
        has_textures: header.has_textures,
        has_texture_coords: header.has_textures && header.texture_triangles > 0,
        has_vertex_skins: header.has_vertex_skins,
        has_skin_weights: false,
        texture_render_types,
        has_trailer: true,
    };
    decode_segments(data, id, &layout, &offsets)
}
