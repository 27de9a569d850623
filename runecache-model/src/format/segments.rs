//! Segment decoders shared by all layouts
//!
//! A layout only decides which segments exist and where they start; the
//! bytes inside each segment are read the same way everywhere. Each segment
//! gets its own short-lived cursor.

use runecache_shared::{CacheResult, Reader, Stage};

use super::header::PER_FACE_PRIORITY;
use super::plan::{Segment, SegmentOffsets};
use crate::definition::{
    BoneWeight, BoneWeights, ModelDefinition, Priority, TextureProjection, TextureTriangle,
};

/// Colour given to faces whose colour field was reused as a texture id
const PACKED_TEXTURE_COLOR: u16 = 127;

/// Size of the optional block after the last segment (3 x u16 + i32)
const TRAILER_BLOCK_SIZE: usize = 10;

/// How a layout stores face render types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenderTypes {
    Absent,
    /// One render type byte per face
    Plain,
    /// Render type, texture flag and texture coordinate in one byte
    Packed,
}

/// Texture triangle counts by kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TextureCounts {
    /// Render type 0
    pub simple: usize,
    /// Render types 1-3
    pub projected: usize,
    /// Render type 2
    pub cylindrical: usize,
}

impl TextureCounts {
    pub fn from_render_types(types: &[u8]) -> Self {
        let mut counts = Self::default();
        for &render_type in types {
            match render_type {
                0 => counts.simple += 1,
                1..=3 => {
                    counts.projected += 1;
                    if render_type == 2 {
                        counts.cylindrical += 1;
                    }
                }
                _ => {}
            }
        }
        counts
    }
}

/// What the segments of one model contain
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub vertex_count: usize,
    pub face_count: usize,
    pub render_types: RenderTypes,
    /// Uniform priority, or [`PER_FACE_PRIORITY`]
    pub priority: u8,
    pub has_alphas: bool,
    pub has_face_skins: bool,
    /// Explicit texture id segment (packed layouts derive textures instead)
    pub has_textures: bool,
    /// Explicit texture coordinate segment
    pub has_texture_coords: bool,
    pub has_vertex_skins: bool,
    pub has_skin_weights: bool,
    /// One render type per texture triangle
    pub texture_render_types: Vec<u8>,
    pub has_trailer: bool,
}

/// Texture render types stored at the very start of typed layouts
pub(crate) fn read_texture_render_types(data: &[u8], count: usize) -> CacheResult<Vec<u8>> {
    let mut r = Reader::new(data, Stage::Model);
    (0..count).map(|_| r.read_u8()).collect()
}

fn cursor<'a>(data: &'a [u8], offsets: &SegmentOffsets, segment: Segment) -> Reader<'a> {
    Reader::at(data, offsets.offset(segment), Stage::Model)
}

/// Decode every segment of a model
pub(crate) fn decode_segments(
    data: &[u8],
    id: u32,
    layout: &Layout,
    offsets: &SegmentOffsets,
) -> CacheResult<ModelDefinition> {
    let mut model = ModelDefinition::new(id);
    model.vertex_count = layout.vertex_count;
    model.face_count = layout.face_count;

    decode_vertices(data, layout, offsets, &mut model)?;
    let packed = decode_face_attributes(data, layout, offsets, &mut model)?;
    decode_face_indices(data, offsets, &mut model)?;
    decode_texture_triangles(data, layout, offsets, &mut model)?;

    if layout.has_trailer {
        skip_trailer(data, offsets.end())?;
    }
    if let Some(summary) = packed {
        resolve_packed_textures(&mut model, summary);
    }

    Ok(model)
}

fn decode_vertices(
    data: &[u8],
    layout: &Layout,
    offsets: &SegmentOffsets,
    model: &mut ModelDefinition,
) -> CacheResult<()> {
    let count = layout.vertex_count;
    let mut flags = cursor(data, offsets, Segment::VertexFlags);
    let mut dx = cursor(data, offsets, Segment::VerticesX);
    let mut dy = cursor(data, offsets, Segment::VerticesY);
    let mut dz = cursor(data, offsets, Segment::VerticesZ);
    // Skins, then skin weight lists, share one cursor
    let mut skins = cursor(data, offsets, Segment::VertexSkins);

    model.vertices_x = Vec::with_capacity(count);
    model.vertices_y = Vec::with_capacity(count);
    model.vertices_z = Vec::with_capacity(count);
    let mut vertex_skins = layout.has_vertex_skins.then(|| Vec::with_capacity(count));

    let (mut x, mut y, mut z) = (0i32, 0i32, 0i32);
    for _ in 0..count {
        let flag = flags.read_u8()?;
        if flag & 1 != 0 {
            x = x.wrapping_add(dx.read_short_smart()?);
        }
        if flag & 2 != 0 {
            y = y.wrapping_add(dy.read_short_smart()?);
        }
        if flag & 4 != 0 {
            z = z.wrapping_add(dz.read_short_smart()?);
        }
        model.vertices_x.push(x);
        model.vertices_y.push(y);
        model.vertices_z.push(z);

        if let Some(list) = vertex_skins.as_mut() {
            list.push(skins.read_u8()?);
        }
    }
    model.vertex_skins = vertex_skins;

    if layout.has_skin_weights {
        let mut weights = Vec::with_capacity(count);
        for _ in 0..count {
            let bindings = skins.read_u8()?;
            let mut list = BoneWeights::new();
            for _ in 0..bindings {
                let bone = skins.read_u8()?;
                let scale = skins.read_u8()?;
                list.push(BoneWeight { bone, scale });
            }
            weights.push(list);
        }
        model.skin_weights = Some(weights);
    }

    Ok(())
}

/// What a packed render byte segment turned up
#[derive(Debug, Clone, Copy, Default)]
struct PackedSummary {
    any_flat: bool,
    any_textured: bool,
}

fn decode_face_attributes(
    data: &[u8],
    layout: &Layout,
    offsets: &SegmentOffsets,
    model: &mut ModelDefinition,
) -> CacheResult<Option<PackedSummary>> {
    let count = layout.face_count;
    let packed = layout.render_types == RenderTypes::Packed;
    let per_face_priority = layout.priority == PER_FACE_PRIORITY;

    let mut colors = cursor(data, offsets, Segment::FaceColors);
    let mut render = cursor(
        data,
        offsets,
        if packed {
            Segment::PackedRenderTypes
        } else {
            Segment::FaceRenderTypes
        },
    );
    let mut priority_bytes = cursor(data, offsets, Segment::FacePriorities);
    let mut alpha_bytes = cursor(data, offsets, Segment::FaceAlphas);
    let mut skin_bytes = cursor(data, offsets, Segment::FaceSkins);
    let mut texture_ids = cursor(data, offsets, Segment::FaceTextures);
    let mut coord_bytes = cursor(data, offsets, Segment::TextureCoords);

    let mut render_types = (layout.render_types != RenderTypes::Absent).then(|| Vec::with_capacity(count));
    let mut priorities = per_face_priority.then(|| Vec::with_capacity(count));
    let mut alphas = layout.has_alphas.then(|| Vec::with_capacity(count));
    let mut face_skins = layout.has_face_skins.then(|| Vec::with_capacity(count));
    let mut textures = (layout.has_textures || packed).then(|| Vec::with_capacity(count));
    let mut coords = (layout.has_texture_coords || packed).then(|| Vec::with_capacity(count));
    let mut summary = PackedSummary::default();

    model.face_colors = Vec::with_capacity(count);
    for _ in 0..count {
        let mut color = colors.read_u16()?;

        if let Some(list) = render_types.as_mut() {
            let byte = render.read_u8()?;
            if packed {
                let flat = byte & 1 == 1;
                summary.any_flat |= flat;
                list.push(u8::from(flat));

                let (texture, coord) = if byte & 2 == 2 {
                    summary.any_textured = true;
                    let texture = i32::from(color);
                    color = PACKED_TEXTURE_COLOR;
                    (texture, i32::from(byte >> 2))
                } else {
                    (-1, -1)
                };
                if let Some(t) = textures.as_mut() {
                    t.push(texture);
                }
                if let Some(c) = coords.as_mut() {
                    c.push(coord);
                }
            } else {
                list.push(byte);
            }
        }

        if let Some(list) = priorities.as_mut() {
            list.push(priority_bytes.read_u8()?);
        }
        if let Some(list) = alphas.as_mut() {
            list.push(alpha_bytes.read_u8()?);
        }
        if let Some(list) = face_skins.as_mut() {
            list.push(skin_bytes.read_u8()?);
        }

        if layout.has_textures {
            let texture = i32::from(texture_ids.read_u16()?) - 1;
            if let Some(t) = textures.as_mut() {
                t.push(texture);
            }
            if let Some(c) = coords.as_mut() {
                let coord = if texture != -1 {
                    i32::from(coord_bytes.read_u8()?) - 1
                } else {
                    -1
                };
                c.push(coord);
            }
        }

        model.face_colors.push(color);
    }

    model.face_render_types = render_types;
    model.priority = match priorities {
        Some(list) => Priority::PerFace(list),
        None => Priority::Uniform(layout.priority),
    };
    model.face_alphas = alphas;
    model.face_skins = face_skins;
    model.face_textures = textures;
    model.texture_coords = coords;

    Ok(packed.then_some(summary))
}

/// Strip-style face index decoding
///
/// Every face carries a type code; each code reuses part of the previous
/// triangle and reads new vertex deltas relative to the last vertex read.
///
/// ```text
/// 1  a = last + d, b = a + d, c = b + d
/// 2  b = c,        c = last + d
/// 3  a = c,        c = last + d
/// 4  swap a and b, c = last + d
/// ```
fn decode_face_indices(
    data: &[u8],
    offsets: &SegmentOffsets,
    model: &mut ModelDefinition,
) -> CacheResult<()> {
    let count = model.face_count;
    let mut types = cursor(data, offsets, Segment::FaceTypes);
    let mut deltas = cursor(data, offsets, Segment::FaceIndices);

    model.face_a = Vec::with_capacity(count);
    model.face_b = Vec::with_capacity(count);
    model.face_c = Vec::with_capacity(count);

    let (mut a, mut b, mut c, mut last) = (0i32, 0i32, 0i32, 0i32);
    for face in 0..count {
        match types.read_u8()? {
            1 => {
                a = last.wrapping_add(deltas.read_short_smart()?);
                b = a.wrapping_add(deltas.read_short_smart()?);
                c = b.wrapping_add(deltas.read_short_smart()?);
                last = c;
            }
            2 => {
                b = c;
                c = last.wrapping_add(deltas.read_short_smart()?);
                last = c;
            }
            3 => {
                a = c;
                c = last.wrapping_add(deltas.read_short_smart()?);
                last = c;
            }
            4 => {
                std::mem::swap(&mut a, &mut b);
                c = last.wrapping_add(deltas.read_short_smart()?);
                last = c;
            }
            other => {
                tracing::warn!(
                    "Model {}: face {} has unknown index type {}, repeating previous face",
                    model.id,
                    face,
                    other
                );
            }
        }
        // Negative indices fall out of range and are cleared afterwards
        model.face_a.push(u32::try_from(a).unwrap_or(u32::MAX));
        model.face_b.push(u32::try_from(b).unwrap_or(u32::MAX));
        model.face_c.push(u32::try_from(c).unwrap_or(u32::MAX));
    }

    Ok(())
}

fn decode_texture_triangles(
    data: &[u8],
    layout: &Layout,
    offsets: &SegmentOffsets,
    model: &mut ModelDefinition,
) -> CacheResult<()> {
    let mut simple = cursor(data, offsets, Segment::SimpleTextures);
    let mut projected = cursor(data, offsets, Segment::ProjectedTextures);
    let mut scales = cursor(data, offsets, Segment::TextureScales);
    let mut rotations = cursor(data, offsets, Segment::TextureRotations);
    let mut directions = cursor(data, offsets, Segment::TextureDirections);
    let mut translations = cursor(data, offsets, Segment::TextureTranslations);

    model.texture_triangles = Vec::with_capacity(layout.texture_render_types.len());
    for (index, &render_type) in layout.texture_render_types.iter().enumerate() {
        let triangle = match render_type {
            0 => {
                let a = u32::from(simple.read_u16()?);
                let b = u32::from(simple.read_u16()?);
                let c = u32::from(simple.read_u16()?);
                TextureTriangle::simple(a, b, c)
            }
            1..=3 => {
                let a = u32::from(projected.read_u16()?);
                let b = u32::from(projected.read_u16()?);
                let c = u32::from(projected.read_u16()?);
                let scale = [scales.read_u16()?, scales.read_u16()?, scales.read_u16()?];
                let rotation = rotations.read_u16()?;
                let direction = directions.read_i8()?;
                let translation = translations.read_u16()?;
                let primary_color = if render_type == 2 {
                    Some(translations.read_u16()?)
                } else {
                    None
                };
                TextureTriangle {
                    render_type,
                    a,
                    b,
                    c,
                    projection: Some(TextureProjection {
                        scale,
                        rotation,
                        direction,
                        translation,
                        primary_color,
                    }),
                }
            }
            other => {
                tracing::warn!(
                    "Model {}: texture triangle {} has unknown render type {}",
                    model.id,
                    index,
                    other
                );
                TextureTriangle {
                    render_type: other,
                    ..TextureTriangle::default()
                }
            }
        };
        model.texture_triangles.push(triangle);
    }

    Ok(())
}

/// Consume the optional block after the last segment
///
/// A non-zero flag byte is followed by three u16 and one i32 whose meaning
/// is unknown.
fn skip_trailer(data: &[u8], offset: usize) -> CacheResult<()> {
    let mut r = Reader::at(data, offset, Stage::Model);
    if r.read_u8()? != 0 {
        r.skip(TRAILER_BLOCK_SIZE)?;
    }
    Ok(())
}

/// Drop packed texture data that carries no information
///
/// A coordinate naming a texture triangle identical to the face itself is
/// the same as no coordinate. Arrays left without a single meaningful entry
/// are removed.
fn resolve_packed_textures(model: &mut ModelDefinition, summary: PackedSummary) {
    if let Some(coords) = model.texture_coords.as_mut() {
        let mut any_explicit = false;
        for (face, coord) in coords.iter_mut().enumerate() {
            if *coord == -1 {
                continue;
            }
            let own_vertices = [model.face_a[face], model.face_b[face], model.face_c[face]];
            match model.texture_triangles.get(*coord as usize) {
                Some(t) if [t.a, t.b, t.c] == own_vertices => {
                    *coord = -1;
                }
                _ => any_explicit = true,
            }
        }
        if !any_explicit {
            model.texture_coords = None;
        }
    }

    if !summary.any_textured {
        model.face_textures = None;
    }
    if !summary.any_flat {
        model.face_render_types = None;
    }
}
