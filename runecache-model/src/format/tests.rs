//! Tests for model layouts

use super::*;
use crate::definition::{BoneWeight, Priority, TextureProjection, TextureTriangle};

/// Short smart byte for a small delta
fn ss(delta: i32) -> u8 {
    (delta + 64) as u8
}

fn assemble(segments: &[&[u8]], header: &[u8]) -> Vec<u8> {
    let mut data: Vec<u8> = segments.concat();
    data.extend_from_slice(header);
    data
}

// ========================================================================
// Format detection
// ========================================================================

#[test]
fn test_detect_markers() {
    assert_eq!(ModelFormat::detect(&[0, 0xFF, 0xFD]).unwrap(), ModelFormat::V3);
    assert_eq!(ModelFormat::detect(&[0xFF, 0xFE]).unwrap(), ModelFormat::V2);
    assert_eq!(ModelFormat::detect(&[0xFF, 0xFF]).unwrap(), ModelFormat::V1);
    assert_eq!(ModelFormat::detect(&[0xFE, 0xFF]).unwrap(), ModelFormat::Legacy);
    assert_eq!(ModelFormat::detect(&[0, 3]).unwrap(), ModelFormat::Legacy);
}

#[test]
fn test_detect_short_buffer() {
    let err = ModelFormat::detect(&[0xFF]).unwrap_err();
    assert_eq!(
        err,
        CacheError::InvalidOffset {
            stage: Stage::Model,
            offset: -1
        }
    );
}

#[test]
fn test_buffer_shorter_than_header() {
    let err = decode_definition(&[0xFF, 0xFD], 1).unwrap_err();
    assert_eq!(
        err,
        CacheError::InvalidOffset {
            stage: Stage::Model,
            offset: -24
        }
    );
}

#[test]
fn test_header_sizes_by_format() {
    assert_eq!(ModelFormat::V3.header_size(), 26);
    assert_eq!(ModelFormat::Legacy.header_size(), 18);
}

// ========================================================================
// Legacy layout
// ========================================================================

fn legacy_triangle_header() -> LegacyHeader {
    LegacyHeader {
        vertex_count: 3,
        face_count: 1,
        priority: 5,
        x_len: 2,
        y_len: 1,
        z_len: 0,
        face_index_len: 3,
        ..Default::default()
    }
}

#[test]
fn test_legacy_triangle() {
    let data = assemble(
        &[
            &[0, 1, 3],                // vertex flags
            &[1],                      // face types
            &[ss(0), ss(1), ss(1)],    // face indices
            &[0x12, 0x34],             // colours
            &[ss(10), ss(-10)],        // x
            &[ss(10)],                 // y
        ],
        &legacy_triangle_header().to_bytes(),
    );

    let model = decode_definition(&data, 42).unwrap();
    assert_eq!(model.id, 42);
    assert_eq!(model.vertex_count, 3);
    assert_eq!(model.vertices_x, vec![0, 10, 0]);
    assert_eq!(model.vertices_y, vec![0, 0, 10]);
    assert_eq!(model.vertices_z, vec![0, 0, 0]);
    assert_eq!(model.face(0), Some([0, 1, 2]));
    assert_eq!(model.face_colors, vec![0x1234]);
    assert_eq!(model.priority, Priority::Uniform(5));
    assert!(model.face_render_types.is_none());
    assert!(model.face_textures.is_none());
    assert!(model.texture_triangles.is_empty());
}

#[test]
fn test_legacy_segments_past_header() {
    let mut header = legacy_triangle_header();
    header.x_len = 400;
    let data = assemble(&[&[0, 1, 3], &[1]], &header.to_bytes());

    let err = decode_definition(&data, 1).unwrap_err();
    assert!(matches!(
        err,
        CacheError::TruncatedInput {
            stage: Stage::Model,
            ..
        }
    ));
}

#[test]
fn test_out_of_range_face_vertex_is_cleared() {
    let data = assemble(
        &[
            &[0, 1, 3],
            &[1],
            &[ss(0), ss(1), ss(40)],
            &[0, 1],
            &[ss(10), ss(-10)],
            &[ss(10)],
        ],
        &legacy_triangle_header().to_bytes(),
    );

    let model = decode_definition(&data, 1).unwrap();
    assert_eq!(model.face(0), Some([0, 1, 0]));
}

// ========================================================================
// V2 packed render types
// ========================================================================

fn v2_textured(texture_triangle: [u8; 6]) -> Vec<u8> {
    let header = V2Header {
        vertex_count: 3,
        face_count: 1,
        texture_triangles: 1,
        has_packed_render: true,
        priority: 0,
        x_len: 2,
        y_len: 1,
        z_len: 0,
        face_index_len: 3,
        vertex_skin_len: 0,
        ..Default::default()
    };
    assemble(
        &[
            &[0, 1, 3],             // vertex flags
            &[1],                   // face types
            &[0b10],                // packed: textured, coordinate 0, smooth
            &[ss(0), ss(1), ss(1)], // face indices
            &[0x00, 0x2A],          // colour doubles as texture id 42
            &texture_triangle,
            &[ss(10), ss(-10)],
            &[ss(10)],
        ],
        &header.to_bytes(),
    )
}

#[test]
fn test_v2_packed_texture_over_own_vertices() {
    let model = decode_definition(&v2_textured([0, 0, 0, 1, 0, 2]), 7).unwrap();

    assert_eq!(model.face_textures, Some(vec![42]));
    assert_eq!(model.face_colors, vec![127]);
    // Coordinate names the face's own vertices, so it carries nothing
    assert!(model.texture_coords.is_none());
    // No flat face
    assert!(model.face_render_types.is_none());
    assert_eq!(model.texture_triangles, vec![TextureTriangle::simple(0, 1, 2)]);
}

#[test]
fn test_v2_packed_texture_with_explicit_coordinate() {
    let model = decode_definition(&v2_textured([0, 2, 0, 1, 0, 0]), 7).unwrap();
    assert_eq!(model.texture_coords, Some(vec![0]));
    assert_eq!(model.face_textures, Some(vec![42]));
}

// ========================================================================
// V3
// ========================================================================

fn v3_model(trailer: &[u8]) -> Vec<u8> {
    let header = V3Header {
        vertex_count: 3,
        face_count: 1,
        texture_triangles: 2,
        has_render_types: true,
        priority: PER_FACE_PRIORITY,
        has_alphas: true,
        has_face_skins: false,
        has_textures: true,
        has_vertex_skins: true,
        has_skin_weights: true,
        x_len: 2,
        y_len: 1,
        z_len: 0,
        face_index_len: 3,
        texture_coord_len: 1,
        vertex_skin_len: 12,
    };
    assemble(
        &[
            &[0, 2],                                  // texture render types
            &[0, 1, 3],                               // vertex flags
            &[1],                                     // face render types
            &[1],                                     // face types
            &[7],                                     // priorities
            &[0, 1, 1],                               // vertex skins
            &[1, 2, 255, 0, 2, 1, 100, 2, 155],       // skin weights
            &[200],                                   // alphas
            &[ss(0), ss(1), ss(1)],                   // face indices
            &[0, 6],                                  // texture 5
            &[2],                                     // coordinate 1
            &[0, 9],                                  // colour
            &[ss(10), ss(-10)],                       // x
            &[ss(10)],                                // y
            &[0, 0, 0, 1, 0, 2],                      // simple triangle
            &[0, 2, 0, 1, 0, 0],                      // projected triangle
            &[0, 1, 0, 2, 0, 3],                      // scale
            &[0, 4],                                  // rotation
            &[0xFF],                                  // direction
            &[0, 5, 0, 6],                            // translation, primary colour
            trailer,
        ],
        &header.to_bytes(),
    )
}

#[test]
fn test_v3_full_model() {
    let model = decode_definition(&v3_model(&[0]), 99).unwrap();

    assert_eq!(model.vertices_x, vec![0, 10, 0]);
    assert_eq!(model.face_render_types, Some(vec![1]));
    assert_eq!(model.priority, Priority::PerFace(vec![7]));
    assert_eq!(model.face_alphas, Some(vec![200]));
    assert_eq!(model.face_textures, Some(vec![5]));
    assert_eq!(model.texture_coords, Some(vec![1]));
    assert_eq!(model.face_colors, vec![9]);
    assert_eq!(model.vertex_skins, Some(vec![0, 1, 1]));

    let weights = model.skin_weights.as_ref().unwrap();
    assert_eq!(weights[0].as_slice(), &[BoneWeight { bone: 2, scale: 255 }]);
    assert!(weights[1].is_empty());
    assert_eq!(weights[2].len(), 2);
    assert_eq!(weights[2][1], BoneWeight { bone: 2, scale: 155 });

    assert_eq!(model.texture_triangles[0], TextureTriangle::simple(0, 1, 2));
    let projected = model.texture_triangles[1];
    assert_eq!((projected.render_type, projected.a, projected.c), (2, 2, 0));
    assert_eq!(
        projected.projection,
        Some(TextureProjection {
            scale: [1, 2, 3],
            rotation: 4,
            direction: -1,
            translation: 5,
            primary_color: Some(6),
        })
    );
}

#[test]
fn test_v3_trailer_block_is_skipped() {
    let mut trailer = vec![1u8];
    trailer.extend_from_slice(&[0xAA; 10]);
    let with_block = decode_definition(&v3_model(&trailer), 99).unwrap();
    let without = decode_definition(&v3_model(&[0]), 99).unwrap();
    assert_eq!(with_block, without);
}

#[test]
fn test_v3_plan_order() {
    let header = V3Header {
        vertex_count: 10,
        face_count: 4,
        texture_triangles: 3,
        priority: 0,
        has_textures: true,
        face_index_len: 9,
        texture_coord_len: 2,
        vertex_skin_len: 5,
        ..Default::default()
    };
    let textures = segments::TextureCounts {
        simple: 1,
        projected: 2,
        cylindrical: 1,
    };
    let offsets = v3::plan(&header, textures).offsets();

    assert_eq!(offsets.offset(Segment::VertexFlags), 3);
    assert_eq!(offsets.offset(Segment::FaceTypes), 13);
    assert_eq!(offsets.offset(Segment::VertexSkins), 17);
    assert_eq!(offsets.offset(Segment::FaceIndices), 22);
    assert_eq!(offsets.offset(Segment::FaceTextures), 31);
    assert_eq!(offsets.offset(Segment::TextureCoords), 39);
    assert_eq!(offsets.offset(Segment::FaceColors), 41);
    assert_eq!(offsets.offset(Segment::SimpleTextures), 49);
    assert_eq!(offsets.offset(Segment::TextureTranslations), 49 + 6 + 12 + 12 + 4 + 2);
    assert_eq!(offsets.end(), 85 + 4 + 2);
}

#[test]
fn test_v1_vertex_skins_are_per_vertex() {
    let header = V1Header {
        vertex_count: 10,
        face_count: 4,
        has_vertex_skins: true,
        ..Default::default()
    };
    let offsets = v1::plan(&header, segments::TextureCounts::default()).offsets();
    assert_eq!(offsets.offset(Segment::FaceAlphas), 10 + 4 + 10);
}

#[test]
fn test_decoding_is_deterministic() {
    let data = v3_model(&[0]);
    let a = decode_definition(&data, 3).unwrap();
    let b = decode_definition(&data, 3).unwrap();
    assert!(a.geometry_eq(&b));
    assert_eq!(a, b);
}

#[test]
fn test_every_truncation_fails_cleanly() {
    let data = v3_model(&[0]);
    for cut in 0..data.len() {
        // Shorter buffers either fail or decode under another layout; they
        // never panic
        let _ = decode_definition(&data[..cut], 0);
    }
}
