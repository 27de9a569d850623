//! Per-face UV bases
//!
//! A textured face is mapped through a texture triangle: U runs along the
//! triangle's first edge and V along its second. A face without an explicit
//! texture triangle is mapped over its own vertices.

use glam::DVec3;

use crate::definition::{ModelDefinition, UvBasis};

/// U/V of a face's vertices in the frame of a texture triangle
///
/// Projects the face vertices onto frame vectors built from the triangle's
/// edges. Returns `None` for degenerate triangles.
pub fn uv_basis(texture: [DVec3; 3], face: [DVec3; 3]) -> Option<UvBasis> {
    let origin = texture[0];
    let edge_u = texture[1] - origin;
    let edge_v = texture[2] - origin;
    let corners = face.map(|p| p - origin);

    let normal = edge_u.cross(edge_v);

    let frame_u = edge_v.cross(normal);
    let scale_u = frame_u.dot(edge_u);
    let frame_v = edge_u.cross(normal);
    let scale_v = frame_v.dot(edge_v);

    let u = corners.map(|p| frame_u.dot(p) / scale_u);
    let v = corners.map(|p| frame_v.dot(p) / scale_v);

    if u.iter().chain(&v).any(|c| !c.is_finite()) {
        return None;
    }
    Some(UvBasis {
        u: u.map(|c| c as f32),
        v: v.map(|c| c as f32),
    })
}

fn position(model: &ModelDefinition, vertex: usize) -> Option<DVec3> {
    let [x, y, z] = model.vertex(vertex)?;
    Some(DVec3::new(f64::from(x), f64::from(y), f64::from(z)))
}

fn textured_basis(model: &ModelDefinition, face: usize, coord: i32) -> Option<UvBasis> {
    let triangle = model.texture_triangles.get((coord & 0xff) as usize)?;
    let [a, b, c] = model.face(face)?;
    let texture = [
        position(model, triangle.a as usize)?,
        position(model, triangle.b as usize)?,
        position(model, triangle.c as usize)?,
    ];
    let corners = [
        position(model, a as usize)?,
        position(model, b as usize)?,
        position(model, c as usize)?,
    ];
    uv_basis(texture, corners)
}

pub(crate) fn compute_uv_bases(model: &mut ModelDefinition) {
    if model.uv_bases.is_some() {
        return;
    }

    let mut bases = vec![UvBasis::IDENTITY; model.face_count];
    if let Some(textures) = model.face_textures.as_ref() {
        for (face, basis) in bases.iter_mut().enumerate() {
            if textures.get(face).is_none_or(|&t| t == -1) {
                continue;
            }
            let coord = model
                .texture_coords
                .as_ref()
                .and_then(|coords| coords.get(face).copied())
                .unwrap_or(-1);
            if coord == -1 {
                // Mapped over its own vertices
                continue;
            }

            match textured_basis(model, face, coord) {
                Some(computed) => *basis = computed,
                None => tracing::warn!(
                    "Model {}: face {} has an unusable texture triangle {}",
                    model.id,
                    face,
                    coord
                ),
            }
        }
    }

    model.uv_bases = Some(bases);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TextureTriangle;

    fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_own_vertices_reduce_to_identity() {
        let tri = [
            DVec3::new(4.0, -2.0, 7.0),
            DVec3::new(31.0, 5.0, -3.0),
            DVec3::new(-8.0, 19.0, 2.0),
        ];
        let basis = uv_basis(tri, tri).unwrap();
        assert_close(basis.u, UvBasis::IDENTITY.u);
        assert_close(basis.v, UvBasis::IDENTITY.v);
    }

    #[test]
    fn test_scaled_texture_triangle() {
        // Texture triangle twice the size of the face
        let texture = [
            DVec3::ZERO,
            DVec3::new(20.0, 0.0, 0.0),
            DVec3::new(0.0, 20.0, 0.0),
        ];
        let face = [
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(0.0, 10.0, 0.0),
        ];
        let basis = uv_basis(texture, face).unwrap();
        assert_close(basis.u, [0.0, 0.5, 0.0]);
        assert_close(basis.v, [0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_degenerate_texture_triangle() {
        let line = [DVec3::ZERO, DVec3::X, DVec3::X * 2.0];
        assert!(uv_basis(line, line).is_none());
    }

    fn textured_model() -> ModelDefinition {
        let mut model = ModelDefinition::new(1);
        model.vertex_count = 5;
        model.face_count = 3;
        model.vertices_x = vec![0, 10, 0, 20, 0];
        model.vertices_y = vec![0, 0, 10, 0, 20];
        model.vertices_z = vec![0; 5];
        model.face_a = vec![0, 0, 0];
        model.face_b = vec![1, 1, 1];
        model.face_c = vec![2, 2, 2];
        model.face_textures = Some(vec![-1, 3, 3]);
        model.texture_coords = Some(vec![-1, -1, 0]);
        model.texture_triangles = vec![TextureTriangle::simple(0, 3, 4)];
        model
    }

    #[test]
    fn test_compute_uv_bases() {
        let mut model = textured_model();
        compute_uv_bases(&mut model);

        let bases = model.uv_bases.as_ref().unwrap();
        assert_eq!(bases[0], UvBasis::IDENTITY);
        assert_eq!(bases[1], UvBasis::IDENTITY);
        assert_close(bases[2].u, [0.0, 0.5, 0.0]);
        assert_close(bases[2].v, [0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_bad_triangle_keeps_default() {
        let mut model = textured_model();
        model.texture_triangles = vec![TextureTriangle::simple(0, 3, 40)];
        compute_uv_bases(&mut model);
        assert_eq!(model.uv_bases.unwrap()[2], UvBasis::IDENTITY);
    }

    #[test]
    fn test_untextured_model() {
        let mut model = textured_model();
        model.face_textures = None;
        compute_uv_bases(&mut model);
        assert_eq!(model.uv_bases, Some(vec![UvBasis::IDENTITY; 3]));
    }
}
