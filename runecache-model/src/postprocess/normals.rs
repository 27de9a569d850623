//! Fixed-point normals
//!
//! Normals use 256 as unit length. Smooth faces (render type 0) add their
//! normal into each of their vertices; flat faces (render type 1) keep
//! their own.

use crate::definition::{FaceNormal, ModelDefinition, VertexNormal};

/// Largest cross product component kept before normalising
const CROSS_LIMIT: i64 = 8192;

/// Unit length
const NORMAL_SCALE: i64 = 256;

/// Normal of triangle `a b c`, scaled to length 256
///
/// Degenerate triangles produce a zero vector.
pub fn face_normal(a: [i32; 3], b: [i32; 3], c: [i32; 3]) -> FaceNormal {
    let [ax, ay, az] = a.map(i64::from);
    let (ux, uy, uz) = (i64::from(b[0]) - ax, i64::from(b[1]) - ay, i64::from(b[2]) - az);
    let (vx, vy, vz) = (i64::from(c[0]) - ax, i64::from(c[1]) - ay, i64::from(c[2]) - az);

    let mut x = uy * vz - vy * uz;
    let mut y = uz * vx - vz * ux;
    let mut z = ux * vy - vx * uy;

    while x.abs() > CROSS_LIMIT || y.abs() > CROSS_LIMIT || z.abs() > CROSS_LIMIT {
        x >>= 1;
        y >>= 1;
        z >>= 1;
    }

    // floor(sqrt), not round
    let length = (((x * x + y * y + z * z) as f64).sqrt() as i64).max(1);

    FaceNormal {
        x: (x * NORMAL_SCALE / length) as i32,
        y: (y * NORMAL_SCALE / length) as i32,
        z: (z * NORMAL_SCALE / length) as i32,
    }
}

pub(crate) fn compute_normals(model: &mut ModelDefinition) {
    if model.vertex_normals.is_some() {
        return;
    }

    let mut vertex_normals = vec![VertexNormal::default(); model.vertex_count];
    let mut face_normals = vec![None; model.face_count];

    for face in 0..model.face_count {
        let Some([a, b, c]) = model.face(face) else {
            continue;
        };
        let corners = (
            model.vertex(a as usize),
            model.vertex(b as usize),
            model.vertex(c as usize),
        );
        let (Some(pa), Some(pb), Some(pc)) = corners else {
            tracing::warn!(
                "Model {}: face {} references a missing vertex, no normal",
                model.id,
                face
            );
            continue;
        };
        let normal = face_normal(pa, pb, pc);

        let render_type = model
            .face_render_types
            .as_ref()
            .and_then(|types| types.get(face).copied())
            .unwrap_or(0);
        match render_type {
            0 => {
                for vertex in [a, b, c] {
                    let n = &mut vertex_normals[vertex as usize];
                    n.x += normal.x;
                    n.y += normal.y;
                    n.z += normal.z;
                    n.magnitude += 1;
                }
            }
            1 => face_normals[face] = Some(normal),
            _ => {}
        }
    }

    model.vertex_normals = Some(vertex_normals);
    model.face_normals = Some(face_normals);
}
