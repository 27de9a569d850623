//! Model byte writers shared by the integration tests
#![allow(dead_code)]

use runecache_model::format::{LegacyHeader, V3Header};

/// Mesh to encode
#[derive(Debug, Clone, Default)]
pub struct MeshFixture {
    pub vertices: Vec<[i32; 3]>,
    pub faces: Vec<[u16; 3]>,
    pub colors: Vec<u16>,
    /// Render type per face; V3 only
    pub render_types: Option<Vec<u8>>,
    pub vertex_skins: Option<Vec<u8>>,
    /// `(bone, scale)` lists per vertex; V3 only
    pub weights: Option<Vec<Vec<(u8, u8)>>>,
}

impl MeshFixture {
    /// Unit-ish tetrahedron, colours 10, 20, 30, 40
    pub fn tetrahedron() -> Self {
        Self {
            vertices: vec![[0, 0, 0], [100, 0, 0], [0, 100, 0], [0, 0, 100]],
            faces: vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
            colors: vec![10, 20, 30, 40],
            ..Default::default()
        }
    }
}

pub fn short_smart(out: &mut Vec<u8>, delta: i32) {
    if (-64..64).contains(&delta) {
        out.push((delta + 64) as u8);
    } else {
        out.extend_from_slice(&((delta + 0xC000) as u16).to_be_bytes());
    }
}

struct Segments {
    flags: Vec<u8>,
    xs: Vec<u8>,
    ys: Vec<u8>,
    zs: Vec<u8>,
    face_types: Vec<u8>,
    face_indices: Vec<u8>,
    colors: Vec<u8>,
}

fn segments(mesh: &MeshFixture) -> Segments {
    let mut s = Segments {
        flags: Vec::new(),
        xs: Vec::new(),
        ys: Vec::new(),
        zs: Vec::new(),
        face_types: Vec::new(),
        face_indices: Vec::new(),
        colors: Vec::new(),
    };

    let mut last = [0i32; 3];
    for v in &mesh.vertices {
        let mut flag = 0u8;
        for (axis, out) in [&mut s.xs, &mut s.ys, &mut s.zs].into_iter().enumerate() {
            let delta = v[axis] - last[axis];
            if delta != 0 {
                flag |= 1 << axis;
                short_smart(out, delta);
            }
        }
        s.flags.push(flag);
        last = *v;
    }

    let mut previous = 0i32;
    for &[a, b, c] in &mesh.faces {
        let (a, b, c) = (i32::from(a), i32::from(b), i32::from(c));
        s.face_types.push(1);
        short_smart(&mut s.face_indices, a - previous);
        short_smart(&mut s.face_indices, b - a);
        short_smart(&mut s.face_indices, c - b);
        previous = c;
    }

    for color in &mesh.colors {
        s.colors.extend_from_slice(&color.to_be_bytes());
    }
    s
}

/// Encode in the original unmarked layout
pub fn encode_legacy(mesh: &MeshFixture, priority: u8) -> Vec<u8> {
    let s = segments(mesh);
    let header = LegacyHeader {
        vertex_count: mesh.vertices.len() as u16,
        face_count: mesh.faces.len() as u16,
        priority,
        has_vertex_skins: mesh.vertex_skins.is_some(),
        x_len: s.xs.len() as u16,
        y_len: s.ys.len() as u16,
        z_len: s.zs.len() as u16,
        face_index_len: s.face_indices.len() as u16,
        ..Default::default()
    };

    let mut data = Vec::new();
    data.extend(&s.flags);
    data.extend(&s.face_types);
    if let Some(skins) = &mesh.vertex_skins {
        data.extend(skins);
    }
    data.extend(&s.face_indices);
    data.extend(&s.colors);
    data.extend(&s.xs);
    data.extend(&s.ys);
    data.extend(&s.zs);
    data.extend(header.to_bytes());
    data
}

/// Encode in the newest (`ff fd`) layout, without textures
pub fn encode_v3(mesh: &MeshFixture) -> Vec<u8> {
    let s = segments(mesh);

    let mut skin_block = Vec::new();
    if let Some(skins) = &mesh.vertex_skins {
        skin_block.extend(skins);
    }
    if let Some(weights) = &mesh.weights {
        for list in weights {
            skin_block.push(list.len() as u8);
            for &(bone, scale) in list {
                skin_block.extend([bone, scale]);
            }
        }
    }

    let header = V3Header {
        vertex_count: mesh.vertices.len() as u16,
        face_count: mesh.faces.len() as u16,
        has_render_types: mesh.render_types.is_some(),
        has_vertex_skins: mesh.vertex_skins.is_some(),
        has_skin_weights: mesh.weights.is_some(),
        x_len: s.xs.len() as u16,
        y_len: s.ys.len() as u16,
        z_len: s.zs.len() as u16,
        face_index_len: s.face_indices.len() as u16,
        vertex_skin_len: skin_block.len() as u16,
        ..Default::default()
    };

    let mut data = Vec::new();
    data.extend(&s.flags);
    if let Some(types) = &mesh.render_types {
        data.extend(types);
    }
    data.extend(&s.face_types);
    data.extend(&skin_block);
    data.extend(&s.face_indices);
    data.extend(&s.colors);
    data.extend(&s.xs);
    data.extend(&s.ys);
    data.extend(&s.zs);
    // No trailer block
    data.push(0);
    data.extend(header.to_bytes());
    data
}
