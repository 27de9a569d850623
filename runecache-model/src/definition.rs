//! Decoded model definition
//!
//! Vertex arrays are indexed `0..vertex_count`, face arrays `0..face_count`.
//! Optional attributes are `None` when the source layout did not carry
//! them. Derived data (groups, normals, UV bases) stays `None` until
//! post-processing builds it.

use smallvec::SmallVec;

/// Render priority for all faces of a model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Priority {
    /// One priority shared by every face
    Uniform(u8),
    /// One priority per face
    PerFace(Vec<u8>),
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Uniform(0)
    }
}

impl Priority {
    /// Priority of face `face`
    pub fn face(&self, face: usize) -> u8 {
        match self {
            Priority::Uniform(p) => *p,
            Priority::PerFace(list) => list.get(face).copied().unwrap_or(0),
        }
    }

    fn expanded(&self, face_count: usize) -> Vec<u8> {
        match self {
            Priority::Uniform(p) => vec![*p; face_count],
            Priority::PerFace(list) => list.clone(),
        }
    }
}

/// Extra mapping data carried by projected texture triangles (types 1-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureProjection {
    pub scale: [u16; 3],
    pub rotation: u16,
    pub direction: i8,
    pub translation: u16,
    /// Only present on cylindrical triangles (type 2)
    pub primary_color: Option<u16>,
}

/// Texture-space triangle referenced by a face's texture coordinate index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureTriangle {
    pub render_type: u8,
    /// Vertex indices
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub projection: Option<TextureProjection>,
}

impl TextureTriangle {
    pub fn simple(a: u32, b: u32, c: u32) -> Self {
        Self {
            render_type: 0,
            a,
            b,
            c,
            projection: None,
        }
    }
}

/// One skeleton binding of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneWeight {
    pub bone: u8,
    /// Weight out of 255
    pub scale: u8,
}

/// Bone bindings of one vertex; almost always a handful
pub type BoneWeights = SmallVec<[BoneWeight; 4]>;

/// Accumulated vertex normal, fixed point with 256 = 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexNormal {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Number of contributions, including the initial (0, 0, 1)
    pub magnitude: u32,
}

impl Default for VertexNormal {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            z: 1,
            magnitude: 1,
        }
    }
}

/// Flat-shaded face normal, fixed point with 256 = 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceNormal {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Texture U/V of a face's three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvBasis {
    pub u: [f32; 3],
    pub v: [f32; 3],
}

impl UvBasis {
    /// Basis of a face textured over its own vertices
    pub const IDENTITY: Self = Self {
        u: [0.0, 1.0, 0.0],
        v: [0.0, 0.0, 1.0],
    };
}

impl Default for UvBasis {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelDefinition {
    pub id: u32,
    pub vertex_count: usize,
    pub face_count: usize,

    pub vertices_x: Vec<i32>,
    pub vertices_y: Vec<i32>,
    pub vertices_z: Vec<i32>,

    pub face_a: Vec<u32>,
    pub face_b: Vec<u32>,
    pub face_c: Vec<u32>,
    pub face_colors: Vec<u16>,

    /// 0 smooth, 1 flat
    pub face_render_types: Option<Vec<u8>>,
    pub priority: Priority,
    pub face_alphas: Option<Vec<u8>>,
    /// Texture id per face, -1 for none
    pub face_textures: Option<Vec<i32>>,
    /// Texture triangle index per face, -1 for none
    pub texture_coords: Option<Vec<i32>>,
    pub vertex_skins: Option<Vec<u8>>,
    pub face_skins: Option<Vec<u8>>,

    pub texture_triangles: Vec<TextureTriangle>,
    pub skin_weights: Option<Vec<BoneWeights>>,

    pub vertex_groups: Option<Vec<Vec<usize>>>,
    pub face_groups: Option<Vec<Vec<usize>>>,
    pub vertex_normals: Option<Vec<VertexNormal>>,
    pub face_normals: Option<Vec<Option<FaceNormal>>>,
    pub uv_bases: Option<Vec<UvBasis>>,
}

impl ModelDefinition {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Position of vertex `index`
    pub fn vertex(&self, index: usize) -> Option<[i32; 3]> {
        Some([
            *self.vertices_x.get(index)?,
            *self.vertices_y.get(index)?,
            *self.vertices_z.get(index)?,
        ])
    }

    /// Vertex indices of face `index`
    pub fn face(&self, index: usize) -> Option<[u32; 3]> {
        Some([
            *self.face_a.get(index)?,
            *self.face_b.get(index)?,
            *self.face_c.get(index)?,
        ])
    }

    pub fn texture_triangle_count(&self) -> usize {
        self.texture_triangles.len()
    }

    /// Same counts, vertex positions and face colours
    pub fn geometry_eq(&self, other: &ModelDefinition) -> bool {
        self.vertex_count == other.vertex_count
            && self.face_count == other.face_count
            && self.vertices_x == other.vertices_x
            && self.vertices_y == other.vertices_y
            && self.vertices_z == other.vertices_z
            && self.face_colors == other.face_colors
    }

    /// Append `other` to this model
    ///
    /// Face, texture triangle and group indices coming from `other` are
    /// shifted past this model's existing vertices, faces and triangles.
    pub fn merge_with(&mut self, other: &ModelDefinition) {
        let vertex_offset = self.vertex_count;
        let face_offset = self.face_count;
        let triangle_offset = self.texture_triangles.len();
        let vertex_shift = vertex_offset as u32;

        self.vertices_x.extend_from_slice(&other.vertices_x);
        self.vertices_y.extend_from_slice(&other.vertices_y);
        self.vertices_z.extend_from_slice(&other.vertices_z);

        self.face_a.extend(other.face_a.iter().map(|&v| v + vertex_shift));
        self.face_b.extend(other.face_b.iter().map(|&v| v + vertex_shift));
        self.face_c.extend(other.face_c.iter().map(|&v| v + vertex_shift));
        self.face_colors.extend_from_slice(&other.face_colors);

        self.priority = match (&self.priority, &other.priority) {
            (Priority::Uniform(a), Priority::Uniform(b)) if a == b => Priority::Uniform(*a),
            (mine, theirs) => {
                let mut list = mine.expanded(face_offset);
                list.extend(theirs.expanded(other.face_count));
                Priority::PerFace(list)
            }
        };

        merge_attribute(
            &mut self.face_render_types,
            face_offset,
            other.face_render_types.as_deref(),
            other.face_count,
            0,
        );
        merge_attribute(
            &mut self.face_alphas,
            face_offset,
            other.face_alphas.as_deref(),
            other.face_count,
            0,
        );
        merge_attribute(
            &mut self.face_textures,
            face_offset,
            other.face_textures.as_deref(),
            other.face_count,
            -1,
        );
        let shifted_coords: Option<Vec<i32>> = other.texture_coords.as_ref().map(|coords| {
            coords
                .iter()
                .map(|&c| if c < 0 { c } else { c + triangle_offset as i32 })
                .collect()
        });
        merge_attribute(
            &mut self.texture_coords,
            face_offset,
            shifted_coords.as_deref(),
            other.face_count,
            -1,
        );
        merge_attribute(
            &mut self.vertex_skins,
            vertex_offset,
            other.vertex_skins.as_deref(),
            other.vertex_count,
            0,
        );
        merge_attribute(
            &mut self.face_skins,
            face_offset,
            other.face_skins.as_deref(),
            other.face_count,
            0,
        );

        let root: BoneWeights = SmallVec::from_slice(&[BoneWeight { bone: 0, scale: 255 }]);
        merge_attribute(
            &mut self.skin_weights,
            vertex_offset,
            other.skin_weights.as_deref(),
            other.vertex_count,
            root,
        );

        self.texture_triangles
            .extend(other.texture_triangles.iter().map(|t| TextureTriangle {
                a: t.a + vertex_shift,
                b: t.b + vertex_shift,
                c: t.c + vertex_shift,
                ..*t
            }));

        merge_groups(&mut self.vertex_groups, other.vertex_groups.as_deref(), vertex_offset);
        merge_groups(&mut self.face_groups, other.face_groups.as_deref(), face_offset);

        merge_derived(&mut self.vertex_normals, other.vertex_normals.as_deref());
        merge_derived(&mut self.face_normals, other.face_normals.as_deref());
        merge_derived(&mut self.uv_bases, other.uv_bases.as_deref());

        self.vertex_count += other.vertex_count;
        self.face_count += other.face_count;
    }
}

/// Concatenate an optional attribute, filling whichever side lacks it
fn merge_attribute<T: Clone>(
    mine: &mut Option<Vec<T>>,
    my_len: usize,
    theirs: Option<&[T]>,
    their_len: usize,
    default: T,
) {
    match (mine.as_mut(), theirs) {
        (None, None) => {}
        (Some(list), Some(other)) => list.extend_from_slice(other),
        (Some(list), None) => list.extend(std::iter::repeat_n(default, their_len)),
        (None, Some(other)) => {
            let mut list = vec![default; my_len];
            list.extend_from_slice(other);
            *mine = Some(list);
        }
    }
}

/// Group-wise union; `theirs` members are shifted by `offset`
fn merge_groups(mine: &mut Option<Vec<Vec<usize>>>, theirs: Option<&[Vec<usize>]>, offset: usize) {
    let Some(theirs) = theirs else {
        return;
    };
    let groups = mine.get_or_insert_with(Vec::new);
    if groups.len() < theirs.len() {
        groups.resize_with(theirs.len(), Vec::new);
    }
    for (group, members) in groups.iter_mut().zip(theirs) {
        group.extend(members.iter().map(|&m| m + offset));
    }
}

/// Derived arrays survive a merge only when both sides carry them
fn merge_derived<T: Clone>(mine: &mut Option<Vec<T>>, theirs: Option<&[T]>) {
    match (mine.as_mut(), theirs) {
        (Some(list), Some(other)) => list.extend_from_slice(other),
        _ => *mine = None,
    }
}
