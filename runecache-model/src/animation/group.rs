//! Group/pivot animation
//!
//! A frame is an ordered list of transforms, each applied to every vertex
//! in a set of skin groups. Rotation and scaling happen about a pivot that
//! an origin transform sets; the pivot starts at zero for every frame and
//! is threaded through the transforms by value.

use super::trig;
use crate::definition::ModelDefinition;

/// Transform type codes as stored in frame maps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// 0: set the pivot
    Origin,
    /// 1: move by (dx, dy, dz)
    Translate,
    /// 2: rotate about the pivot
    Rotate,
    /// 3: scale about the pivot, 128 = 1.0
    Scale,
    /// 5: face transparency, no effect on positions
    Alpha,
    Other(u8),
}

impl From<u8> for TransformKind {
    fn from(code: u8) -> Self {
        match code {
            0 => TransformKind::Origin,
            1 => TransformKind::Translate,
            2 => TransformKind::Rotate,
            3 => TransformKind::Scale,
            5 => TransformKind::Alpha,
            other => TransformKind::Other(other),
        }
    }
}

/// One step of a frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTransform {
    pub kind: TransformKind,
    /// Skin groups the transform applies to
    pub groups: Vec<usize>,
    pub dx: i32,
    pub dy: i32,
    pub dz: i32,
}

/// Rotation and scaling origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pivot {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Vertices of `groups`, skipping groups the model does not have
fn members<'a>(
    vertex_groups: &'a [Vec<usize>],
    groups: &'a [usize],
) -> impl Iterator<Item = usize> + 'a {
    groups
        .iter()
        .filter_map(|&g| vertex_groups.get(g))
        .flatten()
        .copied()
}

/// Apply one transform to `positions`, returning the pivot for the next one
pub fn apply_transform(
    vertex_groups: &[Vec<usize>],
    positions: &mut [[i32; 3]],
    transform: &FrameTransform,
    pivot: Pivot,
) -> Pivot {
    let FrameTransform { dx, dy, dz, .. } = *transform;

    match transform.kind {
        TransformKind::Origin => {
            let mut sum = [0i64; 3];
            let mut count = 0i64;
            for vertex in members(vertex_groups, &transform.groups) {
                if let Some(p) = positions.get(vertex) {
                    for (s, &c) in sum.iter_mut().zip(p) {
                        *s += i64::from(c);
                    }
                    count += 1;
                }
            }
            if count > 0 {
                Pivot {
                    x: dx + (sum[0] / count) as i32,
                    y: dy + (sum[1] / count) as i32,
                    z: dz + (sum[2] / count) as i32,
                }
            } else {
                Pivot { x: dx, y: dy, z: dz }
            }
        }
        TransformKind::Translate => {
            for vertex in members(vertex_groups, &transform.groups) {
                if let Some(p) = positions.get_mut(vertex) {
                    p[0] += dx;
                    p[1] += dy;
                    p[2] += dz;
                }
            }
            pivot
        }
        TransformKind::Rotate => {
            let t = trig::tables();
            // Angles in table steps: 8 per encoded unit
            let rx = ((dx & 255) * 8) as usize;
            let ry = ((dy & 255) * 8) as usize;
            let rz = ((dz & 255) * 8) as usize;

            for vertex in members(vertex_groups, &transform.groups) {
                let Some(p) = positions.get_mut(vertex) else {
                    continue;
                };
                let mut x = i64::from(p[0] - pivot.x);
                let mut y = i64::from(p[1] - pivot.y);
                let mut z = i64::from(p[2] - pivot.z);

                if rz != 0 {
                    let (s, c) = (i64::from(t.sine[rz]), i64::from(t.cosine[rz]));
                    let nx = (s * y + c * x) >> 16;
                    y = (c * y - s * x) >> 16;
                    x = nx;
                }
                if rx != 0 {
                    let (s, c) = (i64::from(t.sine[rx]), i64::from(t.cosine[rx]));
                    let ny = (c * y - s * z) >> 16;
                    z = (s * y + c * z) >> 16;
                    y = ny;
                }
                if ry != 0 {
                    let (s, c) = (i64::from(t.sine[ry]), i64::from(t.cosine[ry]));
                    let nx = (s * z + c * x) >> 16;
                    z = (c * z - s * x) >> 16;
                    x = nx;
                }

                p[0] = x as i32 + pivot.x;
                p[1] = y as i32 + pivot.y;
                p[2] = z as i32 + pivot.z;
            }
            pivot
        }
        TransformKind::Scale => {
            for vertex in members(vertex_groups, &transform.groups) {
                if let Some(p) = positions.get_mut(vertex) {
                    p[0] = (i64::from(dx) * i64::from(p[0] - pivot.x) / 128) as i32 + pivot.x;
                    p[1] = (i64::from(dy) * i64::from(p[1] - pivot.y) / 128) as i32 + pivot.y;
                    p[2] = (i64::from(dz) * i64::from(p[2] - pivot.z) / 128) as i32 + pivot.z;
                }
            }
            pivot
        }
        TransformKind::Alpha | TransformKind::Other(_) => pivot,
    }
}

/// Positions of every vertex after one frame, with Y and Z flipped
pub fn apply_frame(model: &ModelDefinition, transforms: &[FrameTransform]) -> Vec<[i32; 3]> {
    let vertex_groups = model.vertex_groups.as_deref().unwrap_or_default();
    let mut positions: Vec<[i32; 3]> = (0..model.vertex_count)
        .filter_map(|v| model.vertex(v))
        .collect();

    transforms.iter().fold(Pivot::default(), |pivot, transform| {
        apply_transform(vertex_groups, &mut positions, transform, pivot)
    });

    positions.into_iter().map(|[x, y, z]| [x, -y, -z]).collect()
}

/// Run each frame against the model's base positions
///
/// The model itself is not modified.
pub fn apply_group_animation(
    model: &ModelDefinition,
    frames: &[Vec<FrameTransform>],
) -> Vec<Vec<[i32; 3]>> {
    frames
        .iter()
        .map(|transforms| apply_frame(model, transforms))
        .collect()
}
