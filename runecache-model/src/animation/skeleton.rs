//! Skeleton-matrix animation

use glam::{Mat4, Vec4};
use tracing::debug;

use crate::definition::ModelDefinition;

/// Per-frame bone pose matrices
///
/// Pose evaluation (keyframe curves, bone hierarchy) lives outside this
/// crate; the applier only needs the resulting matrix.
pub trait BonePoses {
    /// Pose of `bone` at `frame`, `None` when the skeleton has no such bone
    fn pose(&self, frame: u32, bone: u8) -> Option<Mat4>;
}

impl<F> BonePoses for F
where
    F: Fn(u32, u8) -> Option<Mat4>,
{
    fn pose(&self, frame: u32, bone: u8) -> Option<Mat4> {
        self(frame, bone)
    }
}

/// Positions of bound vertices for frames `0..end_frame`
///
/// Each bound vertex is transformed by the weighted sum of its bones'
/// poses, each pose scaled by `weight / 255`. Unbound vertices are left out
/// of the frame, so a model without skin weights yields no frames.
pub fn apply_skeleton_animation(
    model: &ModelDefinition,
    poses: &dyn BonePoses,
    end_frame: u32,
) -> Vec<Vec<[f32; 3]>> {
    let Some(weights) = model.skin_weights.as_deref() else {
        debug!(model = model.id, "No skin weights, skipping skeleton animation");
        return Vec::new();
    };

    (0..end_frame)
        .map(|frame| {
            weights
                .iter()
                .enumerate()
                .filter(|(_, bones)| !bones.is_empty())
                .filter_map(|(vertex, bones)| {
                    let [x, y, z] = model.vertex(vertex)?;
                    let matrix = bones
                        .iter()
                        .filter_map(|w| {
                            let pose = poses.pose(frame, w.bone)?;
                            Some(pose * (f32::from(w.scale) / 255.0))
                        })
                        .fold(Mat4::ZERO, |acc, m| acc + m);
                    let position = Vec4::new(x as f32, -(y as f32), z as f32, 1.0);
                    Some(matrix.mul_vec4(position).truncate().to_array())
                })
                .collect()
        })
        .collect()
}
