//! Sequence dispatch
//!
//! A sequence either names a skeleton animation (matrix path) or lists
//! frame ids with display lengths (group/pivot path).

use tracing::{debug, warn};

use super::frame::{FrameDefinition, FrameMap};
use super::group::apply_group_animation;
use super::skeleton::{BonePoses, apply_skeleton_animation};
use crate::definition::ModelDefinition;

/// Skeleton animation settings of a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletalSequence {
    /// Frames `0..end_frame` are evaluated
    pub end_frame: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceDefinition {
    pub id: u32,
    pub frame_ids: Vec<u32>,
    /// Display length of each frame, in client ticks
    pub frame_lengths: Vec<u32>,
    pub skeletal: Option<SkeletalSequence>,
}

/// Frames, frame maps and skeletons a sequence refers to
///
/// Implemented by whatever loads those definitions from the cache.
pub trait AnimationSource {
    fn frame(&self, id: u32) -> Option<&FrameDefinition>;
    fn frame_map(&self, id: u32) -> Option<&FrameMap>;
    /// Bone poses driving a skeletal sequence
    fn skeleton(&self, sequence: &SequenceDefinition) -> Option<&dyn BonePoses>;
}

/// Animated vertex positions of one sequence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationData {
    pub frames: Vec<Vec<[f32; 3]>>,
    /// Display length per frame
    pub lengths: Vec<u32>,
}

/// Animate `model` with `sequence`
pub fn animate_sequence(
    model: &ModelDefinition,
    sequence: &SequenceDefinition,
    source: &dyn AnimationSource,
) -> AnimationData {
    if let Some(skeletal) = sequence.skeletal {
        let Some(poses) = source.skeleton(sequence) else {
            warn!(sequence = sequence.id, "Skeletal sequence without a skeleton");
            return AnimationData::default();
        };
        let frames = apply_skeleton_animation(model, poses, skeletal.end_frame);
        let lengths = vec![1; frames.len()];
        debug!(sequence = sequence.id, frames = frames.len(), "Skeletal sequence applied");
        return AnimationData { frames, lengths };
    }

    let mut transforms = Vec::with_capacity(sequence.frame_ids.len());
    let mut lengths = Vec::with_capacity(sequence.frame_ids.len());
    for (i, &frame_id) in sequence.frame_ids.iter().enumerate() {
        let Some(frame) = source.frame(frame_id) else {
            warn!(sequence = sequence.id, frame = frame_id, "Missing animation frame");
            continue;
        };
        let Some(map) = source.frame_map(frame.map_id) else {
            warn!(
                sequence = sequence.id,
                frame = frame_id,
                map = frame.map_id,
                "Missing frame map"
            );
            continue;
        };
        transforms.push(frame.transforms(map));
        lengths.push(sequence.frame_lengths.get(i).copied().unwrap_or(1));
    }

    let frames = apply_group_animation(model, &transforms)
        .into_iter()
        .map(|positions| {
            positions
                .into_iter()
                .map(|[x, y, z]| [x as f32, y as f32, z as f32])
                .collect()
        })
        .collect();

    AnimationData { frames, lengths }
}
