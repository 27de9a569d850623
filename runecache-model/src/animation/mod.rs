//! Animation
//!
//! Two ways to move a model's vertices:
//!
//! - group/pivot frames, which transform whole skin groups about a pivot
//!   in integer fixed-point
//! - skeleton matrices, which blend bone poses per vertex by skin weight
//!
//! [`animate_sequence`] picks the path a sequence asks for. Neither path
//! modifies the model; both return fresh positions per frame.

mod frame;
mod group;
mod sequence;
mod skeleton;
pub mod trig;

pub use frame::{FrameDefinition, FrameMap};
pub use group::{
    FrameTransform, Pivot, TransformKind, apply_frame, apply_group_animation, apply_transform,
};
pub use sequence::{
    AnimationData, AnimationSource, SequenceDefinition, SkeletalSequence, animate_sequence,
};
pub use skeleton::{BonePoses, apply_skeleton_animation};
