//! runecache-model: model definitions, derived geometry and animation
//!
//! Model files come in four layouts. Each stores its attributes as a run of
//! segments followed by a fixed-size header at the end of the buffer; the
//! last two bytes tell the layouts apart.
//!
//! # Usage
//!
//! ```ignore
//! use runecache_model::{ModelDecodeConfig, decode_model, decode_model_with};
//!
//! let model = decode_model(&bytes, 4151)?;
//! println!("{} vertices, {} faces", model.vertex_count, model.face_count);
//!
//! // Geometry only
//! let raw = decode_model_with(&bytes, 4151, &ModelDecodeConfig::raw())?;
//! ```

pub mod animation;
mod config;
mod definition;
pub mod format;
pub mod postprocess;

pub use animation::{
    AnimationData, AnimationSource, BonePoses, FrameDefinition, FrameMap, FrameTransform,
    SequenceDefinition, SkeletalSequence, TransformKind, animate_sequence,
    apply_group_animation, apply_skeleton_animation,
};
pub use config::{ConfigError, ModelDecodeConfig};
pub use definition::{
    BoneWeight, BoneWeights, FaceNormal, ModelDefinition, Priority, TextureProjection,
    TextureTriangle, UvBasis, VertexNormal,
};
pub use format::{ModelFormat, decode_definition};
pub use runecache_shared::{CacheError, CacheResult, Stage};

/// Decode a model and build all derived data
pub fn decode_model(data: &[u8], id: u32) -> CacheResult<ModelDefinition> {
    decode_model_with(data, id, &ModelDecodeConfig::default())
}

/// Decode a model and build the derived data `config` selects
pub fn decode_model_with(
    data: &[u8],
    id: u32,
    config: &ModelDecodeConfig,
) -> CacheResult<ModelDefinition> {
    let mut model = decode_definition(data, id)?;
    model.post_process_with(config);
    Ok(model)
}
