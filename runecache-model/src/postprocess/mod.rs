//! Derived geometry
//!
//! Runs after decoding, in a fixed order: normals, UV bases, skin groups.
//! Every step leaves existing results alone, so post-processing twice is
//! the same as once.

mod groups;
mod normals;
mod uv;

pub use groups::group_by_label;
pub use normals::face_normal;
pub use uv::uv_basis;

use crate::config::ModelDecodeConfig;
use crate::definition::ModelDefinition;

impl ModelDefinition {
    /// Build all derived data
    pub fn post_process(&mut self) {
        self.post_process_with(&ModelDecodeConfig::default());
    }

    /// Build the derived data selected by `config`
    pub fn post_process_with(&mut self, config: &ModelDecodeConfig) {
        if config.compute_normals {
            normals::compute_normals(self);
        }
        if config.compute_texture_coordinates {
            uv::compute_uv_bases(self);
        }
        if config.compute_skin_groups {
            groups::compute_skin_groups(self);
        }
    }
}
