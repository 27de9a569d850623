//! Frames and frame maps
//!
//! A frame map lists transform slots: each slot has a type code and the skin
//! groups it drives. A frame picks a subset of slots and supplies the
//! `(dx, dy, dz)` for each.

use tracing::warn;

use super::group::{FrameTransform, TransformKind};

/// Transform slots shared by a set of frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameMap {
    pub id: u32,
    /// Type code per slot
    pub types: Vec<u8>,
    /// Skin groups per slot
    pub groups: Vec<Vec<usize>>,
}

impl FrameMap {
    pub fn slot_count(&self) -> usize {
        self.types.len()
    }
}

/// One animation frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameDefinition {
    pub id: u32,
    /// Frame map the slots index into
    pub map_id: u32,
    pub transform_slots: Vec<usize>,
    pub dx: Vec<i32>,
    pub dy: Vec<i32>,
    pub dz: Vec<i32>,
}

impl FrameDefinition {
    /// Ordered transform list of this frame
    ///
    /// Slots missing from `map`, or without a delta, are skipped with a
    /// warning.
    pub fn transforms(&self, map: &FrameMap) -> Vec<FrameTransform> {
        self.transform_slots
            .iter()
            .enumerate()
            .filter_map(|(i, &slot)| {
                let (Some(&code), Some(groups)) = (map.types.get(slot), map.groups.get(slot))
                else {
                    warn!(
                        frame = self.id,
                        map = map.id,
                        slot,
                        "Frame references a slot missing from its frame map"
                    );
                    return None;
                };
                let (Some(&dx), Some(&dy), Some(&dz)) =
                    (self.dx.get(i), self.dy.get(i), self.dz.get(i))
                else {
                    warn!(frame = self.id, slot, "Frame slot has no delta");
                    return None;
                };
                Some(FrameTransform {
                    kind: TransformKind::from(code),
                    groups: groups.clone(),
                    dx,
                    dy,
                    dz,
                })
            })
            .collect()
    }
}
