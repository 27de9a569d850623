//! Skin groups

use crate::definition::ModelDefinition;

/// Bucket indices by label
///
/// Returns groups `0..=max label`, each listing the indices carrying that
/// label in ascending order. Labels that never occur get an empty group.
pub fn group_by_label(labels: &[u8]) -> Vec<Vec<usize>> {
    let max = labels.iter().copied().max().unwrap_or(0);
    let mut groups = vec![Vec::new(); usize::from(max) + 1];
    for (index, &label) in labels.iter().enumerate() {
        groups[usize::from(label)].push(index);
    }
    groups
}

/// Replace vertex and face skins with their groups
pub(crate) fn compute_skin_groups(model: &mut ModelDefinition) {
    if let Some(skins) = model.vertex_skins.take() {
        model.vertex_groups = Some(group_by_label(&skins));
    }
    if let Some(skins) = model.face_skins.take() {
        model.face_groups = Some(group_by_label(&skins));
    }
}
