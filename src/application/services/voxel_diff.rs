use std::collections::HashMap;

use crate::domain::{DiffMetrics, Rgb, Voxel, VoxelSet, VoxelStatus};

pub const IMPACT_COLOR: Rgb = Rgb::new(0xff, 0x33, 0x33);
pub const DEBRIS_COLOR: Rgb = Rgb::new(0xff, 0x9d, 0x00);

/// One decimal place per axis.
const QUANTIZATION_SCALE: f64 = 10.0;

pub type SpatialKey = [i64; 3];

/// Quantizes a position to one decimal place, rounding half to even.
pub fn spatial_key(position: &[f64; 3]) -> SpatialKey {
    position.map(|coord| (coord * QUANTIZATION_SCALE).round_ties_even() as i64)
}

/// Voxels keyed by quantized position. The last voxel wins a key, while
/// iteration follows the order in which keys were first seen.
struct SpatialIndex<'a> {
    order: Vec<SpatialKey>,
    by_key: HashMap<SpatialKey, &'a Voxel>,
}

impl<'a> SpatialIndex<'a> {
    fn build(voxels: &'a [Voxel]) -> Self {
        let mut order = Vec::with_capacity(voxels.len());
        let mut by_key = HashMap::with_capacity(voxels.len());
        for voxel in voxels {
            let key = spatial_key(&voxel.position);
            if by_key.insert(key, voxel).is_none() {
                order.push(key);
            }
        }
        Self { order, by_key }
    }

    fn contains(&self, key: &SpatialKey) -> bool {
        self.by_key.contains_key(key)
    }

    fn iter(&self) -> impl Iterator<Item = (&SpatialKey, &'a Voxel)> + '_ {
        self.order
            .iter()
            .filter_map(|key| self.by_key.get(key).map(|voxel| (key, *voxel)))
    }
}

/// Classifies every voxel of `baseline` and `damaged` as matching, lost or added.
///
/// Neither input is modified. If either set is empty the result is empty with
/// zeroed metrics.
pub fn compare_voxel_sets(baseline: &VoxelSet, damaged: &VoxelSet) -> VoxelSet {
    let kind = baseline.kind();
    if baseline.is_empty() || damaged.is_empty() {
        return VoxelSet::comparison(kind, Vec::new(), DiffMetrics::default());
    }

    let baseline_index = SpatialIndex::build(baseline.voxels());
    let damage_index = SpatialIndex::build(damaged.voxels());

    let mut metrics = DiffMetrics::default();
    let mut voxels = Vec::with_capacity(baseline_index.order.len() + damage_index.order.len());

    for (key, voxel) in baseline_index.iter() {
        if damage_index.contains(key) {
            metrics.matching += 1;
            voxels.push(Voxel::classified(
                voxel.position,
                voxel.color,
                VoxelStatus::Matching,
            ));
        } else {
            metrics.lost += 1;
            voxels.push(Voxel::classified(
                voxel.position,
                IMPACT_COLOR,
                VoxelStatus::Lost,
            ));
        }
    }

    for (key, voxel) in damage_index.iter() {
        if !baseline_index.contains(key) {
            metrics.added += 1;
            voxels.push(Voxel::classified(
                voxel.position,
                DEBRIS_COLOR,
                VoxelStatus::Added,
            ));
        }
    }

    VoxelSet::comparison(kind, voxels, metrics)
}
