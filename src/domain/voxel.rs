use std::fmt;

use serde::{Serialize, Serializer};

use super::SourceKind;

/// Opaque 24-bit color. Only rendered as `#rrggbb` when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb([u8; 3]);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn channels(&self) -> [u8; 3] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Classification attached to voxels produced by a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum VoxelStatus {
    #[serde(rename = "match")]
    Matching,
    #[serde(rename = "lost")]
    Lost,
    #[serde(rename = "added")]
    Added,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Voxel {
    #[serde(rename = "pos")]
    pub position: [f64; 3],
    pub color: Rgb,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VoxelStatus>,
}

impl Voxel {
    pub fn new(position: [f64; 3], color: Rgb) -> Self {
        Self {
            position,
            color,
            status: None,
        }
    }

    pub fn classified(position: [f64; 3], color: Rgb, status: VoxelStatus) -> Self {
        Self {
            position,
            color,
            status: Some(status),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffMetrics {
    pub lost: usize,
    pub added: usize,
    pub matching: usize,
}

/// Occupied cells produced by a voxelization or a comparison.
///
/// Positions are not guaranteed unique; comparisons deduplicate them by
/// quantized position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoxelSet {
    #[serde(rename = "type")]
    kind: SourceKind,
    count: usize,
    voxels: Vec<Voxel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics: Option<DiffMetrics>,
}

impl VoxelSet {
    pub fn new(kind: SourceKind, voxels: Vec<Voxel>) -> Self {
        Self {
            kind,
            count: voxels.len(),
            voxels,
            metrics: None,
        }
    }

    pub fn comparison(kind: SourceKind, voxels: Vec<Voxel>, metrics: DiffMetrics) -> Self {
        Self {
            kind,
            count: voxels.len(),
            voxels,
            metrics: Some(metrics),
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn metrics(&self) -> Option<DiffMetrics> {
        self.metrics
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn into_voxels(self) -> Vec<Voxel> {
        self.voxels
    }
}
