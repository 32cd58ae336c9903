use crate::domain::{SourceFormat, VoxelSet};

/// Converts raw upload bytes into a voxel set.
///
/// Implementations are CPU bound and synchronous; callers are expected to run
/// them off the async executor.
pub trait Voxelizer: Send + Sync {
    fn voxelize(
        &self,
        data: &[u8],
        format: SourceFormat,
        resolution: u32,
    ) -> Result<VoxelSet, VoxelizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VoxelizeError {
    #[error("failed to load {format} input: {message}")]
    Load {
        format: SourceFormat,
        message: String,
    },
    #[error("degenerate geometry: largest bounding-box extent is {extent}")]
    DegenerateGeometry { extent: f64 },
    #[error("resolution must be at least 1")]
    ZeroResolution,
}

impl VoxelizeError {
    pub fn load(format: SourceFormat, message: impl Into<String>) -> Self {
        Self::Load {
            format,
            message: message.into(),
        }
    }
}
