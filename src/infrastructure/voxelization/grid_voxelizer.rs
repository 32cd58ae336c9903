use crate::application::ports::{VoxelizeError, Voxelizer};
use crate::domain::{SourceFormat, VoxelSet};

use super::relief::voxelize_image;
use super::obj::parse_obj;
use super::stl::parse_stl;
use super::surface::voxelize_mesh;

/// Dispatches uploads to mesh surface voxelization or image extrusion by format.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridVoxelizer;

impl Voxelizer for GridVoxelizer {
    fn voxelize(
        &self,
        data: &[u8],
        format: SourceFormat,
        resolution: u32,
    ) -> Result<VoxelSet, VoxelizeError> {
        match format {
            SourceFormat::Stl | SourceFormat::Obj => {
                let mesh = match format {
                    SourceFormat::Stl => parse_stl(data),
                    _ => parse_obj(data),
                }
                .map_err(|e| VoxelizeError::load(format, e.to_string()))?;
                voxelize_mesh(&mesh, resolution)
            }
            SourceFormat::Png | SourceFormat::Jpeg => voxelize_image(data, format, resolution),
        }
    }
}
