mod damage;
mod error;
mod grid_voxelizer;
mod mesh;
mod obj;
mod relief;
mod stl;
mod surface;

pub use damage::{ImpactReport, ImpactSite, simulate_impact};
pub use error::MeshLoadError;
pub use grid_voxelizer::GridVoxelizer;
pub use mesh::{Bounds, TriangleMesh};
pub use obj::parse_obj;
pub use relief::{BRIGHTNESS_PER_LEVEL, DARKNESS_THRESHOLD, extrude_pixels, voxelize_image};
pub use stl::{parse_stl, write_stl_binary};
pub use surface::{
    Cell, MESH_VOXEL_COLOR, SurfaceGrid, occupied_cells, triangle_overlaps_box, voxelize_mesh,
};
