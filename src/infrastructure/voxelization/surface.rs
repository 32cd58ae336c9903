//! Surface voxelization of triangle meshes.
//!
//! The grid is anchored at the mesh's bounding-box minimum with a pitch of
//! `largest extent / resolution`. A cell is occupied when any triangle
//! overlaps its closed box. Occupied cells are gathered in an ordered set, so
//! the output depends only on the mesh geometry and never on triangle order.

use std::collections::BTreeSet;

use nalgebra::{Point3, Vector3};

use crate::application::ports::VoxelizeError;
use crate::domain::{Rgb, SourceKind, Voxel, VoxelSet};

use super::mesh::{Bounds, TriangleMesh};

pub const MESH_VOXEL_COLOR: Rgb = Rgb::new(0x00, 0xf2, 0xff);

pub type Cell = [usize; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGrid {
    pub origin: Point3<f64>,
    pub pitch: f64,
    pub cells: [usize; 3],
}

impl SurfaceGrid {
    pub fn fit(bounds: &Bounds, resolution: u32) -> Result<Self, VoxelizeError> {
        if resolution == 0 {
            return Err(VoxelizeError::ZeroResolution);
        }
        let extent = bounds.max_extent();
        if !extent.is_finite() || extent <= 0.0 {
            return Err(VoxelizeError::DegenerateGeometry { extent });
        }

        let pitch = extent / f64::from(resolution);
        let extents = bounds.extents();
        let cells = [0, 1, 2].map(|axis| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let count = (extents[axis] / pitch).ceil() as usize;
            count.clamp(1, resolution as usize)
        });

        Ok(Self {
            origin: bounds.min,
            pitch,
            cells,
        })
    }

    pub fn center(&self, cell: Cell) -> Point3<f64> {
        self.origin + Vector3::from(cell.map(|i| (i as f64 + 0.5) * self.pitch))
    }

    /// Inclusive range of cells along `axis` whose closed boxes can touch
    /// `[lo, hi]`.
    fn span(&self, axis: usize, lo: f64, hi: f64) -> (usize, usize) {
        let last = self.cells[axis] - 1;
        let start = ((lo - self.origin[axis]) / self.pitch).ceil() - 1.0;
        let end = ((hi - self.origin[axis]) / self.pitch).floor();
        (clamp_index(start, last), clamp_index(end, last))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_index(value: f64, last: usize) -> usize {
    if value <= 0.0 {
        0
    } else {
        (value as usize).min(last)
    }
}

pub fn occupied_cells(mesh: &TriangleMesh, grid: &SurfaceGrid) -> BTreeSet<Cell> {
    let half = grid.pitch * 0.5;
    let mut occupied = BTreeSet::new();

    for triangle in mesh.triangles() {
        let [a, b, c] = triangle;
        let lo = a.inf(&b).inf(&c);
        let hi = a.sup(&b).sup(&c);
        let (x0, x1) = grid.span(0, lo.x, hi.x);
        let (y0, y1) = grid.span(1, lo.y, hi.y);
        let (z0, z1) = grid.span(2, lo.z, hi.z);

        for i in x0..=x1 {
            for j in y0..=y1 {
                for k in z0..=z1 {
                    let cell = [i, j, k];
                    if occupied.contains(&cell) {
                        continue;
                    }
                    if triangle_overlaps_box(&triangle, &grid.center(cell), half) {
                        occupied.insert(cell);
                    }
                }
            }
        }
    }

    occupied
}

/// Voxelizes the mesh surface and drops the result onto the `z = 0` plane.
pub fn voxelize_mesh(mesh: &TriangleMesh, resolution: u32) -> Result<VoxelSet, VoxelizeError> {
    let bounds = mesh
        .bounds()
        .ok_or(VoxelizeError::DegenerateGeometry { extent: 0.0 })?;
    let grid = SurfaceGrid::fit(&bounds, resolution)?;
    let cells = occupied_cells(mesh, &grid);

    tracing::debug!(
        triangles = mesh.triangle_count(),
        pitch = grid.pitch,
        grid = ?grid.cells,
        occupied = cells.len(),
        "Mesh surface voxelized"
    );

    let floor = cells.iter().map(|cell| cell[2]).min().unwrap_or(0);
    let voxels = cells
        .iter()
        .map(|&[i, j, k]| {
            let center = grid.center([i, j, k]);
            let z = (k - floor) as f64 * grid.pitch;
            Voxel::new([center.x, center.y, z], MESH_VOXEL_COLOR)
        })
        .collect();

    Ok(VoxelSet::new(SourceKind::Mesh, voxels))
}

/// Separating-axis overlap test between a triangle and an axis-aligned cube
/// (Akenine-Möller). Touching counts as overlapping.
pub fn triangle_overlaps_box(triangle: &[Point3<f64>; 3], center: &Point3<f64>, half: f64) -> bool {
    let v = triangle.map(|p| p - center);
    let edges = [v[1] - v[0], v[2] - v[1], v[0] - v[2]];

    for edge in &edges {
        for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
            if separates(&axis.cross(edge), &v, half) {
                return false;
            }
        }
    }

    for axis in 0..3 {
        let lo = v[0][axis].min(v[1][axis]).min(v[2][axis]);
        let hi = v[0][axis].max(v[1][axis]).max(v[2][axis]);
        if lo > half || hi < -half {
            return false;
        }
    }

    !separates(&edges[0].cross(&edges[1]), &v, half)
}

fn separates(axis: &Vector3<f64>, v: &[Vector3<f64>; 3], half: f64) -> bool {
    let p = v.map(|vertex| axis.dot(&vertex));
    let lo = p[0].min(p[1]).min(p[2]);
    let hi = p[0].max(p[1]).max(p[2]);
    let radius = half * (axis.x.abs() + axis.y.abs() + axis.z.abs());
    lo > radius || hi < -radius
}
