//! Synthetic impact damage: carves a spherical region out of a mesh surface.

use nalgebra::{Point3, Vector3};

use super::mesh::{Bounds, TriangleMesh};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactSite {
    pub center: Point3<f64>,
    pub radius: f64,
}

impl ImpactSite {
    pub fn new(center: Point3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// A sphere tucked just inside the maximum corner of `bounds`.
    ///
    /// On a closed mesh this removes corner material without removing any
    /// whole side, so the damaged mesh keeps the original bounding box.
    pub fn near_corner(bounds: &Bounds) -> Self {
        let extent = bounds.max_extent();
        Self {
            center: bounds.max - Vector3::repeat(extent * 0.1),
            radius: extent * 0.3,
        }
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        nalgebra::distance(&self.center, point) <= self.radius
    }
}

#[derive(Debug, Clone)]
pub struct ImpactReport {
    pub mesh: TriangleMesh,
    pub removed_faces: usize,
}

/// Returns a copy of `mesh` without the triangles whose centroids fall inside
/// `site`. Faces with dangling indices are dropped too. The input mesh is not
/// modified.
pub fn simulate_impact(mesh: &TriangleMesh, site: &ImpactSite) -> ImpactReport {
    let mut damaged = TriangleMesh::with_capacity(mesh.vertices.len(), mesh.faces.len());
    damaged.vertices.clone_from(&mesh.vertices);

    let centroid = |face: &[u32; 3]| -> Option<Point3<f64>> {
        let mut sum = Vector3::zeros();
        for &index in face {
            sum += mesh.vertices.get(index as usize)?.coords;
        }
        Some(Point3::from(sum / 3.0))
    };

    for face in &mesh.faces {
        if let Some(center) = centroid(face) {
            if !site.contains(&center) {
                damaged.faces.push(*face);
            }
        }
    }

    let removed_faces = mesh.faces.len() - damaged.faces.len();
    damaged.remove_unreferenced_vertices();

    tracing::debug!(removed_faces, remaining = damaged.faces.len(), "Impact simulated");

    ImpactReport {
        mesh: damaged,
        removed_faces,
    }
}
