use nalgebra::{Point3, Vector3};

use super::error::MeshLoadError;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Bounds {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for p in points {
            bounds.min = bounds.min.inf(p);
            bounds.max = bounds.max.sup(p);
        }
        Some(bounds)
    }

    pub fn extents(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f64 {
        self.extents().max()
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3<f64>>,
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    /// Appends a triangle with its own three vertices (STL style, no sharing).
    pub fn push_triangle(&mut self, a: Point3<f64>, b: Point3<f64>, c: Point3<f64>) {
        #[allow(clippy::cast_possible_truncation)]
        let base = self.vertices.len() as u32;
        self.vertices.extend([a, b, c]);
        self.faces.push([base, base + 1, base + 2]);
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Triangles as vertex positions. Faces with dangling indices are skipped;
    /// [`TriangleMesh::validate`] reports them.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f64>; 3]> + '_ {
        self.faces.iter().filter_map(|&[a, b, c]| {
            Some([
                *self.vertices.get(a as usize)?,
                *self.vertices.get(b as usize)?,
                *self.vertices.get(c as usize)?,
            ])
        })
    }

    /// Bounds of the vertices referenced by faces.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(
            self.faces
                .iter()
                .flatten()
                .filter_map(|&i| self.vertices.get(i as usize)),
        )
    }

    pub fn validate(&self) -> Result<(), MeshLoadError> {
        if self.faces.is_empty() {
            return Err(MeshLoadError::Empty);
        }
        if let Some(&index) = self
            .faces
            .iter()
            .flatten()
            .find(|&&i| i as usize >= self.vertices.len())
        {
            return Err(MeshLoadError::DanglingIndex { index });
        }
        if self
            .vertices
            .iter()
            .any(|v| !(v.x.is_finite() && v.y.is_finite() && v.z.is_finite()))
        {
            return Err(MeshLoadError::NonFinite);
        }
        Ok(())
    }

    /// Drops vertices no face refers to, renumbering the faces.
    pub fn remove_unreferenced_vertices(&mut self) {
        let vertex_count = self.vertices.len();
        self.faces
            .retain(|face| face.iter().all(|&i| (i as usize) < vertex_count));

        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut kept = Vec::with_capacity(self.vertices.len());
        for face in &mut self.faces {
            for index in face.iter_mut() {
                let slot = &mut remap[*index as usize];
                if *slot == u32::MAX {
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        *slot = kept.len() as u32;
                    }
                    kept.push(self.vertices[*index as usize]);
                }
                *index = *slot;
            }
        }
        self.vertices = kept;
    }
}
