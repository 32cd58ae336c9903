//! Wavefront OBJ decoding. Only `v` and `f` records matter; polygons are
//! fan-triangulated and texture/normal references are ignored.

use nalgebra::Point3;

use super::error::MeshLoadError;
use super::mesh::TriangleMesh;

pub fn parse_obj(data: &[u8]) -> Result<TriangleMesh, MeshLoadError> {
    let text = std::str::from_utf8(data)?;
    let mut mesh = TriangleMesh::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default();
        let mut parts = content.split_whitespace();

        match parts.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for coord in &mut coords {
                    let token = parts
                        .next()
                        .ok_or_else(|| MeshLoadError::parse(line, "vertex needs three coordinates"))?;
                    *coord = token.parse().map_err(|e| {
                        MeshLoadError::parse(line, format!("invalid coordinate {token:?}: {e}"))
                    })?;
                }
                mesh.vertices.push(Point3::from(coords));
            }
            Some("f") => {
                let corners = parts
                    .map(|token| resolve_index(token, mesh.vertices.len(), line))
                    .collect::<Result<Vec<_>, _>>()?;
                if corners.len() < 3 {
                    return Err(MeshLoadError::MalformedFacet {
                        line,
                        vertices: corners.len(),
                    });
                }
                for pair in corners[1..].windows(2) {
                    mesh.faces.push([corners[0], pair[0], pair[1]]);
                }
            }
            _ => {}
        }
    }

    mesh.validate()?;
    Ok(mesh)
}

/// Resolves a `v`, `v/vt` or `v/vt/vn` reference; negative indices count back
/// from the most recent vertex.
fn resolve_index(token: &str, vertex_count: usize, line: usize) -> Result<u32, MeshLoadError> {
    let raw = token.split('/').next().unwrap_or_default();
    let index: i64 = raw
        .parse()
        .map_err(|_| MeshLoadError::parse(line, format!("invalid face reference {token:?}")))?;

    #[allow(clippy::cast_possible_wrap)]
    let resolved = match index {
        0 => -1,
        i if i > 0 => i - 1,
        i => vertex_count as i64 + i,
    };

    if resolved < 0 || resolved as usize >= vertex_count {
        return Err(MeshLoadError::IndexOutOfRange { line, index });
    }
    u32::try_from(resolved).map_err(|_| MeshLoadError::IndexOutOfRange { line, index })
}
