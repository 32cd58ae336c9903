//! STL decoding and binary encoding.
//!
//! Binary layout:
//!
//! ```text
//! UINT8[80]    header
//! UINT32       triangle count
//! per triangle REAL32[3] normal, REAL32[3] x3 vertices, UINT16 attribute
//! ```
//!
//! ASCII files start with `solid`. Some exporters also write `solid` into
//! binary headers, so a payload whose size matches the declared triangle
//! count exactly is always treated as binary.

use nalgebra::{Point3, Vector3};

use super::error::MeshLoadError;
use super::mesh::TriangleMesh;

const HEADER_SIZE: usize = 80;
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;
const TRIANGLE_SIZE: usize = 50;
const HEADER_TEXT: &[u8] = b"binary STL written by voxsure";

pub fn parse_stl(data: &[u8]) -> Result<TriangleMesh, MeshLoadError> {
    if data.len() < 6 {
        return Err(MeshLoadError::TooShort { len: data.len() });
    }

    let mesh = if looks_binary(data) {
        parse_binary(data)?
    } else {
        parse_ascii(data)?
    };

    mesh.validate()?;
    Ok(mesh)
}

fn declared_triangles(data: &[u8]) -> Option<u32> {
    let count = data.get(HEADER_SIZE..PREAMBLE_SIZE)?;
    Some(u32::from_le_bytes([count[0], count[1], count[2], count[3]]))
}

fn looks_binary(data: &[u8]) -> bool {
    let exact_size = declared_triangles(data)
        .and_then(|count| (count as usize).checked_mul(TRIANGLE_SIZE))
        .is_some_and(|body| body + PREAMBLE_SIZE == data.len());
    if exact_size {
        return true;
    }

    let header = &data[..data.len().min(HEADER_SIZE)];
    let starts_with_solid = String::from_utf8_lossy(header)
        .trim_start()
        .starts_with("solid");
    !starts_with_solid || header.contains(&0)
}

fn parse_binary(data: &[u8]) -> Result<TriangleMesh, MeshLoadError> {
    let expected =
        declared_triangles(data).ok_or(MeshLoadError::TooShort { len: data.len() })?;
    let body = &data[PREAMBLE_SIZE..];
    let available = body.len() / TRIANGLE_SIZE;
    if available < expected as usize {
        return Err(MeshLoadError::TruncatedBinary {
            expected,
            available,
        });
    }

    let mut mesh = TriangleMesh::with_capacity(expected as usize * 3, expected as usize);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(expected as usize) {
        // Bytes 0..12 hold the stored normal, which is ignored.
        mesh.push_triangle(
            read_vertex(&record[12..24]),
            read_vertex(&record[24..36]),
            read_vertex(&record[36..48]),
        );
    }
    Ok(mesh)
}

fn read_vertex(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(data: &[u8]) -> Result<TriangleMesh, MeshLoadError> {
    let text = std::str::from_utf8(data)?;
    let mut mesh = TriangleMesh::new();
    let mut in_loop = false;
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let mut parts = raw.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => corners.clear(),
            "outer" => in_loop = true,
            "vertex" => {
                if !in_loop {
                    return Err(MeshLoadError::parse(line, "vertex outside of a facet loop"));
                }
                corners.push(parse_point(parts, line)?);
            }
            "endloop" => in_loop = false,
            "endfacet" => {
                let &[a, b, c] = corners.as_slice() else {
                    return Err(MeshLoadError::MalformedFacet {
                        line,
                        vertices: corners.len(),
                    });
                };
                mesh.push_triangle(a, b, c);
                corners.clear();
            }
            "endsolid" => break,
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_point<'a>(
    mut parts: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Point3<f64>, MeshLoadError> {
    let mut coord = || -> Result<f64, MeshLoadError> {
        let token = parts
            .next()
            .ok_or_else(|| MeshLoadError::parse(line, "vertex needs three coordinates"))?;
        token
            .parse()
            .map_err(|e| MeshLoadError::parse(line, format!("invalid coordinate {token:?}: {e}")))
    };
    Ok(Point3::new(coord()?, coord()?, coord()?))
}

/// Encodes a mesh as binary STL with recomputed facet normals.
pub fn write_stl_binary(mesh: &TriangleMesh) -> Vec<u8> {
    let triangles: Vec<_> = mesh.triangles().collect();
    let mut out = Vec::with_capacity(PREAMBLE_SIZE + triangles.len() * TRIANGLE_SIZE);

    let mut header = [b' '; HEADER_SIZE];
    header[..HEADER_TEXT.len()].copy_from_slice(HEADER_TEXT);
    out.extend_from_slice(&header);

    #[allow(clippy::cast_possible_truncation)]
    let count = triangles.len() as u32;
    out.extend_from_slice(&count.to_le_bytes());

    for [a, b, c] in triangles {
        let normal = (b - a).cross(&(c - a));
        let normal = normal
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let values = normal
            .iter()
            .chain(a.coords.iter())
            .chain(b.coords.iter())
            .chain(c.coords.iter());
        for value in values {
            #[allow(clippy::cast_possible_truncation)]
            out.extend_from_slice(&(*value as f32).to_le_bytes());
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    out
}
