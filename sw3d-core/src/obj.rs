/// Wavefront OBJ mesh loader (`v x y z` / `f i j k` subset)
use std::path::Path;

use nom::{
    character::complete::{multispace1, u32 as index},
    number::complete::float,
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use nalgebra::Point3;

use crate::geometry::{Mesh, Triangle};

/// Mesh loading failure. Any of these is fatal at load time; the frame
/// loop is never started on a bad mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed {kind} record at line {line}")]
    Malformed { kind: &'static str, line: usize },
    #[error("face at line {line} references vertex {index}, but only {count} vertices are defined")]
    IndexOutOfRange {
        line: usize,
        index: usize,
        count: usize,
    },
}

/// Read and parse an OBJ file.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| MeshError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_obj(&text)
}

/// Parse OBJ text: `v x y z` vertex records and `f i j k` faces with
/// 1-indexed vertex references. Comments and unsupported records
/// (normals, texture coordinates, groups, ...) are skipped.
pub fn parse_obj(input: &str) -> Result<Mesh, MeshError> {
    let mut verts: Vec<Point3<f32>> = Vec::new();
    let mut mesh = Mesh::new();

    for (idx, raw) in input.lines().enumerate() {
        let line = raw.trim();
        let lineno = idx + 1;

        if let Some(rest) = line.strip_prefix('v') {
            // Only bare `v` records; `vn`, `vt`, ... fall through.
            if rest.starts_with(char::is_whitespace) {
                let (_, vertex) = parse_vertex(rest)
                    .map_err(|_| MeshError::Malformed {
                        kind: "vertex",
                        line: lineno,
                    })?;
                verts.push(vertex);
            }
        } else if let Some(rest) = line.strip_prefix('f') {
            if rest.starts_with(char::is_whitespace) {
                let (_, face) = parse_face(rest).map_err(|_| MeshError::Malformed {
                    kind: "face",
                    line: lineno,
                })?;
                let mut points = [Point3::origin(); 3];
                for (slot, &i) in points.iter_mut().zip(face.iter()) {
                    let i = i as usize;
                    if i == 0 || i > verts.len() {
                        return Err(MeshError::IndexOutOfRange {
                            line: lineno,
                            index: i,
                            count: verts.len(),
                        });
                    }
                    *slot = verts[i - 1];
                }
                mesh.add_triangle(Triangle::new(points[0], points[1], points[2]));
            }
        }
    }

    log::debug!(
        "parsed OBJ: {} vertices, {} triangles",
        verts.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f32>> {
    let (input, x) = preceded(multispace1, float)(input)?;
    let (input, y) = preceded(multispace1, float)(input)?;
    let (input, z) = preceded(multispace1, float)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, [u32; 3]> {
    let (input, a) = preceded(multispace1, index)(input)?;
    let (input, b) = preceded(multispace1, index)(input)?;
    let (input, c) = preceded(multispace1, index)(input)?;
    Ok((input, [a, b, c]))
}
