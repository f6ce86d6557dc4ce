//! Wavefront OBJ import for curve control points and meshes
//!
//! Only what the exercises need: `v` records, triangular `f` records with
//! 1-based indices. Everything is scaled so the largest axis extent is 1.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Failure while importing an asset
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// Only `.obj` files are accepted
    #[error("unsupported asset '{}': only .obj is allowed", path.display())]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to read '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be parsed
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A face references a vertex that does not exist
    #[error("line {line}: face index {index} out of range (1..={count})")]
    FaceIndexOutOfRange { line: usize, index: i64, count: usize },

    #[error("'{}' contains no vertices", path.display())]
    NoVertices { path: PathBuf },
}

/// Triangle mesh with 0-based face indices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    /// Vertex positions as raw bytes for a vertex buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Face indices as raw bytes for an index buffer
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.faces)
    }

    /// Corners of every triangle, in face order; faces with an index past
    /// the vertex list are skipped
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.faces.iter().filter_map(|f| {
            let corner = |i: u32| self.vertices.get(i as usize).copied();
            Some([corner(f[0])?, corner(f[1])?, corner(f[2])?])
        })
    }
}

/// Parsed contents of an OBJ source
#[derive(Debug, Default)]
struct ObjData {
    vertices: Vec<Vec3>,
    /// Still 1-based, as written
    faces: Vec<(usize, [i64; 3])>,
}

fn check_extension(path: &Path) -> Result<(), AssetError> {
    let is_obj = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("obj"));
    if is_obj {
        Ok(())
    } else {
        Err(AssetError::UnsupportedExtension {
            path: path.to_path_buf(),
        })
    }
}

fn read_source(path: &Path) -> Result<String, AssetError> {
    check_extension(path)?;
    fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_floats(line: usize, fields: &[&str]) -> Result<Vec3, AssetError> {
    if fields.len() < 3 {
        return Err(AssetError::Parse {
            line,
            reason: format!("vertex needs 3 coordinates, got {}", fields.len()),
        });
    }
    let mut xyz = [0.0f32; 3];
    for (slot, field) in xyz.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| AssetError::Parse {
            line,
            reason: format!("invalid coordinate '{field}'"),
        })?;
    }
    Ok(Vec3::from_array(xyz))
}

fn parse_face(line: usize, fields: &[&str]) -> Result<[i64; 3], AssetError> {
    if fields.len() != 3 {
        return Err(AssetError::Parse {
            line,
            reason: format!("only triangular faces are supported, got {} indices", fields.len()),
        });
    }
    let mut idx = [0i64; 3];
    for (slot, field) in idx.iter_mut().zip(fields) {
        // `v/vt/vn` forms: only the vertex index matters
        let vertex = field.split('/').next().unwrap_or(field);
        *slot = vertex.parse().map_err(|_| AssetError::Parse {
            line,
            reason: format!("invalid face index '{field}'"),
        })?;
    }
    Ok(idx)
}

fn parse_obj(source: &str) -> Result<ObjData, AssetError> {
    let mut data = ObjData::default();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let mut fields = raw.split_whitespace();
        let Some(tag) = fields.next() else {
            continue;
        };
        if tag.starts_with('#') || tag == "g" {
            continue;
        }
        let rest: Vec<&str> = fields.collect();
        match tag {
            "v" => data.vertices.push(parse_floats(line, &rest)?),
            "f" => data.faces.push((line, parse_face(line, &rest)?)),
            _ => {}
        }
    }

    Ok(data)
}

/// Divide all points by their largest axis extent
fn normalize_extent(points: &mut [Vec3]) {
    let Some(first) = points.first().copied() else {
        return;
    };
    let (min, max) = points
        .iter()
        .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
    let scale = (max - min).max_element();
    if scale > 0.0 {
        for p in points.iter_mut() {
            *p /= scale;
        }
    }
}

fn translate_faces(faces: &[(usize, [i64; 3])], count: usize) -> Result<Vec<[u32; 3]>, AssetError> {
    faces
        .iter()
        .map(|&(line, face)| {
            let mut out = [0u32; 3];
            for (slot, index) in out.iter_mut().zip(face) {
                if index < 1 || index as usize > count {
                    return Err(AssetError::FaceIndexOutOfRange { line, index, count });
                }
                *slot = (index - 1) as u32;
            }
            Ok(out)
        })
        .collect()
}

/// Control points from the `v` records of an OBJ source, scaled to unit extent
pub fn control_points_from_str(source: &str) -> Result<Vec<Vec3>, AssetError> {
    let mut points = parse_obj(source)?.vertices;
    normalize_extent(&mut points);
    Ok(points)
}

/// Mesh from an OBJ source, scaled to unit extent with 0-based faces
pub fn mesh_from_str(source: &str) -> Result<Mesh, AssetError> {
    let data = parse_obj(source)?;
    let faces = translate_faces(&data.faces, data.vertices.len())?;
    let mut vertices = data.vertices;
    normalize_extent(&mut vertices);
    Ok(Mesh { vertices, faces })
}

/// Load curve control points from an `.obj` file
pub fn load_control_points(path: impl AsRef<Path>) -> Result<Vec<Vec3>, AssetError> {
    let path = path.as_ref();
    let points = control_points_from_str(&read_source(path)?)?;
    if points.is_empty() {
        return Err(AssetError::NoVertices {
            path: path.to_path_buf(),
        });
    }
    log::info!("Loaded {} control points from {}", points.len(), path.display());
    Ok(points)
}

/// Load a triangle mesh from an `.obj` file
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, AssetError> {
    let path = path.as_ref();
    let mesh = mesh_from_str(&read_source(path)?)?;
    if mesh.vertices.is_empty() {
        return Err(AssetError::NoVertices {
            path: path.to_path_buf(),
        });
    }
    log::info!(
        "Loaded mesh {} ({} vertices, {} faces)",
        path.display(),
        mesh.vertices.len(),
        mesh.faces.len()
    );
    Ok(mesh)
}
