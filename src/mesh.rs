//! Indexed triangle mesh model, loaded from Wavefront OBJ/MTL.
//!
//! Grounded in `world/model.cpp`: per shape, a deduplicated vertex buffer
//! keyed by `(position_idx, normal_idx, texcoord_idx)`, a `u32` index
//! buffer (triangles only), and an optional diffuse texture path resolved
//! against the OBJ's parent directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use nalgebra::{Vector2, Vector3};

use crate::color::FColor;
use crate::error::{RenderError, RenderResult};
use crate::vertex::Vertex;

/// One shape (OBJ "object"/"group") worth of deduplicated geometry.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub diffuse_texture: Option<PathBuf>,
}

impl Shape {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// An ordered sequence of shapes making up one loaded model.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub shapes: Vec<Shape>,
}

fn material_colors(material: Option<&tobj::Material>) -> (FColor, FColor, FColor) {
    let ambient = material
        .and_then(|m| m.ambient)
        .map(|[r, g, b]| FColor::new(r, g, b))
        .unwrap_or(FColor::BLACK);

    let diffuse = material
        .and_then(|m| m.diffuse)
        .map(|[r, g, b]| FColor::new(r, g, b))
        .unwrap_or(FColor::BLACK);

    // tobj has no first-class `emissive` field; the MTL `Ke` line lands in
    // `unknown_param` when present.
    let emissive = material
        .and_then(|m| m.unknown_param.get("Ke"))
        .and_then(|s| {
            let mut it = s.split_whitespace().filter_map(|v| v.parse::<f32>().ok());
            Some(FColor::new(it.next()?, it.next()?, it.next()?))
        })
        .unwrap_or(FColor::BLACK);

    (ambient, diffuse, emissive)
}

struct Corner {
    position_idx: u32,
    normal_idx: Option<u32>,
    uv_idx: Option<u32>,
}

/// Loads every shape in a Wavefront OBJ file (with its accompanying MTL),
/// triangulating faces and deduplicating vertices by
/// `(position_idx, normal_idx, texcoord_idx)`.
pub fn load_obj<P: AsRef<Path>>(path: P) -> RenderResult<Mesh> {
    let path = path.as_ref();

    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
    };

    let (models, materials) =
        tobj::load_obj(path, &load_options).map_err(|source| RenderError::ModelLoad {
            path: path.to_path_buf(),
            source,
        })?;

    let materials = materials.map_err(|source| RenderError::ModelLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let base_folder = path.parent().unwrap_or_else(|| Path::new(""));

    let mut mesh = Mesh::default();

    for model in models {
        let m = &model.mesh;
        let has_normals = !m.normals.is_empty();
        let has_uvs = !m.texcoords.is_empty();

        // Per-corner view across the three flat index arrays tobj exposes
        // with `single_index: false`; every face was triangulated on load,
        // so this chunks cleanly into groups of 3.
        let corners: Vec<Corner> = (0..m.indices.len())
            .map(|i| Corner {
                position_idx: m.indices[i],
                normal_idx: has_normals.then(|| m.normal_indices[i]),
                uv_idx: has_uvs.then(|| m.texcoord_indices[i]),
            })
            .collect();

        let material = m.material_id.and_then(|id| materials.get(id));
        let (ambient, diffuse, emissive) = material_colors(material);

        let position_of = |idx: u32| {
            let p = idx as usize * 3;
            Vector3::new(m.positions[p], m.positions[p + 1], m.positions[p + 2])
        };

        let mut shape = Shape::default();
        let mut index_map: HashMap<(u32, u32, u32), u32> = HashMap::new();

        for face in corners.chunks(3) {
            let face_normal = (!has_normals).then(|| {
                let (a, b, c) = (
                    position_of(face[0].position_idx),
                    position_of(face[1].position_idx),
                    position_of(face[2].position_idx),
                );
                (b - a).cross(&(c - a)).normalize()
            });

            for corner in face {
                let key = (
                    corner.position_idx,
                    corner.normal_idx.unwrap_or(u32::MAX),
                    corner.uv_idx.unwrap_or(u32::MAX),
                );

                let vertex_index = *index_map.entry(key).or_insert_with(|| {
                    let mut vertex = Vertex::new(position_of(corner.position_idx));

                    vertex.norm = match corner.normal_idx {
                        Some(n) => {
                            let n = n as usize * 3;
                            Vector3::new(m.normals[n], m.normals[n + 1], m.normals[n + 2])
                        }
                        None => face_normal.expect("face normal computed when source lacks normals"),
                    };

                    vertex.uv = match corner.uv_idx {
                        Some(t) => {
                            let t = t as usize * 2;
                            Vector2::new(m.texcoords[t], m.texcoords[t + 1])
                        }
                        None => Vector2::zeros(),
                    };

                    vertex.ambient = ambient;
                    vertex.diffuse = diffuse;
                    vertex.emissive = emissive;

                    shape.vertices.push(vertex);
                    (shape.vertices.len() - 1) as u32
                });

                shape.indices.push(vertex_index);
            }
        }

        if let Some(mat) = material {
            if let Some(tex) = &mat.diffuse_texture {
                if !tex.is_empty() {
                    shape.diffuse_texture = Some(base_folder.join(tex));
                }
            }
        }

        for &index in &shape.indices {
            if index as usize >= shape.vertices.len() {
                return Err(RenderError::IndexOutOfBounds {
                    index,
                    len: shape.vertices.len(),
                });
            }
        }

        mesh.shapes.push(shape);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_obj(contents: &str) -> tempfile_obj::TempObj {
        tempfile_obj::TempObj::new(contents)
    }

    // Minimal self-contained temp-file helper: avoids pulling in `tempfile`
    // just for one test fixture.
    mod tempfile_obj {
        use std::fs;
        use std::path::PathBuf;

        pub struct TempObj {
            pub path: PathBuf,
        }

        impl TempObj {
            pub fn new(contents: &str) -> TempObj {
                let mut path = std::env::temp_dir();
                path.push(format!("softrender_test_{}.obj", std::process::id()));
                fs::write(&path, contents).unwrap();
                TempObj { path }
            }
        }

        impl Drop for TempObj {
            fn drop(&mut self) {
                let _ = fs::remove_file(&self.path);
            }
        }
    }

    #[test]
    fn dedup_count_matches_distinct_corner_triples() {
        let obj = "\
v 0 0 0\nv 1 0 0\nv 0 1 0\nv 1 1 0\n\
f 1 2 3\nf 2 4 3\n";
        let temp = write_temp_obj(obj);
        let mesh = load_obj(&temp.path).unwrap();

        assert_eq!(mesh.shapes.len(), 1);
        // 4 distinct positions are referenced across the two triangles (no
        // normals/uvs means the dedup key collapses to position_idx alone),
        // but faces don't share all three (pos, MAX, MAX) triples equally
        // since each triangle references 3 of the 4 verts.
        let shape = &mesh.shapes[0];
        assert_eq!(shape.vertices.len(), 4);
        assert_eq!(shape.indices.len(), 6);
    }

    #[test]
    fn missing_normals_fall_back_to_face_normal() {
        let obj = "\
v -1 -1 0\nv 1 -1 0\nv 0 1 0\n\
f 1 2 3\n";
        let temp = write_temp_obj(obj);
        let mesh = load_obj(&temp.path).unwrap();
        let shape = &mesh.shapes[0];

        for v in &shape.vertices {
            assert!((v.norm - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-5);
        }
    }
}
