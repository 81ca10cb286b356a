//! Triangle meshes loaded from Wavefront OBJ.
//!
//! Faces keep the loader's 1-based indices into the position, normal and
//! texture coordinate lists; the rasterizer subtracts one when it looks
//! them up.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{RenderError, RenderResult};
use crate::math::{Vec2f, Vec3f};

/// Three 1-based index triples: vertex position, texture coordinate, normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Face {
    pub vertex: [u32; 3],
    pub texture: [u32; 3],
    pub normal: [u32; 3],
}

impl Face {
    pub const fn new(vertex: [u32; 3], texture: [u32; 3], normal: [u32; 3]) -> Self {
        Self {
            vertex,
            texture,
            normal,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3f>,
    normals: Vec<Vec3f>,
    uvs: Vec<Vec2f>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3f>, normals: Vec<Vec3f>, uvs: Vec<Vec2f>, faces: Vec<Face>) -> Self {
        Self {
            positions,
            normals,
            uvs,
            faces,
        }
    }

    /// Load an OBJ file. Every object in the file is merged into one mesh.
    pub fn from_obj<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mesh = Self::from_obj_reader(&mut BufReader::new(file))?;
        debug!(
            path = %path.display(),
            vertices = mesh.positions.len(),
            faces = mesh.faces.len(),
            "Loaded OBJ mesh"
        );
        Ok(mesh)
    }

    /// Parse OBJ text from any buffered reader.
    ///
    /// Polygons are triangulated. Positions, normals and texture
    /// coordinates keep separate index streams. Material libraries are not
    /// read.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R) -> RenderResult<Self> {
        let options = tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ignore_points: true,
            ignore_lines: true,
            ..Default::default()
        };
        let (models, _materials) =
            tobj::load_obj_buf(reader, &options, |_: &Path| Ok(Default::default()))?;

        let mut mesh = Mesh::default();
        for model in &models {
            let m = &model.mesh;
            if m.indices.is_empty() {
                warn!(name = %model.name, "Skipping object without faces");
                continue;
            }
            if m.normal_indices.is_empty() {
                return Err(RenderError::MissingAttribute("normals"));
            }
            if m.texcoord_indices.is_empty() {
                return Err(RenderError::MissingAttribute("texture coordinates"));
            }

            // 1-based, offset past the objects merged so far
            let vertex_base = mesh.positions.len() as u32 + 1;
            let normal_base = mesh.normals.len() as u32 + 1;
            let uv_base = mesh.uvs.len() as u32 + 1;

            mesh.positions
                .extend(m.positions.chunks_exact(3).map(|p| Vec3f::new(p[0], p[1], p[2])));
            mesh.normals
                .extend(m.normals.chunks_exact(3).map(|n| Vec3f::new(n[0], n[1], n[2])));
            mesh.uvs
                .extend(m.texcoords.chunks_exact(2).map(|t| Vec2f::new(t[0], t[1])));

            let triangles = m
                .indices
                .chunks_exact(3)
                .zip(m.texcoord_indices.chunks_exact(3))
                .zip(m.normal_indices.chunks_exact(3));
            mesh.faces.extend(triangles.map(|((v, t), n)| Face {
                vertex: [v[0] + vertex_base, v[1] + vertex_base, v[2] + vertex_base],
                texture: [t[0] + uv_base, t[1] + uv_base, t[2] + uv_base],
                normal: [n[0] + normal_base, n[1] + normal_base, n[2] + normal_base],
            }));
        }

        if mesh.faces.is_empty() {
            return Err(RenderError::MissingAttribute("faces"));
        }
        Ok(mesh)
    }

    pub fn positions(&self) -> &[Vec3f] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3f] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2f] {
        &self.uvs
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QUAD: &str = "\
o quad
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn test_quad_is_triangulated() {
        let mesh = Mesh::from_obj_reader(&mut Cursor::new(QUAD)).unwrap();
        assert_eq!(mesh.positions().len(), 4);
        assert_eq!(mesh.uvs().len(), 4);
        assert_eq!(mesh.normals(), &[Vec3f::Z]);
        assert_eq!(mesh.triangle_count(), 2);

        for face in mesh.faces() {
            assert!(face.vertex.iter().all(|&i| (1..=4).contains(&i)));
            assert_eq!(face.normal, [1, 1, 1]);
            // positions and UVs share numbering in this file
            assert_eq!(face.vertex, face.texture);
        }
    }

    #[test]
    fn test_objects_are_merged_with_offsets() {
        let text = "\
o a
v 0 0 0
v 1 0 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
o b
v 0 0 1
v 1 0 1
v 0 1 1
vt 1 1
vn 0 0 -1
f 4/2/2 5/2/2 6/2/2
";
        let mesh = Mesh::from_obj_reader(&mut Cursor::new(text)).unwrap();
        assert_eq!(mesh.positions().len(), 6);
        assert_eq!(mesh.triangle_count(), 2);

        let second = mesh.faces()[1];
        let mut vertices = second.vertex;
        vertices.sort_unstable();
        assert_eq!(vertices, [4, 5, 6]);
        assert_eq!(mesh.normals()[second.normal[0] as usize - 1], -Vec3f::Z);
        assert_eq!(mesh.uvs()[second.texture[0] as usize - 1], Vec2f::new(1.0, 1.0));
    }

    #[test]
    fn test_missing_normals() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n";
        assert!(matches!(
            Mesh::from_obj_reader(&mut Cursor::new(text)),
            Err(RenderError::MissingAttribute("normals"))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Mesh::from_obj("does/not/exist.obj"),
            Err(RenderError::Io { .. })
        ));
    }
}
