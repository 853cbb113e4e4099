use crate::core::color::Color;
use crate::error::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Represents a single vertex in 3D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in local object space.
    pub position: Point3<f32>,
    /// Normal vector for lighting calculations (zero until derived).
    pub normal: Vector3<f32>,
    /// Optional per-vertex color.
    pub color: Option<Color>,
}

impl Vertex {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            normal: Vector3::zeros(),
            color: None,
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A triangle referencing three vertices by index, wound counter-clockwise
/// when seen from the outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub indices: [u32; 3],
    /// Per-corner colors that take precedence over the vertex colors.
    pub corner_colors: Option<[Color; 3]>,
}

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: [a, b, c],
            corner_colors: None,
        }
    }

    pub fn with_corner_colors(mut self, colors: [Color; 3]) -> Self {
        self.corner_colors = Some(colors);
        self
    }
}

/// An indexed triangle mesh.
///
/// Every face index is guaranteed to be smaller than the vertex count; the
/// only way to obtain a `Mesh` is through [`Mesh::new`], which checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
        let vertex_count = vertices.len();
        for (face_idx, face) in faces.iter().enumerate() {
            if let Some(&index) = face.indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(Error::InvalidMesh {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// The three corner positions of a face.
    pub fn face_positions(&self, face: &Face) -> [Point3<f32>; 3] {
        face.indices.map(|i| self.vertices[i as usize].position)
    }

    /// Unit normal of a face by the right-hand rule, or zero when degenerate.
    pub fn face_normal(&self, face: &Face) -> Vector3<f32> {
        let [a, b, c] = self.face_positions(face);
        (b - a).cross(&(c - a)).try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
    }

    /// Replaces every vertex normal. `normals` must have one entry per vertex.
    pub(crate) fn set_normals(&mut self, normals: &[Vector3<f32>]) {
        for (vertex, normal) in self.vertices.iter_mut().zip(normals) {
            vertex.normal = *normal;
        }
    }
}

/// Colored line segments, stored as endpoint pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSegments {
    points: Vec<Point3<f32>>,
    colors: Vec<Color>,
}

impl LineSegments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(segments: usize) -> Self {
        Self {
            points: Vec::with_capacity(segments * 2),
            colors: Vec::with_capacity(segments * 2),
        }
    }

    pub fn push(&mut self, start: (Point3<f32>, Color), end: (Point3<f32>, Color)) {
        self.points.push(start.0);
        self.colors.push(start.1);
        self.points.push(end.0);
        self.colors.push(end.1);
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates over `((start, start_color), (end, end_color))`.
    pub fn segments(
        &self,
    ) -> impl Iterator<Item = ((Point3<f32>, Color), (Point3<f32>, Color))> + '_ {
        self.points
            .chunks_exact(2)
            .zip(self.colors.chunks_exact(2))
            .map(|(p, c)| ((p[0], c[0]), (p[1], c[1])))
    }
}
