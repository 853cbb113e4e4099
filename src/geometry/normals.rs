use crate::core::geometry::Mesh;
use nalgebra::Vector3;

/// Per-vertex smooth normals: the normalized sum of the unit normals of the
/// faces that use each vertex.
///
/// Every face contributes equally regardless of its area. A vertex no face
/// touches, or whose contributions cancel out, gets a zero normal.
pub fn smooth_vertex_normals(mesh: &Mesh) -> Vec<Vector3<f32>> {
    let mut sums = vec![Vector3::zeros(); mesh.vertex_count()];
    for face in mesh.faces() {
        let n = mesh.face_normal(face);
        for &i in &face.indices {
            sums[i as usize] += n;
        }
    }
    sums.into_iter()
        .map(|s| s.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
        .collect()
}

/// Recomputes the vertex normals of `mesh` in place.
pub fn apply_smooth_normals(mut mesh: Mesh) -> Mesh {
    let normals = smooth_vertex_normals(&mesh);
    mesh.set_normals(&normals);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::{Face, Vertex};
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn shared_edge_averages_two_faces() {
        // Two triangles folded 90 degrees along the X axis.
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
            Vertex::new(Point3::new(0.0, 0.0, -1.0)),
        ];
        let faces = vec![Face::new(0, 1, 2), Face::new(0, 3, 1)];
        let mesh = apply_smooth_normals(Mesh::new(vertices, faces).unwrap());

        let expected = Vector3::new(0.0, 1.0, 1.0).normalize();
        assert_relative_eq!(mesh.vertices()[0].normal, expected, epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices()[2].normal, Vector3::z(), epsilon = 1e-6);
        assert_relative_eq!(mesh.vertices()[3].normal, Vector3::y(), epsilon = 1e-6);
    }

    #[test]
    fn unused_vertex_keeps_zero_normal() {
        let vertices = vec![
            Vertex::new(Point3::new(0.0, 0.0, 0.0)),
            Vertex::new(Point3::new(1.0, 0.0, 0.0)),
            Vertex::new(Point3::new(0.0, 1.0, 0.0)),
            Vertex::new(Point3::new(5.0, 5.0, 5.0)),
        ];
        let mesh = Mesh::new(vertices, vec![Face::new(0, 1, 2)]).unwrap();
        let normals = smooth_vertex_normals(&mesh);
        assert_eq!(normals[3], Vector3::zeros());
    }
}
