use crate::core::geometry::{Face, Mesh, Vertex};
use crate::error::{Result, ensure_positive};
use nalgebra::{Point3, Vector3};

/// One leaf of a fractal: a primitive of edge `size` centered at `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedPrimitive {
    pub size: f32,
    pub position: Point3<f32>,
}

/// Leaf placements of a Sierpinski tetrahedron.
///
/// Level 0 is a single placement of `size` at `position`. Each further level
/// replaces a placement by four of half the size (top, front left, front
/// right, back), in that order, depth first. The result has `4^level`
/// entries, each of size `size / 2^level`.
///
/// `size` is not validated: zero or negative sizes yield degenerate
/// placements of the same count.
pub fn sierpinski_tetrahedron(level: u32, size: f32, position: Point3<f32>) -> Vec<PlacedPrimitive> {
    let mut out = Vec::with_capacity(preallocation(level));
    subdivide(level, size, position, &mut out);
    out
}

/// Deepest level whose full leaf count is reserved up front.
const MAX_PREALLOC_LEVEL: u32 = 10;

fn preallocation(level: u32) -> usize {
    4usize.pow(level.min(MAX_PREALLOC_LEVEL))
}

fn subdivide(level: u32, size: f32, position: Point3<f32>, out: &mut Vec<PlacedPrimitive>) {
    if level == 0 {
        out.push(PlacedPrimitive { size, position });
        return;
    }

    let s = size / 2.0;
    let d = s * (2.0_f32 / 3.0).sqrt() / 2.0;
    let front = s / (2.0 * 3.0_f32.sqrt());
    let back = s / 3.0_f32.sqrt();

    let offsets = [
        Vector3::new(0.0, d, 0.0),
        Vector3::new(-s / 2.0, -d, front),
        Vector3::new(s / 2.0, -d, front),
        Vector3::new(0.0, -d, -back),
    ];
    for offset in offsets {
        subdivide(level - 1, s, position + offset, out);
    }
}

/// A regular tetrahedron of the given edge, apex up, vertically centered on
/// the origin, with its base corners where [`sierpinski_tetrahedron`] puts
/// the lower children. Faces do not share vertices, so normals are flat.
pub fn tetrahedron_mesh(edge: f32) -> Result<Mesh> {
    ensure_positive("edge", edge)?;

    let h = edge * (2.0_f32 / 3.0).sqrt();
    let sqrt3 = 3.0_f32.sqrt();
    let a = Point3::new(-edge / 2.0, -h / 2.0, edge / (2.0 * sqrt3));
    let b = Point3::new(edge / 2.0, -h / 2.0, edge / (2.0 * sqrt3));
    let c = Point3::new(0.0, -h / 2.0, -edge / sqrt3);
    let apex = Point3::new(0.0, h / 2.0, 0.0);

    let triangles = [[a, c, b], [a, b, apex], [b, c, apex], [c, a, apex]];

    let mut vertices = Vec::with_capacity(12);
    let mut faces = Vec::with_capacity(4);
    for (i, [p0, p1, p2]) in triangles.into_iter().enumerate() {
        let normal = (p1 - p0).cross(&(p2 - p0)).normalize();
        vertices.extend([p0, p1, p2].map(|p| Vertex::new(p).with_normal(normal)));
        let base = 3 * i as u32;
        faces.push(Face::new(base, base + 1, base + 2));
    }

    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reservation_stops_growing_past_the_cap() {
        assert_eq!(preallocation(0), 1);
        assert_eq!(preallocation(3), 64);
        assert_eq!(preallocation(MAX_PREALLOC_LEVEL), 1 << 20);
        // 4^31 overflows a 64-bit capacity in bytes.
        assert_eq!(preallocation(31), preallocation(MAX_PREALLOC_LEVEL));
        assert_eq!(preallocation(u32::MAX), 1 << 20);
    }

    #[test]
    fn level_zero_is_the_input() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(
            sierpinski_tetrahedron(0, 10.0, p),
            vec![PlacedPrimitive { size: 10.0, position: p }]
        );
    }

    #[test]
    fn level_one_children() {
        let leaves = sierpinski_tetrahedron(1, 10.0, Point3::origin());
        assert_eq!(leaves.len(), 4);
        let expected = [
            (0.0, 2.041_241, 0.0),
            (-2.5, -2.041_241, 1.443_376),
            (2.5, -2.041_241, 1.443_376),
            (0.0, -2.041_241, -2.886_751),
        ];
        for (leaf, (x, y, z)) in leaves.iter().zip(expected) {
            assert_eq!(leaf.size, 5.0);
            assert_relative_eq!(leaf.position, Point3::new(x, y, z), epsilon = 1e-4);
        }
    }

    #[test]
    fn count_and_size_per_level() {
        for level in 0..6 {
            let leaves = sierpinski_tetrahedron(level, 8.0, Point3::origin());
            assert_eq!(leaves.len(), 4usize.pow(level));
            let size = 8.0 / 2f32.powi(level as i32);
            assert!(leaves.iter().all(|l| (l.size - size).abs() < 1e-6));
        }
    }

    #[test]
    fn leaf_faces_point_outward() {
        let mesh = tetrahedron_mesh(2.0).unwrap();
        assert_eq!(mesh.face_count(), 4);
        for face in mesh.faces() {
            let [a, b, c] = mesh.face_positions(face);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(mesh.face_normal(face).dot(&centroid) > 0.0);
        }
    }

    #[test]
    fn children_fill_the_parent_corners() {
        // The apex of the top child coincides with the apex of the parent.
        let size = 4.0;
        let parent_apex_y = size * (2.0_f32 / 3.0).sqrt() / 2.0;
        let top = sierpinski_tetrahedron(1, size, Point3::origin())[0];
        let child_apex_y = top.position.y + top.size * (2.0_f32 / 3.0).sqrt() / 2.0;
        assert_relative_eq!(child_apex_y, parent_apex_y, epsilon = 1e-6);
    }
}
