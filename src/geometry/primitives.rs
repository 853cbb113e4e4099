//! Small fixed shapes and line helpers used to dress the scenes.

use crate::core::color::Color;
use crate::core::geometry::{Face, LineSegments, Mesh, Vertex};
use crate::error::{Result, ensure_positive, ensure_segments};
use nalgebra::{Point3, Vector3};
use std::f32::consts::{PI, TAU};

/// The hand-built right triangle `(0,0,0), (4,0,0), (0,8,0)`.
pub fn triangle_mesh() -> Result<Mesh> {
    let vertices = [(0.0, 0.0), (4.0, 0.0), (0.0, 8.0)]
        .map(|(x, y)| Vertex::new(Point3::new(x, y, 0.0)).with_normal(Vector3::z()));
    Mesh::new(vertices.to_vec(), vec![Face::new(0, 1, 2)])
}

/// The hand-built 8x8 square made of faces `(0,1,2)` and `(1,2,3)`.
///
/// The second face is wound clockwise, so the square needs a double sided
/// material to show both halves.
pub fn square_mesh() -> Result<Mesh> {
    let vertices = [(0.0, 0.0), (8.0, 0.0), (0.0, 8.0), (8.0, 8.0)]
        .map(|(x, y)| Vertex::new(Point3::new(x, y, 0.0)).with_normal(Vector3::z()));
    Mesh::new(vertices.to_vec(), vec![Face::new(0, 1, 2), Face::new(1, 2, 3)])
}

/// UV sphere centered on the origin, poles on the Y axis.
///
/// Rows and columns repeat their seam vertices; quads touching a pole
/// collapse to one triangle.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Result<Mesh> {
    ensure_positive("radius", radius)?;
    ensure_segments("width_segments", width_segments)?;
    if height_segments < 2 {
        return Err(crate::Error::InvalidParameter {
            name: "height_segments",
            reason: format!("needs at least 2 segments, got {height_segments}"),
        });
    }

    let stride = width_segments + 1;
    let mut vertices = Vec::with_capacity((stride * (height_segments + 1)) as usize);
    for row in 0..=height_segments {
        let theta = PI * row as f32 / height_segments as f32;
        for col in 0..=width_segments {
            let phi = TAU * col as f32 / width_segments as f32;
            let normal = Vector3::new(-phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
            vertices.push(Vertex::new(Point3::from(normal * radius)).with_normal(normal));
        }
    }

    let mut faces = Vec::new();
    for row in 0..height_segments {
        for col in 0..width_segments {
            let a = row * stride + col + 1;
            let b = row * stride + col;
            let c = (row + 1) * stride + col;
            let d = (row + 1) * stride + col + 1;
            if row != 0 {
                faces.push(Face::new(a, b, d));
            }
            if row != height_segments - 1 {
                faces.push(Face::new(b, c, d));
            }
        }
    }

    Mesh::new(vertices, faces)
}

/// Axis-aligned box centered on the origin with flat normals.
pub fn box_mesh(width: f32, height: f32, depth: f32) -> Result<Mesh> {
    ensure_positive("width", width)?;
    ensure_positive("height", height)?;
    ensure_positive("depth", depth)?;

    let half = Vector3::new(width, height, depth) / 2.0;
    // Each side: outward normal and two in-plane axes with `u × v = normal`.
    let sides = [
        (Vector3::x(), -Vector3::z(), Vector3::y()),
        (-Vector3::x(), Vector3::z(), Vector3::y()),
        (Vector3::y(), Vector3::x(), -Vector3::z()),
        (-Vector3::y(), Vector3::x(), Vector3::z()),
        (Vector3::z(), Vector3::x(), Vector3::y()),
        (-Vector3::z(), -Vector3::x(), Vector3::y()),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut faces = Vec::with_capacity(12);
    for (normal, u, v) in sides {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = normal + u * su + v * sv;
            vertices.push(Vertex::new(Point3::from(p.component_mul(&half))).with_normal(normal));
        }
        faces.push(Face::new(base, base + 1, base + 2));
        faces.push(Face::new(base, base + 2, base + 3));
    }

    Mesh::new(vertices, faces)
}

/// Rectangle in the XY plane centered on the origin, facing +Z.
pub fn plane_mesh(width: f32, height: f32) -> Result<Mesh> {
    ensure_positive("width", width)?;
    ensure_positive("height", height)?;

    let (hw, hh) = (width / 2.0, height / 2.0);
    let vertices = [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .map(|(x, y)| Vertex::new(Point3::new(x, y, 0.0)).with_normal(Vector3::z()));
    Mesh::new(vertices.to_vec(), vec![Face::new(0, 1, 2), Face::new(0, 2, 3)])
}

/// Three segments from the origin: X red, Y green, Z blue.
pub fn axes_lines(size: f32) -> LineSegments {
    let mut lines = LineSegments::with_capacity(3);
    for (axis, color) in [
        (Vector3::x(), Color::RED),
        (Vector3::y(), Color::GREEN),
        (Vector3::z(), Color::BLUE),
    ] {
        lines.push((Point3::origin(), color), (Point3::from(axis * size), color));
    }
    lines
}

/// Closed loop of `segments` chords around the circle of `radius` in the XZ plane.
pub fn circle_lines(radius: f32, segments: u32, color: Color) -> Result<LineSegments> {
    ensure_positive("radius", radius)?;
    ensure_segments("segments", segments)?;

    let point = |i: u32| {
        let (sin, cos) = (TAU * i as f32 / segments as f32).sin_cos();
        Point3::new(radius * cos, 0.0, radius * sin)
    };
    let mut lines = LineSegments::with_capacity(segments as usize);
    for i in 0..segments {
        lines.push((point(i), color), (point((i + 1) % segments), color));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_outward(mesh: &Mesh) {
        for face in mesh.faces() {
            let [a, b, c] = mesh.face_positions(face);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            assert!(
                mesh.face_normal(face).dot(&centroid) > 0.0,
                "face {:?} points inward",
                face.indices
            );
        }
    }

    #[test]
    fn sphere_vertices_lie_on_the_sphere() {
        let mesh = uv_sphere(2.0, 16, 8).unwrap();
        assert_eq!(mesh.vertex_count(), 17 * 9);
        assert_eq!(mesh.face_count(), 2 * 16 * 8 - 2 * 16);
        for v in mesh.vertices() {
            assert_relative_eq!(v.position.coords.norm(), 2.0, epsilon = 1e-5);
        }
        assert_outward(&mesh);
    }

    #[test]
    fn box_is_closed_and_outward() {
        let mesh = box_mesh(2.0, 4.0, 6.0).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 12);
        for v in mesh.vertices() {
            assert_relative_eq!(v.position.y.abs(), 2.0, epsilon = 1e-6);
        }
        assert_outward(&mesh);
        for face in mesh.faces() {
            let n = mesh.vertices()[face.indices[0] as usize].normal;
            assert_relative_eq!(mesh.face_normal(face), n, epsilon = 1e-6);
        }
    }

    #[test]
    fn circle_is_closed() {
        let circle = circle_lines(10.0, 128, Color::WHITE).unwrap();
        assert_eq!(circle.segment_count(), 128);
        let segments: Vec<_> = circle.segments().collect();
        assert_eq!(segments[127].1.0, segments[0].0.0);
        for ((p, _), _) in &segments {
            assert_relative_eq!(p.y, 0.0);
            assert_relative_eq!(p.coords.norm(), 10.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn intro_meshes() {
        let triangle = triangle_mesh().unwrap();
        assert_eq!((triangle.vertex_count(), triangle.face_count()), (3, 1));
        let square = square_mesh().unwrap();
        assert_eq!((square.vertex_count(), square.face_count()), (4, 2));
        assert_eq!(axes_lines(5.0).segment_count(), 3);
    }
}
