use crate::core::color::Color;
use crate::core::geometry::{Face, Mesh, Vertex};
use crate::error::{Result, ensure_positive, ensure_segments};
use nalgebra::{Point3, Vector3};
use std::f32::consts::TAU;

/// Builds a regular `n`-gon in the XY plane as a triangle fan around its center.
///
/// Vertex 0 is the center and carries `inner`; vertex `i + 1` sits at angle
/// `2π·i/n` on the circle of `radius` and carries `outer`. Face `i - 1` is
/// `(0, i, i mod n + 1)` with corner colors `(inner, outer, outer)`, wound
/// counter-clockwise seen from +Z, so every normal is +Z.
///
/// # Errors
/// [`Error::InvalidParameter`](crate::Error::InvalidParameter) when `n < 3`
/// or `radius` is not a positive finite number.
pub fn regular_polygon_fan(n: u32, radius: f32, inner: Color, outer: Color) -> Result<Mesh> {
    ensure_segments("n", n)?;
    ensure_positive("radius", radius)?;

    let mut vertices = Vec::with_capacity(n as usize + 1);
    vertices.push(
        Vertex::new(Point3::origin())
            .with_normal(Vector3::z())
            .with_color(inner),
    );
    for i in 0..n {
        let theta = TAU * i as f32 / n as f32;
        let (sin, cos) = theta.sin_cos();
        vertices.push(
            Vertex::new(Point3::new(radius * cos, radius * sin, 0.0))
                .with_normal(Vector3::z())
                .with_color(outer),
        );
    }

    let faces = (1..=n)
        .map(|i| Face::new(0, i, i % n + 1).with_corner_colors([inner, outer, outer]))
        .collect();

    Mesh::new(vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn square_fan_layout() {
        let mesh = regular_polygon_fan(4, 5.0, Color::RED, Color::BLUE).unwrap();
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.face_count(), 4);

        let expected = [(5.0, 0.0), (0.0, 5.0), (-5.0, 0.0), (0.0, -5.0)];
        for (v, (x, y)) in mesh.vertices()[1..].iter().zip(expected) {
            assert_relative_eq!(v.position, Point3::new(x, y, 0.0), epsilon = 1e-5);
        }

        let indices: Vec<[u32; 3]> = mesh.faces().iter().map(|f| f.indices).collect();
        assert_eq!(indices, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]]);
        for face in mesh.faces() {
            assert_eq!(face.corner_colors, Some([Color::RED, Color::BLUE, Color::BLUE]));
        }
    }

    #[test]
    fn faces_point_along_positive_z() {
        let mesh = regular_polygon_fan(7, 2.0, Color::WHITE, Color::BLACK).unwrap();
        for face in mesh.faces() {
            assert_relative_eq!(mesh.face_normal(face), Vector3::z(), epsilon = 1e-5);
        }
        assert!(mesh.vertices().iter().all(|v| v.normal == Vector3::z()));
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(matches!(
            regular_polygon_fan(2, 1.0, Color::RED, Color::BLUE),
            Err(Error::InvalidParameter { name: "n", .. })
        ));
        assert!(matches!(
            regular_polygon_fan(5, 0.0, Color::RED, Color::BLUE),
            Err(Error::InvalidParameter { name: "radius", .. })
        ));
        assert!(regular_polygon_fan(5, f32::NAN, Color::RED, Color::BLUE).is_err());
    }
}
