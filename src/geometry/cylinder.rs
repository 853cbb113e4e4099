use crate::core::geometry::{Face, Mesh, Vertex};
use crate::error::{Result, ensure_positive, ensure_segments};
use crate::geometry::normals::apply_smooth_normals;
use nalgebra::Point3;
use std::f32::consts::TAU;

/// Builds an open cylinder around the Y axis, centered on the origin.
///
/// Vertices `0..n` form the top ring at `y = length/2`, vertices `n..2n` the
/// bottom ring at `y = -length/2`; ring position `i` is at angle `2π·i/n`
/// measured from +X toward +Z. Each side quad is split into
/// `(i, next, n + next)` and `(i, n + next, n + i)`. No caps. Vertex
/// normals are smooth (see [`smooth_vertex_normals`](super::normals::smooth_vertex_normals)).
pub fn cylinder_shell(n: u32, radius: f32, length: f32) -> Result<Mesh> {
    ensure_segments("n", n)?;
    ensure_positive("radius", radius)?;
    ensure_positive("length", length)?;

    let half = length / 2.0;
    let ring = |y: f32| {
        (0..n).map(move |i| {
            let (sin, cos) = (TAU * i as f32 / n as f32).sin_cos();
            Vertex::new(Point3::new(radius * cos, y, radius * sin))
        })
    };
    let vertices: Vec<Vertex> = ring(half).chain(ring(-half)).collect();

    let mut faces = Vec::with_capacity(2 * n as usize);
    for i in 0..n {
        let next = (i + 1) % n;
        faces.push(Face::new(i, next, n + next));
        faces.push(Face::new(i, n + next, n + i));
    }

    Mesh::new(vertices, faces).map(apply_smooth_normals)
}
