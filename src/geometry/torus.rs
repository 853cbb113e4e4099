use crate::core::color::Color;
use crate::core::geometry::{Face, LineSegments, Mesh, Vertex};
use crate::error::{Result, ensure_positive, ensure_segments};
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f32::consts::TAU;

/// Every star-burst has at least this many rays.
pub const MIN_RAYS: u32 = 10;

/// Parameters of [`torus_with_starbursts`].
#[derive(Debug, Clone, PartialEq)]
pub struct TorusParams {
    /// Distance from the torus center to the center of the tube.
    pub major_radius: f32,
    /// Radius of the tube.
    pub minor_radius: f32,
    /// Number of star-bursts scattered over the surface.
    pub count: usize,
    /// Length of every ray.
    pub burst_radius: f32,
    /// Each burst gets `MIN_RAYS + k` rays with `k` uniform in `[0, max_rays)`.
    pub max_rays: u32,
    /// Segments around the tube.
    pub radial_segments: u32,
    /// Segments around the main ring.
    pub tubular_segments: u32,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            major_radius: 3.0,
            minor_radius: 1.5,
            count: 100,
            burst_radius: 0.2,
            max_rays: 20,
            radial_segments: 30,
            tubular_segments: 30,
        }
    }
}

/// A star-burst placed on the torus.
#[derive(Debug, Clone)]
pub struct Appendage {
    pub position: Point3<f32>,
    /// `normalize(position)`: the direction from the torus center, not the
    /// true surface normal. The burst's local +Y is aligned with it.
    pub normal: Vector3<f32>,
    /// Rays in the burst's local frame, all starting at the local origin.
    pub rays: LineSegments,
}

#[derive(Debug, Clone)]
pub struct StarburstTorus {
    pub surface: Mesh,
    pub appendages: Vec<Appendage>,
}

/// Point of the torus at ring angle `u` and tube angle `v`, torus in the XY plane.
#[inline]
pub fn torus_point(major_radius: f32, minor_radius: f32, u: f32, v: f32) -> Point3<f32> {
    let (sin_u, cos_u) = u.sin_cos();
    let (sin_v, cos_v) = v.sin_cos();
    let ring = major_radius + minor_radius * cos_v;
    Point3::new(ring * cos_u, ring * sin_u, minor_radius * sin_v)
}

/// Tessellated torus lying in the XY plane with analytic smooth normals.
///
/// The grid repeats its seam vertices, giving
/// `(tubular + 1)·(radial + 1)` vertices and `2·tubular·radial` faces.
pub fn torus_mesh(
    major_radius: f32,
    minor_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> Result<Mesh> {
    ensure_positive("major_radius", major_radius)?;
    ensure_positive("minor_radius", minor_radius)?;
    ensure_segments("radial_segments", radial_segments)?;
    ensure_segments("tubular_segments", tubular_segments)?;

    let stride = radial_segments + 1;
    let mut vertices = Vec::with_capacity(((tubular_segments + 1) * stride) as usize);
    for i in 0..=tubular_segments {
        let u = TAU * i as f32 / tubular_segments as f32;
        let center = Point3::new(major_radius * u.cos(), major_radius * u.sin(), 0.0);
        for j in 0..=radial_segments {
            let v = TAU * j as f32 / radial_segments as f32;
            let position = torus_point(major_radius, minor_radius, u, v);
            vertices.push(Vertex::new(position).with_normal((position - center).normalize()));
        }
    }

    let mut faces = Vec::with_capacity((2 * tubular_segments * radial_segments) as usize);
    for i in 0..tubular_segments {
        for j in 0..radial_segments {
            let current = i * stride + j;
            let next = current + stride;
            faces.push(Face::new(current, next, current + 1));
            faces.push(Face::new(current + 1, next, next + 1));
        }
    }

    Mesh::new(vertices, faces)
}

/// A bundle of rays from the origin to points uniform on the sphere of
/// `burst_radius`, each endpoint with its own random color.
pub fn starburst<R: Rng>(burst_radius: f32, max_rays: u32, rng: &mut R) -> LineSegments {
    let extra = if max_rays == 0 {
        0
    } else {
        rng.random_range(0..max_rays)
    };
    let count = MIN_RAYS + extra;

    let mut rays = LineSegments::with_capacity(count as usize);
    for _ in 0..count {
        let theta = TAU * rng.random::<f32>();
        let phi = (2.0 * rng.random::<f32>() - 1.0).acos();
        let end = Point3::new(
            burst_radius * phi.sin() * theta.cos(),
            burst_radius * phi.sin() * theta.sin(),
            burst_radius * phi.cos(),
        );
        let start_color = Color::random(rng);
        let end_color = Color::random(rng);
        rays.push((Point3::origin(), start_color), (end, end_color));
    }
    rays
}

/// Builds the torus surface and `params.count` star-bursts at uniformly
/// sampled `(u, v)` parameters.
///
/// All randomness comes from `rng`; the same seed gives the same result.
pub fn torus_with_starbursts<R: Rng>(params: &TorusParams, rng: &mut R) -> Result<StarburstTorus> {
    let surface = torus_mesh(
        params.major_radius,
        params.minor_radius,
        params.radial_segments,
        params.tubular_segments,
    )?;
    ensure_positive("burst_radius", params.burst_radius)?;

    let appendages = (0..params.count)
        .map(|_| {
            let u = TAU * rng.random::<f32>();
            let v = TAU * rng.random::<f32>();
            let position = torus_point(params.major_radius, params.minor_radius, u, v);
            let normal = position.coords.try_normalize(1e-9).unwrap_or_else(Vector3::y);
            Appendage {
                position,
                normal,
                rays: starburst(params.burst_radius, params.max_rays, rng),
            }
        })
        .collect();

    Ok(StarburstTorus {
        surface,
        appendages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn surface_faces_point_away_from_the_tube_center() {
        let mesh = torus_mesh(3.0, 1.0, 12, 16).unwrap();
        assert_eq!(mesh.vertex_count(), 17 * 13);
        assert_eq!(mesh.face_count(), 2 * 12 * 16);

        for face in mesh.faces() {
            let [a, b, c] = mesh.face_positions(face);
            let centroid = (a.coords + b.coords + c.coords) / 3.0;
            let u = centroid.y.atan2(centroid.x);
            let tube_center = Vector3::new(3.0 * u.cos(), 3.0 * u.sin(), 0.0);
            assert!(mesh.face_normal(face).dot(&(centroid - tube_center)) > 0.0);
        }
    }

    #[test]
    fn analytic_normals_are_unit() {
        let mesh = torus_mesh(3.0, 1.5, 30, 30).unwrap();
        for v in mesh.vertices() {
            assert_relative_eq!(v.normal.norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn bursts_respect_ray_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let rays = starburst(0.2, 20, &mut rng);
            assert!((10..30).contains(&rays.segment_count()));
            for ((start, _), (end, _)) in rays.segments() {
                assert_eq!(start, Point3::origin());
                assert_relative_eq!(end.coords.norm(), 0.2, epsilon = 1e-5);
            }
        }
        assert_eq!(starburst(1.0, 0, &mut rng).segment_count(), 10);
    }

    #[test]
    fn appendage_normal_is_normalized_position() {
        let mut rng = StdRng::seed_from_u64(11);
        let torus = torus_with_starbursts(&TorusParams::default(), &mut rng).unwrap();
        assert_eq!(torus.appendages.len(), 100);
        for a in &torus.appendages {
            assert_relative_eq!(a.normal, a.position.coords.normalize(), epsilon = 1e-6);
        }
    }
}
