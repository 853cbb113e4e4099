use nalgebra::{Point2, Vector3};
use std::ops::{Add, Mul};

const EPSILON: f32 = 1e-5;

/// Barycentric weights `(alpha, beta, gamma)` of `p` with respect to the
/// screen-space triangle `(a, b, c)`, or `None` for a degenerate triangle.
pub fn barycentric_coordinates(
    p: Point2<f32>,
    a: Point2<f32>,
    b: Point2<f32>,
    c: Point2<f32>,
) -> Option<Vector3<f32>> {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let area_x2 = ab.x * ac.y - ab.y * ac.x;
    if area_x2.abs() < EPSILON {
        return None;
    }

    let inv = 1.0 / area_x2;
    let beta = (ap.x * ac.y - ap.y * ac.x) * inv;
    let gamma = (ab.x * ap.y - ab.y * ap.x) * inv;

    Some(Vector3::new(1.0 - beta - gamma, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// Reweights screen-space barycentrics by the clip-space `w` of each corner,
/// so attributes interpolate linearly in view space rather than on screen.
pub fn perspective_correct_barycentric(bary: Vector3<f32>, w: [f32; 3]) -> Option<Vector3<f32>> {
    let inv = w.map(|wi| if wi.abs() > EPSILON { 1.0 / wi } else { 1.0 });
    let weighted = Vector3::new(bary.x * inv[0], bary.y * inv[1], bary.z * inv[2]);

    let sum = weighted.x + weighted.y + weighted.z;
    if sum.abs() < EPSILON {
        return None;
    }
    Some(weighted / sum)
}

/// Blends three corner values with barycentric weights.
#[inline]
pub fn interpolate3<T>(values: &[T; 3], weights: Vector3<f32>) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    values[0] * weights.x + values[1] * weights.y + values[2] * weights.z
}

/// Linear interpolation between two values, `t = 0` giving `a`.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    a * (1.0 - t) + b * t
}
