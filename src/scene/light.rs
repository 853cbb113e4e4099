use crate::core::color::Color;
use nalgebra::{Point3, Vector3};

/// A point light in world space.
///
/// With a `range`, intensity fades linearly to zero at that distance; without
/// one it does not fall off.
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub position: Point3<f32>,
    pub color: Color,
    pub intensity: f32,
    pub range: Option<f32>,
}

impl Light {
    pub fn new_point(position: Point3<f32>, color: Color, intensity: f32, range: Option<f32>) -> Self {
        Self {
            position,
            color,
            intensity,
            range,
        }
    }

    /// Unit vector from `surface_point` toward the light.
    pub fn direction_to_light(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        (self.position - surface_point)
            .try_normalize(1e-9)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Radiance arriving at `surface_point`.
    pub fn radiance(&self, surface_point: &Point3<f32>) -> Vector3<f32> {
        let falloff = match self.range {
            Some(r) if r > 0.0 => (1.0 - (self.position - surface_point).norm() / r).clamp(0.0, 1.0),
            _ => 1.0,
        };
        self.color.to_vector() * (self.intensity * falloff)
    }
}
