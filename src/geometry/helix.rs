use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone, PartialEq)]
pub struct HelixParams {
    pub count: usize,
    pub radius: f32,
    /// Angle between consecutive items, in radians.
    pub angle: f32,
    /// Rise along +Z between consecutive items.
    pub distance: f32,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            count: 49,
            radius: 2.0,
            angle: std::f32::consts::FRAC_PI_4,
            distance: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HelixPlacement {
    pub position: Point3<f32>,
    /// Turns the item's local +Z toward the helix axis at the same height.
    pub rotation: Matrix4<f32>,
}

/// Item `i` sits at `(r·cos(i·a), r·sin(i·a), i·d)` facing `(0, 0, i·d)`.
pub fn helix_placements(params: &HelixParams) -> Vec<HelixPlacement> {
    (0..params.count)
        .map(|i| {
            let t = i as f32;
            let (sin, cos) = (params.angle * t).sin_cos();
            let position = Point3::new(params.radius * cos, params.radius * sin, params.distance * t);
            let axis_point = Point3::new(0.0, 0.0, position.z);
            HelixPlacement {
                position,
                rotation: TransformFactory::orient_towards(&position, &axis_point, &Vector3::y()),
            }
        })
        .collect()
}
