//! Stacked and nested torus arrangements.

use crate::core::color::Color;
use crate::error::{Result, ensure_positive};

/// One ring of an arrangement.
#[derive(Debug, Clone, PartialEq)]
pub struct TorusRing {
    pub major_radius: f32,
    pub minor_radius: f32,
    /// Height of the ring's center along +Y.
    pub height: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PyramidParams {
    pub count: usize,
    pub bottom_major_radius: f32,
    pub major_radius_step: f32,
    /// Minor radius as a fraction of each ring's major radius.
    pub minor_radius_factor: f32,
}

impl Default for PyramidParams {
    fn default() -> Self {
        Self {
            count: 6,
            bottom_major_radius: 5.0,
            major_radius_step: 0.8,
            minor_radius_factor: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToroidPyramid {
    /// Bottom ring first. Rings lie flat (in the XZ plane once placed).
    pub rings: Vec<TorusRing>,
    pub cherry_radius: f32,
    pub cherry_height: f32,
}

/// Flat rings stacked along +Y, each shrinking by `major_radius_step`, the
/// whole stack vertically centered on the origin, topped by a cherry.
pub fn toroid_pyramid(params: &PyramidParams) -> Result<ToroidPyramid> {
    ensure_positive("minor_radius_factor", params.minor_radius_factor)?;
    let majors: Vec<f32> = (0..params.count)
        .map(|i| params.bottom_major_radius - i as f32 * params.major_radius_step)
        .collect();
    for &major in &majors {
        ensure_positive("major_radius", major)?;
    }

    let total: f32 = majors
        .iter()
        .map(|m| 2.0 * m * params.minor_radius_factor)
        .sum();
    let mut level = -total / 2.0;

    let rings = majors
        .iter()
        .enumerate()
        .map(|(i, &major)| {
            let minor = major * params.minor_radius_factor;
            let ring = TorusRing {
                major_radius: major,
                minor_radius: minor,
                height: level + minor,
                color: Color::from_hsl(i as f32 / params.count as f32, 1.0, 0.5),
            };
            level += 2.0 * minor;
            ring
        })
        .collect();

    let cherry_radius = params.minor_radius_factor * params.bottom_major_radius;
    Ok(ToroidPyramid {
        rings,
        cherry_radius,
        cherry_height: level + cherry_radius / 2.0,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct NestedToriParams {
    pub count: usize,
    pub major_radius: f32,
    pub minor_radius: f32,
    /// Angular speed factor; ring `i` turns at `(i + 1)·rotation_speed` rad/s.
    pub rotation_speed: f32,
    /// Angular frequency of the center sphere's pulse.
    pub pulse_speed: f32,
}

impl Default for NestedToriParams {
    fn default() -> Self {
        Self {
            count: 10,
            major_radius: 20.0,
            minor_radius: 2.0,
            rotation_speed: 0.2,
            pulse_speed: 0.8,
        }
    }
}

/// Concentric rings with major radius `R - 2i`, all centered on the origin.
pub fn nested_tori(params: &NestedToriParams) -> Result<Vec<TorusRing>> {
    ensure_positive("minor_radius", params.minor_radius)?;
    (0..params.count)
        .map(|i| {
            let major = params.major_radius - 2.0 * i as f32;
            ensure_positive("major_radius", major)?;
            Ok(TorusRing {
                major_radius: major,
                minor_radius: params.minor_radius,
                height: 0.0,
                color: Color::from_hsl(i as f32 / params.count as f32, 1.0, 0.5),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn pyramid_rings_touch_and_center() {
        let pyramid = toroid_pyramid(&PyramidParams::default()).unwrap();
        assert_eq!(pyramid.rings.len(), 6);

        let bottom = &pyramid.rings[0];
        let top = pyramid.rings.last().unwrap();
        let lowest = bottom.height - bottom.minor_radius;
        let highest = top.height + top.minor_radius;
        assert_relative_eq!(lowest, -highest, epsilon = 1e-5);

        for pair in pyramid.rings.windows(2) {
            let gap = (pair[1].height - pair[1].minor_radius) - (pair[0].height + pair[0].minor_radius);
            assert_relative_eq!(gap, 0.0, epsilon = 1e-5);
            assert!(pair[1].major_radius < pair[0].major_radius);
        }
        assert_relative_eq!(pyramid.cherry_radius, 0.5);
        assert_relative_eq!(pyramid.cherry_height, highest + 0.25, epsilon = 1e-5);
    }

    #[test]
    fn nested_rings_shrink_by_two() {
        let rings = nested_tori(&NestedToriParams::default()).unwrap();
        let majors: Vec<f32> = rings.iter().map(|r| r.major_radius).collect();
        assert_eq!(majors, vec![20.0, 18.0, 16.0, 14.0, 12.0, 10.0, 8.0, 6.0, 4.0, 2.0]);
        assert_eq!(rings[0].color, Color::from_hsl(0.0, 1.0, 0.5));
    }

    #[test]
    fn too_many_rings_is_an_error() {
        let params = NestedToriParams {
            count: 11,
            ..Default::default()
        };
        assert!(nested_tori(&params).is_err());
    }
}
