use crate::core::color::Color;
use crate::error::{Error, Result, ensure_positive};
use nalgebra::{Point3, Vector3};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxFieldParams {
    pub count: usize,
    pub min_side: f32,
    pub max_side: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Edge of the square floor the boxes stand on, centered on the origin.
    pub floor_size: f32,
}

impl Default for BoxFieldParams {
    fn default() -> Self {
        Self {
            count: 100,
            min_side: 5.0,
            max_side: 20.0,
            min_height: 5.0,
            max_height: 60.0,
            floor_size: 200.0,
        }
    }
}

/// A box resting on the floor: `center.y == size.y / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatteredBox {
    /// Width, height, depth.
    pub size: Vector3<f32>,
    pub center: Point3<f32>,
    pub color: Color,
}

/// Uniform in `[-extent/2, extent/2)`.
fn spread<R: Rng>(rng: &mut R, extent: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * extent
}

fn uniform<R: Rng>(rng: &mut R, low: f32, high: f32) -> f32 {
    low + rng.random::<f32>() * (high - low)
}

/// Scatters `count` boxes of random size and color over the floor.
///
/// Every box lies fully inside the floor square and rests on `y = 0`.
pub fn random_boxes<R: Rng>(params: &BoxFieldParams, rng: &mut R) -> Result<Vec<ScatteredBox>> {
    ensure_positive("min_side", params.min_side)?;
    ensure_positive("min_height", params.min_height)?;
    if params.max_side < params.min_side || params.max_height < params.min_height {
        return Err(Error::InvalidParameter {
            name: "max_side",
            reason: "ranges must satisfy min <= max".into(),
        });
    }
    if params.floor_size <= params.max_side {
        return Err(Error::InvalidParameter {
            name: "floor_size",
            reason: format!(
                "floor {} cannot hold boxes up to {}",
                params.floor_size, params.max_side
            ),
        });
    }

    let boxes = (0..params.count)
        .map(|_| {
            let width = uniform(rng, params.min_side, params.max_side);
            let depth = uniform(rng, params.min_side, params.max_side);
            let height = uniform(rng, params.min_height, params.max_height);

            let hue = rng.random::<f32>();
            let saturation = uniform(rng, 0.8, 0.95);
            let lightness = uniform(rng, 0.3, 0.7);

            let x = spread(rng, params.floor_size - width);
            let z = spread(rng, params.floor_size - depth);

            ScatteredBox {
                size: Vector3::new(width, height, depth),
                center: Point3::new(x, height / 2.0, z),
                color: Color::from_hsl(hue, saturation, lightness),
            }
        })
        .collect();
    Ok(boxes)
}
