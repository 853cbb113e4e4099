use crate::core::geometry::Vertex;
use nalgebra::{Vector3, Vector4};
use std::ops::{Add, Mul};

/// Per-vertex data that can be blended across a primitive.
///
/// `Send + Sync` because fragments of one triangle are shaded on several
/// threads at once.
pub trait Interpolatable:
    Copy + Clone + Add<Output = Self> + Mul<f32, Output = Self> + Send + Sync
{
}

impl Interpolatable for Vector3<f32> {}

/// The programmable stages of the pipeline.
pub trait Shader: Send + Sync {
    type Varying: Interpolatable;

    /// Transforms a vertex into homogeneous clip space.
    ///
    /// `color` is the resolved base color of this corner (face corner color,
    /// vertex color or material color, in that order of precedence).
    fn vertex(&self, vertex: &Vertex, color: Vector3<f32>) -> (Vector4<f32>, Self::Varying);

    /// Linear RGB of a fragment from its interpolated varying.
    fn fragment(&self, varying: Self::Varying) -> Vector3<f32>;
}
