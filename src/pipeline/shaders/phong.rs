use crate::core::geometry::Vertex;
use crate::core::pipeline::{Interpolatable, Shader};
use crate::scene::light::Light;
use crate::scene::material::PhongMaterial;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::ops::{Add, Mul};

/// Data interpolated across the triangle for per-fragment lighting.
#[derive(Clone, Copy, Debug)]
pub struct PhongVarying {
    /// World space, not normalized after interpolation.
    pub normal: Vector3<f32>,
    pub world_pos: Point3<f32>,
    /// Resolved diffuse color of the corner.
    pub color: Vector3<f32>,
}

// Point3 has no Point3 + Point3, so positions blend through their coordinates.
impl Add for PhongVarying {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            normal: self.normal + other.normal,
            world_pos: Point3::from(self.world_pos.coords + other.world_pos.coords),
            color: self.color + other.color,
        }
    }
}

impl Mul<f32> for PhongVarying {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            normal: self.normal * scalar,
            world_pos: Point3::from(self.world_pos.coords * scalar),
            color: self.color * scalar,
        }
    }
}

impl Interpolatable for PhongVarying {}

/// Ambient + diffuse + specular over every scene light.
pub struct PhongShader<'a> {
    model_matrix: Matrix4<f32>,
    mvp_matrix: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    camera_pos: Point3<f32>,

    lights: &'a [Light],
    ambient: Vector3<f32>,

    specular: Vector3<f32>,
    shininess: f32,
}

impl<'a> PhongShader<'a> {
    pub fn new(
        model: Matrix4<f32>,
        view_projection: Matrix4<f32>,
        camera_pos: Point3<f32>,
        lights: &'a [Light],
        ambient: Vector3<f32>,
        material: &PhongMaterial,
    ) -> Self {
        // Inverse transpose keeps normals perpendicular under non-uniform scale.
        let linear = model.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inv| inv.transpose())
            .unwrap_or(linear);

        Self {
            model_matrix: model,
            mvp_matrix: view_projection * model,
            normal_matrix,
            camera_pos,
            lights,
            ambient,
            specular: material.specular.to_vector(),
            shininess: material.shininess,
        }
    }
}

impl Shader for PhongShader<'_> {
    type Varying = PhongVarying;

    fn vertex(&self, vertex: &Vertex, color: Vector3<f32>) -> (Vector4<f32>, Self::Varying) {
        let world_pos = self.model_matrix.transform_point(&vertex.position);
        let normal = (self.normal_matrix * vertex.normal)
            .try_normalize(1e-9)
            .unwrap_or_else(Vector3::zeros);
        let clip_pos = self.mvp_matrix * vertex.position.to_homogeneous();

        (
            clip_pos,
            PhongVarying {
                normal,
                world_pos,
                color,
            },
        )
    }

    fn fragment(&self, varying: Self::Varying) -> Vector3<f32> {
        let diffuse_color = varying.color;
        let mut result = self.ambient.component_mul(&diffuse_color);

        let Some(normal) = varying.normal.try_normalize(1e-9) else {
            return result;
        };
        let view_dir = (self.camera_pos - varying.world_pos)
            .try_normalize(1e-9)
            .unwrap_or(normal);

        for light in self.lights {
            let light_dir = light.direction_to_light(&varying.world_pos);
            let radiance = light.radiance(&varying.world_pos);

            let diff = normal.dot(&light_dir).max(0.0);
            if diff <= 0.0 {
                continue;
            }
            result += radiance.component_mul(&diffuse_color) * diff;

            let reflect_dir = normal * (2.0 * normal.dot(&light_dir)) - light_dir;
            let spec = view_dir.dot(&reflect_dir).max(0.0).powf(self.shininess);
            result += radiance.component_mul(&self.specular) * spec;
        }

        result.map(|c| c.min(1.0))
    }
}
