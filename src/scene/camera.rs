use crate::core::math::transform::TransformFactory;
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective camera with cached view and projection matrices.
///
/// Call [`Camera::update_matrices`] after changing any public field.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view, radians.
    pub fov_y_rad: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,

    view_matrix: Matrix4<f32>,
    projection_matrix: Matrix4<f32>,
}

impl Camera {
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        fov_y_deg: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up: Vector3::y(),
            fov_y_rad: fov_y_deg.to_radians(),
            aspect_ratio,
            near,
            far,
            view_matrix: Matrix4::identity(),
            projection_matrix: Matrix4::identity(),
        };
        cam.update_matrices();
        cam
    }

    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up);
        self.projection_matrix =
            TransformFactory::perspective(self.aspect_ratio, self.fov_y_rad, self.near, self.far);
    }

    /// Points the camera at `target` and refreshes the matrices.
    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
        self.update_matrices();
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix * self.view_matrix
    }
}
