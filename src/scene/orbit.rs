use crate::scene::camera::Camera;
use nalgebra::{Point3, Vector3};
use std::f32::consts::PI;

/// Keeps a camera on a sphere around a target point.
///
/// The camera position is `target + radius · (sin φ sin θ, cos φ, sin φ cos θ)`
/// with azimuth `θ` around +Y and polar angle `φ` measured from +Y.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub radius: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Azimuth change per second, radians.
    pub auto_rotate_speed: f32,
    /// Disabled controls leave the camera untouched.
    pub enabled: bool,
}

const POLAR_EPSILON: f32 = 1e-3;

impl OrbitControls {
    /// Picks up the camera's current placement around its target.
    pub fn from_camera(camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.norm().max(f32::EPSILON);
        Self {
            target: camera.target,
            radius,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            min_radius: 0.0,
            max_radius: f32::INFINITY,
            auto_rotate_speed: 0.0,
            enabled: true,
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.azimuth -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.polar = (self.polar - angle).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Scales the distance to the target; factors below 1 move closer.
    pub fn dolly(&mut self, factor: f32) {
        if factor > 0.0 {
            self.radius = (self.radius * factor).clamp(self.min_radius, self.max_radius);
        }
    }

    pub fn offset(&self) -> Vector3<f32> {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vector3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.radius
    }

    /// Advances auto-rotation by `dt` seconds and writes the camera.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) {
        if !self.enabled {
            return;
        }
        self.azimuth += self.auto_rotate_speed * dt;
        camera.position = self.target + self.offset();
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn camera_at(position: Point3<f32>) -> Camera {
        Camera::new_perspective(position, Point3::origin(), 40.0, 1.0, 1.0, 1000.0)
    }

    #[test]
    fn round_trips_the_camera_placement() {
        let mut camera = camera_at(Point3::new(0.0, 100.0, 400.0));
        let mut orbit = OrbitControls::from_camera(&camera);
        orbit.update(0.0, &mut camera);
        assert_relative_eq!(camera.position, Point3::new(0.0, 100.0, 400.0), epsilon = 1e-3);
    }

    #[test]
    fn auto_rotation_keeps_the_distance() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 30.0));
        let mut orbit = OrbitControls::from_camera(&camera);
        orbit.auto_rotate_speed = std::f32::consts::FRAC_PI_2;
        orbit.update(1.0, &mut camera);
        assert_relative_eq!(camera.position, Point3::new(30.0, 0.0, 0.0), epsilon = 1e-3);
        assert_relative_eq!(camera.target, Point3::origin());
    }

    #[test]
    fn rotate_left_swings_around_the_vertical() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 30.0));
        let mut orbit = OrbitControls::from_camera(&camera);
        orbit.rotate_left(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(orbit.azimuth, -std::f32::consts::FRAC_PI_2);
        orbit.update(0.0, &mut camera);
        assert_relative_eq!(camera.position, Point3::new(-30.0, 0.0, 0.0), epsilon = 1e-3);
    }

    #[test]
    fn rotate_up_stops_short_of_the_poles() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 30.0));
        let mut orbit = OrbitControls::from_camera(&camera);

        orbit.rotate_up(0.25);
        assert_relative_eq!(orbit.polar, FRAC_PI_2 - 0.25, epsilon = 1e-6);

        orbit.rotate_up(10.0);
        assert_relative_eq!(orbit.polar, POLAR_EPSILON);
        orbit.update(0.0, &mut camera);
        assert!(camera.position.y > 29.99 && camera.position.y < 30.0);
        assert_relative_eq!(camera.position.coords.norm(), 30.0, epsilon = 1e-3);

        orbit.rotate_up(-10.0);
        assert_relative_eq!(orbit.polar, PI - POLAR_EPSILON);
        orbit.update(0.0, &mut camera);
        assert!(camera.position.y < -29.99);
    }

    #[test]
    fn dolly_and_disabled_controls() {
        let mut camera = camera_at(Point3::new(0.0, 0.0, 30.0));
        let mut orbit = OrbitControls::from_camera(&camera);
        orbit.dolly(0.5);
        orbit.enabled = false;
        orbit.update(1.0, &mut camera);
        assert_relative_eq!(camera.position.z, 30.0);
        orbit.enabled = true;
        orbit.update(0.0, &mut camera);
        assert_relative_eq!(camera.position.z, 15.0, epsilon = 1e-4);
    }
}
