//! A scaled-down solar system: the Sun, eight orbiting planets, optional
//! orbit lines and a focus mode that follows one body with the camera.

use crate::core::color::Color;
use crate::core::math::interpolation::lerp;
use crate::error::{Error, Result};
use crate::geometry::primitives::{circle_lines, uv_sphere};
use crate::geometry::torus_mesh;
use crate::scene::animation::Animator;
use crate::scene::camera::Camera;
use crate::scene::material::Material;
use crate::scene::node::{SceneNode, Transform};
use log::info;
use nalgebra::{Point3, Vector3};
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;

/// A body of the system. The Sun is the one with `distance == 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub name: &'static str,
    /// Sphere radius.
    pub scale: f32,
    /// Orbit radius around the Sun.
    pub distance: f32,
    pub color: u32,
}

impl Body {
    pub fn is_sun(&self) -> bool {
        self.distance == 0.0
    }

    pub fn orbit_name(&self) -> String {
        format!("{}-orbit", self.name)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (size scale {}", self.name, self.scale)?;
        if self.is_sun() {
            write!(f, ")")
        } else {
            write!(f, ", {} units from the Sun)", self.distance)
        }
    }
}

/// The Sun keeps its own scale; every planet is three times its Earth-relative size.
pub const BODIES: [Body; 9] = [
    Body { name: "Sun", scale: 23.0, distance: 0.0, color: 0xffcc33 },
    Body { name: "Mercury", scale: 0.383 * 3.0, distance: 100.0, color: 0x9e9e9e },
    Body { name: "Venus", scale: 0.949 * 3.0, distance: 150.0, color: 0xe3bb76 },
    Body { name: "Earth", scale: 3.0, distance: 200.0, color: 0x2f6ee0 },
    Body { name: "Mars", scale: 0.532 * 3.0, distance: 300.0, color: 0xc1440e },
    Body { name: "Jupiter", scale: 11.21 * 3.0, distance: 450.0, color: 0xd8ca9d },
    Body { name: "Saturn", scale: 9.45 * 3.0, distance: 650.0, color: 0xead6b8 },
    Body { name: "Uranus", scale: 4.0 * 3.0, distance: 850.0, color: 0x9fe3e6 },
    Body { name: "Neptune", scale: 3.88 * 3.0, distance: 1050.0, color: 0x3f54ba },
];

pub const SYSTEM_NAME: &str = "solar-system";
pub const MARKER_NAME: &str = "focus-marker";
const ORBIT_SEGMENTS: u32 = 128;
const CAMERA_EASING: f32 = 0.005;

pub fn body(name: &str) -> Result<&'static Body> {
    BODIES
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownPlanet(name.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolarParams {
    /// Multiplies every orbital and spin speed.
    pub speed: f32,
    pub show_orbits: bool,
    pub focus: Option<String>,
    /// Camera distance from the focused body, in units of its radius.
    pub focus_distance: f32,
}

impl Default for SolarParams {
    fn default() -> Self {
        Self {
            speed: 10.0,
            show_orbits: true,
            focus: None,
            focus_distance: 1.0,
        }
    }
}

/// Position of `body` at time `elapsed`: angle `elapsed · speed / distance`
/// around the Sun in the XZ plane.
pub fn orbit_position(body: &Body, elapsed: f32, speed: f32) -> Point3<f32> {
    if body.is_sun() {
        return Point3::origin();
    }
    let angle = elapsed * speed / body.distance;
    Point3::new(angle.cos() * body.distance, 0.0, angle.sin() * body.distance)
}

/// Drives the solar-system scene.
#[derive(Debug, Clone)]
pub struct SolarSystem {
    params: SolarParams,
    focus: Option<&'static Body>,
}

impl SolarSystem {
    /// Fails with [`Error::UnknownPlanet`] when the focus names no body.
    pub fn new(params: SolarParams) -> Result<Self> {
        let focus = params.focus.as_deref().map(body).transpose()?;
        Ok(Self { params, focus })
    }

    pub fn params(&self) -> &SolarParams {
        &self.params
    }

    pub fn focused(&self) -> Option<&'static Body> {
        self.focus
    }

    /// Builds the system at time zero: one node per body plus orbit lines.
    pub fn build(&self) -> Result<SceneNode> {
        let mut root = SceneNode::group(SYSTEM_NAME);
        for b in &BODIES {
            let sphere = uv_sphere(b.scale, 32, 32)?;
            let material = if b.is_sun() {
                Material::basic(Color::from_hex(b.color))
            } else {
                Material::phong(Color::from_hex(b.color))
            };
            root.add_child(
                SceneNode::mesh(sphere, material)
                    .named(b.name)
                    .at(orbit_position(b, 0.0, self.params.speed).coords),
            );

            if !b.is_sun() {
                let ring = circle_lines(b.distance, ORBIT_SEGMENTS, Color::WHITE)?;
                let mut orbit = SceneNode::lines(ring, Material::basic(Color::WHITE)).named(b.orbit_name());
                orbit.visible = self.params.show_orbits;
                root.add_child(orbit);
            }
        }
        if let Some(b) = self.focus {
            root.add_child(marker(b, orbit_position(b, 0.0, self.params.speed))?);
        }
        Ok(root)
    }

    pub fn set_show_orbits(&mut self, root: &mut SceneNode, show: bool) {
        self.params.show_orbits = show;
        for b in BODIES.iter().filter(|b| !b.is_sun()) {
            if let Some(orbit) = root.find_mut(&b.orbit_name()) {
                orbit.visible = show;
            }
        }
    }

    /// Focuses `name` (or nothing): swaps the marker ring and jumps the
    /// camera next to the body. The ring goes into the system group when
    /// `root` holds one, so it is dropped along with that group.
    pub fn set_focus(
        &mut self,
        root: &mut SceneNode,
        camera: &mut Camera,
        name: Option<&str>,
    ) -> Result<()> {
        let focus = name.map(body).transpose()?;
        root.remove_child(MARKER_NAME);
        self.focus = focus;
        self.params.focus = focus.map(|b| b.name.to_string());

        let Some(b) = focus else {
            return Ok(());
        };
        let position = current_position(root, b);
        let ring = marker(b, position)?;
        match root.find_mut(SYSTEM_NAME) {
            Some(system) => system.add_child(ring),
            None => root.add_child(ring),
        }
        camera.position = position + self.camera_offset(b);
        camera.look_at(position);
        info!("Focused {b}");
        Ok(())
    }

    fn camera_offset(&self, b: &Body) -> Vector3<f32> {
        Vector3::new(1.0, 2.0, 1.0).normalize() * b.scale * self.params.focus_distance
    }
}

fn current_position(root: &SceneNode, b: &Body) -> Point3<f32> {
    root.find(b.name)
        .map(|n| Point3::from(n.transform.translation))
        .unwrap_or_else(Point3::origin)
}

/// Flat green ring around the focused body.
fn marker(b: &Body, position: Point3<f32>) -> Result<SceneNode> {
    let ring = torus_mesh(b.scale * 5.2, 0.03, 16, 100)?;
    let mut transform = Transform::from_translation(position.coords);
    transform.euler.x = FRAC_PI_2;
    Ok(SceneNode::mesh(Arc::new(ring), Material::basic(Color::GREEN))
        .named(MARKER_NAME)
        .with_transform(transform))
}

impl Animator for SolarSystem {
    fn update(&mut self, root: &mut SceneNode, camera: &mut Camera, dt: f32, elapsed: f32) -> Result<()> {
        let speed = self.params.speed;
        for b in &BODIES {
            let Some(node) = root.find_mut(b.name) else {
                continue;
            };
            if b.is_sun() {
                node.transform.euler.y += 0.05 * speed * dt;
            } else {
                node.transform.translation = orbit_position(b, elapsed, speed).coords;
                node.transform.euler.y += 0.1 * speed * dt;
            }
        }

        if let Some(b) = self.focus {
            let position = current_position(root, b);
            if let Some(marker) = root.find_mut(MARKER_NAME) {
                marker.transform.translation = position.coords;
            }
            let goal = position + self.camera_offset(b);
            camera.position = Point3::from(lerp(camera.position.coords, goal.coords, CAMERA_EASING));
            camera.look_at(position);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new_perspective(Point3::new(0.0, 500.0, 1500.0), Point3::origin(), 60.0, 1.0, 1.0, 4000.0)
    }

    #[test]
    fn planets_follow_their_orbits() {
        let mut system = SolarSystem::new(SolarParams::default()).unwrap();
        let mut root = system.build().unwrap();
        let mut cam = camera();

        system.update(&mut root, &mut cam, 0.1, 30.0).unwrap();
        let earth = root.find("Earth").unwrap().transform.translation;
        let angle = 30.0_f32 * 10.0 / 200.0;
        assert_relative_eq!(earth, Vector3::new(angle.cos() * 200.0, 0.0, angle.sin() * 200.0), epsilon = 1e-3);
        assert_relative_eq!(earth.norm(), 200.0, epsilon = 1e-3);

        assert_relative_eq!(root.find("Sun").unwrap().transform.euler.y, 0.05);
        assert_relative_eq!(root.find("Mars").unwrap().transform.euler.y, 0.1);
    }

    #[test]
    fn orbit_lines_toggle() {
        let mut system = SolarSystem::new(SolarParams::default()).unwrap();
        let mut root = system.build().unwrap();
        assert!(root.find("Neptune-orbit").unwrap().visible);
        system.set_show_orbits(&mut root, false);
        assert!(BODIES[1..].iter().all(|b| !root.find(&b.orbit_name()).unwrap().visible));
    }

    #[test]
    fn unknown_focus_is_rejected() {
        let params = SolarParams {
            focus: Some("Pluto".into()),
            ..Default::default()
        };
        assert!(matches!(SolarSystem::new(params), Err(Error::UnknownPlanet(name)) if name == "Pluto"));
    }

    #[test]
    fn focus_moves_marker_and_camera() {
        let mut system = SolarSystem::new(SolarParams::default()).unwrap();
        let mut root = system.build().unwrap();
        let mut cam = camera();

        system.set_focus(&mut root, &mut cam, Some("earth")).unwrap();
        assert_eq!(system.focused().map(|b| b.name), Some("Earth"));
        assert_relative_eq!(cam.target, Point3::new(200.0, 0.0, 0.0), epsilon = 1e-4);

        system.update(&mut root, &mut cam, 0.1, 10.0).unwrap();
        let earth = root.find("Earth").unwrap().transform.translation;
        let marker = root.find(MARKER_NAME).unwrap().transform.translation;
        assert_relative_eq!(marker, earth);
        assert_relative_eq!(cam.target.coords, earth);

        system.set_focus(&mut root, &mut cam, None).unwrap();
        assert!(root.find(MARKER_NAME).is_none());
    }
}
