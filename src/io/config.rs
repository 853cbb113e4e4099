use crate::error::{Error, Result};
use crate::geometry::helix::HelixParams;
use crate::geometry::scatter::BoxFieldParams;
use crate::geometry::stack::{NestedToriParams, PyramidParams};
use crate::geometry::torus::TorusParams;
use crate::scene::solar::SolarParams;
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Deepest Sierpinski level the config accepts (4^10 leaves).
pub const MAX_FRACTAL_LEVEL: u32 = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub scene: SceneConfig,

    // --- One table per scene kind ---
    #[serde(default)]
    pub polygon: PolygonConfig,
    #[serde(default)]
    pub cylinder: CylinderConfig,
    #[serde(default)]
    pub starburst_torus: StarburstTorusConfig,
    #[serde(default)]
    pub sierpinski: SierpinskiConfig,
    #[serde(default)]
    pub helix: HelixConfig,
    #[serde(default)]
    pub boxes: BoxesConfig,
    #[serde(default)]
    pub toroid_pyramid: ToroidPyramidConfig,
    #[serde(default)]
    pub nested_tori: NestedToriConfig,
    #[serde(default)]
    pub solar_system: SolarSystemConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: usize,
    #[serde(default = "default_height")]
    pub height: usize,
    /// Supersampling factor per axis (1 = off).
    #[serde(default = "default_samples")]
    pub samples: usize,
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_frames")]
    pub frames: usize,
    /// Simulated frame rate; sets `dt` between frames.
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Clear color as `0xRRGGBB`.
    #[serde(default)]
    pub background: u32,
    /// Gamma-encode colors when writing images. Off, hex colors are written as given.
    #[serde(default)]
    pub gamma: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            samples: default_samples(),
            output: default_output(),
            frames: default_frames(),
            fps: default_fps(),
            background: 0x000000,
            gamma: false,
        }
    }
}

fn default_width() -> usize {
    800
}
fn default_height() -> usize {
    600
}
fn default_samples() -> usize {
    2
}
fn default_output() -> String {
    "output.png".to_string()
}
fn default_frames() -> usize {
    1
}
fn default_fps() -> f32 {
    30.0
}

/// Optional overrides of the camera each scene sets up for itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CameraConfig {
    pub position: Option<[f32; 3]>,
    pub target: Option<[f32; 3]>,
    /// Vertical field of view, degrees.
    pub fov: Option<f32>,
    pub near: Option<f32>,
    pub far: Option<f32>,
    /// Orbit speed around the target in degrees per second.
    #[serde(default)]
    pub auto_rotate: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneConfig {
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Seed of every random choice; unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            seed: None,
        }
    }
}

fn default_kind() -> String {
    "sierpinski".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolygonConfig {
    pub sides: u32,
    pub radius: f32,
    pub inner: u32,
    pub outer: u32,
}

impl Default for PolygonConfig {
    fn default() -> Self {
        Self {
            sides: 8,
            radius: 5.0,
            inner: 0xff0000,
            outer: 0x0000ff,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CylinderConfig {
    pub segments: u32,
    pub radius: f32,
    pub length: f32,
    pub color: u32,
    pub wireframe: bool,
}

impl Default for CylinderConfig {
    fn default() -> Self {
        Self {
            segments: 8,
            radius: 5.0,
            length: 10.0,
            color: 0xff0000,
            wireframe: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StarburstTorusConfig {
    pub major_radius: f32,
    pub minor_radius: f32,
    pub count: usize,
    pub burst_radius: f32,
    pub max_rays: u32,
    pub radial_segments: u32,
    pub tubular_segments: u32,
    pub color: u32,
}

impl Default for StarburstTorusConfig {
    fn default() -> Self {
        let p = TorusParams::default();
        Self {
            major_radius: p.major_radius,
            minor_radius: p.minor_radius,
            count: p.count,
            burst_radius: p.burst_radius,
            max_rays: p.max_rays,
            radial_segments: p.radial_segments,
            tubular_segments: p.tubular_segments,
            color: 0x444444,
        }
    }
}

impl StarburstTorusConfig {
    pub fn params(&self) -> TorusParams {
        TorusParams {
            major_radius: self.major_radius,
            minor_radius: self.minor_radius,
            count: self.count,
            burst_radius: self.burst_radius,
            max_rays: self.max_rays,
            radial_segments: self.radial_segments,
            tubular_segments: self.tubular_segments,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SierpinskiConfig {
    pub level: u32,
    pub size: f32,
    pub color: u32,
}

impl Default for SierpinskiConfig {
    fn default() -> Self {
        Self {
            level: 7,
            size: 10.0,
            color: 0xff0000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HelixConfig {
    pub count: usize,
    pub radius: f32,
    /// Angle between neighbors, degrees.
    pub angle: f32,
    pub distance: f32,
    pub sphere_radius: f32,
    pub color: u32,
}

impl Default for HelixConfig {
    fn default() -> Self {
        Self {
            count: 49,
            radius: 2.0,
            angle: 45.0,
            distance: 0.5,
            sphere_radius: 1.0,
            color: 0x0000ff,
        }
    }
}

impl HelixConfig {
    pub fn params(&self) -> HelixParams {
        HelixParams {
            count: self.count,
            radius: self.radius,
            angle: self.angle.to_radians(),
            distance: self.distance,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoxesConfig {
    pub count: usize,
    pub min_side: f32,
    pub max_side: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub floor_size: f32,
    pub floor_color: u32,
    pub opacity: f32,
}

impl Default for BoxesConfig {
    fn default() -> Self {
        let p = BoxFieldParams::default();
        Self {
            count: p.count,
            min_side: p.min_side,
            max_side: p.max_side,
            min_height: p.min_height,
            max_height: p.max_height,
            floor_size: p.floor_size,
            floor_color: 0x808080,
            opacity: 0.8,
        }
    }
}

impl BoxesConfig {
    pub fn params(&self) -> BoxFieldParams {
        BoxFieldParams {
            count: self.count,
            min_side: self.min_side,
            max_side: self.max_side,
            min_height: self.min_height,
            max_height: self.max_height,
            floor_size: self.floor_size,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToroidPyramidConfig {
    pub count: usize,
    pub bottom_major_radius: f32,
    pub major_radius_step: f32,
    pub minor_radius_factor: f32,
}

impl Default for ToroidPyramidConfig {
    fn default() -> Self {
        let p = PyramidParams::default();
        Self {
            count: p.count,
            bottom_major_radius: p.bottom_major_radius,
            major_radius_step: p.major_radius_step,
            minor_radius_factor: p.minor_radius_factor,
        }
    }
}

impl ToroidPyramidConfig {
    pub fn params(&self) -> PyramidParams {
        PyramidParams {
            count: self.count,
            bottom_major_radius: self.bottom_major_radius,
            major_radius_step: self.major_radius_step,
            minor_radius_factor: self.minor_radius_factor,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NestedToriConfig {
    pub count: usize,
    pub major_radius: f32,
    pub minor_radius: f32,
    pub rotation_speed: f32,
    pub pulse_speed: f32,
}

impl Default for NestedToriConfig {
    fn default() -> Self {
        let p = NestedToriParams::default();
        Self {
            count: p.count,
            major_radius: p.major_radius,
            minor_radius: p.minor_radius,
            rotation_speed: p.rotation_speed,
            pulse_speed: p.pulse_speed,
        }
    }
}

impl NestedToriConfig {
    pub fn params(&self) -> NestedToriParams {
        NestedToriParams {
            count: self.count,
            major_radius: self.major_radius,
            minor_radius: self.minor_radius,
            rotation_speed: self.rotation_speed,
            pulse_speed: self.pulse_speed,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolarSystemConfig {
    pub speed: f32,
    pub show_orbits: bool,
    pub focus: Option<String>,
    pub focus_distance: f32,
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        let p = SolarParams::default();
        Self {
            speed: p.speed,
            show_orbits: p.show_orbits,
            focus: p.focus,
            focus_distance: p.focus_distance,
        }
    }
}

impl SolarSystemConfig {
    pub fn params(&self) -> SolarParams {
        SolarParams {
            speed: self.speed,
            show_orbits: self.show_orbits,
            focus: self.focus.clone(),
            focus_distance: self.focus_distance,
        }
    }
}

impl Config {
    /// Reads and parses `path`. Nothing is checked yet; overrides go in
    /// first, then [`Config::validate`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| Error::Config(format!("failed to parse TOML: {e}")))?;
        Ok(config)
    }

    /// Rejects settings no frame can be produced with and clamps the
    /// fractal level to [`MAX_FRACTAL_LEVEL`].
    pub fn validate(mut self) -> Result<Self> {
        let render = &self.render;
        if render.width == 0 || render.height == 0 {
            return Err(Error::Config(format!(
                "image size must be non-zero, got {}x{}",
                render.width, render.height
            )));
        }
        if render.samples == 0 {
            return Err(Error::Config("samples must be at least 1".into()));
        }
        if render.frames == 0 {
            return Err(Error::Config("frames must be at least 1".into()));
        }
        if !(render.fps.is_finite() && render.fps > 0.0) {
            return Err(Error::Config(format!("fps must be positive, got {}", render.fps)));
        }

        if self.sierpinski.level > MAX_FRACTAL_LEVEL {
            warn!(
                "Sierpinski level {} clamped to {}",
                self.sierpinski.level, MAX_FRACTAL_LEVEL
            );
            self.sierpinski.level = MAX_FRACTAL_LEVEL;
        }
        if !(0.0..=1.0).contains(&self.boxes.opacity) {
            warn!("Box opacity {} clamped to [0, 1]", self.boxes.opacity);
            self.boxes.opacity = self.boxes.opacity.clamp(0.0, 1.0);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.render.width, 800);
        assert_eq!(config.scene.kind, "sierpinski");
        assert_eq!(config.polygon.sides, 8);
        assert_eq!(config.polygon.inner, 0xff0000);
        assert_eq!(config.sierpinski.level, 7);
        assert_eq!(config.starburst_torus.count, 100);
        assert_eq!(config.boxes.floor_size, 200.0);
        assert!(config.solar_system.show_orbits);
        assert!(config.camera.position.is_none());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [scene]
            kind = "polygon"
            seed = 9

            [polygon]
            sides = 5
            outer = 0x00ff00
            "#,
        )
        .unwrap();
        assert_eq!(config.scene.seed, Some(9));
        assert_eq!(config.polygon.sides, 5);
        assert_eq!(config.polygon.radius, 5.0);
        assert_eq!(config.polygon.outer, 0x00ff00);
    }

    #[test]
    fn fractal_level_is_capped() {
        let config = Config::from_toml("[sierpinski]\nlevel = 14\n").unwrap();
        assert_eq!(config.sierpinski.level, 14);
        let config = config.validate().unwrap();
        assert_eq!(config.sierpinski.level, MAX_FRACTAL_LEVEL);
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let config = Config::from_toml("[render]\nwidth = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(matches!(Config::from_toml("[render\n"), Err(Error::Config(_))));
    }
}
