//! The set of scenes the renderer knows how to build.

use crate::core::color::Color;
use crate::core::math::transform::TransformFactory;
use crate::error::{Error, Result};
use crate::geometry::helix::helix_placements;
use crate::geometry::primitives::{axes_lines, box_mesh, plane_mesh, square_mesh, triangle_mesh, uv_sphere};
use crate::geometry::scatter::random_boxes;
use crate::geometry::stack::{nested_tori, toroid_pyramid};
use crate::geometry::{
    cylinder_shell, regular_polygon_fan, sierpinski_tetrahedron, tetrahedron_mesh, torus_mesh,
    torus_with_starbursts,
};
use crate::io::config::{CameraConfig, Config};
use crate::scene::animation::{Animator, NestedToriAnimator};
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::material::Material;
use crate::scene::node::{SceneNode, Shape, Transform};
use crate::scene::orbit::OrbitControls;
use crate::scene::solar::SolarSystem;
use log::info;
use nalgebra::{Point3, Vector3};
use rand::Rng;
use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

const MAGENTA: u32 = 0xff00ff;
const TORUS_SEGMENTS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Triangle,
    Square,
    Polygon,
    Cylinder,
    StarburstTorus,
    Sierpinski,
    Helix,
    Boxes,
    ToroidPyramid,
    NestedTori,
    SolarSystem,
}

impl SceneKind {
    pub const ALL: [SceneKind; 11] = [
        SceneKind::Triangle,
        SceneKind::Square,
        SceneKind::Polygon,
        SceneKind::Cylinder,
        SceneKind::StarburstTorus,
        SceneKind::Sierpinski,
        SceneKind::Helix,
        SceneKind::Boxes,
        SceneKind::ToroidPyramid,
        SceneKind::NestedTori,
        SceneKind::SolarSystem,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Triangle => "triangle",
            SceneKind::Square => "square",
            SceneKind::Polygon => "polygon",
            SceneKind::Cylinder => "cylinder",
            SceneKind::StarburstTorus => "starburst-torus",
            SceneKind::Sierpinski => "sierpinski",
            SceneKind::Helix => "helix",
            SceneKind::Boxes => "boxes",
            SceneKind::ToroidPyramid => "toroid-pyramid",
            SceneKind::NestedTori => "nested-tori",
            SceneKind::SolarSystem => "solar-system",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SceneKind::Triangle => "a single hand-built triangle",
            SceneKind::Square => "two triangles sharing an edge",
            SceneKind::Polygon => "regular polygon fan with blended vertex colors",
            SceneKind::Cylinder => "open cylinder shell in wireframe",
            SceneKind::StarburstTorus => "wireframe torus dotted with colored star-bursts",
            SceneKind::Sierpinski => "recursive Sierpinski tetrahedron",
            SceneKind::Helix => "spheres along a helix",
            SceneKind::Boxes => "random translucent boxes on a floor",
            SceneKind::ToroidPyramid => "stacked tori with a cherry on top",
            SceneKind::NestedTori => "spinning nested tori around a pulsing sphere",
            SceneKind::SolarSystem => "the Sun and eight orbiting planets",
        }
    }

    /// Camera placement used when the config does not override it.
    fn default_view(self) -> View {
        let at = |x: f32, y: f32, z: f32| Point3::new(x, y, z);
        match self {
            SceneKind::Sierpinski => View::new(at(0.0, 0.0, 40.0), 40.0, 1.0, 100.0),
            SceneKind::Helix => View::new(at(0.0, 10.0, 30.0), 75.0, 0.1, 1000.0),
            SceneKind::Boxes => View::new(at(0.0, 100.0, 400.0), 40.0, 1.0, 1000.0),
            SceneKind::NestedTori => View::new(at(0.0, 60.0, 100.0), 60.0, 1.0, 1000.0),
            SceneKind::SolarSystem => View::new(at(0.0, 500.0, 1500.0), 60.0, 1.0, 4000.0),
            _ => View::new(at(0.0, 0.0, 30.0), 40.0, 1.0, 1000.0),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().replace('_', "-");
        SceneKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownScene(s.to_string()))
    }
}

struct View {
    position: Point3<f32>,
    target: Point3<f32>,
    fov: f32,
    near: f32,
    far: f32,
}

impl View {
    fn new(position: Point3<f32>, fov: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Point3::origin(),
            fov,
            near,
            far,
        }
    }

    fn with_overrides(self, overrides: &CameraConfig) -> Self {
        Self {
            position: overrides.position.map(Point3::from).unwrap_or(self.position),
            target: overrides.target.map(Point3::from).unwrap_or(self.target),
            fov: overrides.fov.unwrap_or(self.fov),
            near: overrides.near.unwrap_or(self.near),
            far: overrides.far.unwrap_or(self.far),
        }
    }
}

/// Everything needed to render and animate one scene.
pub struct Scene {
    pub kind: SceneKind,
    pub root: SceneNode,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub lights: Vec<Light>,
    pub ambient: Color,
    pub background: Color,
    pub animator: Option<Box<dyn Animator>>,
}

/// Geometry totals over the whole graph, invisible nodes included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub nodes: usize,
    pub meshes: usize,
    pub vertices: usize,
    pub faces: usize,
    pub segments: usize,
}

impl fmt::Display for SceneStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} meshes, {} vertices, {} faces, {} line segments",
            self.nodes, self.meshes, self.vertices, self.faces, self.segments
        )
    }
}

impl Scene {
    pub fn stats(&self) -> SceneStats {
        fn walk(node: &SceneNode, stats: &mut SceneStats) {
            stats.nodes += 1;
            match &node.shape {
                Some(Shape::Mesh(mesh)) => {
                    stats.meshes += 1;
                    stats.vertices += mesh.vertex_count();
                    stats.faces += mesh.face_count();
                }
                Some(Shape::Lines(lines)) => stats.segments += lines.segment_count(),
                None => {}
            }
            for child in &node.children {
                walk(child, stats);
            }
        }
        let mut stats = SceneStats::default();
        walk(&self.root, &mut stats);
        stats
    }

    /// Advances the scene by one frame: the animator first, then the orbit
    /// controls.
    pub fn update(&mut self, dt: f32, elapsed: f32) -> Result<()> {
        if let Some(animator) = self.animator.as_mut() {
            animator.update(&mut self.root, &mut self.camera, dt, elapsed)?;
        }
        self.orbit.update(dt, &mut self.camera);
        Ok(())
    }

    /// Rebuilds the scene's subject from `config` and swaps it in, dropping
    /// the previous geometry. Camera, lights and helpers stay as they are.
    pub fn regenerate<R: Rng>(&mut self, config: &Config, rng: &mut R) -> Result<()> {
        let subject = build_subject(self.kind, config, rng)?;
        if self.root.replace_child(self.kind.name(), subject.node).is_none() {
            return Err(Error::Config(format!(
                "scene '{}' has no node to regenerate",
                self.kind
            )));
        }
        if subject.animator.is_some() {
            self.animator = subject.animator;
        }
        Ok(())
    }
}

/// The main content of a scene: a node named after the kind, plus its
/// per-frame driver if it moves.
struct Subject {
    node: SceneNode,
    animator: Option<Box<dyn Animator>>,
}

impl Subject {
    fn still(node: SceneNode) -> Self {
        Self { node, animator: None }
    }
}

/// Assembles `kind` from its config table. All randomness comes from `rng`.
pub fn build<R: Rng>(kind: SceneKind, config: &Config, rng: &mut R) -> Result<Scene> {
    let render = &config.render;
    let aspect = render.width as f32 / render.height as f32;
    let view = kind.default_view().with_overrides(&config.camera);
    let mut camera = Camera::new_perspective(view.position, view.target, view.fov, aspect, view.near, view.far);

    let subject = build_subject(kind, config, rng)?;
    let mut root = SceneNode::group("scene").with_child(subject.node);
    if let Some(size) = axes_size(kind) {
        root.add_child(
            SceneNode::lines(axes_lines(size), Material::vertex_colored()).named("axes"),
        );
    }

    let mut orbit = OrbitControls::from_camera(&camera);
    orbit.auto_rotate_speed = config.camera.auto_rotate.to_radians();

    let mut animator = subject.animator;
    if kind == SceneKind::SolarSystem {
        let params = config.solar_system.params();
        let mut system = SolarSystem::new(params.clone())?;
        if let Some(focus) = params.focus.as_deref() {
            system.set_focus(&mut root, &mut camera, Some(focus))?;
            // The focus animation owns the camera from here on.
            orbit.enabled = false;
        }
        animator = Some(Box::new(system));
    }

    let (lights, ambient) = lighting(kind);
    let scene = Scene {
        kind,
        root,
        camera,
        orbit,
        lights,
        ambient,
        background: Color::from_hex(render.background),
        animator,
    };
    info!("Built scene '{}': {}", kind, scene.stats());
    Ok(scene)
}

fn axes_size(kind: SceneKind) -> Option<f32> {
    match kind {
        SceneKind::Triangle | SceneKind::Square | SceneKind::Polygon | SceneKind::ToroidPyramid => Some(10.0),
        SceneKind::Boxes => Some(100.0),
        _ => None,
    }
}

fn lighting(kind: SceneKind) -> (Vec<Light>, Color) {
    match kind {
        SceneKind::Helix => (
            vec![Light::new_point(Point3::new(10.0, 20.0, 20.0), Color::WHITE, 1.0, Some(100.0))],
            Color::from_hex(0x404040),
        ),
        SceneKind::NestedTori => (
            vec![Light::new_point(Point3::new(0.0, 50.0, 0.0), Color::WHITE, 1.0, Some(1000.0))],
            Color::from_hex(0x222222),
        ),
        SceneKind::SolarSystem => (
            vec![Light::new_point(Point3::origin(), Color::WHITE, 1.5, None)],
            Color::from_hex(0x333333),
        ),
        _ => (Vec::new(), Color::BLACK),
    }
}

fn build_subject<R: Rng>(kind: SceneKind, config: &Config, rng: &mut R) -> Result<Subject> {
    let subject = match kind {
        SceneKind::Triangle => Subject::still(SceneNode::mesh(
            triangle_mesh()?,
            Material::basic(Color::from_hex(MAGENTA)).with_double_sided(true),
        )),
        SceneKind::Square => Subject::still(SceneNode::mesh(
            square_mesh()?,
            Material::basic(Color::from_hex(MAGENTA)).with_double_sided(true),
        )),
        SceneKind::Polygon => {
            let p = &config.polygon;
            let fan = regular_polygon_fan(p.sides, p.radius, Color::from_hex(p.inner), Color::from_hex(p.outer))?;
            Subject::still(SceneNode::mesh(fan, Material::vertex_colored()))
        }
        SceneKind::Cylinder => {
            let c = &config.cylinder;
            let shell = cylinder_shell(c.segments, c.radius, c.length)?;
            Subject::still(SceneNode::mesh(
                shell,
                Material::basic(Color::from_hex(c.color)).with_wireframe(c.wireframe),
            ))
        }
        SceneKind::StarburstTorus => Subject::still(starburst_torus(config, rng)?),
        SceneKind::Sierpinski => Subject::still(sierpinski(config)?),
        SceneKind::Helix => Subject::still(helix(config)?),
        SceneKind::Boxes => Subject::still(boxes(config, rng)?),
        SceneKind::ToroidPyramid => Subject::still(pyramid(config)?),
        SceneKind::NestedTori => nested(config)?,
        SceneKind::SolarSystem => {
            let system = SolarSystem::new(config.solar_system.params())?;
            Subject::still(system.build()?)
        }
    };
    Ok(Subject {
        node: subject.node.named(kind.name()),
        animator: subject.animator,
    })
}

fn starburst_torus<R: Rng>(config: &Config, rng: &mut R) -> Result<SceneNode> {
    let c = &config.starburst_torus;
    let torus = torus_with_starbursts(&c.params(), rng)?;

    let mut group = SceneNode::default().with_child(SceneNode::mesh(
        torus.surface,
        Material::basic(Color::from_hex(c.color)).with_wireframe(true),
    ));
    for (i, appendage) in torus.appendages.into_iter().enumerate() {
        let transform = Transform {
            translation: appendage.position.coords,
            orientation: TransformFactory::align(&Vector3::y(), &appendage.normal),
            ..Default::default()
        };
        group.add_child(
            SceneNode::lines(appendage.rays, Material::vertex_colored())
                .named(format!("starburst-{i}"))
                .with_transform(transform),
        );
    }
    Ok(group)
}

fn sierpinski(config: &Config) -> Result<SceneNode> {
    let c = &config.sierpinski;
    let placements = sierpinski_tetrahedron(c.level, c.size, Point3::origin());
    let material = Material::basic(Color::from_hex(c.color));

    // Every leaf of one level has the same size.
    let leaf = Arc::new(tetrahedron_mesh(c.size / 2f32.powi(c.level as i32))?);
    let mut group = SceneNode::default();
    group.children.reserve(placements.len());
    for placed in placements {
        group.add_child(SceneNode::mesh(Arc::clone(&leaf), material.clone()).at(placed.position.coords));
    }
    Ok(group)
}

fn helix(config: &Config) -> Result<SceneNode> {
    let c = &config.helix;
    let sphere = Arc::new(uv_sphere(c.sphere_radius, 12, 12)?);
    let material = Material::lambert(Color::from_hex(c.color));

    let mut group = SceneNode::default();
    for placement in helix_placements(&c.params()) {
        let transform = Transform {
            translation: placement.position.coords,
            orientation: placement.rotation,
            ..Default::default()
        };
        group.add_child(SceneNode::mesh(Arc::clone(&sphere), material.clone()).with_transform(transform));
    }
    Ok(group)
}

fn boxes<R: Rng>(config: &Config, rng: &mut R) -> Result<SceneNode> {
    let c = &config.boxes;
    let mut floor = SceneNode::mesh(
        plane_mesh(c.floor_size, c.floor_size)?,
        Material::basic(Color::from_hex(c.floor_color)).with_double_sided(true),
    )
    .named("floor");
    floor.transform.euler.x = -FRAC_PI_2;

    let mut group = SceneNode::default().with_child(floor);
    for b in random_boxes(&c.params(), rng)? {
        group.add_child(
            SceneNode::mesh(
                box_mesh(b.size.x, b.size.y, b.size.z)?,
                Material::basic(b.color).with_opacity(c.opacity),
            )
            .at(b.center.coords),
        );
    }
    Ok(group)
}

fn pyramid(config: &Config) -> Result<SceneNode> {
    let pyramid = toroid_pyramid(&config.toroid_pyramid.params())?;

    let mut group = SceneNode::default();
    for ring in pyramid.rings {
        let mut node = SceneNode::mesh(
            torus_mesh(ring.major_radius, ring.minor_radius, TORUS_SEGMENTS, TORUS_SEGMENTS)?,
            Material::basic(ring.color).with_double_sided(true),
        )
        .at(Vector3::new(0.0, ring.height, 0.0));
        node.transform.euler.x = FRAC_PI_2;
        group.add_child(node);
    }
    group.add_child(
        SceneNode::mesh(uv_sphere(pyramid.cherry_radius, 32, 32)?, Material::basic(Color::RED))
            .named("cherry")
            .at(Vector3::new(0.0, pyramid.cherry_height, 0.0)),
    );
    Ok(group)
}

fn nested(config: &Config) -> Result<Subject> {
    let c = &config.nested_tori;
    let params = c.params();

    let mut group = SceneNode::default();
    let mut names = Vec::with_capacity(params.count);
    for (i, ring) in nested_tori(&params)?.into_iter().enumerate() {
        let name = NestedToriAnimator::ring_name(i);
        group.add_child(
            SceneNode::mesh(
                torus_mesh(ring.major_radius, ring.minor_radius, TORUS_SEGMENTS, TORUS_SEGMENTS)?,
                Material::phong(ring.color),
            )
            .named(name.clone()),
        );
        names.push(name);
    }
    group.add_child(
        SceneNode::mesh(uv_sphere(params.minor_radius, 32, 32)?, Material::phong(Color::WHITE)).named("sphere"),
    );

    let animator = NestedToriAnimator {
        rings: names,
        sphere: "sphere".to_string(),
        rotation_speed: params.rotation_speed,
        pulse_speed: params.pulse_speed,
    };
    Ok(Subject {
        node: group,
        animator: Some(Box::new(animator)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.sierpinski.level = 2;
        config.starburst_torus.count = 5;
        config.boxes.count = 7;
        config
    }

    #[test]
    fn names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().unwrap(), kind);
        }
        assert_eq!("Solar_System".parse::<SceneKind>().unwrap(), SceneKind::SolarSystem);
        assert!(matches!("teapot".parse::<SceneKind>(), Err(Error::UnknownScene(_))));
    }

    #[test]
    fn every_kind_builds() {
        let config = small_config();
        let mut rng = StdRng::seed_from_u64(1);
        for kind in SceneKind::ALL {
            let scene = build(kind, &config, &mut rng).unwrap();
            assert!(scene.root.find(kind.name()).is_some(), "{kind}");
            assert!(scene.stats().nodes >= 2);
        }
    }

    #[test]
    fn sierpinski_has_one_node_per_leaf() {
        let config = small_config();
        let scene = build(SceneKind::Sierpinski, &config, &mut StdRng::seed_from_u64(0)).unwrap();
        let stats = scene.stats();
        assert_eq!(stats.meshes, 16);
        assert_eq!(stats.faces, 16 * 4);
    }

    #[test]
    fn starbursts_regenerate_in_place() {
        let config = small_config();
        let mut rng = StdRng::seed_from_u64(3);
        let mut scene = build(SceneKind::StarburstTorus, &config, &mut rng).unwrap();
        let nodes = scene.stats().nodes;
        let before = scene.stats().segments;

        scene.regenerate(&config, &mut rng).unwrap();
        assert_eq!(scene.stats().nodes, nodes);
        assert_eq!(scene.root.find("starburst-torus").map(|n| n.children.len()), Some(6));
        assert!(before >= 5 * 10);
    }

    #[test]
    fn camera_overrides_apply() {
        let mut config = small_config();
        config.camera.position = Some([1.0, 2.0, 3.0]);
        config.camera.fov = Some(90.0);
        let scene = build(SceneKind::Polygon, &config, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(scene.camera.position, Point3::new(1.0, 2.0, 3.0));
        assert!((scene.camera.fov_y_rad - FRAC_PI_2).abs() < 1e-6);
    }

    fn count_named(node: &SceneNode, name: &str) -> usize {
        let own = usize::from(node.name.as_deref() == Some(name));
        own + node.children.iter().map(|c| count_named(c, name)).sum::<usize>()
    }

    #[test]
    fn regenerating_a_focused_system_keeps_one_marker() {
        use crate::scene::solar::{MARKER_NAME, SYSTEM_NAME};

        let mut config = small_config();
        config.solar_system.focus = Some("Earth".into());
        let mut rng = StdRng::seed_from_u64(0);
        let mut scene = build(SceneKind::SolarSystem, &config, &mut rng).unwrap();
        assert_eq!(count_named(&scene.root, MARKER_NAME), 1);

        for _ in 0..4 {
            scene.regenerate(&config, &mut rng).unwrap();
            assert_eq!(count_named(&scene.root, MARKER_NAME), 1);
        }
        let system = scene.root.find(SYSTEM_NAME).unwrap();
        assert!(system.children.iter().any(|c| c.name.as_deref() == Some(MARKER_NAME)));

        // The surviving ring is the one the animation moves.
        scene.update(0.1, 30.0).unwrap();
        let earth = scene.root.find("Earth").unwrap().transform.translation;
        let marker = scene.root.find(MARKER_NAME).unwrap().transform.translation;
        assert_eq!(marker, earth);
    }

    #[test]
    fn solar_focus_hands_camera_to_animation() {
        let mut config = small_config();
        config.solar_system.focus = Some("mars".into());
        let scene = build(SceneKind::SolarSystem, &config, &mut StdRng::seed_from_u64(0)).unwrap();
        assert!(!scene.orbit.enabled);
        assert!(scene.root.find(crate::scene::solar::MARKER_NAME).is_some());

        config.solar_system.focus = Some("vulcan".into());
        assert!(matches!(
            build(SceneKind::SolarSystem, &config, &mut StdRng::seed_from_u64(0)),
            Err(Error::UnknownPlanet(_))
        ));
    }
}
