use crate::error::Result;
use crate::scene::camera::Camera;
use crate::scene::node::SceneNode;

/// Per-frame update hook of a scene.
///
/// Called once per frame before rendering with the time since the previous
/// frame (`dt`) and since the start (`elapsed`), both in seconds.
pub trait Animator: Send {
    fn update(&mut self, root: &mut SceneNode, camera: &mut Camera, dt: f32, elapsed: f32)
    -> Result<()>;
}

/// Spins the rings of the nested-tori scene and pulses its center sphere.
#[derive(Debug, Clone)]
pub struct NestedToriAnimator {
    /// Node names of the rings, innermost speed first.
    pub rings: Vec<String>,
    pub sphere: String,
    pub rotation_speed: f32,
    pub pulse_speed: f32,
}

impl NestedToriAnimator {
    pub fn ring_name(index: usize) -> String {
        format!("torus-{index}")
    }

    pub fn pulse_scale(&self, elapsed: f32) -> f32 {
        (elapsed * self.pulse_speed).sin() * 0.25 + 1.0
    }
}

impl Animator for NestedToriAnimator {
    fn update(
        &mut self,
        root: &mut SceneNode,
        _camera: &mut Camera,
        dt: f32,
        elapsed: f32,
    ) -> Result<()> {
        for (i, name) in self.rings.iter().enumerate() {
            if let Some(ring) = root.find_mut(name) {
                let step = dt * (i + 1) as f32 * self.rotation_speed;
                ring.transform.euler.x += step;
                ring.transform.euler.y += step;
            }
        }
        let scale = self.pulse_scale(elapsed);
        if let Some(sphere) = root.find_mut(&self.sphere) {
            sphere.transform.scale.fill(scale);
        }
        Ok(())
    }
}
