pub mod animation;
pub mod camera;
pub mod catalog;
pub mod light;
pub mod material;
pub mod node;
pub mod orbit;
pub mod solar;

pub use animation::Animator;
pub use catalog::{Scene, SceneKind};
pub use node::{SceneNode, Shape, Transform};
