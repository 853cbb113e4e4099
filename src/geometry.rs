//! Pure builders: every function here returns fresh data and touches no scene.

pub mod cylinder;
pub mod fractal;
pub mod helix;
pub mod normals;
pub mod polygon;
pub mod primitives;
pub mod scatter;
pub mod stack;
pub mod torus;

pub use cylinder::cylinder_shell;
pub use fractal::{PlacedPrimitive, sierpinski_tetrahedron, tetrahedron_mesh};
pub use polygon::regular_polygon_fan;
pub use torus::{StarburstTorus, TorusParams, torus_mesh, torus_with_starbursts};
