pub mod basic;
pub mod phong;

pub use basic::BasicShader;
pub use phong::PhongShader;
