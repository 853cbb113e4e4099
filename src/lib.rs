//! Procedural scenes built from parametric meshes and a recursive
//! Sierpinski generator, rendered headlessly by a small software rasterizer.

pub mod app;
pub mod core;
pub mod error;
pub mod geometry;
pub mod io;
pub mod pipeline;
pub mod scene;

pub use error::{Error, Result};
