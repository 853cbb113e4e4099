use thiserror::Error;

/// Errors produced while building geometry, assembling scenes or writing output.
#[derive(Error, Debug)]
pub enum Error {
    /// A builder was called with a parameter outside its domain.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    InvalidMesh {
        face: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("unknown planet '{0}'")]
    UnknownPlanet(String),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

/// Checks that a ring or fan has at least three segments.
pub(crate) fn ensure_segments(name: &'static str, value: u32) -> Result<()> {
    if value >= 3 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            reason: format!("needs at least 3 segments, got {value}"),
        })
    }
}
