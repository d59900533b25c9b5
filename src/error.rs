//! Crate-wide error type.
//!
//! Mirrors the failure kinds the original renderer distinguishes: asset
//! load failures and image I/O failures abort the render and propagate to
//! the caller; per-pixel/per-triangle issues (degenerate triangles,
//! off-screen pixels, missing textures) never become a `RenderError` and are
//! handled silently at the call site instead.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to load model {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to decode texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write depth dump {path}: {source}")]
    DepthDump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("index {index} out of bounds for vertex buffer of length {len}")]
    IndexOutOfBounds { index: u32, len: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
