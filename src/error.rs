//! Error types for the renderer and its loaders.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while setting up rendering or loading assets.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A buffer was requested with a zero or negative dimension.
    #[error("Invalid dimensions {width}x{height} (both must be > 0)")]
    InvalidDimensions { width: i64, height: i64 },

    /// The display backend failed to initialize or present a frame.
    #[error("Display error: {0}")]
    Display(String),

    /// IO error while reading an asset.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The path that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The OBJ parser rejected the mesh.
    #[error("Failed to load mesh: {0}")]
    MeshLoad(#[from] tobj::LoadError),

    /// The mesh is missing per-vertex data the rasterizer needs.
    #[error("Mesh has no {0}")]
    MissingAttribute(&'static str),

    /// The texture header describes a variant the decoder does not handle.
    #[error("Unsupported texture: {0}")]
    UnsupportedTexture(String),

    /// The texture data ended before every pixel was decoded.
    #[error("Texture data truncated: decoded {decoded} of {expected} pixels")]
    TruncatedTexture { expected: usize, decoded: usize },

    /// The generic image decoder failed.
    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
