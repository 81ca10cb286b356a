//! A minimal CPU software rasterizer.
//!
//! Geometry goes through a model/view/projection/viewport matrix stack, then
//! gets drawn as Bresenham lines or as depth-tested, lit, optionally
//! textured triangles. Output goes to anything implementing [`Display`]:
//! the headless [`FrameBuffer`](render::FrameBuffer), or an SDL2 window with
//! the `window` feature.
//!
//! # Quick Start
//!
//! ```
//! use soft_render::prelude::*;
//!
//! let mut renderer = Renderer::new(FrameBuffer::new(320, 240)?)?;
//! renderer.look_at(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, Vec3f::Y);
//! renderer.clear(colors::BACKGROUND);
//! renderer.triangle([
//!     Vertex::new(Vec3f::new(-0.5, -0.5, 0.0)).with_color(colors::RED),
//!     Vertex::new(Vec3f::new(0.5, -0.5, 0.0)).with_color(colors::GREEN),
//!     Vertex::new(Vec3f::new(0.0, 0.5, 0.0)).with_color(colors::BLUE),
//! ]);
//! renderer.update()?;
//! # Ok::<(), RenderError>(())
//! ```

pub mod colors;
pub mod display;
pub mod error;
pub mod math;
pub mod mesh;
pub mod model;
pub mod render;
pub mod texture;
pub mod transform;
#[cfg(feature = "window")]
pub mod window;

pub use display::{Display, Message};
pub use error::{RenderError, RenderResult};
pub use mesh::{Face, Mesh};
pub use model::Model;
pub use render::{ColorMode, Renderer};
pub use texture::{Texture, TextureSampler};
pub use transform::TransformStack;

/// Default framebuffer width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default framebuffer height in pixels.
pub const DEFAULT_HEIGHT: u32 = 600;
/// Target frames per second for interactive loops.
pub const FRAME_RATE: u64 = 60;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::colors;
    pub use crate::display::{Display, Message};
    pub use crate::error::{RenderError, RenderResult};
    pub use crate::math::{Mat4, Vec2f, Vec2i, Vec3f, Vec4f};
    pub use crate::mesh::{Face, Mesh};
    pub use crate::model::Model;
    pub use crate::render::{ColorMode, FrameBuffer, Renderer, Vertex};
    pub use crate::texture::{Texture, TextureSampler};
    pub use crate::transform::TransformStack;

    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window};
}
