//! The render context.
//!
//! [`Renderer`] bundles everything a draw call needs: the display it writes
//! into, the depth buffer sized to that display, the transform stack and the
//! currently bound texture. Lines and triangles are drawn through methods
//! defined in [`line`] and [`triangle`].
//!
//! ```
//! use soft_render::colors;
//! use soft_render::math::Vec2i;
//! use soft_render::render::{FrameBuffer, Renderer};
//!
//! let mut renderer = Renderer::new(FrameBuffer::new(64, 64)?)?;
//! renderer.clear(colors::BACKGROUND);
//! renderer.line(Vec2i::new(0, 0), Vec2i::new(63, 63), colors::WHITE);
//! renderer.update()?;
//! # Ok::<(), soft_render::RenderError>(())
//! ```

pub mod depth;
pub mod framebuffer;
pub mod line;
pub mod shader;
pub mod triangle;

pub use depth::DepthBuffer;
pub use framebuffer::FrameBuffer;
pub use shader::{IntensityShader, PixelShader, TextureShader, VertexColorShader};
pub use triangle::Vertex;

use tracing::info;

use crate::display::{Display, Message};
use crate::error::RenderResult;
use crate::math::Vec3f;
use crate::texture::TextureSampler;
use crate::transform::TransformStack;

/// Where an untextured triangle gets its color from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Barycentric blend of the three vertex colors.
    #[default]
    VertexColor,
    /// Grayscale light intensity.
    Intensity,
}

/// Render context over a display backend `D`.
///
/// `'t` is the lifetime of the bound texture's pixel data; the borrow
/// checker keeps it alive until the texture is rebound or the renderer is
/// released.
pub struct Renderer<'t, D: Display> {
    display: D,
    depth: DepthBuffer,
    transform: TransformStack,
    texture: Option<TextureSampler<'t>>,
    color_mode: ColorMode,
    depth_test: bool,
}

impl<'t, D: Display> Renderer<'t, D> {
    /// Take ownership of `display` and size the depth buffer and viewport
    /// to its resolution.
    ///
    /// On failure the display is dropped before the error is returned.
    pub fn new(display: D) -> RenderResult<Self> {
        let (width, height) = display.resolution();
        let depth = DepthBuffer::new(width, height)?;
        info!(width, height, "Render context created");
        Ok(Self {
            display,
            depth,
            transform: TransformStack::new(width, height),
            texture: None,
            color_mode: ColorMode::default(),
            depth_test: true,
        })
    }

    /// Tear down the context and hand the display back.
    pub fn release(self) -> D {
        info!("Render context released");
        self.display
    }

    /// Clear the display to `color` and reset the depth buffer.
    pub fn clear(&mut self, color: u32) {
        self.display.clear(color);
        self.depth.clear();
    }

    /// Present the frame.
    pub fn update(&mut self) -> RenderResult<()> {
        self.display.update()
    }

    pub fn poll_event(&mut self) -> Option<Message> {
        self.display.poll_event()
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.depth.width(), self.depth.height())
    }

    // ============ Transform ============

    pub fn transform(&self) -> &TransformStack {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut TransformStack {
        &mut self.transform
    }

    /// Shorthand for [`TransformStack::look_at`].
    pub fn look_at(&mut self, eye: Vec3f, target: Vec3f, up: Vec3f) -> &mut TransformStack {
        self.transform.look_at(eye, target, up)
    }

    pub fn project_to_screen(&self, v: Vec3f) -> Vec3f {
        self.transform.project_to_screen(v)
    }

    // ============ State ============

    /// Bind a texture for subsequent triangles, or unbind with `None`.
    pub fn bind_texture(&mut self, texture: Option<TextureSampler<'t>>) {
        self.texture = texture;
    }

    pub fn texture(&self) -> Option<TextureSampler<'t>> {
        self.texture
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_depth_test(&mut self, enabled: bool) {
        self.depth_test = enabled;
    }

    pub fn depth_test_enabled(&self) -> bool {
        self.depth_test
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Write a pixel gated by the depth test when it is enabled.
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub(crate) fn put_with_depth(&mut self, x: i32, y: i32, z: f32, color: u32) -> bool {
        if self.depth_test && !self.depth.test_and_set(x, y, z) {
            return false;
        }
        self.display.put(x, y, color);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors;
    use crate::error::RenderError;
    use crate::texture::Texture;

    #[test]
    fn test_context_follows_display_resolution() {
        let renderer = Renderer::new(FrameBuffer::new(40, 30).unwrap()).unwrap();
        assert_eq!(renderer.resolution(), (40, 30));
        assert_eq!(renderer.depth_buffer().width(), 40);
        assert_eq!(renderer.depth_buffer().height(), 30);
        assert_eq!(
            renderer.transform().viewport(),
            TransformStack::viewport_matrix(40, 30)
        );
        assert!(renderer.depth_test_enabled());
        assert_eq!(renderer.color_mode(), ColorMode::VertexColor);
    }

    /// Backend that reports a fixed resolution and records when it is dropped.
    struct StubDisplay<'a> {
        resolution: (u32, u32),
        dropped: &'a std::cell::Cell<bool>,
    }

    impl Display for StubDisplay<'_> {
        fn clear(&mut self, _color: u32) {}
        fn put(&mut self, _x: i32, _y: i32, _color: u32) {}
        fn update(&mut self) -> RenderResult<()> {
            Ok(())
        }
        fn resolution(&self) -> (u32, u32) {
            self.resolution
        }
        fn poll_event(&mut self) -> Option<Message> {
            None
        }
    }

    impl Drop for StubDisplay<'_> {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    #[test]
    fn test_zero_resolution_display_is_rejected() {
        for resolution in [(0, 0), (16, 0), (0, 9)] {
            let dropped = std::cell::Cell::new(false);
            let display = StubDisplay {
                resolution,
                dropped: &dropped,
            };
            let result = Renderer::new(display);
            assert!(matches!(
                result,
                Err(RenderError::InvalidDimensions { width, height })
                    if (width, height) == (resolution.0.into(), resolution.1.into())
            ));
            assert!(dropped.get());
        }
    }

    #[test]
    fn test_clear_resets_color_and_depth() {
        let mut renderer = Renderer::new(FrameBuffer::new(4, 4).unwrap()).unwrap();
        assert!(renderer.put_with_depth(1, 1, 0.5, colors::RED));
        renderer.clear(colors::BLUE);
        assert_eq!(renderer.display().rgb(1, 1), Some(colors::BLUE));
        assert_eq!(renderer.depth_buffer().get(1, 1), Some(f32::NEG_INFINITY));
    }

    #[test]
    fn test_depth_gate_can_be_disabled() {
        let mut renderer = Renderer::new(FrameBuffer::new(4, 4).unwrap()).unwrap();
        assert!(renderer.put_with_depth(0, 0, 1.0, colors::RED));
        assert!(!renderer.put_with_depth(0, 0, 0.0, colors::GREEN));
        assert_eq!(renderer.display().rgb(0, 0), Some(colors::RED));

        renderer.set_depth_test(false);
        assert!(renderer.put_with_depth(0, 0, 0.0, colors::GREEN));
        assert_eq!(renderer.display().rgb(0, 0), Some(colors::GREEN));
    }

    #[test]
    fn test_release_returns_display() {
        let mut renderer = Renderer::new(FrameBuffer::new(2, 2).unwrap()).unwrap();
        renderer.display_mut().push_event(Message::Quit);
        renderer.update().unwrap();
        let mut fb = renderer.release();
        assert_eq!(fb.frames_presented(), 1);
        assert_eq!(fb.poll_event(), Some(Message::Quit));
    }

    #[test]
    fn test_texture_binding() {
        let texture = Texture::from_pixels(1, 1, vec![colors::CYAN]).unwrap();
        let mut renderer = Renderer::new(FrameBuffer::new(2, 2).unwrap()).unwrap();
        renderer.bind_texture(Some(texture.sampler()));
        assert_eq!(renderer.texture().map(|t| t.sample(0.5, 0.5)), Some(colors::CYAN));
        renderer.bind_texture(None);
        assert!(renderer.texture().is_none());
    }
}
