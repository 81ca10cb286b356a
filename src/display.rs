//! The display backend capability.
//!
//! The renderer never talks to a window system directly. It writes pixels
//! through a [`Display`], which owns the visible pixel buffer and the input
//! queue. Creating a backend is its `init`; dropping it is its `release`.

use crate::error::RenderResult;

/// Input messages a display can post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveCloser,
    MoveFurther,
    MoveLeft,
    MoveRight,
}

pub trait Display {
    /// Fill the whole buffer with `color` (packed RGB).
    fn clear(&mut self, color: u32);

    /// Write one pixel. Coordinates outside the buffer are silently ignored.
    ///
    /// `(0, 0)` is the top-left corner.
    fn put(&mut self, x: i32, y: i32, color: u32);

    /// Copy the in-memory buffer to the visible surface.
    fn update(&mut self) -> RenderResult<()>;

    /// Buffer size as `(width, height)`.
    fn resolution(&self) -> (u32, u32);

    /// Next pending input message, if any.
    fn poll_event(&mut self) -> Option<Message>;
}
