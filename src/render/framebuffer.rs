//! In-memory display backend.
//!
//! [`FrameBuffer`] owns an ARGB8888 color buffer and implements [`Display`]
//! without any window system, so the whole pipeline can run headless. The
//! SDL2 window backend keeps one of these as its back buffer.

use std::collections::VecDeque;

use tracing::debug;

use crate::colors::OPAQUE;
use crate::display::{Display, Message};
use crate::error::{RenderError, RenderResult};

/// An owned color buffer with width/height metadata and an input queue.
///
/// Pixels are stored row-major, top row first, as `0xFFRRGGBB`.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
    events: VecDeque<Message>,
    frames_presented: u64,
}

impl FrameBuffer {
    /// Allocate a `width` x `height` buffer cleared to opaque black.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        debug!(width, height, "Allocated frame buffer");
        Ok(Self {
            color_buffer: vec![OPAQUE; width as usize * height as usize],
            width,
            height,
            events: VecDeque::new(),
            frames_presented: 0,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get the stored color at (x, y), or None if out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    /// Get the packed RGB color at (x, y) with the alpha byte stripped.
    #[inline]
    pub fn rgb(&self, x: i32, y: i32) -> Option<u32> {
        self.pixel(x, y).map(|c| c & !OPAQUE)
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Returns the buffer as bytes (ARGB8888, native endianness).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.color_buffer)
    }

    /// Queue an input message for a later [`Display::poll_event`].
    pub fn push_event(&mut self, message: Message) {
        self.events.push_back(message);
    }

    /// Number of successful [`Display::update`] calls.
    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Display for FrameBuffer {
    fn clear(&mut self, color: u32) {
        self.color_buffer.fill(OPAQUE | color);
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.color_buffer[i] = OPAQUE | color;
        }
    }

    fn update(&mut self) -> RenderResult<()> {
        self.frames_presented += 1;
        Ok(())
    }

    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn poll_event(&mut self) -> Option<Message> {
        self.events.pop_front()
    }
}
