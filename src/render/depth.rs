//! Per-pixel depth buffer.
//!
//! Stores one `f32` per framebuffer pixel, row-major. The convention is
//! "larger z wins": a new sample replaces the stored one only when it is
//! strictly greater, so depth grows toward the viewer. A cleared cell holds
//! `f32::NEG_INFINITY`, meaning nothing has been drawn there yet.

use crate::error::{RenderError, RenderResult};

#[derive(Debug, Clone)]
pub struct DepthBuffer {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl DepthBuffer {
    /// Allocate a cleared `width` x `height` buffer.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        Ok(Self {
            data: vec![f32::NEG_INFINITY; width as usize * height as usize],
            width,
            height,
        })
    }

    /// Reset every cell to negative infinity.
    pub fn clear(&mut self) {
        self.data.fill(f32::NEG_INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Store `z` at (x, y) if it is strictly greater than the current value.
    ///
    /// Returns false when (x, y) is out of bounds or the test fails; the
    /// buffer is untouched in both cases.
    #[inline]
    pub fn test_and_set(&mut self, x: i32, y: i32, z: f32) -> bool {
        match self.index(x, y) {
            Some(i) if z > self.data[i] => {
                self.data[i] = z;
                true
            }
            _ => false,
        }
    }

    /// Same comparison as [`test_and_set`](Self::test_and_set) without writing.
    #[inline]
    pub fn test(&self, x: i32, y: i32, z: f32) -> bool {
        self.index(x, y).is_some_and(|i| z > self.data[i])
    }

    pub fn get(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.data[i])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}
