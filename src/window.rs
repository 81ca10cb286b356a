//! SDL2 display backend.
//!
//! [`Window`] draws into an in-memory [`FrameBuffer`] and uploads it to a
//! streaming ARGB8888 texture on every [`Display::update`].

use std::time::Duration;

use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use tracing::{debug, info};

use crate::display::{Display, Message};
use crate::error::{RenderError, RenderResult};
use crate::render::FrameBuffer;
use crate::FRAME_RATE;

fn sdl_error(e: impl ToString) -> RenderError {
    RenderError::Display(e.to_string())
}

/// Map an SDL event to a render loop message.
fn translate(event: &Event) -> Option<Message> {
    match event {
        Event::Quit { .. } => Some(Message::Quit),
        Event::KeyDown {
            keycode: Some(key), ..
        } => translate_key(*key),
        _ => None,
    }
}

fn translate_key(key: Keycode) -> Option<Message> {
    match key {
        Keycode::Escape | Keycode::Space => Some(Message::Quit),
        Keycode::W | Keycode::Up => Some(Message::MoveCloser),
        Keycode::S | Keycode::Down => Some(Message::MoveFurther),
        Keycode::A | Keycode::Left => Some(Message::MoveLeft),
        Keycode::D | Keycode::Right => Some(Message::MoveRight),
        _ => None,
    }
}

pub struct Window {
    // texture must drop before texture_creator
    texture: sdl2::render::Texture<'static>,
    #[allow(dead_code)]
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    timer_subsystem: sdl2::TimerSubsystem,
    back_buffer: FrameBuffer,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> RenderResult<Self> {
        let back_buffer = FrameBuffer::new(width, height)?;

        let sdl_context = sdl2::init().map_err(sdl_error)?;
        let video_subsystem = sdl_context.video().map_err(sdl_error)?;
        let timer_subsystem = sdl_context.timer().map_err(sdl_error)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(sdl_error)?;

        let canvas = window.into_canvas().build().map_err(sdl_error)?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump().map_err(sdl_error)?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // We ensure texture is dropped before texture_creator by struct field order.
        let texture_creator_ref: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let texture = texture_creator_ref
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(sdl_error)?;

        info!(title, width, height, "Window opened");
        Ok(Self {
            texture,
            texture_creator,
            canvas,
            event_pump,
            timer_subsystem,
            back_buffer,
        })
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }

    pub fn back_buffer(&self) -> &FrameBuffer {
        &self.back_buffer
    }
}

impl Display for Window {
    fn clear(&mut self, color: u32) {
        self.back_buffer.clear(color);
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: u32) {
        self.back_buffer.put(x, y, color);
    }

    fn update(&mut self) -> RenderResult<()> {
        let (width, height) = self.back_buffer.resolution();
        self.texture
            .update(None, self.back_buffer.as_bytes(), (width * 4) as usize)
            .map_err(sdl_error)?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, width, height)))
            .map_err(sdl_error)?;
        self.canvas.present();
        self.back_buffer.update()
    }

    fn resolution(&self) -> (u32, u32) {
        self.back_buffer.resolution()
    }

    fn poll_event(&mut self) -> Option<Message> {
        while let Some(event) = self.event_pump.poll_event() {
            if let Some(message) = translate(&event) {
                debug!(?message, "Input");
                return Some(message);
            }
        }
        None
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        info!(frames = self.back_buffer.frames_presented(), "Window closed");
    }
}

/// Sleeps out the remainder of each frame to hold [`FRAME_RATE`].
pub struct FrameLimiter {
    previous_frame_time: u64,
    frame_target_ms: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
            frame_target_ms: 1000 / FRAME_RATE,
        }
    }

    /// Waits if necessary to maintain frame rate and returns the delta time in milliseconds.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < self.frame_target_ms {
            std::thread::sleep(Duration::from_millis(self.frame_target_ms - delta_time));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(translate(&Event::Quit { timestamp: 0 }), Some(Message::Quit));
        assert_eq!(translate_key(Keycode::Escape), Some(Message::Quit));
        assert_eq!(translate_key(Keycode::Space), Some(Message::Quit));
        assert_eq!(translate_key(Keycode::W), Some(Message::MoveCloser));
        assert_eq!(translate_key(Keycode::Up), Some(Message::MoveCloser));
        assert_eq!(translate_key(Keycode::S), Some(Message::MoveFurther));
        assert_eq!(translate_key(Keycode::Down), Some(Message::MoveFurther));
        assert_eq!(translate_key(Keycode::A), Some(Message::MoveLeft));
        assert_eq!(translate_key(Keycode::Left), Some(Message::MoveLeft));
        assert_eq!(translate_key(Keycode::D), Some(Message::MoveRight));
        assert_eq!(translate_key(Keycode::Right), Some(Message::MoveRight));
        assert_eq!(translate_key(Keycode::Q), None);
    }
}
