//! Packed 24-bit RGB colors.
//!
//! Colors are `0x00RRGGBB`: red in the high byte, blue in the low byte. The
//! display backend adds full opacity when it stores a pixel.

pub const BLACK: u32 = 0x000000;
pub const WHITE: u32 = 0xFFFFFF;
pub const RED: u32 = 0xFF0000;
pub const GREEN: u32 = 0x00FF00;
pub const BLUE: u32 = 0x0000FF;
pub const YELLOW: u32 = 0xFFFF00;
pub const CYAN: u32 = 0x00FFFF;
pub const GRAY: u32 = 0x808080;

pub const BACKGROUND: u32 = BLACK;

/// Opaque alpha added by display backends (ARGB8888 storage).
pub const OPAQUE: u32 = 0xFF00_0000;

#[inline]
pub fn red(color: u32) -> u8 {
    ((color >> 16) & 0xFF) as u8
}

#[inline]
pub fn green(color: u32) -> u8 {
    ((color >> 8) & 0xFF) as u8
}

#[inline]
pub fn blue(color: u32) -> u8 {
    (color & 0xFF) as u8
}

/// Pack 8-bit channels into `0x00RRGGBB`.
#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Pack channels given as floats in `[0, 255]`, rounding to the nearest
/// level and saturating out-of-range values.
#[inline]
pub fn pack_rgb_f32(r: f32, g: f32, b: f32) -> u32 {
    pack_rgb(r.round() as u8, g.round() as u8, b.round() as u8)
}

/// Unpack into float channels in `[0, 255]`.
#[inline]
pub fn unpack_rgb(color: u32) -> [f32; 3] {
    [red(color) as f32, green(color) as f32, blue(color) as f32]
}

/// Scale every channel by `intensity`.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    let [r, g, b] = unpack_rgb(color);
    pack_rgb_f32(r * intensity, g * intensity, b * intensity)
}

/// Grayscale color whose three channels equal `intensity * 255`.
#[inline]
pub fn gray(intensity: f32) -> u32 {
    let c = intensity * 255.0;
    pack_rgb_f32(c, c, c)
}

/// Blend three colors with barycentric weights.
#[inline]
pub fn blend3(colors: [u32; 3], lambda: [f32; 3]) -> u32 {
    let c0 = unpack_rgb(colors[0]);
    let c1 = unpack_rgb(colors[1]);
    let c2 = unpack_rgb(colors[2]);
    let channel = |i: usize| lambda[0] * c0[i] + lambda[1] * c1[i] + lambda[2] * c2[i];
    pack_rgb_f32(channel(0), channel(1), channel(2))
}
