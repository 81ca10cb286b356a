//! Pixel shaders for triangle rasterization.
//!
//! The rasterizer owns coverage, depth and the lighting term; a shader only
//! turns barycentric weights plus that light intensity into a packed color.
//!
//! # Barycentric Coordinates
//!
//! The `lambda` parameter contains three weights [λ₀, λ₁, λ₂] that sum to
//! 1.0 inside the triangle. Any per-vertex attribute interpolates as
//! `attr = λ₀*attr₀ + λ₁*attr₁ + λ₂*attr₂`.

use crate::colors::{blend3, gray, modulate};
use crate::math::Vec2f;
use crate::texture::TextureSampler;

/// Per-pixel color computation.
pub trait PixelShader {
    /// Compute the color for a pixel.
    ///
    /// # Arguments
    /// * `lambda` - Barycentric coordinates [λ₀, λ₁, λ₂] that sum to 1.0
    /// * `intensity` - Light intensity in `[0, 1]` at this pixel
    fn shade(&self, lambda: [f32; 3], intensity: f32) -> u32;
}

/// Interpolates the packed vertex colors. Ignores lighting.
pub struct VertexColorShader {
    colors: [u32; 3],
}

impl VertexColorShader {
    pub fn new(colors: [u32; 3]) -> Self {
        Self { colors }
    }
}

impl PixelShader for VertexColorShader {
    #[inline]
    fn shade(&self, lambda: [f32; 3], _intensity: f32) -> u32 {
        blend3(self.colors, lambda)
    }
}

/// Grayscale from the light intensity alone.
pub struct IntensityShader;

impl PixelShader for IntensityShader {
    #[inline]
    fn shade(&self, _lambda: [f32; 3], intensity: f32) -> u32 {
        gray(intensity)
    }
}

/// Samples a texture at the interpolated UV and scales it by the light
/// intensity.
pub struct TextureShader<'a> {
    sampler: TextureSampler<'a>,
    uvs: [Vec2f; 3],
}

impl<'a> TextureShader<'a> {
    pub fn new(sampler: TextureSampler<'a>, uvs: [Vec2f; 3]) -> Self {
        Self { sampler, uvs }
    }

    #[inline]
    fn interpolate_uv(&self, lambda: [f32; 3]) -> Vec2f {
        self.uvs[0] * lambda[0] + self.uvs[1] * lambda[1] + self.uvs[2] * lambda[2]
    }
}

impl PixelShader for TextureShader<'_> {
    #[inline]
    fn shade(&self, lambda: [f32; 3], intensity: f32) -> u32 {
        let uv = self.interpolate_uv(lambda);
        modulate(self.sampler.sample(uv.u(), uv.v()), intensity)
    }
}
