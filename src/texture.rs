//! Textures and nearest-neighbour sampling.
//!
//! A [`Texture`] owns packed `0x00RRGGBB` pixels, bottom row first, so that
//! `v = 0` addresses the bottom of the image as OBJ texture coordinates
//! expect. The rasterizer never holds a `Texture` directly; it borrows a
//! [`TextureSampler`] view, which keeps pixel data shared rather than copied.

use std::path::Path;

use tracing::{debug, warn};

use crate::colors::pack_rgb;
use crate::error::{RenderError, RenderResult};

/// Size of the fixed TGA file header.
const TGA_HEADER_LEN: usize = 18;
/// Run-length encoded truecolor image.
const TGA_RLE_TRUECOLOR: u8 = 10;

/// A borrowed view over texture pixels.
#[derive(Debug, Clone, Copy)]
pub struct TextureSampler<'a> {
    pixels: &'a [u32],
    width: u32,
    height: u32,
}

impl<'a> TextureSampler<'a> {
    /// Wrap externally owned row-major pixels.
    ///
    /// Fails on a zero dimension, or when `pixels` does not hold exactly
    /// `width * height` entries.
    pub fn new(pixels: &'a [u32], width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::TruncatedTexture {
                expected,
                decoded: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fetch the texel at integer coordinates.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> u32 {
        debug_assert!(
            x < self.width && y < self.height,
            "Texel ({x}, {y}) outside {}x{} texture",
            self.width,
            self.height
        );
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Sample at normalized coordinates using nearest-neighbour lookup.
    ///
    /// UVs outside `[0, 1]` are clamped to the edge texels.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> u32 {
        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);
        let x = (u * (self.width - 1) as f32) as u32;
        let y = (v * (self.height - 1) as f32) as u32;
        self.texel(x, y)
    }
}

/// An owned texture image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl Texture {
    /// Build a texture from row-major packed RGB pixels.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(RenderError::TruncatedTexture {
                expected,
                decoded: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load a run-length encoded truecolor TGA file.
    pub fn from_tga_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let texture = Self::from_tga_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            width = texture.width,
            height = texture.height,
            "Loaded TGA texture"
        );
        Ok(texture)
    }

    /// Decode an in-memory TGA image.
    ///
    /// Only uncolormapped, RLE-compressed, 24 bits per pixel images with a
    /// zero origin and no descriptor flags are accepted. Rows are kept in
    /// file order (bottom row first).
    pub fn from_tga_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let header: &[u8; TGA_HEADER_LEN] = bytes
            .get(..TGA_HEADER_LEN)
            .and_then(|h| h.try_into().ok())
            .ok_or_else(|| RenderError::UnsupportedTexture("missing TGA header".into()))?;

        let id_len = header[0] as usize;
        let color_map_type = header[1];
        let image_type = header[2];
        let le16 = |at: usize| u16::from_le_bytes([header[at], header[at + 1]]);
        let (x_origin, y_origin) = (le16(8), le16(10));
        let (width, height) = (le16(12) as u32, le16(14) as u32);
        let bpp = header[16];
        let descriptor = header[17];

        if color_map_type != 0 || image_type != TGA_RLE_TRUECOLOR {
            return Err(RenderError::UnsupportedTexture(format!(
                "color map type {color_map_type}, image type {image_type}"
            )));
        }
        if x_origin != 0 || y_origin != 0 {
            return Err(RenderError::UnsupportedTexture(format!(
                "origin ({x_origin}, {y_origin})"
            )));
        }
        if bpp != 24 {
            return Err(RenderError::UnsupportedTexture(format!("{bpp} bits per pixel")));
        }
        if descriptor != 0 {
            return Err(RenderError::UnsupportedTexture(format!(
                "image descriptor {descriptor:#04x}"
            )));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: width.into(),
                height: height.into(),
            });
        }

        let expected = width as usize * height as usize;
        let data = bytes.get(TGA_HEADER_LEN + id_len..).unwrap_or(&[]);
        let pixels = decode_rle_bgr(data, expected);
        if pixels.len() < expected {
            return Err(RenderError::TruncatedTexture {
                expected,
                decoded: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Load any format the `image` crate understands (PNG, JPEG, ...).
    ///
    /// The image is flipped vertically to match the bottom-row-first layout.
    pub fn from_image_file<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let path = path.as_ref();
        let img = image::open(path)?.flipv().to_rgb8();
        let (width, height) = img.dimensions();

        let pixels: Vec<u32> = img
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                pack_rgb(r, g, b)
            })
            .collect();

        debug!(path = %path.display(), width, height, "Loaded image texture");
        Self::from_pixels(width, height, pixels)
    }

    /// Borrow a sampler over this texture's pixels.
    pub fn sampler(&self) -> TextureSampler<'_> {
        // dimensions were validated when the texture was built
        TextureSampler {
            pixels: &self.pixels,
            width: self.width,
            height: self.height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

/// Decode TGA run-length packets of BGR triples into packed RGB.
///
/// Stops after `count` pixels or at the end of the data, whichever comes
/// first. Packets may span scanlines.
fn decode_rle_bgr(data: &[u8], count: usize) -> Vec<u32> {
    let mut pixels = Vec::with_capacity(count);
    let mut pos = 0;
    let read_bgr = |at: usize| -> Option<u32> {
        let bgr = data.get(at..at + 3)?;
        Some(pack_rgb(bgr[2], bgr[1], bgr[0]))
    };

    while pixels.len() < count {
        let Some(&packet) = data.get(pos) else { break };
        pos += 1;
        let run = (packet & 0x7F) as usize + 1;
        let run = run.min(count - pixels.len());

        if packet & 0x80 != 0 {
            let Some(color) = read_bgr(pos) else { break };
            pos += 3;
            pixels.extend(std::iter::repeat(color).take(run));
        } else {
            for _ in 0..run {
                let Some(color) = read_bgr(pos) else { break };
                pos += 3;
                pixels.push(color);
            }
        }
    }

    if pixels.len() == count && pos < data.len() {
        warn!(trailing = data.len() - pos, "Ignoring bytes after TGA pixel data");
    }
    pixels
}
