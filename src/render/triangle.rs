//! Edge function triangle rasterization.
//!
//! # Algorithm Overview
//!
//! 1. Project the three vertices to screen space through the transform stack
//! 2. Compute a bounding box and clamp it to the framebuffer
//! 3. For every pixel center in the box, evaluate three edge functions
//! 4. Keep the pixel when it passes all three edges (top-left rule on ties)
//! 5. Normalize the edge values by the total area to get barycentric weights
//! 6. Depth test, light, shade and write
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (P.x - A.x) * (B.y - A.y) - (P.y - A.y) * (B.x - A.x)
//! ```
//!
//! It is twice the signed area of the triangle (A, B, P). With the y-down
//! screen produced by the viewport, counter-clockwise model-space triangles
//! give positive values inside. Clockwise triangles are rejected.
//!
//! # Lighting
//!
//! The light points straight out of the screen, so the intensity at a pixel
//! is the z component of the interpolated normal. A negative intensity
//! marks a back-facing pixel, which is skipped.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)

use tracing::{debug, trace};

use super::shader::{IntensityShader, PixelShader, TextureShader, VertexColorShader};
use super::{ColorMode, Renderer};
use crate::colors::WHITE;
use crate::display::Display;
use crate::math::{Vec2f, Vec3f};
use crate::mesh::{Face, Mesh};

/// A triangle corner as fed to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3f,
    pub normal: Vec3f,
    pub uv: Vec2f,
    pub color: u32,
}

impl Vertex {
    /// A white vertex facing the viewer with zero UV.
    pub fn new(position: Vec3f) -> Self {
        Self {
            position,
            normal: Vec3f::Z,
            uv: Vec2f::ZERO,
            color: WHITE,
        }
    }

    pub fn with_normal(mut self, normal: Vec3f) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_uv(mut self, uv: Vec2f) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }
}

/// Twice the signed area of (a, b, p), using only x and y.
#[inline]
pub fn edge_function(a: Vec3f, b: Vec3f, p: Vec3f) -> f32 {
    (p.x() - a.x()) * (b.y() - a.y()) - (p.y() - a.y()) * (b.x() - a.x())
}

/// Whether an edge vector is a top edge (horizontal, pointing left) or a
/// left edge (pointing up).
#[inline]
pub fn is_top_left(edge: Vec3f) -> bool {
    (edge.y() == 0.0 && edge.x() <= 0.0) || edge.y() < 0.0
}

#[inline]
fn passes_edge(w: f32, top_left: bool) -> bool {
    w > 0.0 || (w == 0.0 && top_left)
}

impl<D: Display> Renderer<'_, D> {
    /// Fill a triangle given in model space.
    ///
    /// Returns the number of pixels written.
    pub fn triangle(&mut self, vertices: [Vertex; 3]) -> usize {
        let [a, b, c] = vertices;
        let screen = [
            self.project_to_screen(a.position),
            self.project_to_screen(b.position),
            self.project_to_screen(c.position),
        ];
        let normals = [a.normal, b.normal, c.normal];

        match (self.texture, self.color_mode) {
            (Some(sampler), _) => {
                let shader = TextureShader::new(sampler, [a.uv, b.uv, c.uv]);
                self.rasterize_with_shader(screen, normals, &shader)
            }
            (None, ColorMode::VertexColor) => {
                let shader = VertexColorShader::new([a.color, b.color, c.color]);
                self.rasterize_with_shader(screen, normals, &shader)
            }
            (None, ColorMode::Intensity) => {
                self.rasterize_with_shader(screen, normals, &IntensityShader)
            }
        }
    }

    /// Rasterize a screen-space triangle, delegating color to `shader`.
    fn rasterize_with_shader<S: PixelShader>(
        &mut self,
        [v0, v1, v2]: [Vec3f; 3],
        normals: [Vec3f; 3],
        shader: &S,
    ) -> usize {
        let area = edge_function(v0, v1, v2);
        if area.abs() < f32::EPSILON {
            trace!(?v0, ?v1, ?v2, "Skipping degenerate triangle");
            return 0;
        }
        let inv_area = 1.0 / area;

        let (width, height) = self.resolution();
        let min_x = v0.x().min(v1.x()).min(v2.x()).floor().max(0.0) as i32;
        let min_y = v0.y().min(v1.y()).min(v2.y()).floor().max(0.0) as i32;
        let max_x = (v0.x().max(v1.x()).max(v2.x()).ceil() as i32).min(width as i32 - 1);
        let max_y = (v0.y().max(v1.y()).max(v2.y()).ceil() as i32).min(height as i32 - 1);

        // Edge i is opposite vertex i
        let top_left = [
            is_top_left(v2 - v1),
            is_top_left(v0 - v2),
            is_top_left(v1 - v0),
        ];

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec3f::new(x as f32 + 0.5, y as f32 + 0.5, 0.0);

                let w0 = edge_function(v1, v2, p);
                let w1 = edge_function(v2, v0, p);
                let w2 = edge_function(v0, v1, p);

                if !(passes_edge(w0, top_left[0])
                    && passes_edge(w1, top_left[1])
                    && passes_edge(w2, top_left[2]))
                {
                    continue;
                }

                let lambda = [w0 * inv_area, w1 * inv_area, w2 * inv_area];
                let z = lambda[0] * v0.z() + lambda[1] * v1.z() + lambda[2] * v2.z();
                if self.depth_test && !self.depth.test_and_set(x, y, z) {
                    continue;
                }

                let normal = normals[0] * lambda[0] + normals[1] * lambda[1] + normals[2] * lambda[2];
                let intensity = normal.z();
                if intensity < 0.0 {
                    continue;
                }

                self.display.put(x, y, shader.shade(lambda, intensity));
                written += 1;
            }
        }
        written
    }

    /// Draw every face of `mesh`.
    ///
    /// Returns the number of pixels written.
    pub fn draw_mesh(&mut self, mesh: &Mesh) -> usize {
        self.draw_faces(mesh.faces(), mesh.positions(), mesh.normals(), mesh.uvs())
    }

    /// Draw faces whose 1-based indices point into the given attribute
    /// lists.
    ///
    /// # Panics
    /// Panics if an index is zero or past the end of its list.
    pub fn draw_faces(
        &mut self,
        faces: &[Face],
        positions: &[Vec3f],
        normals: &[Vec3f],
        uvs: &[Vec2f],
    ) -> usize {
        let mut written = 0;
        for face in faces {
            let vertices: [Vertex; 3] = std::array::from_fn(|i| {
                let (v, t, n) = (face.vertex[i], face.texture[i], face.normal[i]);
                debug_assert!(
                    (1..=positions.len() as u32).contains(&v),
                    "Face vertex index {v} out of range 1..={}",
                    positions.len()
                );
                debug_assert!(
                    (1..=uvs.len() as u32).contains(&t),
                    "Face texture index {t} out of range 1..={}",
                    uvs.len()
                );
                debug_assert!(
                    (1..=normals.len() as u32).contains(&n),
                    "Face normal index {n} out of range 1..={}",
                    normals.len()
                );
                Vertex::new(positions[v as usize - 1])
                    .with_uv(uvs[t as usize - 1])
                    .with_normal(normals[n as usize - 1])
            });
            written += self.triangle(vertices);
        }
        debug!(faces = faces.len(), pixels = written, "Drew faces");
        written
    }
}
