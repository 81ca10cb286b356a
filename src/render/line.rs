//! Bresenham line drawing.
//!
//! Integer-only stepping: pick the dominant axis (transposing steep lines),
//! always walk left to right, and accumulate an error term that decides
//! when the minor axis advances. Both endpoints are drawn.
//!
//! Only the part of the dominant axis that lies inside the framebuffer is
//! walked, so endpoints far off screen cost nothing extra.

use tracing::trace;

use super::Renderer;
use crate::display::Display;
use crate::math::{Vec2f, Vec2i, Vec3f};

/// Walk the pixels from `p0` to `p1` inclusive, restricted to the columns
/// (rows for steep lines) inside `bounds`.
///
/// `plot` receives each pixel plus its parameter `t` along the segment,
/// `0.0` at `p0` and `1.0` at `p1`, regardless of the internal walk order.
fn bresenham(p0: Vec2i, p1: Vec2i, bounds: (u32, u32), mut plot: impl FnMut(i32, i32, f32)) {
    let (mut x0, mut y0) = (i64::from(p0.x()), i64::from(p0.y()));
    let (mut x1, mut y1) = (i64::from(p1.x()), i64::from(p1.y()));
    let mut span = i64::from(bounds.0);

    let steep = (x0 - x1).abs() < (y0 - y1).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
        span = i64::from(bounds.1);
    }
    let reversed = x0 > x1;
    if reversed {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let first = x0.max(0);
    let last = x1.min(span - 1);
    if first > last {
        return;
    }

    let dx = x1 - x0;
    let dy = y1 - y0;
    let derr = 2 * dy.abs();
    let dir = if dy > 0 { 1 } else { -1 };

    // Error state after `first - x0` steps: the minor axis has advanced the
    // least number of times that keeps the error within (-dx, dx].
    let (mut y, mut err) = if dx == 0 {
        (y0, 0)
    } else {
        let two_dx = 2 * i128::from(dx);
        let total = i128::from(first - x0) * i128::from(derr);
        let steps = (total - i128::from(dx) + two_dx - 1).div_euclid(two_dx);
        (y0 + dir * steps as i64, (total - steps * two_dx) as i64)
    };

    for x in first..=last {
        let t = if dx == 0 {
            0.0
        } else {
            ((x - x0) as f64 / dx as f64) as f32
        };
        let t = if reversed { 1.0 - t } else { t };

        // x is inside the framebuffer, y lies between two i32 endpoints
        if steep {
            plot(y as i32, x as i32, t);
        } else {
            plot(x as i32, y as i32, t);
        }

        err += derr;
        if err > dx {
            y += dir;
            err -= 2 * dx;
        }
    }
}

impl<D: Display> Renderer<'_, D> {
    /// Draw a line between two pixel positions.
    pub fn line(&mut self, p0: Vec2i, p1: Vec2i, color: u32) {
        let bounds = self.resolution();
        let display = &mut self.display;
        bresenham(p0, p1, bounds, |x, y, _| display.put(x, y, color));
    }

    /// Draw a line between two points in normalized device coordinates.
    ///
    /// `(-1, -1)` is the bottom-left corner of the screen, `(1, 1)` the
    /// top-right.
    pub fn line_ndc(&mut self, p0: Vec2f, p1: Vec2f, color: u32) {
        let (width, height) = self.resolution();
        let to_pixel = |p: Vec2f| {
            Vec2i::new(
                ((p.x() + 1.0) * width as f32 / 2.0) as i32,
                ((1.0 - p.y()) * height as f32 / 2.0) as i32,
            )
        };
        self.line(to_pixel(p0), to_pixel(p1), color);
    }

    /// Draw a depth-tested line between two model-space points.
    ///
    /// Both endpoints go through the transform stack; depth is interpolated
    /// linearly over the dominant-axis steps. Segments whose projection is
    /// not finite (an endpoint on the eye plane) are skipped.
    pub fn line_3d(&mut self, p0: Vec3f, p1: Vec3f, color: u32) {
        let s0 = self.project_to_screen(p0);
        let s1 = self.project_to_screen(p1);
        let finite = |s: Vec3f| s.x().is_finite() && s.y().is_finite() && s.z().is_finite();
        if !finite(s0) || !finite(s1) {
            trace!(?p0, ?p1, "Skipping line with non-finite projection");
            return;
        }
        let (z0, z1) = (s0.z(), s1.z());

        let bounds = self.resolution();
        bresenham(s0.xy().to_i32(), s1.xy().to_i32(), bounds, |x, y, t| {
            self.put_with_depth(x, y, z0 + (z1 - z0) * t, color);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{RED, WHITE};
    use crate::math::Mat4;
    use crate::render::FrameBuffer;

    fn lit(renderer: &Renderer<'_, FrameBuffer>) -> Vec<(i32, i32)> {
        let (w, h) = renderer.resolution();
        let fb = renderer.display();
        let mut out = Vec::new();
        for y in 0..h as i32 {
            for x in 0..w as i32 {
                if fb.rgb(x, y) != Some(0) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    fn renderer(w: u32, h: u32) -> Renderer<'static, FrameBuffer> {
        Renderer::new(FrameBuffer::new(w, h).unwrap()).unwrap()
    }

    #[test]
    fn horizontal_line_includes_both_endpoints() {
        let mut r = renderer(10, 10);
        r.line(Vec2i::new(0, 0), Vec2i::new(5, 0), WHITE);
        assert_eq!(lit(&r), (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn reversed_endpoints_draw_the_same_pixels() {
        let mut a = renderer(16, 16);
        let mut b = renderer(16, 16);
        a.line(Vec2i::new(1, 2), Vec2i::new(13, 7), WHITE);
        b.line(Vec2i::new(13, 7), Vec2i::new(1, 2), WHITE);
        assert_eq!(lit(&a), lit(&b));
        assert_eq!(lit(&a).len(), 13);
    }

    #[test]
    fn steep_line_has_one_pixel_per_row() {
        let mut r = renderer(16, 16);
        r.line(Vec2i::new(3, 1), Vec2i::new(6, 12), WHITE);
        let pixels = lit(&r);
        assert_eq!(pixels.len(), 12);
        for y in 1..=12 {
            assert_eq!(pixels.iter().filter(|p| p.1 == y).count(), 1);
        }
        assert!(pixels.contains(&(3, 1)));
        assert!(pixels.contains(&(6, 12)));
    }

    #[test]
    fn diagonal_and_single_point() {
        let mut r = renderer(8, 8);
        r.line(Vec2i::new(0, 7), Vec2i::new(7, 0), WHITE);
        let pixels = lit(&r);
        assert_eq!(pixels.len(), 8);
        assert!(pixels.iter().all(|&(x, y)| x + y == 7));

        let mut r = renderer(8, 8);
        r.line(Vec2i::new(4, 4), Vec2i::new(4, 4), WHITE);
        assert_eq!(lit(&r), vec![(4, 4)]);
    }

    #[test]
    fn off_screen_pixels_are_ignored() {
        let mut r = renderer(4, 4);
        r.line(Vec2i::new(-5, 1), Vec2i::new(10, 1), WHITE);
        assert_eq!(lit(&r).len(), 4);
    }

    #[test]
    fn extreme_endpoints_do_not_overflow() {
        let mut r = renderer(10, 10);
        r.line(
            Vec2i::new(-2_000_000_000, 1),
            Vec2i::new(2_000_000_000, 1),
            WHITE,
        );
        assert_eq!(lit(&r), (0..10).map(|x| (x, 1)).collect::<Vec<_>>());

        let mut r = renderer(10, 10);
        r.line(Vec2i::new(i32::MIN, i32::MIN), Vec2i::new(i32::MAX, i32::MAX), WHITE);
        let pixels = lit(&r);
        assert_eq!(pixels.len(), 10);
        assert!(pixels.iter().all(|&(x, y)| x == y));
    }

    #[test]
    fn clipped_walk_matches_full_walk() {
        // same line, once entirely on screen and once shifted 100 pixels
        // up and left so that it starts off screen
        let mut full = Vec::new();
        bresenham(Vec2i::new(70, 93), Vec2i::new(140, 120), (1000, 1000), |x, y, _| {
            full.push((x - 100, y - 100))
        });
        full.retain(|&(x, y)| (0..16).contains(&x) && (0..16).contains(&y));
        assert!(!full.is_empty());

        let mut r = renderer(16, 16);
        r.line(Vec2i::new(-30, -7), Vec2i::new(40, 20), WHITE);
        let mut pixels = lit(&r);
        pixels.sort_by_key(|&(x, y)| (x, y));
        full.sort_by_key(|&(x, y)| (x, y));
        assert_eq!(pixels, full);

        // steep variant, walking rows
        let mut full = Vec::new();
        bresenham(Vec2i::new(95, 60), Vec2i::new(110, 150), (1000, 1000), |x, y, _| {
            full.push((x - 100, y - 100))
        });
        full.retain(|&(x, y)| (0..16).contains(&x) && (0..16).contains(&y));
        assert!(!full.is_empty());

        let mut r = renderer(16, 16);
        r.line(Vec2i::new(-5, -40), Vec2i::new(10, 50), WHITE);
        let mut pixels = lit(&r);
        pixels.sort_by_key(|&(x, y)| (x, y));
        full.sort_by_key(|&(x, y)| (x, y));
        assert_eq!(pixels, full);
    }

    #[test]
    fn line_through_eye_plane_stays_bounded() {
        let mut r = renderer(32, 32);
        r.look_at(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, Vec3f::Y);
        let mut calls = 0;
        let s0 = r.project_to_screen(Vec3f::new(1.0, 1.0, 2.999_998_8));
        let s1 = r.project_to_screen(Vec3f::new(-1.0, -1.0, 3.000_001_2));
        bresenham(s0.xy().to_i32(), s1.xy().to_i32(), (32, 32), |_, _, _| calls += 1);
        assert!(calls <= 32);

        r.line_3d(
            Vec3f::new(1.0, 1.0, 2.999_998_8),
            Vec3f::new(-1.0, -1.0, 3.000_001_2),
            WHITE,
        );
        // the eye point itself projects through w = 0
        r.line_3d(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, WHITE);
    }

    #[test]
    fn ndc_axes_map_to_screen_centre() {
        let mut r = renderer(20, 10);
        r.line_ndc(Vec2f::new(-1.0, 0.0), Vec2f::new(0.95, 0.0), WHITE);
        let pixels = lit(&r);
        assert!(pixels.iter().all(|&(_, y)| y == 5));
        assert_eq!(pixels.first(), Some(&(0, 5)));
        assert_eq!(pixels.last(), Some(&(19, 5)));

        let mut r = renderer(20, 10);
        r.line_ndc(Vec2f::new(0.0, 1.0), Vec2f::new(0.0, -0.8), WHITE);
        let pixels = lit(&r);
        assert!(pixels.iter().all(|&(x, _)| x == 10));
        assert_eq!(pixels.first(), Some(&(10, 0)));
    }

    #[test]
    fn line_3d_interpolates_depth() {
        let mut r = renderer(16, 16);
        r.transform_mut().set_viewport(Mat4::identity());
        r.line_3d(Vec3f::new(0.0, 0.0, 0.0), Vec3f::new(10.0, 0.0, 1.0), RED);
        assert_eq!(r.depth_buffer().get(0, 0), Some(0.0));
        assert_eq!(r.depth_buffer().get(5, 0), Some(0.5));
        assert_eq!(r.depth_buffer().get(10, 0), Some(1.0));

        // behind the first line: hidden
        r.line_3d(Vec3f::new(0.0, 0.0, -1.0), Vec3f::new(10.0, 0.0, -1.0), WHITE);
        assert_eq!(r.display().rgb(5, 0), Some(RED));

        r.set_depth_test(false);
        r.line_3d(Vec3f::new(0.0, 0.0, -1.0), Vec3f::new(10.0, 0.0, -1.0), WHITE);
        assert_eq!(r.display().rgb(5, 0), Some(WHITE));
    }
}
