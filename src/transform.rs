//! Model/view/projection/viewport matrix stack.
//!
//! [`TransformStack`] bundles the four matrices of the pipeline with their
//! cached product. Mutators use a fluent API where each call returns
//! `&mut Self` for chaining:
//!
//! ```
//! use soft_render::math::Vec3f;
//! use soft_render::transform::TransformStack;
//!
//! let mut stack = TransformStack::new(800, 600);
//! stack
//!     .look_at(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, Vec3f::Y)
//!     .model_rotate_y(0.5)
//!     .model_scale(Vec3f::new(2.0, 2.0, 2.0));
//! ```

use tracing::debug;

use crate::math::{Mat4, Vec3f};

/// Model, view, projection, viewport and their product.
///
/// The cached `mvp` is always `viewport * projection * view * model` as of
/// the last mutation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformStack {
    model: Mat4,
    view: Mat4,
    projection: Mat4,
    viewport: Mat4,
    mvp: Mat4,
}

impl TransformStack {
    /// Create a stack whose viewport maps NDC `[-1, 1]²` onto a
    /// `width` x `height` pixel grid, with row 0 at the top of the screen.
    pub fn new(width: u32, height: u32) -> Self {
        let mut stack = Self {
            model: Mat4::identity(),
            view: Mat4::identity(),
            projection: Mat4::identity(),
            viewport: Self::viewport_matrix(width, height),
            mvp: Mat4::identity(),
        };
        stack.update_mvp();
        stack
    }

    /// Viewport matrix for a `width` x `height` target (y flipped).
    pub fn viewport_matrix(width: u32, height: u32) -> Mat4 {
        let half_w = width as f32 / 2.0;
        let half_h = height as f32 / 2.0;
        Mat4::from_rows([
            [half_w, 0.0, 0.0, half_w],
            [0.0, -half_h, 0.0, half_h],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    fn update_mvp(&mut self) {
        self.mvp = self.viewport * self.projection * self.view * self.model;
    }

    // ============ Camera ============

    /// Place the camera at `eye`, looking at `target`.
    ///
    /// Builds an orthonormal basis with forward pointing from the target
    /// back to the eye, and resets the projection to a single perspective
    /// term `-1 / |eye - target|` in element (3, 2). Nearer geometry ends up
    /// with a larger post-divide z.
    pub fn look_at(&mut self, eye: Vec3f, target: Vec3f, up: Vec3f) -> &mut Self {
        let forward = (eye - target).normalize();
        let right = up.normalize().cross(forward).normalize();
        let up = forward.cross(right);

        let mut view = Mat4::identity();
        for (row, axis) in [right, up, forward].into_iter().enumerate() {
            view.set_row(row, axis.extend(-axis.dot(target)));
        }
        self.view = view;

        self.projection = Mat4::identity();
        let distance = (eye - target).length();
        if distance > 0.0 {
            self.projection[(3, 2)] = -1.0 / distance;
        }

        debug!(?eye, ?target, distance, "Camera placed");
        self.update_mvp();
        self
    }

    // ============ Model ============

    /// Reset the model matrix to identity.
    pub fn model_identity(&mut self) -> &mut Self {
        self.model = Mat4::identity();
        self.update_mvp();
        self
    }

    pub fn model_scale(&mut self, factor: Vec3f) -> &mut Self {
        self.apply_model(Mat4::scaling(factor.x(), factor.y(), factor.z()))
    }

    pub fn model_translate(&mut self, offset: Vec3f) -> &mut Self {
        self.apply_model(Mat4::translation(offset.x(), offset.y(), offset.z()))
    }

    /// Rotate around the X axis (pitch).
    pub fn model_rotate_x(&mut self, angle: f32) -> &mut Self {
        self.apply_model(Mat4::rotation_x(angle))
    }

    /// Rotate around the Y axis (yaw).
    pub fn model_rotate_y(&mut self, angle: f32) -> &mut Self {
        self.apply_model(Mat4::rotation_y(angle))
    }

    /// Rotate around the Z axis (roll).
    pub fn model_rotate_z(&mut self, angle: f32) -> &mut Self {
        self.apply_model(Mat4::rotation_z(angle))
    }

    pub fn model_rotate_axis_angle(&mut self, axis: Vec3f, angle: f32) -> &mut Self {
        self.apply_model(Mat4::rotation_axis_angle(axis, angle))
    }

    /// Post-multiply the model matrix, so `m` applies before what is
    /// already there.
    fn apply_model(&mut self, m: Mat4) -> &mut Self {
        self.model = self.model * m;
        self.update_mvp();
        self
    }

    // ============ Raw setters ============

    pub fn set_model(&mut self, model: Mat4) -> &mut Self {
        self.model = model;
        self.update_mvp();
        self
    }

    pub fn set_view(&mut self, view: Mat4) -> &mut Self {
        self.view = view;
        self.update_mvp();
        self
    }

    pub fn set_projection(&mut self, projection: Mat4) -> &mut Self {
        self.projection = projection;
        self.update_mvp();
        self
    }

    pub fn set_viewport(&mut self, viewport: Mat4) -> &mut Self {
        self.viewport = viewport;
        self.update_mvp();
        self
    }

    // ============ Getters ============

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn viewport(&self) -> Mat4 {
        self.viewport
    }

    pub fn mvp(&self) -> Mat4 {
        self.mvp
    }

    /// Transform a model-space point to screen space.
    ///
    /// x and y are pixel coordinates; z is kept for depth comparison.
    #[inline]
    pub fn project_to_screen(&self, v: Vec3f) -> Vec3f {
        (self.mvp * v.extend(1.0)).perspective_divide()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_viewport_maps_ndc_corners() {
        let stack = TransformStack::new(800, 600);
        assert_relative_eq!(
            stack.project_to_screen(Vec3f::new(-1.0, 1.0, 0.0)),
            Vec3f::new(0.0, 0.0, 0.0)
        );
        assert_relative_eq!(
            stack.project_to_screen(Vec3f::new(1.0, -1.0, 0.0)),
            Vec3f::new(800.0, 600.0, 0.0)
        );
        assert_relative_eq!(
            stack.project_to_screen(Vec3f::ZERO),
            Vec3f::new(400.0, 300.0, 0.0)
        );
    }

    #[test]
    fn test_look_at_basis() {
        let mut stack = TransformStack::new(100, 100);
        let up = Vec3f::Y;
        stack.look_at(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, up);

        let view = stack.view();
        let forward = view.row(2).truncate();
        assert_relative_eq!(forward, Vec3f::Z, epsilon = 1e-6);

        let right = view.row(0).truncate();
        assert_relative_eq!(right.dot(up), 0.0, epsilon = 1e-6);
        assert_relative_eq!(right.dot(forward), 0.0, epsilon = 1e-6);
        assert_relative_eq!(stack.projection()[(3, 2)], -1.0 / 3.0);
    }

    #[test]
    fn test_look_at_same_point_keeps_identity_projection() {
        let mut stack = TransformStack::new(10, 10);
        stack.look_at(Vec3f::ONE, Vec3f::ONE, Vec3f::Y);
        assert_eq!(stack.projection(), Mat4::identity());
    }

    #[test]
    fn test_nearer_points_have_larger_depth() {
        let mut stack = TransformStack::new(100, 100);
        stack.look_at(Vec3f::new(0.0, 0.0, 3.0), Vec3f::ZERO, Vec3f::Y);
        let near = stack.project_to_screen(Vec3f::new(0.0, 0.0, 1.0));
        let far = stack.project_to_screen(Vec3f::new(0.0, 0.0, -1.0));
        assert_relative_eq!(near.z(), 1.5, epsilon = 1e-5);
        assert_relative_eq!(far.z(), -0.75, epsilon = 1e-5);
        assert!(near.z() > far.z());
    }

    #[test]
    fn test_mvp_tracks_every_mutation() {
        let mut stack = TransformStack::new(320, 240);
        stack
            .look_at(Vec3f::new(1.0, 2.0, 5.0), Vec3f::ZERO, Vec3f::Y)
            .model_translate(Vec3f::new(0.5, 0.0, 0.0))
            .model_rotate_axis_angle(Vec3f::new(1.0, 1.0, 0.0), 0.7)
            .model_scale(Vec3f::new(2.0, 1.0, 1.0));

        let expected = stack.viewport() * stack.projection() * stack.view() * stack.model();
        assert_relative_eq!(stack.mvp(), expected, epsilon = 1e-5);

        stack.set_viewport(TransformStack::viewport_matrix(64, 64));
        let expected = stack.viewport() * stack.projection() * stack.view() * stack.model();
        assert_relative_eq!(stack.mvp(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_model_mutators_post_multiply() {
        let mut stack = TransformStack::new(2, 2);
        stack
            .model_translate(Vec3f::new(1.0, 0.0, 0.0))
            .model_scale(Vec3f::new(2.0, 2.0, 2.0));
        // scale first, then translate
        let p = (stack.model() * Vec3f::new(1.0, 1.0, 1.0).extend(1.0)).truncate();
        assert_eq!(p, Vec3f::new(3.0, 2.0, 2.0));

        stack.model_identity();
        assert_eq!(stack.model(), Mat4::identity());
    }

    #[test]
    fn test_rotations_compose() {
        let mut a = TransformStack::new(2, 2);
        a.model_rotate_x(0.3).model_rotate_y(-0.4).model_rotate_z(1.1);
        let expected = Mat4::rotation_x(0.3) * Mat4::rotation_y(-0.4) * Mat4::rotation_z(1.1);
        assert_relative_eq!(a.model(), expected, epsilon = 1e-6);
    }
}
