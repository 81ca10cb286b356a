//! Fixed-size vector and matrix algebra.

pub mod matrix;
pub mod vector;

pub use matrix::{Mat4, Matrix};
pub use vector::{Vec2f, Vec2i, Vec3f, Vec3i, Vec4f, Vector};
