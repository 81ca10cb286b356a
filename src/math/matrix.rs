//! Fixed-size row-major matrices.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//!
//! # Example
//! ```
//! use soft_render::math::{Mat4, Vec4f};
//!
//! let m = Mat4::translation(1.0, 2.0, 3.0) * Mat4::scaling(2.0, 2.0, 2.0);
//! let p = m * Vec4f::new(1.0, 1.0, 1.0, 1.0);
//! assert_eq!(p, Vec4f::new(3.0, 4.0, 5.0, 1.0));
//! ```

use std::ops::{Div, Index, IndexMut, Mul};

use approx::{AbsDiffEq, RelativeEq};

use super::vector::{Vec3f, Vector};

/// An `R`x`C` matrix of `f32` stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const R: usize, const C: usize> {
    data: [[f32; C]; R],
}

pub type Mat4 = Matrix<4, 4>;

impl<const R: usize, const C: usize> Matrix<R, C> {
    pub const fn from_rows(data: [[f32; C]; R]) -> Self {
        Self { data }
    }

    pub const fn zero() -> Self {
        Self {
            data: [[0.0; C]; R],
        }
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    pub fn row(&self, row: usize) -> Vector<f32, C> {
        Vector::from_array(self.data[row])
    }

    pub fn column(&self, col: usize) -> Vector<f32, R> {
        Vector::from_array(std::array::from_fn(|row| self.data[row][col]))
    }

    pub fn set_row(&mut self, row: usize, values: Vector<f32, C>) {
        self.data[row] = values.into_array();
    }

    pub fn transpose(&self) -> Matrix<C, R> {
        Matrix {
            data: std::array::from_fn(|row| std::array::from_fn(|col| self.data[col][row])),
        }
    }
}

impl<const N: usize> Matrix<N, N> {
    pub fn identity() -> Self {
        Self {
            data: std::array::from_fn(|row| {
                std::array::from_fn(|col| if row == col { 1.0 } else { 0.0 })
            }),
        }
    }
}

impl<const R: usize, const C: usize> Default for Matrix<R, C> {
    fn default() -> Self {
        Self::zero()
    }
}

impl Mat4 {
    /// Creates a translation matrix.
    ///
    /// Translation is stored in the last column.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Self::from_rows([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a counter-clockwise rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a counter-clockwise rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a counter-clockwise rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a rotation of `angle` radians around an arbitrary axis
    /// (Rodrigues' formula). The axis does not need to be normalized.
    pub fn rotation_axis_angle(axis: Vec3f, angle: f32) -> Self {
        let k = axis.normalize();
        let (x, y, z) = (k.x(), k.y(), k.z());
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;
        Self::from_rows([
            [c + x * x * t, x * y * t - z * s, x * z * t + y * s, 0.0],
            [y * x * t + z * s, c + y * y * t, y * z * t - x * s, 0.0],
            [z * x * t - y * s, z * y * t + x * s, c + z * z * t, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }
}

impl<const R: usize, const C: usize> Index<(usize, usize)> for Matrix<R, C> {
    type Output = f32;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &f32 {
        &self.data[row][col]
    }
}

impl<const R: usize, const C: usize> IndexMut<(usize, usize)> for Matrix<R, C> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
        &mut self.data[row][col]
    }
}

/// Matrix multiplication: `(R x C) * (C x K) = (R x K)`.
///
/// `A * B * v` applies B first, then A.
impl<const R: usize, const C: usize, const K: usize> Mul<Matrix<C, K>> for Matrix<R, C> {
    type Output = Matrix<R, K>;

    fn mul(self, rhs: Matrix<C, K>) -> Matrix<R, K> {
        let mut result = Matrix::<R, K>::zero();
        for row in 0..R {
            for col in 0..K {
                result.data[row][col] = (0..C).map(|i| self.data[row][i] * rhs.data[i][col]).sum();
            }
        }
        result
    }
}

/// Transform a column vector: `(R x C) * C = R`.
impl<const R: usize, const C: usize> Mul<Vector<f32, C>> for Matrix<R, C> {
    type Output = Vector<f32, R>;

    fn mul(self, v: Vector<f32, C>) -> Vector<f32, R> {
        Vector::from_array(std::array::from_fn(|row| self.row(row).dot(v)))
    }
}

impl<const R: usize, const C: usize> Div<f32> for Matrix<R, C> {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self {
            data: self.data.map(|row| row.map(|value| value / rhs)),
        }
    }
}

/// A vector is a single-column matrix.
impl<const N: usize> From<Vector<f32, N>> for Matrix<N, 1> {
    fn from(v: Vector<f32, N>) -> Self {
        Self {
            data: v.into_array().map(|value| [value]),
        }
    }
}

impl<const N: usize> From<Matrix<N, 1>> for Vector<f32, N> {
    fn from(m: Matrix<N, 1>) -> Self {
        m.column(0)
    }
}

impl<const R: usize, const C: usize> AbsDiffEq for Matrix<R, C> {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        (0..R).all(|row| self.row(row).abs_diff_eq(&other.row(row), epsilon))
    }
}

impl<const R: usize, const C: usize> RelativeEq for Matrix<R, C> {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        (0..R).all(|row| {
            self.row(row)
                .relative_eq(&other.row(row), epsilon, max_relative)
        })
    }
}
