//! Fixed-size numeric vectors.
//!
//! [`Vector`] is a thin wrapper over `[T; N]`. Named components (`x`, `y`,
//! `z`, `w`, and `u`/`v` for texture coordinates) are accessor methods over
//! the same backing slots, only available on the sizes that have them.
//!
//! # Example
//! ```
//! use soft_render::math::{Vec3f, Vector};
//!
//! let a = Vec3f::new(1.0, 0.0, 0.0);
//! let b = Vec3f::new(0.0, 1.0, 0.0);
//! assert_eq!(a.cross(b), Vec3f::new(0.0, 0.0, 1.0));
//! assert_eq!(a.dot(b), 0.0);
//! ```

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use approx::{AbsDiffEq, RelativeEq};

/// An `N`-component vector of `T`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Vector<T, const N: usize> {
    data: [T; N],
}

pub type Vec2f = Vector<f32, 2>;
pub type Vec3f = Vector<f32, 3>;
pub type Vec4f = Vector<f32, 4>;
pub type Vec2i = Vector<i32, 2>;
pub type Vec3i = Vector<i32, 3>;

impl<T, const N: usize> Vector<T, N> {
    pub const fn from_array(data: [T; N]) -> Self {
        Self { data }
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.data
    }

    pub fn into_array(self) -> [T; N] {
        self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Copy, const N: usize> Vector<T, N> {
    /// Applies `f` to every component.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Vector<U, N> {
        Vector {
            data: self.data.map(f),
        }
    }
}

impl<T: Copy + Default, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self {
            data: [T::default(); N],
        }
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self { data }
    }
}

// ============ Named components ============

impl<T: Copy> Vector<T, 2> {
    pub const fn new(x: T, y: T) -> Self {
        Self { data: [x, y] }
    }

    #[inline]
    pub fn x(&self) -> T {
        self.data[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.data[1]
    }

    /// Texture-space alias for `x`.
    #[inline]
    pub fn u(&self) -> T {
        self.data[0]
    }

    /// Texture-space alias for `y`.
    #[inline]
    pub fn v(&self) -> T {
        self.data[1]
    }

    pub fn set_x(&mut self, value: T) {
        self.data[0] = value;
    }

    pub fn set_y(&mut self, value: T) {
        self.data[1] = value;
    }
}

impl<T: Copy> Vector<T, 3> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Self { data: [x, y, z] }
    }

    #[inline]
    pub fn x(&self) -> T {
        self.data[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.data[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.data[2]
    }

    pub fn set_x(&mut self, value: T) {
        self.data[0] = value;
    }

    pub fn set_y(&mut self, value: T) {
        self.data[1] = value;
    }

    pub fn set_z(&mut self, value: T) {
        self.data[2] = value;
    }

    /// Drops the z component.
    pub fn xy(&self) -> Vector<T, 2> {
        Vector::<T, 2>::new(self.data[0], self.data[1])
    }
}

impl<T: Copy> Vector<T, 4> {
    pub const fn new(x: T, y: T, z: T, w: T) -> Self {
        Self { data: [x, y, z, w] }
    }

    #[inline]
    pub fn x(&self) -> T {
        self.data[0]
    }

    #[inline]
    pub fn y(&self) -> T {
        self.data[1]
    }

    #[inline]
    pub fn z(&self) -> T {
        self.data[2]
    }

    #[inline]
    pub fn w(&self) -> T {
        self.data[3]
    }

    /// Drops the w component.
    pub fn truncate(&self) -> Vector<T, 3> {
        Vector::<T, 3>::new(self.data[0], self.data[1], self.data[2])
    }
}

impl Vec2f {
    pub const ZERO: Self = Self::new(0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0);
}

impl Vec3f {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Homogeneous form with the given w (1 for points, 0 for directions).
    pub const fn extend(self, w: f32) -> Vec4f {
        Vec4f::new(self.data[0], self.data[1], self.data[2], w)
    }
}

impl Vec4f {
    /// Perspective divide: `(x/w, y/w, z/w)`.
    ///
    /// A zero `w` leaves the components undivided.
    pub fn perspective_divide(self) -> Vec3f {
        let w = self.data[3];
        if w != 0.0 && w != 1.0 {
            Vec3f::new(self.data[0] / w, self.data[1] / w, self.data[2] / w)
        } else {
            self.truncate()
        }
    }
}

// ============ Products ============

impl<T, const N: usize> Vector<T, N>
where
    T: Copy + Default + Add<Output = T> + Mul<Output = T>,
{
    pub fn dot(&self, other: Self) -> T {
        self.data
            .iter()
            .zip(other.data.iter())
            .fold(T::default(), |acc, (&a, &b)| acc + a * b)
    }
}

impl<T> Vector<T, 3>
where
    T: Copy + Sub<Output = T> + Mul<Output = T>,
{
    /// Returns the cross product of two vectors.
    /// The resulting vector is perpendicular to both input vectors.
    pub fn cross(&self, other: Self) -> Self {
        let [ax, ay, az] = self.data;
        let [bx, by, bz] = other.data;
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }
}

// ============ Float-only operations ============

impl<const N: usize> Vector<f32, N> {
    pub fn length(&self) -> f32 {
        self.dot(*self).sqrt()
    }

    /// Returns a unit vector in the same direction.
    ///
    /// The zero vector has no direction and is returned unchanged.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            *self * (1.0 / len)
        } else {
            *self
        }
    }

    /// Linearly interpolate between two vectors.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Truncating conversion to integer components.
    pub fn to_i32(self) -> Vector<i32, N> {
        self.map(|c| c as i32)
    }
}

impl<const N: usize> Vector<i32, N> {
    pub fn to_f32(self) -> Vector<f32, N> {
        self.map(|c| c as f32)
    }
}

// ============ Operators ============

impl<T, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T, const N: usize> IndexMut<usize> for Vector<T, N> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

/// Component-wise addition of two vectors.
impl<T: Copy + Add<Output = T>, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            data: std::array::from_fn(|i| self.data[i] + rhs.data[i]),
        }
    }
}

/// Component-wise subtraction of two vectors.
impl<T: Copy + Sub<Output = T>, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            data: std::array::from_fn(|i| self.data[i] - rhs.data[i]),
        }
    }
}

/// Scalar multiplication of a vector.
impl<T: Copy + Mul<Output = T>, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(self, rhs: T) -> Self {
        self.map(|c| c * rhs)
    }
}

impl<const N: usize> Mul<Vector<f32, N>> for f32 {
    type Output = Vector<f32, N>;

    fn mul(self, rhs: Vector<f32, N>) -> Vector<f32, N> {
        rhs * self
    }
}

/// Scalar division of a vector.
impl<T: Copy + Div<Output = T>, const N: usize> Div<T> for Vector<T, N> {
    type Output = Self;

    fn div(self, rhs: T) -> Self {
        self.map(|c| c / rhs)
    }
}

impl<T: Copy + Neg<Output = T>, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|c| -c)
    }
}

impl<T: Copy + Add<Output = T>, const N: usize> AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<T: Copy + Sub<Output = T>, const N: usize> SubAssign for Vector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<T: Copy + Mul<Output = T>, const N: usize> MulAssign<T> for Vector<T, N> {
    fn mul_assign(&mut self, rhs: T) {
        *self = *self * rhs;
    }
}

impl<T: Copy + Div<Output = T>, const N: usize> DivAssign<T> for Vector<T, N> {
    fn div_assign(&mut self, rhs: T) {
        *self = *self / rhs;
    }
}

// ============ approx ============

impl<const N: usize> AbsDiffEq for Vector<f32, N> {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

impl<const N: usize> RelativeEq for Vector<f32, N> {
    fn default_max_relative() -> f32 {
        f32::EPSILON
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.relative_eq(b, epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn named_components_share_storage() {
        let mut uv = Vec2f::new(0.25, 0.75);
        assert_eq!(uv.u(), uv.x());
        assert_eq!(uv.v(), uv.y());

        uv[0] = 0.5;
        assert_eq!(uv.u(), 0.5);
        uv.set_y(0.1);
        assert_eq!(uv[1], 0.1);
    }

    #[test]
    fn arithmetic() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        let b = Vec3f::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3f::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3f::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3f::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(b / 2.0, Vec3f::new(2.0, 2.5, 3.0));
        assert_eq!(-a, Vec3f::new(-1.0, -2.0, -3.0));
        assert_eq!(a.dot(b), 32.0);

        let mut c = a;
        c += b;
        c -= a;
        c *= 3.0;
        c /= 3.0;
        assert_eq!(c, b);
    }

    #[test]
    fn integer_vectors() {
        let a = Vec2i::new(3, -4);
        assert_eq!(a + Vec2i::new(1, 1), Vec2i::new(4, -3));
        assert_eq!(a.dot(a), 25);
        assert_eq!(Vec3i::new(1, 0, 0).cross(Vec3i::new(0, 1, 0)), Vec3i::new(0, 0, 1));
        assert_eq!(Vec2f::new(1.9, -1.9).to_i32(), Vec2i::new(1, -1));
    }

    #[test]
    fn cross_is_perpendicular() {
        let a = Vec3f::new(1.0, 2.0, 3.0);
        let b = Vec3f::new(-2.0, 0.5, 4.0);
        let c = a.cross(b);
        assert_relative_eq!(c.dot(a), 0.0, epsilon = 1e-5);
        assert_relative_eq!(c.dot(b), 0.0, epsilon = 1e-5);
        assert_eq!(Vec3f::X.cross(Vec3f::Y), Vec3f::Z);
    }

    #[test]
    fn normalize_produces_unit_length() {
        for v in [
            Vec3f::new(3.0, 4.0, 0.0),
            Vec3f::new(-0.001, 0.002, 0.0005),
            Vec3f::new(100.0, -250.0, 42.0),
        ] {
            assert_relative_eq!(v.normalize().length(), 1.0, epsilon = 1e-5);
        }
        assert_relative_eq!(Vec4f::new(1.0, 1.0, 1.0, 1.0).normalize().length(), 1.0);
    }

    #[test]
    fn normalize_zero_is_noop() {
        assert_eq!(Vec3f::ZERO.normalize(), Vec3f::ZERO);
        assert_eq!(Vec2f::ZERO.normalize(), Vec2f::ZERO);
    }

    #[test]
    fn perspective_divide() {
        let v = Vec4f::new(2.0, 4.0, 6.0, 2.0);
        assert_eq!(v.perspective_divide(), Vec3f::new(1.0, 2.0, 3.0));
        // w == 0 is left alone rather than producing infinities
        assert_eq!(
            Vec4f::new(1.0, 2.0, 3.0, 0.0).perspective_divide(),
            Vec3f::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn lerp_endpoints() {
        let a = Vec2f::new(0.0, 10.0);
        let b = Vec2f::new(10.0, 0.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Vec2f::new(5.0, 5.0));
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_panics() {
        let v = Vec2f::new(1.0, 2.0);
        let _ = v[2];
    }
}
