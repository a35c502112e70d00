/// Fixed-dimension vectors
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};
use crate::quaternion::Quaternion;
use crate::scalar::Real;
use crate::transform::Transform;

/// An ordered tuple of `N` scalars.
///
/// Vectors are plain values: copied, never shared. Equality is tolerant,
/// component by component, see [`Real::approx_eq`].
#[derive(Debug, Clone, Copy)]
pub struct Vector<T: Real, const N: usize> {
    data: [T; N],
}

pub type Vec2<T> = Vector<T, 2>;
pub type Vec3<T> = Vector<T, 3>;
pub type Vec4<T> = Vector<T, 4>;

impl<T: Real, const N: usize> Vector<T, N> {
    pub const fn new(data: [T; N]) -> Self {
        Self { data }
    }

    pub fn zero() -> Self {
        Self { data: [T::ZERO; N] }
    }

    /// Build from a slice whose length must be exactly `N`
    pub fn from_slice(values: &[T]) -> Result<Self> {
        if values.len() != N {
            return Err(Error::Length {
                expected: N,
                found: values.len(),
            });
        }
        let mut data = [T::ZERO; N];
        data.copy_from_slice(values);
        Ok(Self { data })
    }

    pub const fn dimensions(&self) -> usize {
        N
    }

    pub fn as_array(&self) -> &[T; N] {
        &self.data
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Checked element access
    pub fn get(&self, index: usize) -> Result<T> {
        self.data
            .get(index)
            .copied()
            .ok_or(Error::OutOfBounds { index, len: N })
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        self.data
            .get_mut(index)
            .ok_or(Error::OutOfBounds { index, len: N })
    }

    pub fn dot(&self, other: &Self) -> T {
        let mut total = T::ZERO;
        for i in 0..N {
            total += self.data[i] * other.data[i];
        }
        total
    }

    pub fn magnitude_squared(&self) -> T {
        self.dot(self)
    }

    pub fn magnitude(&self) -> T {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector in the same direction.
    ///
    /// Fails with [`Error::DivisionByZero`] for a (near-)zero vector.
    pub fn unit(&self) -> Result<Self> {
        self.checked_div(self.magnitude())
    }

    /// Scalar projection of `v` onto this vector
    pub fn component(&self, v: &Self) -> Result<T> {
        let magnitude = self.magnitude();
        if magnitude.is_near_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(self.dot(v) / magnitude)
    }

    /// Vector projection of `v` onto this vector
    pub fn project(&self, v: &Self) -> Result<Self> {
        Ok(self.unit()? * self.component(v)?)
    }

    /// Cross product for vectors whose dimension is only known generically.
    ///
    /// Fails with [`Error::InvalidOperation`] unless `N == 3`; use
    /// [`Vector::cross`] when the dimension is statically three.
    pub fn try_cross(&self, other: &Self) -> Result<Self> {
        if N != 3 {
            return Err(Error::InvalidOperation(
                "cross product is applicable to 3D vectors only",
            ));
        }
        let a = Vec3::from_slice(&self.data)?;
        let b = Vec3::from_slice(&other.data)?;
        Self::from_slice(a.cross(&b).as_array())
    }

    /// Divide every component by `s`, failing on a (near-)zero divisor
    pub fn checked_div(&self, s: T) -> Result<Self> {
        if s.is_near_zero() {
            return Err(Error::DivisionByZero);
        }
        let mut out = *self;
        for x in &mut out.data {
            *x /= s;
        }
        Ok(out)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }

    pub fn approx_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(a, b)| a.approx_eq_eps(*b, eps))
    }
}

impl<T: Real> Vector<T, 2> {
    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }

    /// Rotate counter-clockwise by `angle` radians
    pub fn rotate_2d(&self, angle: T) -> Self {
        Transform::rotation2(angle) * *self
    }
}

impl<T: Real> Vector<T, 3> {
    pub fn x(&self) -> T {
        self.data[0]
    }

    pub fn y(&self) -> T {
        self.data[1]
    }

    pub fn z(&self) -> T {
        self.data[2]
    }

    pub fn cross(&self, other: &Self) -> Self {
        let (a, b) = (&self.data, &other.data);
        Self::new([
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ])
    }

    pub fn rotate_x(&self, angle: T) -> Self {
        Transform::rotation_x3(angle) * *self
    }

    pub fn rotate_y(&self, angle: T) -> Self {
        Transform::rotation_y3(angle) * *self
    }

    pub fn rotate_z(&self, angle: T) -> Self {
        Transform::rotation_z3(angle) * *self
    }

    /// Rotate about an arbitrary (not necessarily unit) axis
    pub fn rotate_about(&self, axis: &Self, angle: T) -> Result<Self> {
        Ok(self.rotate(&Quaternion::from_axis_angle(axis, angle)?))
    }

    /// Rotate by a unit quaternion
    pub fn rotate(&self, q: &Quaternion<T>) -> Self {
        q.rotate(self)
    }

    /// Homogeneous 4-vector with the given `w`
    pub fn promote(&self, w: T) -> Vector<T, 4> {
        Vector::new([self.data[0], self.data[1], self.data[2], w])
    }
}

impl<T: Real> Vector<T, 4> {
    pub fn w(&self) -> T {
        self.data[3]
    }

    /// Drop the `w` component
    pub fn demote(&self) -> Vector<T, 3> {
        Vector::new([self.data[0], self.data[1], self.data[2]])
    }

    /// Divide by `w`, failing when `w` is (near-)zero
    pub fn perspective_divide(&self) -> Result<Self> {
        self.checked_div(self.data[3])
    }
}

impl<T: Real, const N: usize> Default for Vector<T, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Real, const N: usize> From<[T; N]> for Vector<T, N> {
    fn from(data: [T; N]) -> Self {
        Self::new(data)
    }
}

impl<T: Real, const N: usize> PartialEq for Vector<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, T::TOLERANCE)
    }
}

impl<T: Real, const N: usize> Index<usize> for Vector<T, N> {
    type Output = T;

    /// # Panics
    /// If `index >= N`; use [`Vector::get`] for a checked lookup.
    fn index(&self, index: usize) -> &T {
        match self.data.get(index) {
            Some(x) => x,
            None => panic!("{}", Error::OutOfBounds { index, len: N }),
        }
    }
}

impl<T: Real, const N: usize> IndexMut<usize> for Vector<T, N> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.data.get_mut(index) {
            Some(x) => x,
            None => panic!("{}", Error::OutOfBounds { index, len: N }),
        }
    }
}

impl<T: Real, const N: usize> AddAssign for Vector<T, N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a += b;
        }
    }
}

impl<T: Real, const N: usize> SubAssign for Vector<T, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.data.iter_mut().zip(rhs.data) {
            *a -= b;
        }
    }
}

impl<T: Real, const N: usize> MulAssign<T> for Vector<T, N> {
    fn mul_assign(&mut self, s: T) {
        for a in &mut self.data {
            *a *= s;
        }
    }
}

impl<T: Real, const N: usize> Add for Vector<T, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Real, const N: usize> Sub for Vector<T, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Real, const N: usize> Mul<T> for Vector<T, N> {
    type Output = Self;

    fn mul(mut self, s: T) -> Self {
        self *= s;
        self
    }
}

impl<T: Real, const N: usize> Neg for Vector<T, N> {
    type Output = Self;

    fn neg(mut self) -> Self {
        for a in &mut self.data {
            *a = -*a;
        }
        self
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {$(
        impl<const N: usize> Mul<Vector<$t, N>> for $t {
            type Output = Vector<$t, N>;

            fn mul(self, v: Vector<$t, N>) -> Vector<$t, N> {
                v * self
            }
        }
    )*};
}

impl_scalar_lhs_mul!(f32, f64);

impl<T: Real, const N: usize> fmt::Display for Vector<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, x) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", x)?;
        }
        write!(f, "]")
    }
}
