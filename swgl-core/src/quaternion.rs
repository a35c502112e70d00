/// Quaternions for composing 3D rotations
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};
use crate::scalar::Real;
use crate::vector::Vec3;

/// Scalar part `s` plus vector part `v`.
///
/// Only unit quaternions represent rotations; [`Quaternion::from_axis_angle`]
/// normalizes the axis so its result is always unit. Products compose
/// rotations right to left: rotating by `a * b` rotates by `b` first.
#[derive(Debug, Clone, Copy)]
pub struct Quaternion<T: Real> {
    s: T,
    v: Vec3<T>,
}

impl<T: Real> Quaternion<T> {
    pub fn new(s: T, v: Vec3<T>) -> Self {
        Self { s, v }
    }

    /// Multiplicative identity, the "no rotation" quaternion
    pub fn identity() -> Self {
        Self::new(T::ONE, Vec3::zero())
    }

    pub fn zero() -> Self {
        Self::new(T::ZERO, Vec3::zero())
    }

    /// Rotation of `angle` radians about `axis`.
    ///
    /// Fails with [`Error::DivisionByZero`] when the axis has zero length.
    pub fn from_axis_angle(axis: &Vec3<T>, angle: T) -> Result<Self> {
        let half = angle * T::HALF;
        Ok(Self::new(half.cos(), axis.unit()? * half.sin()))
    }

    /// Axis and angle of a unit quaternion, angle in `[0, 2π]`.
    ///
    /// The identity has no defined axis; x is reported.
    pub fn to_axis_angle(&self) -> (Vec3<T>, T) {
        let s = self.s.clamp(-T::ONE, T::ONE);
        let angle = T::TWO * s.acos();
        match self.v.unit() {
            Ok(axis) => (axis, angle),
            Err(_) => (Vec3::new([T::ONE, T::ZERO, T::ZERO]), T::ZERO),
        }
    }

    pub fn scalar(&self) -> T {
        self.s
    }

    pub fn vector(&self) -> Vec3<T> {
        self.v
    }

    /// Checked access: 0 is the scalar part, 1..=3 the vector part
    pub fn get(&self, index: usize) -> Result<T> {
        match index {
            0 => Ok(self.s),
            1..=3 => self.v.get(index - 1),
            _ => Err(Error::OutOfBounds { index, len: 4 }),
        }
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.s, -self.v)
    }

    pub fn inner_product(&self, other: &Self) -> T {
        self.s * other.s + self.v.dot(&other.v)
    }

    pub fn magnitude(&self) -> T {
        self.inner_product(self).sqrt()
    }

    pub fn unit(&self) -> Result<Self> {
        self.checked_div(self.magnitude())
    }

    /// `conjugate / |q|²`; equal to the conjugate for unit quaternions
    pub fn inverse(&self) -> Result<Self> {
        self.conjugate().checked_div(self.inner_product(self))
    }

    pub fn checked_div(&self, r: T) -> Result<Self> {
        if r.is_near_zero() {
            return Err(Error::DivisionByZero);
        }
        Ok(Self::new(self.s / r, self.v.checked_div(r)?))
    }

    /// Rotate `p` by this unit quaternion: vector part of `q (0, p) q*`
    pub fn rotate(&self, p: &Vec3<T>) -> Vec3<T> {
        let pure = Self::new(T::ZERO, *p);
        (*self * pure * self.conjugate()).v
    }

    pub fn approx_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.s.approx_eq_eps(other.s, eps) && self.v.approx_eq_eps(&other.v, eps)
    }
}

impl<T: Real> Default for Quaternion<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> PartialEq for Quaternion<T> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, T::TOLERANCE)
    }
}

impl<T: Real> Index<usize> for Quaternion<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match index {
            0 => &self.s,
            1..=3 => &self.v[index - 1],
            _ => panic!("{}", Error::OutOfBounds { index, len: 4 }),
        }
    }
}

impl<T: Real> IndexMut<usize> for Quaternion<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match index {
            0 => &mut self.s,
            1..=3 => &mut self.v[index - 1],
            _ => panic!("{}", Error::OutOfBounds { index, len: 4 }),
        }
    }
}

impl<T: Real> MulAssign for Quaternion<T> {
    /// Hamilton product
    fn mul_assign(&mut self, q: Self) {
        let s = self.s * q.s - self.v.dot(&q.v);
        let v = q.v * self.s + self.v * q.s + self.v.cross(&q.v);
        self.s = s;
        self.v = v;
    }
}

impl<T: Real> Mul for Quaternion<T> {
    type Output = Self;

    fn mul(mut self, q: Self) -> Self {
        self *= q;
        self
    }
}

impl<T: Real> MulAssign<T> for Quaternion<T> {
    fn mul_assign(&mut self, r: T) {
        self.s *= r;
        self.v *= r;
    }
}

impl<T: Real> Mul<T> for Quaternion<T> {
    type Output = Self;

    fn mul(mut self, r: T) -> Self {
        self *= r;
        self
    }
}

impl<T: Real> AddAssign for Quaternion<T> {
    fn add_assign(&mut self, q: Self) {
        self.s += q.s;
        self.v += q.v;
    }
}

impl<T: Real> SubAssign for Quaternion<T> {
    fn sub_assign(&mut self, q: Self) {
        self.s -= q.s;
        self.v -= q.v;
    }
}

impl<T: Real> Add for Quaternion<T> {
    type Output = Self;

    fn add(mut self, q: Self) -> Self {
        self += q;
        self
    }
}

impl<T: Real> Sub for Quaternion<T> {
    type Output = Self;

    fn sub(mut self, q: Self) -> Self {
        self -= q;
        self
    }
}

impl<T: Real> Neg for Quaternion<T> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.s, -self.v)
    }
}

impl<T: Real> fmt::Display for Quaternion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.s, self.v)
    }
}
