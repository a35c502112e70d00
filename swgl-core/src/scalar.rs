/// Floating-point scalar abstraction shared by vectors, matrices and quaternions
use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// A real number type usable as a vector/matrix element.
///
/// Implemented for `f32` and `f64`. Equality between scalars goes through
/// [`Real::approx_eq`], which tolerates accumulated rounding: two values are
/// equal when they differ by at most `TOLERANCE * max(1, |a|, |b|)`.
pub trait Real:
    Copy
    + Debug
    + Display
    + Default
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
    + DivAssign
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const HALF: Self;
    const PI: Self;
    /// Machine epsilon
    const EPSILON: Self;
    /// Epsilon scaled for comparisons after a handful of operations
    const TOLERANCE: Self;

    fn from_f64(value: f64) -> Self;
    fn to_f64(self) -> f64;

    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn acos(self) -> Self;
    fn abs(self) -> Self;
    fn floor(self) -> Self;
    fn ceil(self) -> Self;
    fn round(self) -> Self;
    fn is_finite(self) -> bool;

    fn max(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }

    fn min(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }

    fn clamp(self, lo: Self, hi: Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Tolerant equality, see the trait docs
    fn approx_eq(self, other: Self) -> bool {
        self.approx_eq_eps(other, Self::TOLERANCE)
    }

    fn approx_eq_eps(self, other: Self, eps: Self) -> bool {
        let scale = Self::ONE.max(self.abs()).max(other.abs());
        (self - other).abs() <= eps * scale
    }

    /// Whether the value is indistinguishable from zero
    fn is_near_zero(self) -> bool {
        self.abs() <= Self::TOLERANCE
    }
}

macro_rules! impl_real {
    ($t:ident, $tolerance:expr) => {
        impl Real for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const TWO: Self = 2.0;
            const HALF: Self = 0.5;
            const PI: Self = std::$t::consts::PI;
            const EPSILON: Self = $t::EPSILON;
            const TOLERANCE: Self = $tolerance;

            #[inline]
            fn from_f64(value: f64) -> Self {
                value as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn sqrt(self) -> Self {
                $t::sqrt(self)
            }

            #[inline]
            fn sin(self) -> Self {
                $t::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                $t::cos(self)
            }

            #[inline]
            fn tan(self) -> Self {
                $t::tan(self)
            }

            #[inline]
            fn acos(self) -> Self {
                $t::acos(self)
            }

            #[inline]
            fn abs(self) -> Self {
                $t::abs(self)
            }

            #[inline]
            fn floor(self) -> Self {
                $t::floor(self)
            }

            #[inline]
            fn ceil(self) -> Self {
                $t::ceil(self)
            }

            #[inline]
            fn round(self) -> Self {
                $t::round(self)
            }

            #[inline]
            fn is_finite(self) -> bool {
                $t::is_finite(self)
            }
        }
    };
}

impl_real!(f32, f32::EPSILON * 128.0);
impl_real!(f64, f64::EPSILON * 1024.0);
