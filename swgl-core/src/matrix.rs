/// Fixed-shape matrices, row-major
use std::array;
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::error::{Error, Result};
use crate::scalar::Real;
use crate::vector::Vector;

/// `M` row vectors of dimension `N`, indexed `m[row][col]`.
///
/// Shapes are part of the type, so products with mismatched inner
/// dimensions do not compile.
#[derive(Debug, Clone, Copy)]
pub struct Matrix<T: Real, const M: usize, const N: usize> {
    rows: [Vector<T, N>; M],
}

pub type Mat2<T> = Matrix<T, 2, 2>;
pub type Mat3<T> = Matrix<T, 3, 3>;
pub type Mat4<T> = Matrix<T, 4, 4>;

impl<T: Real, const M: usize, const N: usize> Matrix<T, M, N> {
    pub fn new(elements: [[T; N]; M]) -> Self {
        Self {
            rows: elements.map(Vector::new),
        }
    }

    pub fn zero() -> Self {
        Self {
            rows: [Vector::zero(); M],
        }
    }

    /// Build from nested slices, checking the row and column counts
    pub fn from_rows(rows: &[&[T]]) -> Result<Self> {
        if rows.len() != M {
            return Err(Error::RowCount {
                expected: M,
                found: rows.len(),
            });
        }
        let mut out = Self::zero();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != N {
                return Err(Error::ColumnCount {
                    row: i,
                    expected: N,
                    found: row.len(),
                });
            }
            out.rows[i] = Vector::from_slice(row)?;
        }
        Ok(out)
    }

    pub const fn rows(&self) -> usize {
        M
    }

    pub const fn columns(&self) -> usize {
        N
    }

    pub fn row(&self, row: usize) -> Result<Vector<T, N>> {
        self.rows
            .get(row)
            .copied()
            .ok_or(Error::OutOfBounds { index: row, len: M })
    }

    pub fn column(&self, col: usize) -> Result<Vector<T, M>> {
        if col >= N {
            return Err(Error::OutOfBounds { index: col, len: N });
        }
        Ok(Vector::new(array::from_fn(|i| self.rows[i][col])))
    }

    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.row(row)?.get(col)
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let r = self
            .rows
            .get_mut(row)
            .ok_or(Error::OutOfBounds { index: row, len: M })?;
        *r.get_mut(col)? = value;
        Ok(())
    }

    pub fn transpose(&self) -> Matrix<T, N, M> {
        Matrix {
            rows: array::from_fn(|j| Vector::new(array::from_fn(|i| self.rows[i][j]))),
        }
    }

    pub fn checked_div(&self, s: T) -> Result<Self> {
        let mut out = *self;
        for row in &mut out.rows {
            *row = row.checked_div(s)?;
        }
        Ok(out)
    }

    pub fn is_finite(&self) -> bool {
        self.rows.iter().all(Vector::is_finite)
    }

    pub fn approx_eq_eps(&self, other: &Self, eps: T) -> bool {
        self.rows
            .iter()
            .zip(other.rows.iter())
            .all(|(a, b)| a.approx_eq_eps(b, eps))
    }
}

impl<T: Real, const N: usize> Matrix<T, N, N> {
    pub fn identity() -> Self {
        let mut m = Self::zero();
        for i in 0..N {
            m.rows[i][i] = T::ONE;
        }
        m
    }

    /// Product of the row norms, an upper bound on `|det|` (Hadamard)
    fn row_norm_product(&self) -> T {
        self.rows
            .iter()
            .fold(T::ONE, |acc, row| acc * row.magnitude())
    }

    /// Whether `det` is negligible relative to the scale of the rows
    fn is_singular(&self, det: T) -> bool {
        !det.is_finite() || det.abs() <= T::TOLERANCE * self.row_norm_product()
    }
}

impl<T: Real> Matrix<T, 2, 2> {
    pub fn determinant(&self) -> T {
        let m = &self.rows;
        m[0][0] * m[1][1] - m[0][1] * m[1][0]
    }
}

impl<T: Real> Matrix<T, 3, 3> {
    pub fn determinant(&self) -> T {
        let m = &self.rows;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }
}

/// 2x2 minors of the top two rows (`s`) and bottom two rows (`c`)
struct Minors4<T> {
    s: [T; 6],
    c: [T; 6],
}

impl<T: Real> Matrix<T, 4, 4> {
    fn minors(&self) -> Minors4<T> {
        let a = &self.rows;
        Minors4 {
            s: [
                a[0][0] * a[1][1] - a[1][0] * a[0][1],
                a[0][0] * a[1][2] - a[1][0] * a[0][2],
                a[0][0] * a[1][3] - a[1][0] * a[0][3],
                a[0][1] * a[1][2] - a[1][1] * a[0][2],
                a[0][1] * a[1][3] - a[1][1] * a[0][3],
                a[0][2] * a[1][3] - a[1][2] * a[0][3],
            ],
            c: [
                a[2][0] * a[3][1] - a[3][0] * a[2][1],
                a[2][0] * a[3][2] - a[3][0] * a[2][2],
                a[2][0] * a[3][3] - a[3][0] * a[2][3],
                a[2][1] * a[3][2] - a[3][1] * a[2][2],
                a[2][1] * a[3][3] - a[3][1] * a[2][3],
                a[2][2] * a[3][3] - a[3][2] * a[2][3],
            ],
        }
    }

    pub fn determinant(&self) -> T {
        let Minors4 { s, c } = self.minors();
        s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0]
    }

    /// Closed-form inverse by cofactor (Laplace) expansion.
    ///
    /// Fails with [`Error::Singular`] when the determinant is negligible
    /// compared to the product of the row norms.
    pub fn inverse(&self) -> Result<Self> {
        let a = &self.rows;
        let Minors4 { s, c } = self.minors();
        let det = s[0] * c[5] - s[1] * c[4] + s[2] * c[3] + s[3] * c[2] - s[4] * c[1] + s[5] * c[0];

        if self.is_singular(det) {
            return Err(Error::Singular {
                determinant: det.to_f64(),
            });
        }

        let inv = Self::new([
            [
                a[1][1] * c[5] - a[1][2] * c[4] + a[1][3] * c[3],
                -a[0][1] * c[5] + a[0][2] * c[4] - a[0][3] * c[3],
                a[3][1] * s[5] - a[3][2] * s[4] + a[3][3] * s[3],
                -a[2][1] * s[5] + a[2][2] * s[4] - a[2][3] * s[3],
            ],
            [
                -a[1][0] * c[5] + a[1][2] * c[2] - a[1][3] * c[1],
                a[0][0] * c[5] - a[0][2] * c[2] + a[0][3] * c[1],
                -a[3][0] * s[5] + a[3][2] * s[2] - a[3][3] * s[1],
                a[2][0] * s[5] - a[2][2] * s[2] + a[2][3] * s[1],
            ],
            [
                a[1][0] * c[4] - a[1][1] * c[2] + a[1][3] * c[0],
                -a[0][0] * c[4] + a[0][1] * c[2] - a[0][3] * c[0],
                a[3][0] * s[4] - a[3][1] * s[2] + a[3][3] * s[0],
                -a[2][0] * s[4] + a[2][1] * s[2] - a[2][3] * s[0],
            ],
            [
                -a[1][0] * c[3] + a[1][1] * c[1] - a[1][2] * c[0],
                a[0][0] * c[3] - a[0][1] * c[1] + a[0][2] * c[0],
                -a[3][0] * s[3] + a[3][1] * s[1] - a[3][2] * s[0],
                a[2][0] * s[3] - a[2][1] * s[1] + a[2][2] * s[0],
            ],
        ]);

        Ok(inv * (T::ONE / det))
    }
}

impl<T: Real, const M: usize, const N: usize> Default for Matrix<T, M, N> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<T: Real, const M: usize, const N: usize> PartialEq for Matrix<T, M, N> {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq_eps(other, T::TOLERANCE)
    }
}

impl<T: Real, const M: usize, const N: usize> Index<usize> for Matrix<T, M, N> {
    type Output = Vector<T, N>;

    /// # Panics
    /// If `row >= M`; use [`Matrix::row`] or [`Matrix::get`] for checked access.
    fn index(&self, row: usize) -> &Vector<T, N> {
        match self.rows.get(row) {
            Some(r) => r,
            None => panic!("{}", Error::OutOfBounds { index: row, len: M }),
        }
    }
}

impl<T: Real, const M: usize, const N: usize> IndexMut<usize> for Matrix<T, M, N> {
    fn index_mut(&mut self, row: usize) -> &mut Vector<T, N> {
        match self.rows.get_mut(row) {
            Some(r) => r,
            None => panic!("{}", Error::OutOfBounds { index: row, len: M }),
        }
    }
}

impl<T: Real, const M: usize, const N: usize> Mul<Vector<T, N>> for Matrix<T, M, N> {
    type Output = Vector<T, M>;

    fn mul(self, v: Vector<T, N>) -> Vector<T, M> {
        Vector::new(array::from_fn(|i| self.rows[i].dot(&v)))
    }
}

impl<T: Real, const M: usize, const N: usize, const P: usize> Mul<Matrix<T, N, P>>
    for Matrix<T, M, N>
{
    type Output = Matrix<T, M, P>;

    fn mul(self, rhs: Matrix<T, N, P>) -> Matrix<T, M, P> {
        let mut c = Matrix::<T, M, P>::zero();
        for i in 0..M {
            for j in 0..P {
                for k in 0..N {
                    c.rows[i][j] += self.rows[i][k] * rhs.rows[k][j];
                }
            }
        }
        c
    }
}

impl<T: Real, const M: usize, const N: usize> MulAssign<T> for Matrix<T, M, N> {
    fn mul_assign(&mut self, s: T) {
        for row in &mut self.rows {
            *row *= s;
        }
    }
}

impl<T: Real, const M: usize, const N: usize> Mul<T> for Matrix<T, M, N> {
    type Output = Self;

    fn mul(mut self, s: T) -> Self {
        self *= s;
        self
    }
}

impl<T: Real, const M: usize, const N: usize> AddAssign for Matrix<T, M, N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.rows.iter_mut().zip(rhs.rows) {
            *a += b;
        }
    }
}

impl<T: Real, const M: usize, const N: usize> SubAssign for Matrix<T, M, N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.rows.iter_mut().zip(rhs.rows) {
            *a -= b;
        }
    }
}

impl<T: Real, const M: usize, const N: usize> Add for Matrix<T, M, N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<T: Real, const M: usize, const N: usize> Sub for Matrix<T, M, N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<T: Real, const M: usize, const N: usize> Neg for Matrix<T, M, N> {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            rows: self.rows.map(Neg::neg),
        }
    }
}

macro_rules! impl_scalar_lhs_mul {
    ($($t:ty),*) => {$(
        impl<const M: usize, const N: usize> Mul<Matrix<$t, M, N>> for $t {
            type Output = Matrix<$t, M, N>;

            fn mul(self, m: Matrix<$t, M, N>) -> Matrix<$t, M, N> {
                m * self
            }
        }
    )*};
}

impl_scalar_lhs_mul!(f32, f64);

impl<T: Real, const M: usize, const N: usize> fmt::Display for Matrix<T, M, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", row)?;
        }
        write!(f, "]")
    }
}
