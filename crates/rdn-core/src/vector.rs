//! Small fixed-dimension vectors and square matrices.
//!
//! Every grid cell holds one [`FixedVector`]; the channel count `N` is a
//! const generic so the same stencil code serves one-channel test fields and
//! the two-channel reaction models.

use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::Vec2;

/// A vector of `N` channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedVector<const N: usize>(pub [f32; N]);

impl<const N: usize> FixedVector<N> {
    /// All channels zero.
    pub const ZERO: Self = Self([0.0; N]);

    /// Creates a vector from its channel values.
    pub const fn new(values: [f32; N]) -> Self {
        Self(values)
    }

    /// Creates a vector with every channel set to `value`.
    pub const fn splat(value: f32) -> Self {
        Self([value; N])
    }

    /// Returns the channel values.
    pub fn to_array(self) -> [f32; N] {
        self.0
    }

    /// Applies `f` to every channel.
    pub fn map(self, mut f: impl FnMut(f32) -> f32) -> Self {
        let mut out = self.0;
        for v in &mut out {
            *v = f(*v);
        }
        Self(out)
    }

    /// Dot product.
    pub fn dot(self, other: Self) -> f32 {
        self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum()
    }

    /// Sum of squared channels.
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Largest absolute channel value.
    pub fn max_abs(self) -> f32 {
        self.0.iter().fold(0.0f32, |m, v| m.max(v.abs()))
    }

    /// Clamps every channel to `[-limit, limit]`.
    pub fn clamp_abs(self, limit: f32) -> Self {
        self.map(|v| v.clamp(-limit, limit))
    }

    /// Returns true if no channel is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

impl<const N: usize> Default for FixedVector<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[f32; N]> for FixedVector<N> {
    fn from(values: [f32; N]) -> Self {
        Self(values)
    }
}

impl From<Vec2> for FixedVector<2> {
    fn from(v: Vec2) -> Self {
        Self([v.x, v.y])
    }
}

impl From<FixedVector<2>> for Vec2 {
    fn from(v: FixedVector<2>) -> Self {
        Vec2::new(v.0[0], v.0[1])
    }
}

impl<const N: usize> Index<usize> for FixedVector<N> {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for FixedVector<N> {
    fn index_mut(&mut self, i: usize) -> &mut f32 {
        &mut self.0[i]
    }
}

impl<const N: usize> Add for FixedVector<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize> AddAssign for FixedVector<N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a += b;
        }
    }
}

impl<const N: usize> Sub for FixedVector<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize> SubAssign for FixedVector<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(rhs.0) {
            *a -= b;
        }
    }
}

impl<const N: usize> Mul<f32> for FixedVector<N> {
    type Output = Self;

    fn mul(mut self, rhs: f32) -> Self {
        self *= rhs;
        self
    }
}

impl<const N: usize> MulAssign<f32> for FixedVector<N> {
    fn mul_assign(&mut self, rhs: f32) {
        for a in &mut self.0 {
            *a *= rhs;
        }
    }
}

impl<const N: usize> Neg for FixedVector<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

/// An `N`×`N` matrix stored row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix<const N: usize> {
    rows: [[f32; N]; N],
}

impl<const N: usize> Matrix<N> {
    /// The zero matrix.
    pub const ZERO: Self = Self {
        rows: [[0.0; N]; N],
    };

    /// Creates a matrix from its rows.
    pub const fn from_rows(rows: [[f32; N]; N]) -> Self {
        Self { rows }
    }

    /// The identity matrix.
    pub fn identity() -> Self {
        Self::diagonal([1.0; N])
    }

    /// A diagonal matrix.
    pub fn diagonal(diag: [f32; N]) -> Self {
        let mut rows = [[0.0; N]; N];
        for (i, d) in diag.into_iter().enumerate() {
            rows[i][i] = d;
        }
        Self { rows }
    }

    /// Element at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[[f32; N]; N] {
        &self.rows
    }

    /// Multiplies every element by `s`.
    pub fn scale(&self, s: f32) -> Self {
        let mut rows = self.rows;
        for row in &mut rows {
            for v in row.iter_mut() {
                *v *= s;
            }
        }
        Self { rows }
    }

    /// Matrix-vector product.
    #[inline]
    pub fn mul_vec(&self, v: FixedVector<N>) -> FixedVector<N> {
        let mut out = [0.0; N];
        for (o, row) in out.iter_mut().zip(&self.rows) {
            *o = row.iter().zip(&v.0).map(|(a, b)| a * b).sum();
        }
        FixedVector(out)
    }
}

impl Matrix<2> {
    /// Largest eigenvalue magnitude.
    pub fn spectral_radius(&self) -> f32 {
        let [[a, b], [c, d]] = self.rows;
        let half_trace = 0.5 * (a + d);
        let det = a * d - b * c;
        let disc = half_trace * half_trace - det;
        if disc >= 0.0 {
            let root = disc.sqrt();
            (half_trace + root).abs().max((half_trace - root).abs())
        } else {
            // Complex pair: |λ|² = det.
            det.abs().sqrt()
        }
    }
}

impl<const N: usize> Default for Matrix<N> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const N: usize> Mul<FixedVector<N>> for Matrix<N> {
    type Output = FixedVector<N>;

    fn mul(self, rhs: FixedVector<N>) -> FixedVector<N> {
        self.mul_vec(rhs)
    }
}
