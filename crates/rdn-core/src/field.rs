//! Dense 2D grids of fixed-size vectors.

use crate::vector::FixedVector;

/// A `width`×`height` array of vectors, indexed row-major by `y * width + x`.
///
/// The shape is fixed at construction. Resizing means building a new field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field<const N: usize> {
    width: usize,
    height: usize,
    data: Box<[FixedVector<N>]>,
}

impl<const N: usize> Field<N> {
    /// Creates a zero-filled field.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, FixedVector::ZERO)
    }

    /// Creates a field with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: FixedVector<N>) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height].into_boxed_slice(),
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the field has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Linear index of `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Gets the vector at a position.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> FixedVector<N> {
        self.data[y * self.width + x]
    }

    /// Sets the vector at a position.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: FixedVector<N>) {
        self.data[y * self.width + x] = value;
    }

    /// One row of cells.
    pub fn row(&self, y: usize) -> &[FixedVector<N>] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// One row of cells, mutably.
    pub fn row_mut(&mut self, y: usize) -> &mut [FixedVector<N>] {
        &mut self.data[y * self.width..(y + 1) * self.width]
    }

    /// All cells in row-major order.
    pub fn as_slice(&self) -> &[FixedVector<N>] {
        &self.data
    }

    /// All cells in row-major order, mutably.
    pub fn as_mut_slice(&mut self) -> &mut [FixedVector<N>] {
        &mut self.data
    }

    /// Sets every cell to `value`.
    pub fn fill(&mut self, value: FixedVector<N>) {
        self.data.fill(value);
    }

    /// Fills the axis-aligned rectangle starting at `(x0, y0)`, clipped to the field.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, w: usize, h: usize, value: FixedVector<N>) {
        let x1 = (x0 + w).min(self.width);
        let y1 = (y0 + h).min(self.height);
        for y in y0.min(y1)..y1 {
            self.row_mut(y)[x0.min(x1)..x1].fill(value);
        }
    }

    /// Returns true if every cell is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Sum of all cells.
    pub fn sum(&self) -> FixedVector<N> {
        self.data
            .iter()
            .fold(FixedVector::ZERO, |acc, &v| acc + v)
    }
}

/// The fields a simulation keeps for one grid shape.
///
/// All fields share the same `(width, height)`; a shape change replaces the
/// whole set.
#[derive(Debug, Clone)]
pub struct GridSet<const N: usize> {
    /// Current state.
    pub state: Field<N>,
    /// Laplacian of the state.
    pub laplacian: Field<N>,
    /// Horizontal gradient of the state.
    pub grad_x: Field<N>,
    /// Vertical gradient of the state.
    pub grad_y: Field<N>,
}

impl<const N: usize> GridSet<N> {
    /// Allocates zeroed fields of the given shape.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            state: Field::new(width, height),
            laplacian: Field::new(width, height),
            grad_x: Field::new(width, height),
            grad_y: Field::new(width, height),
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.state.width()
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.state.height()
    }

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        self.state.shape()
    }
}
