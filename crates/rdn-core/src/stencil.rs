//! Neighborhood stencils on the mirrored-row grid topology.
//!
//! Columns wrap periodically. Rows do not wrap: the cell above row 0 is the
//! horizontally mirrored cell of row 0 itself (column `w - 1 - x`), and the
//! cell below the last row is likewise the mirrored cell of the last row.
//! A tile rendered next to its mirror image therefore has continuous seams.

use crate::field::Field;
use crate::vector::{FixedVector, Matrix};

/// Linear indices of the four neighbors of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    /// Cell at column `x - 1` (wrapping).
    pub left: usize,
    /// Cell at column `x + 1` (wrapping).
    pub right: usize,
    /// Cell above; mirrored within row 0 at the top edge.
    pub up: usize,
    /// Cell below; mirrored within the last row at the bottom edge.
    pub down: usize,
}

/// Neighbors of `(x, y)` on a `width`×`height` grid.
#[inline]
pub fn neighbors(width: usize, height: usize, x: usize, y: usize) -> Neighbors {
    let xl = if x > 0 { x - 1 } else { width - 1 };
    let xr = if x + 1 < width { x + 1 } else { 0 };
    let mirror = width - 1 - x;
    let up = if y > 0 {
        (y - 1) * width + x
    } else {
        mirror
    };
    let down = if y + 1 < height {
        (y + 1) * width + x
    } else {
        y * width + mirror
    };
    Neighbors {
        left: y * width + xl,
        right: y * width + xr,
        up,
        down,
    }
}

/// Writes the 5-point Laplacian of `src` into `dst`.
///
/// Center weight −4, each neighbor +1.
pub fn laplacian<const N: usize>(src: &Field<N>, dst: &mut Field<N>) {
    debug_assert_eq!(src.shape(), dst.shape());
    let (w, h) = src.shape();
    let s = src.as_slice();
    let d = dst.as_mut_slice();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let n = neighbors(w, h, x, y);
            d[i] = s[n.left] + s[n.right] + s[n.up] + s[n.down] - s[i] * 4.0;
        }
    }
}

/// Writes central-difference gradients of `src` into `dx` and `dy`.
///
/// Uses the same neighbor rule as [`laplacian`]; `dy` points down the rows.
pub fn gradients<const N: usize>(src: &Field<N>, dx: &mut Field<N>, dy: &mut Field<N>) {
    debug_assert_eq!(src.shape(), dx.shape());
    debug_assert_eq!(src.shape(), dy.shape());
    let (w, h) = src.shape();
    let s = src.as_slice();
    let gx = dx.as_mut_slice();
    let gy = dy.as_mut_slice();
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let n = neighbors(w, h, x, y);
            gx[i] = (s[n.right] - s[n.left]) * 0.5;
            gy[i] = (s[n.down] - s[n.up]) * 0.5;
        }
    }
}

/// Accumulates `matrix · laplacian · dt` into `state`.
pub fn diffuse<const N: usize>(
    state: &mut Field<N>,
    laplacian: &Field<N>,
    matrix: &Matrix<N>,
    dt: f32,
) {
    debug_assert_eq!(state.shape(), laplacian.shape());
    let m = matrix.scale(dt);
    for (v, l) in state.as_mut_slice().iter_mut().zip(laplacian.as_slice()) {
        *v += m.mul_vec(*l);
    }
}

/// Blends every cell toward the average of its four neighbors.
///
/// `self_weight` is the share kept from the cell itself; the rest comes from
/// the neighbor average. Requires `laplacian` to be current for `state`,
/// since `average - center == laplacian / 4`.
pub fn smooth<const N: usize>(state: &mut Field<N>, laplacian: &Field<N>, self_weight: f32) {
    debug_assert_eq!(state.shape(), laplacian.shape());
    let k = (1.0 - self_weight) * 0.25;
    for (v, l) in state.as_mut_slice().iter_mut().zip(laplacian.as_slice()) {
        *v += *l * k;
    }
}

/// Scans one channel of a Laplacian field for a 3×3 checkerboard.
///
/// A match is nine cells whose values alternate sign cell to cell, each
/// beyond `threshold` in magnitude. This is the footprint of an explicit
/// integrator going unstable. Returns the top-left corner of the first match.
pub fn find_checkerboard<const N: usize>(
    laplacian: &Field<N>,
    channel: usize,
    threshold: f32,
) -> Option<(usize, usize)> {
    let (w, h) = laplacian.shape();
    if w < 3 || h < 3 || channel >= N {
        return None;
    }
    let sign = |x: usize, y: usize| -> i8 {
        let v = laplacian.get(x, y)[channel];
        if v > threshold {
            1
        } else if v < -threshold {
            -1
        } else {
            0
        }
    };
    for y in 0..h - 2 {
        for x in 0..w - 2 {
            let first = sign(x, y);
            if first == 0 {
                continue;
            }
            let matches = (0..3).all(|j| {
                (0..3).all(|i| {
                    let expected = if (i + j) % 2 == 0 { first } else { -first };
                    sign(x + i, y + j) == expected
                })
            });
            if matches {
                return Some((x, y));
            }
        }
    }
    None
}

/// A zero field except for `value` at `(x, y)`.
pub fn impulse<const N: usize>(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    value: FixedVector<N>,
) -> Field<N> {
    let mut f = Field::new(width, height);
    f.set(x, y, value);
    f
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    fn one(v: f32) -> FixedVector<1> {
        FixedVector::new([v])
    }

    fn diffused(x: usize, y: usize) -> Field<1> {
        let mut state = impulse(5, 5, x, y, one(1.0));
        let mut lap = Field::new(5, 5);
        laplacian(&state, &mut lap);
        diffuse(&mut state, &lap, &Matrix::diagonal([0.5]), 0.2);
        state
    }

    fn approx(f: &Field<1>, x: usize, y: usize, expected: f32) {
        let got = f.get(x, y)[0];
        assert!(
            (got - expected).abs() < EPS,
            "cell ({x}, {y}): expected {expected}, got {got}"
        );
    }

    #[test]
    fn test_neighbors_interior() {
        let n = neighbors(5, 4, 2, 1);
        assert_eq!(n.left, 6);
        assert_eq!(n.right, 8);
        assert_eq!(n.up, 2);
        assert_eq!(n.down, 12);
    }

    #[test]
    fn test_neighbors_wrap_columns() {
        let n = neighbors(5, 4, 0, 2);
        assert_eq!(n.left, 2 * 5 + 4);
        let n = neighbors(5, 4, 4, 2);
        assert_eq!(n.right, 2 * 5);
    }

    #[test]
    fn test_neighbors_mirror_rows() {
        // Top edge: mirrored column in row 0, never row h - 1.
        let n = neighbors(5, 4, 1, 0);
        assert_eq!(n.up, 3);
        // Bottom edge: mirrored column in the last row.
        let n = neighbors(5, 4, 1, 3);
        assert_eq!(n.down, 3 * 5 + 3);
    }

    #[test]
    fn test_topology_reads_mirrored_row_not_wrapped_row() {
        let (w, h) = (6, 4);
        let x = 1;
        let src = impulse(w, h, x, 0, one(1.0));
        let mut lap = Field::new(w, h);
        laplacian(&src, &mut lap);

        // Row 0's mirrored neighbor picks up the value.
        assert_eq!(lap.get(w - 1 - x, 0)[0], 1.0);
        // Plain toroidal wrap would have put it in the last row.
        assert_eq!(lap.get(x, h - 1)[0], 0.0);
    }

    #[test]
    fn test_diffusion_interior_cell() {
        // D * dt = 0.1
        let f = diffused(2, 2);
        approx(&f, 2, 2, 0.6);
        approx(&f, 1, 2, 0.1);
        approx(&f, 3, 2, 0.1);
        approx(&f, 2, 1, 0.1);
        approx(&f, 2, 3, 0.1);
        approx(&f, 1, 1, 0.0);
    }

    #[test]
    fn test_diffusion_corner_cell() {
        let f = diffused(0, 0);
        approx(&f, 0, 0, 0.6);
        // (4, 0) is both the wrapped left neighbor and the mirrored up neighbor.
        approx(&f, 4, 0, 0.2);
        approx(&f, 1, 0, 0.1);
        approx(&f, 0, 1, 0.1);
        // No contribution through a vertical wrap.
        approx(&f, 0, 4, 0.0);
    }

    #[test]
    fn test_diffusion_edge_cell() {
        // Center column of the top row mirrors onto itself.
        let f = diffused(2, 0);
        approx(&f, 2, 0, 0.7);
        approx(&f, 1, 0, 0.1);
        approx(&f, 3, 0, 0.1);
        approx(&f, 2, 1, 0.1);
        approx(&f, 2, 4, 0.0);
    }

    #[test]
    fn test_diffusion_conserves_mass() {
        for &(x, y) in &[(0, 0), (2, 0), (3, 4), (2, 2), (4, 1)] {
            let f = diffused(x, y);
            assert!((f.sum()[0] - 1.0).abs() < EPS, "mass leaked at ({x}, {y})");
        }
    }

    #[test]
    fn test_diffusion_matrix_couples_channels() {
        let mut state = impulse(4, 4, 1, 1, FixedVector::new([1.0, 0.0]));
        let mut lap = Field::new(4, 4);
        laplacian(&state, &mut lap);
        let m = Matrix::from_rows([[1.0, 0.0], [0.5, 0.0]]);
        diffuse(&mut state, &lap, &m, 0.1);
        // Channel 1 receives half of channel 0's Laplacian.
        assert!((state.get(1, 1)[1] - (-0.2)).abs() < EPS);
        assert!((state.get(2, 1)[1] - 0.05).abs() < EPS);
    }

    #[test]
    fn test_gradients() {
        let mut src = Field::<1>::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                src.set(x, y, one(x as f32 + 10.0 * y as f32));
            }
        }
        let mut dx = Field::new(4, 3);
        let mut dy = Field::new(4, 3);
        gradients(&src, &mut dx, &mut dy);

        assert_eq!(dx.get(1, 1)[0], 1.0);
        assert_eq!(dy.get(1, 1)[0], 10.0);
        // Wrapped column: (0 - 2) / 2 at x = 3 uses x = 0 on the right.
        assert_eq!(dx.get(3, 1)[0], (10.0 - 12.0) * 0.5);
        // Top row: up neighbor of (1, 0) is (2, 0).
        assert_eq!(dy.get(1, 0)[0], (11.0 - 2.0) * 0.5);
    }

    #[test]
    fn test_smooth_matches_neighbor_blend() {
        let mut state = impulse(5, 5, 2, 2, one(1.0));
        let mut lap = Field::new(5, 5);
        laplacian(&state, &mut lap);
        smooth(&mut state, &lap, 0.9);
        // 0.9 * 1 + 0.1 * 0
        approx(&state, 2, 2, 0.9);
        // 0.9 * 0 + 0.1 * (1 / 4)
        approx(&state, 2, 1, 0.025);
    }

    #[test]
    fn test_find_checkerboard() {
        let mut lap = Field::<1>::new(6, 6);
        for y in 1..4 {
            for x in 2..5 {
                let s = if (x + y) % 2 == 0 { 1.0 } else { -1.0 };
                lap.set(x, y, one(s));
            }
        }
        assert_eq!(find_checkerboard(&lap, 0, 0.5), Some((2, 1)));
        assert_eq!(find_checkerboard(&lap, 0, 2.0), None);
    }

    #[test]
    fn test_find_checkerboard_ignores_smooth_fields() {
        let mut lap = Field::<1>::filled(6, 6, one(1.0));
        lap.set(3, 3, one(-1.0));
        assert_eq!(find_checkerboard(&lap, 0, 0.1), None);
        assert_eq!(find_checkerboard(&Field::<1>::new(2, 2), 0, 0.1), None);
    }
}
