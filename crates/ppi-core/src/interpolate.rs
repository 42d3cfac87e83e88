//! Edge-aware 2x directional interpolation.
//!
//! Source samples are seeded onto the even/even positions of a target
//! twice the size, and the three remaining phases are filled in order:
//!
//! ```text
//!   S h S h S        S = seeded source sample (even, even)
//!   v d v d v        d = diagonal pass        (odd, odd)
//!   S h S h S        h = horizontal pass      (even, odd)
//!   v d v d v        v = vertical pass        (odd, even)
//! ```
//!
//! Every filled sample is a normalized weighted average of already-known
//! neighbours. A neighbour `k` seen from target `c`, with `o` the
//! neighbour on the opposite side, weighs
//!
//! ```text
//! w_k = 1 / (2 * |ref_k - ref_c| + |ref_k - ref_o| + eps)
//! ```
//!
//! so neighbours across a strong edge of the reference contribute little.
//! The last target row and column have no far neighbour and copy the
//! row/column before them.

use crate::error::{CoreError, Result};
use crate::plane::Plane;

/// Fills every target phase of a 2x upsampling from a weight reference.
///
/// The reference is either on the target grid (`2H x 2W`, used as is) or
/// on the source grid (`H x W`, expanded bilinearly first).
///
/// # Example
///
/// ```
/// use ppi_core::{DirectionalInterpolator, Plane};
///
/// let source = Plane::from_fn(4, 3, |y, x| (y * 4 + x) as f64);
/// let reference = Plane::filled(8, 6, 1.0);
/// let target = DirectionalInterpolator::new()
///     .interpolate(&source, &reference)
///     .unwrap();
///
/// assert_eq!(target.shape(), (6, 8));
/// assert_eq!(target.get(2, 4), source.get(1, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalInterpolator {
    epsilon: f64,
}

impl Default for DirectionalInterpolator {
    fn default() -> Self {
        Self { epsilon: 1e-6 }
    }
}

impl DirectionalInterpolator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Added to every weight denominator.
    ///
    /// Default: `1e-6`
    #[inline]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Upsample `source` (`H x W`) to `2H x 2W`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidParameter`] for an empty source or a
    ///   non-positive epsilon
    /// - [`CoreError::ShapeMismatch`] when the reference is neither
    ///   `H x W` nor `2H x 2W`
    pub fn interpolate(&self, source: &Plane, reference: &Plane) -> Result<Plane> {
        if source.is_empty() {
            return Err(CoreError::InvalidParameter(
                "cannot interpolate an empty plane".to_string(),
            ));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "interpolation epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }

        let (height, width) = source.shape();
        let target_shape = (2 * height, 2 * width);
        let expanded;
        let reference = if reference.shape() == target_shape {
            reference
        } else if reference.shape() == source.shape() {
            expanded = expand_bilinear(reference);
            &expanded
        } else {
            return Err(CoreError::shape(
                "interpolation reference",
                target_shape,
                reference.shape(),
            ));
        };

        let mut grid = Grid::seed(source, reference, self.epsilon);
        grid.diagonal_pass();
        grid.horizontal_pass();
        grid.vertical_pass();
        grid.fill_boundary();
        Ok(grid.into_plane())
    }
}

/// Bilinear 2x expansion that keeps `out[2i, 2j] == plane[i, j]`.
///
/// Odd positions average their in-range neighbours; the last odd row and
/// column repeat the edge.
pub fn expand_bilinear(plane: &Plane) -> Plane {
    let (height, width) = plane.shape();
    Plane::from_fn(2 * width, 2 * height, |ty, tx| {
        let (y0, x0) = (ty / 2, tx / 2);
        let y1 = if ty % 2 == 1 { (y0 + 1).min(height - 1) } else { y0 };
        let x1 = if tx % 2 == 1 { (x0 + 1).min(width - 1) } else { x0 };
        0.25 * (plane.get(y0, x0) + plane.get(y0, x1) + plane.get(y1, x0) + plane.get(y1, x1))
    })
}

/// Working state of one interpolation.
struct Grid<'a> {
    target: Vec<f64>,
    reference: &'a [f64],
    /// Source dimensions
    height: usize,
    width: usize,
    eps: f64,
}

impl<'a> Grid<'a> {
    fn seed(source: &Plane, reference: &'a Plane, eps: f64) -> Self {
        let (height, width) = source.shape();
        let mut target = vec![0.0; 4 * height * width];
        for i in 0..height {
            for (j, &v) in source.row(i).iter().enumerate() {
                target[(2 * i) * (2 * width) + 2 * j] = v;
            }
        }
        Self {
            target,
            reference: reference.as_slice(),
            height,
            width,
            eps,
        }
    }

    #[inline]
    fn idx(&self, y: usize, x: usize) -> usize {
        y * 2 * self.width + x
    }

    #[inline]
    fn t(&self, y: usize, x: usize) -> f64 {
        self.target[self.idx(y, x)]
    }

    #[inline]
    fn r(&self, y: usize, x: usize) -> f64 {
        self.reference[self.idx(y, x)]
    }

    /// `1 / (2 |ref_k - ref_c| + |ref_k - ref_o| + eps)`
    #[inline]
    fn weight(&self, k: f64, center: f64, opposite: f64) -> f64 {
        1.0 / (2.0 * (k - center).abs() + (k - opposite).abs() + self.eps)
    }

    /// Odd/odd samples from the four corners of each interior block.
    fn diagonal_pass(&mut self) {
        for i in 0..self.height.saturating_sub(1) {
            for j in 0..self.width.saturating_sub(1) {
                let (y, x) = (2 * i + 1, 2 * j + 1);
                let (n, s, w, e) = (y - 1, y + 1, x - 1, x + 1);
                let rc = self.r(y, x);
                let (r_nw, r_ne) = (self.r(n, w), self.r(n, e));
                let (r_se, r_sw) = (self.r(s, e), self.r(s, w));

                let g_nw = self.weight(r_nw, rc, r_se);
                let g_ne = self.weight(r_ne, rc, r_sw);
                let g_se = self.weight(r_se, rc, r_nw);
                let g_sw = self.weight(r_sw, rc, r_ne);

                let sum = g_nw * self.t(n, w)
                    + g_ne * self.t(n, e)
                    + g_se * self.t(s, e)
                    + g_sw * self.t(s, w);
                let idx = self.idx(y, x);
                self.target[idx] = sum / (g_nw + g_ne + g_se + g_sw);
            }
        }
    }

    /// Even/odd samples: seeded left/right plus diagonal results above/below.
    fn horizontal_pass(&mut self) {
        let last_row = self.height - 1;
        for i in 0..self.height {
            for j in 0..self.width.saturating_sub(1) {
                let (y, x) = (2 * i, 2 * j + 1);
                let rc = self.r(y, x);
                let (r_w, r_e) = (self.r(y, x - 1), self.r(y, x + 1));

                let g_w = self.weight(r_w, rc, r_e);
                let g_e = self.weight(r_e, rc, r_w);
                let mut sum = g_w * self.t(y, x - 1) + g_e * self.t(y, x + 1);
                let mut total = g_w + g_e;

                if i > 0 {
                    let r_n = self.r(y - 1, x);
                    let r_far = if i < last_row { self.r(y + 1, x) } else { rc };
                    let g_n = self.weight(r_n, rc, r_far);
                    sum += g_n * self.t(y - 1, x);
                    total += g_n;
                }
                if i < last_row {
                    let r_s = self.r(y + 1, x);
                    let r_far = if i > 0 { self.r(y - 1, x) } else { rc };
                    let g_s = self.weight(r_s, rc, r_far);
                    sum += g_s * self.t(y + 1, x);
                    total += g_s;
                }

                let idx = self.idx(y, x);
                self.target[idx] = sum / total;
            }
        }
    }

    /// Odd/even samples: seeded above/below plus diagonal results left/right.
    fn vertical_pass(&mut self) {
        let last_col = self.width - 1;
        for i in 0..self.height.saturating_sub(1) {
            for j in 0..self.width {
                let (y, x) = (2 * i + 1, 2 * j);
                let rc = self.r(y, x);
                let (r_n, r_s) = (self.r(y - 1, x), self.r(y + 1, x));

                let g_n = self.weight(r_n, rc, r_s);
                let g_s = self.weight(r_s, rc, r_n);
                let mut sum = g_n * self.t(y - 1, x) + g_s * self.t(y + 1, x);
                let mut total = g_n + g_s;

                if j > 0 {
                    let r_w = self.r(y, x - 1);
                    let r_far = if j < last_col { self.r(y, x + 1) } else { rc };
                    let g_w = self.weight(r_w, rc, r_far);
                    sum += g_w * self.t(y, x - 1);
                    total += g_w;
                }
                if j < last_col {
                    let r_e = self.r(y, x + 1);
                    let r_far = if j > 0 { self.r(y, x - 1) } else { rc };
                    let g_e = self.weight(r_e, rc, r_far);
                    sum += g_e * self.t(y, x + 1);
                    total += g_e;
                }

                let idx = self.idx(y, x);
                self.target[idx] = sum / total;
            }
        }
    }

    /// Last column, then last row, copy their inner neighbour.
    fn fill_boundary(&mut self) {
        let (rows, cols) = (2 * self.height, 2 * self.width);
        for y in 0..rows {
            let row = &mut self.target[y * cols..(y + 1) * cols];
            row[cols - 1] = row[cols - 2];
        }
        let (inner, last) = self.target.split_at_mut((rows - 1) * cols);
        last.copy_from_slice(&inner[(rows - 2) * cols..]);
    }

    fn into_plane(self) -> Plane {
        Plane::from_parts(self.target, 2 * self.width, 2 * self.height)
    }
}
