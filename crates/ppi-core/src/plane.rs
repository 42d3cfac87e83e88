//! Single-band floating-point image.
//!
//! [`Plane`] is the one array type every stage of the pipeline reads and
//! writes: channels, the PPI, guide images, spectral differences and the
//! 2x results are all planes. Samples are stored row-major as `f64`.

use serde::Serialize;

use crate::error::{CoreError, Result};

/// A row-major `height x width` image of `f64` samples.
///
/// # Example
///
/// ```
/// use ppi_core::Plane;
///
/// let plane = Plane::from_fn(3, 2, |y, x| (y * 3 + x) as f64);
/// assert_eq!(plane.shape(), (2, 3));
/// assert_eq!(plane.get(1, 2), 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

/// Summary statistics of a plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlaneStats {
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Plane {
    /// Wrap row-major samples.
    ///
    /// Fails with [`CoreError::InvalidParameter`] when
    /// `data.len() != width * height`.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> Result<Self> {
        if data.len() != width * height {
            return Err(CoreError::InvalidParameter(format!(
                "plane data length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Internal constructor for buffers whose length is correct by construction.
    pub(crate) fn from_parts(data: Vec<f64>, width: usize, height: usize) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            data,
            width,
            height,
        }
    }

    /// A plane with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: f64) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn zeros(width: usize, height: usize) -> Self {
        Self::filled(width, height, 0.0)
    }

    /// Build a plane by evaluating `f(y, x)` for every sample.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(y, x));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, the same order the rest of the crate reports shapes in.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Sample at row `y`, column `x`.
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the plane.
    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f64 {
        debug_assert!(y < self.height && x < self.width);
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, y: usize, x: usize, value: f64) {
        debug_assert!(y < self.height && x < self.width);
        self.data[y * self.width + x] = value;
    }

    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Apply `f` to every sample.
    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Plane {
        Plane {
            data: self.data.iter().map(|&v| f(v)).collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Combine two equally shaped planes sample by sample.
    ///
    /// Callers check shapes first; see [`Plane::ensure_same_shape`].
    pub fn zip_map(&self, other: &Plane, f: impl Fn(f64, f64) -> f64) -> Plane {
        debug_assert_eq!(self.shape(), other.shape());
        Plane {
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
            width: self.width,
            height: self.height,
        }
    }

    /// Fail with [`CoreError::ShapeMismatch`] unless `other` has this plane's shape.
    pub fn ensure_same_shape(&self, other: &Plane, context: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(CoreError::shape(context, self.shape(), other.shape()));
        }
        Ok(())
    }

    pub fn mean(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population standard deviation.
    pub fn std(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|&v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }

    pub fn min(&self) -> f64 {
        self.data.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn stats(&self) -> PlaneStats {
        PlaneStats {
            mean: self.mean(),
            std: self.std(),
            min: self.min(),
            max: self.max(),
        }
    }

    /// True when no sample is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Mean over the window `rows x cols` (half-open ranges), clipped to the plane.
    pub fn window_mean(
        &self,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> f64 {
        let rows = rows.start.min(self.height)..rows.end.min(self.height);
        let cols = cols.start.min(self.width)..cols.end.min(self.width);
        let count = rows.len() * cols.len();
        if count == 0 {
            return 0.0;
        }
        let mut sum = 0.0;
        for y in rows {
            sum += self.row(y)[cols.clone()].iter().sum::<f64>();
        }
        sum / count as f64
    }
}
