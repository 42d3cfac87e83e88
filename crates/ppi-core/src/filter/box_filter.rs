//! Moving-average (box) filter over a rectangular window.

use super::{separable, Border};
use crate::plane::Plane;

/// A rectangular, odd-sized filter window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// Height in samples
    pub rows: usize,
    /// Width in samples
    pub cols: usize,
}

impl Window {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// A `(2r + 1) x (2r + 1)` window.
    pub const fn square(radius: usize) -> Self {
        Self::new(2 * radius + 1, 2 * radius + 1)
    }

    /// Elongated along x: 7 wide, 3 tall.
    pub const HORIZONTAL: Window = Window::new(3, 7);

    /// Elongated along y: 3 wide, 7 tall.
    pub const VERTICAL: Window = Window::new(7, 3);
}

/// Mean of every `window` neighbourhood, symmetric borders.
pub fn box_filter(plane: &Plane, window: Window) -> Plane {
    debug_assert!(window.rows % 2 == 1 && window.cols % 2 == 1);
    let horizontal = vec![1.0 / window.cols as f64; window.cols];
    let vertical = vec![1.0 / window.rows as f64; window.rows];
    separable(plane, &horizontal, &vertical, Border::Symmetric)
}
