//! Structure/edge guide images.
//!
//! A guide is an `H x W` plane in `[0, 1]` that is large on strong edges
//! of bright structure. It is only ever used as a weighting signal.

use crate::filter::gradient_magnitude;
use crate::plane::Plane;
use crate::stack::ChannelStack;

/// Builds guide images from a channel stack or a single plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuideBuilder;

impl GuideBuilder {
    pub fn new() -> Self {
        Self
    }

    /// `normalize(mean_norm * (1 + edge_norm))` over all channels.
    ///
    /// The edge map is the per-channel Sobel magnitude averaged across
    /// channels, scaled by its maximum. The structure map is the channel
    /// mean, min-max normalized (all zero when flat).
    pub fn build(&self, stack: &ChannelStack) -> Plane {
        let (height, width) = stack.shape();
        let scale = 1.0 / stack.len() as f64;

        let mut edges = vec![0.0; width * height];
        for channel in stack.channels() {
            let magnitude = gradient_magnitude(channel);
            for (acc, &m) in edges.iter_mut().zip(magnitude.as_slice()) {
                *acc += m * scale;
            }
        }
        let edges = scale_by_max(Plane::from_parts(edges, width, height));
        let structure = min_max_normalize(&stack.mean_plane());

        let guide = structure.zip_map(&edges, |s, e| s * (1.0 + e));
        tracing::debug!(height, width, channels = stack.len(), "Built guide image");
        scale_by_max(guide)
    }

    /// Sobel magnitude of `image`, scaled by its maximum.
    ///
    /// Used when no channel stack is available.
    pub fn edge_only(&self, image: &Plane) -> Plane {
        scale_by_max(gradient_magnitude(image))
    }
}

/// Divide by the maximum when it is positive; otherwise return as is.
fn scale_by_max(plane: Plane) -> Plane {
    let max = plane.max();
    if max > 0.0 {
        plane.map(|v| v / max)
    } else {
        plane
    }
}

/// Map `[min, max]` onto `[0, 1]`; a flat plane becomes all zeros.
pub fn min_max_normalize(plane: &Plane) -> Plane {
    let (min, max) = (plane.min(), plane.max());
    let range = max - min;
    if range > 0.0 {
        plane.map(|v| (v - min) / range)
    } else {
        Plane::zeros(plane.width(), plane.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDGES: [usize; 3] = [10, 25, 40];

    fn stepped_stack() -> ChannelStack {
        let channels = EDGES
            .iter()
            .map(|&col| Plane::from_fn(50, 20, |_, x| if x >= col { 200.0 } else { 50.0 }))
            .collect();
        ChannelStack::new(channels).unwrap()
    }

    fn column_band_mean(plane: &Plane, cols: std::ops::Range<usize>) -> f64 {
        plane.window_mean(0..plane.height(), cols)
    }

    #[test]
    fn test_guide_range() {
        let guide = GuideBuilder::new().build(&stepped_stack());
        assert_eq!(guide.shape(), (20, 50));
        assert!(guide.min() >= 0.0);
        assert!(guide.max() <= 1.0);
        assert!((guide.max() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_guide_elevated_at_edges() {
        let guide = GuideBuilder::new().build(&stepped_stack());
        for col in EDGES {
            let at_edge = column_band_mean(&guide, col..col + 2);
            let flat = column_band_mean(&guide, col + 4..col + 6);
            assert!(
                at_edge > flat,
                "column {col}: edge {at_edge} vs flat {flat}"
            );
        }
    }

    #[test]
    fn test_flat_stack_gives_zero_guide() {
        let stack = ChannelStack::new(vec![Plane::filled(6, 6, 80.0); 3]).unwrap();
        let guide = GuideBuilder::new().build(&stack);
        assert!(guide.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_edge_only_peaks_at_one() {
        let image = Plane::from_fn(12, 12, |y, _| if y >= 6 { 255.0 } else { 0.0 });
        let guide = GuideBuilder::new().edge_only(&image);
        assert!((guide.max() - 1.0).abs() < 1e-12);
        assert_eq!(guide.get(0, 0), 0.0);
        assert!(guide.get(5, 3) > 0.5);
    }

    #[test]
    fn test_edge_only_flat_image() {
        let guide = GuideBuilder::new().edge_only(&Plane::filled(4, 4, 9.0));
        assert!(guide.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_min_max_normalize() {
        let plane = Plane::new(vec![10.0, 20.0, 30.0], 3, 1).unwrap();
        let out = min_max_normalize(&plane);
        assert_eq!(out.as_slice(), &[0.0, 0.5, 1.0]);
    }
}
