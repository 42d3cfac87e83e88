//! Domain-critical regression tests for ppi-core.
//!
//! Each test documents the regression it guards against.

#[cfg(test)]
mod domain_tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{
        reconstruct, ChannelStack, DirectionalInterpolator, GuideBuilder, GuidedUpsampler, Plane,
        PpiGenerator, PpiMethod, SpectralUpsampler, UpscaleMethod,
    };

    fn uniform_stack(values: &[f64], width: usize, height: usize) -> ChannelStack {
        ChannelStack::new(
            values
                .iter()
                .map(|&v| Plane::filled(width, height, v))
                .collect(),
        )
        .unwrap()
    }

    fn random_plane(rng: &mut StdRng, width: usize, height: usize) -> Plane {
        Plane::from_fn(width, height, |_, _| rng.gen_range(0.0..255.0))
    }

    // ========================================================================
    // Synthesis on structureless input
    // ========================================================================

    /// If this breaks, it means: a synthesis method adds a correction where
    /// there is no structure at all. Uniform channels carry no edges, so
    /// every method must return the channel mean (PPID and IGFPPI up to
    /// rounding).
    #[test]
    fn test_uniform_channels_give_channel_mean() {
        let stack = uniform_stack(&[100.0, 150.0, 200.0], 100, 100);

        let simple = PpiGenerator::new(&stack, PpiMethod::Simple).unwrap();
        assert!(simple.generate().plane().as_slice().iter().all(|&v| v == 150.0));

        for name in ["ppid", "igfppi"] {
            let generator = PpiGenerator::new(&stack, name.parse().unwrap()).unwrap();
            let plane = generator.generate().plane();
            assert!(
                (plane.mean() - 150.0).abs() < 1.0,
                "REGRESSION: {name} mean {:.4} on uniform input, expected 150",
                plane.mean()
            );
            assert!(plane.max() - plane.min() < 1e-6, "{name} output is not flat");
        }
    }

    /// If this breaks, it means: channel order or count leaks into the
    /// simple PPI, or IGFPPI stopped reporting its iteration counts.
    #[test]
    fn test_fifteen_constant_channels() {
        let values: Vec<f64> = (0..15).map(|i| 100.0 + 5.0 * i as f64).collect();
        let expected = values.iter().sum::<f64>() / values.len() as f64;
        let stack = uniform_stack(&values, 100, 100);

        let simple = PpiGenerator::new(&stack, PpiMethod::Simple).unwrap();
        let band = simple.generate();
        assert_eq!(band.plane().shape(), (100, 100));
        assert!((band.plane().mean() - expected).abs() < 1e-9);

        let igfppi = PpiGenerator::new(&stack, PpiMethod::default()).unwrap();
        let report = igfppi.generate().iterations().unwrap();
        assert!(report.horizontal >= 1);
        assert!(report.vertical >= 1);
    }

    // ========================================================================
    // Directional interpolation invariants
    // ========================================================================

    /// If this breaks, it means: a later pass overwrites seeded samples, so
    /// upscaling no longer reproduces the source at its own positions.
    #[test]
    fn test_interpolation_keeps_source_samples() {
        let mut rng = StdRng::seed_from_u64(11);
        for (width, height) in [(1, 1), (2, 3), (7, 5), (12, 10)] {
            let source = random_plane(&mut rng, width, height);
            let reference = random_plane(&mut rng, 2 * width, 2 * height);
            let target = DirectionalInterpolator::new()
                .interpolate(&source, &reference)
                .unwrap();
            for y in 0..height {
                for x in 0..width {
                    assert_eq!(
                        target.get(2 * y, 2 * x),
                        source.get(y, x),
                        "REGRESSION: seeded sample ({y}, {x}) changed for {width}x{height}"
                    );
                }
            }
        }
    }

    /// If this breaks, it means: interpolation weights are no longer
    /// normalized, so a flat field picks up structure from the reference.
    #[test]
    fn test_interpolation_of_flat_field_is_flat() {
        let mut rng = StdRng::seed_from_u64(5);
        let source = Plane::filled(9, 8, 73.0);
        let reference = random_plane(&mut rng, 18, 16);
        let target = DirectionalInterpolator::new()
            .interpolate(&source, &reference)
            .unwrap();
        for &v in target.as_slice() {
            assert!((v - 73.0).abs() < 1e-9, "REGRESSION: flat field became {v}");
        }
    }

    // ========================================================================
    // Reconstruction and sizing
    // ========================================================================

    /// If this breaks, it means: reconstruction clamps or rescales instead
    /// of adding, which biases every band.
    #[test]
    fn test_reconstruct_is_elementwise_sum() {
        let mut rng = StdRng::seed_from_u64(9);
        let ppi = Plane::from_fn(6, 4, |_, _| rng.gen_range(-500.0..500.0));
        let delta = Plane::from_fn(6, 4, |_, _| rng.gen_range(-500.0..500.0));
        let out = reconstruct(&ppi, &delta).unwrap();
        for i in 0..out.len() {
            assert_eq!(out.as_slice()[i], ppi.as_slice()[i] + delta.as_slice()[i]);
        }
        assert_eq!(reconstruct(&ppi, &Plane::zeros(6, 4)).unwrap(), ppi);
    }

    /// If this breaks, it means: output sizing drifted from `(h * s, w * s)`.
    #[test]
    fn test_output_size_for_integer_scales() {
        let guided = GuidedUpsampler::new(2.0, UpscaleMethod::Guided).unwrap();
        assert_eq!(guided.get_output_size(37, 53), (74, 106));
        for s in 1..=5 {
            let upsampler = GuidedUpsampler::new(s as f64, UpscaleMethod::Lanczos).unwrap();
            assert_eq!(upsampler.get_output_size(37, 53), (37 * s, 53 * s));
        }
    }

    // ========================================================================
    // Guide image
    // ========================================================================

    /// If this breaks, it means: the guide no longer highlights edges,
    /// so guided upscaling blends across them.
    #[test]
    fn test_guide_highlights_step_edges() {
        let edges = [10usize, 25, 40];
        let channels = edges
            .iter()
            .map(|&col| Plane::from_fn(50, 50, |_, x| if x >= col { 200.0 } else { 50.0 }))
            .collect();
        let stack = ChannelStack::new(channels).unwrap();
        let guide = GuideBuilder::new().build(&stack);

        assert!(guide.min() >= 0.0 && guide.max() <= 1.0);
        for col in edges {
            let near = guide.window_mean(0..50, col..col + 2);
            let flat = guide.window_mean(0..50, col + 4..col + 6);
            assert!(
                near > flat,
                "REGRESSION: guide at column {col} ({near:.3}) not above flat ({flat:.3})"
            );
        }
    }

    // ========================================================================
    // End-to-end
    // ========================================================================

    /// If this breaks, it means: some stage of PPI -> 2x PPI -> per-channel
    /// detail transfer lost the band's energy or produced non-finite values.
    #[test]
    fn test_full_pipeline_on_random_channels() {
        let mut rng = StdRng::seed_from_u64(2024);
        let channels: Vec<Plane> = (0..15).map(|_| random_plane(&mut rng, 12, 10)).collect();
        let stack = ChannelStack::new(channels).unwrap();

        let generator = PpiGenerator::new(&stack, PpiMethod::default()).unwrap();
        let ppi = generator.generate().plane();
        let ppi_2x = GuidedUpsampler::new(2.0, UpscaleMethod::Guided)
            .unwrap()
            .upscale(ppi, Some(&stack))
            .unwrap();
        let upscaled = SpectralUpsampler::new(2.0)
            .unwrap()
            .workers(4)
            .upsample_all(&stack, ppi, &ppi_2x)
            .unwrap();

        assert_eq!(upscaled.len(), 15);
        assert_eq!(upscaled.shape(), (20, 24));
        for (original, up) in stack.channels().iter().zip(upscaled.channels()) {
            assert!(up.is_finite());
            assert!(
                (up.mean() - original.mean()).abs() < 30.0,
                "REGRESSION: channel mean moved from {:.2} to {:.2}",
                original.mean(),
                up.mean()
            );
        }
    }
}
