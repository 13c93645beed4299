//! Property-based tests for poisson-fill
//!
//! These tests use proptest to verify invariants of the filling engine
//! that should hold for every image and hole layout.

use poisson_fill::{FillConfig, HoleMask, PixelBuffer, PoissonFilling};
use proptest::prelude::*;

const HOLE: f32 = 0.0;

/// Strategy for a single-channel image with random holes punched out
///
/// Known samples are drawn from `[0.1, 10.0)` so they never match the sentinel.
fn holed_image() -> impl Strategy<Value = PixelBuffer> {
    (1u32..=12, 1u32..=12).prop_flat_map(|(width, height)| {
        let count = (width * height) as usize;
        (
            prop::collection::vec(0.1f32..10.0, count),
            prop::collection::vec(any::<bool>(), count),
        )
            .prop_map(move |(values, holes)| {
                let data = values
                    .into_iter()
                    .zip(holes)
                    .map(|(v, hole)| if hole { HOLE } else { v })
                    .collect();
                PixelBuffer::from_raw(width, height, 1, data).unwrap()
            })
    })
}

/// Strategy for an image without any holes
fn solid_image() -> impl Strategy<Value = PixelBuffer> {
    (1u32..=12, 1u32..=12, 1usize..=4).prop_flat_map(|(width, height, channels)| {
        let count = width as usize * height as usize * channels;
        prop::collection::vec(0.1f32..10.0, count).prop_map(move |data| {
            PixelBuffer::from_raw(width, height, channels, data).unwrap()
        })
    })
}

fn hole_mask(image: &PixelBuffer) -> HoleMask {
    HoleMask::from_buffer(image, &[HOLE], FillConfig::DEFAULT_MATCH_THRESHOLD).unwrap()
}

proptest! {
    /// Property: Images without holes come back unchanged after zero sweeps
    #[test]
    fn no_holes_is_identity(image in solid_image()) {
        let mut engine = PoissonFilling::new();
        let filled = engine.fill(&image, None, HOLE).unwrap();

        prop_assert_eq!(&filled, &image);
        prop_assert_eq!(engine.last_report().unwrap().sweeps, 0);
    }

    /// Property: The sweep count never exceeds the cap plus one
    #[test]
    fn sweeps_are_bounded(image in holed_image(), cap in 0usize..6) {
        let config = FillConfig::default().with_max_iterations(cap);
        let mut engine = PoissonFilling::with_config(config).unwrap();
        engine.fill(&image, None, HOLE).unwrap();

        prop_assert!(engine.last_report().unwrap().sweeps <= cap + 1);
    }

    /// Property: Known pixels are never rewritten
    #[test]
    fn known_pixels_are_preserved(image in holed_image()) {
        let mask = hole_mask(&image);
        let filled = PoissonFilling::new().fill(&image, None, HOLE).unwrap();

        for y in 0..image.height() {
            for x in 0..image.width() {
                if !mask.get(x, y) {
                    prop_assert_eq!(filled.at(x, y), image.at(x, y));
                }
            }
        }
    }

    /// Property: Filled values stay within the range of the known values
    #[test]
    fn fill_respects_known_value_range(image in holed_image()) {
        let known: Vec<f32> = image.as_raw().iter().copied().filter(|&v| v != HOLE).collect();
        prop_assume!(!known.is_empty());
        let lo = known.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = known.iter().copied().fold(f32::NEG_INFINITY, f32::max);

        let filled = PoissonFilling::new().fill(&image, None, HOLE).unwrap();

        for &v in filled.as_raw() {
            prop_assert!(v >= lo - 1e-4 && v <= hi + 1e-4, "{} outside [{}, {}]", v, lo, hi);
        }
    }

    /// Property: Any image with a known pixel converges within width + height sweeps
    #[test]
    fn connected_grid_converges(image in holed_image()) {
        let mask = hole_mask(&image);
        prop_assume!(mask.hole_count() < (image.width() * image.height()) as usize);

        let mut engine = PoissonFilling::new();
        engine.fill(&image, None, HOLE).unwrap();

        let report = engine.last_report().unwrap();
        prop_assert!(report.converged);
        prop_assert_eq!(report.remaining_holes, 0);
        prop_assert!(report.sweeps <= (image.width() + image.height()) as usize);
    }

    /// Property: Remaining holes never exceed the initial hole count
    #[test]
    fn holes_never_grow(image in holed_image(), cap in 0usize..4) {
        let initial = hole_mask(&image).hole_count();
        let config = FillConfig::default().with_max_iterations(cap);
        let mut engine = PoissonFilling::with_config(config).unwrap();

        let filled = engine.fill(&image, None, HOLE).unwrap();

        let report = engine.last_report().unwrap();
        prop_assert!(report.remaining_holes <= initial);
        prop_assert_eq!(hole_mask(&filled).hole_count(), report.remaining_holes);
    }

    /// Property: Reusing an engine gives the same result as a fresh one
    #[test]
    fn engine_reuse_is_transparent(first in holed_image(), second in holed_image()) {
        let mut shared = PoissonFilling::new();
        shared.fill(&first, None, HOLE).unwrap();
        let reused = shared.fill(&second, None, HOLE).unwrap();
        let fresh = PoissonFilling::new().fill(&second, None, HOLE).unwrap();

        prop_assert_eq!(reused, fresh);
    }
}
