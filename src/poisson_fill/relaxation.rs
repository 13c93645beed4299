//! One relaxation sweep of the filling engine.
//!
//! A sweep reads only from the previous buffer and writes only to the next
//! one, so rows can be processed in any order and on any thread. Off-grid
//! neighbours never contribute to a pixel.

use crate::poisson_fill::hole_mask::{equal_within, HoleMask};
use crate::poisson_fill::pixel_buffer::PixelBuffer;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Right, left, down, up.
const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

type Neighborhood<'a> = [Option<&'a [f32]>; 4];

/// Sentinel and tolerance shared by every pixel of a sweep
#[derive(Debug, Clone, Copy)]
pub struct SweepParams {
    pub hole_value: f32,
    pub threshold: f32,
}

/// Runs one sweep from `src` into `dst`
///
/// `dst` first becomes a full copy of `src`; only hole pixels and
/// poisson-eligible pixels are then rewritten. Hole flags of pixels that
/// receive a value are cleared in `holes`. `eligible` is read only.
///
/// Returns the number of hole pixels seeded by this sweep.
pub fn relax(
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    holes: &mut HoleMask,
    eligible: &HoleMask,
    params: SweepParams,
) -> usize {
    debug_assert_eq!(src.dimensions(), holes.dimensions());
    debug_assert_eq!(src.dimensions(), eligible.dimensions());

    dst.assign(src);

    let width = src.width() as usize;
    let row_len = src.row_len();
    if row_len == 0 {
        return 0;
    }

    let sweep_row = |(y, (out_row, hole_row)): (usize, (&mut [f32], &mut [bool]))| {
        relax_row(src, eligible, y as u32, out_row, hole_row, params)
    };

    #[cfg(feature = "rayon")]
    let seeded: usize = dst
        .as_raw_mut()
        .par_chunks_mut(row_len)
        .zip(holes.as_raw_mut().par_chunks_mut(width))
        .enumerate()
        .map(sweep_row)
        .sum();

    #[cfg(not(feature = "rayon"))]
    let seeded: usize = dst
        .as_raw_mut()
        .chunks_mut(row_len)
        .zip(holes.as_raw_mut().chunks_mut(width))
        .enumerate()
        .map(sweep_row)
        .sum();

    seeded
}

fn relax_row(
    src: &PixelBuffer,
    eligible: &HoleMask,
    y: u32,
    out_row: &mut [f32],
    hole_row: &mut [bool],
    params: SweepParams,
) -> usize {
    let Some(src_row) = src.row(y) else {
        return 0;
    };
    let channels = src.channels();
    let eligible_row = eligible.row(y);
    let mut seeded = 0;

    for (x, ((out, hole), center)) in out_row
        .chunks_exact_mut(channels)
        .zip(hole_row.iter_mut())
        .zip(src_row.chunks_exact(channels))
        .enumerate()
    {
        let neighbors: Neighborhood<'_> =
            NEIGHBORS.map(|(dx, dy)| src.neighbor(x as u32, y, dx, dy));

        if *hole {
            if seed_pixel(out, &neighbors, params) {
                *hole = false;
                seeded += 1;
            }
        } else if eligible_row[x] {
            correct_pixel(center, out, &neighbors, params);
        }
    }

    seeded
}

/// Writes the mean of the valid neighbours into every channel that has one.
/// Returns `true` if at least one channel was written.
fn seed_pixel(out: &mut [f32], neighbors: &Neighborhood<'_>, params: SweepParams) -> bool {
    let mut seeded = false;
    for (k, sample) in out.iter_mut().enumerate() {
        if let Some(mean) = valid_mean(neighbors, k, params) {
            *sample = mean;
            seeded = true;
        }
    }
    seeded
}

/// Moves each channel by the mean difference to its valid neighbours,
/// driving the local Laplacian towards zero. A channel that still holds the
/// sentinel is seeded instead.
fn correct_pixel(
    center: &[f32],
    out: &mut [f32],
    neighbors: &Neighborhood<'_>,
    params: SweepParams,
) {
    for (k, (sample, &current)) in out.iter_mut().zip(center).enumerate() {
        if equal_within(current, params.hole_value, params.threshold) {
            if let Some(mean) = valid_mean(neighbors, k, params) {
                *sample = mean;
            }
            continue;
        }

        let (delta, count) = valid_samples(neighbors, k, params)
            .fold((0.0f32, 0u32), |(sum, n), v| (sum + (v - current), n + 1));
        if count > 0 {
            *sample = current + delta / count as f32;
        }
    }
}

fn valid_mean(neighbors: &Neighborhood<'_>, k: usize, params: SweepParams) -> Option<f32> {
    let (sum, count) = valid_samples(neighbors, k, params)
        .fold((0.0f32, 0u32), |(sum, n), v| (sum + v, n + 1));
    (count > 0).then(|| sum / count as f32)
}

fn valid_samples<'a>(
    neighbors: &'a Neighborhood<'a>,
    k: usize,
    params: SweepParams,
) -> impl Iterator<Item = f32> + 'a {
    neighbors
        .iter()
        .flatten()
        .map(move |pixel| pixel[k])
        .filter(move |&v| !equal_within(v, params.hole_value, params.threshold))
}
