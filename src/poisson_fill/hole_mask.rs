//! Hole masks and the tolerance comparison used to build them.

use crate::error::FillResult;
use crate::poisson_fill::pixel_buffer::PixelBuffer;
use crate::utils::validate_len;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Compares two samples with an absolute tolerance
///
/// Returns `true` when `a == b` or `|a - b| <= threshold`. A threshold of
/// zero requires exact equality; equal infinities always match.
#[inline]
pub fn equal_within(a: f32, b: f32, threshold: f32) -> bool {
    a == b || (a - b).abs() <= threshold
}

/// Per-pixel boolean grid marking pixels that still need a value
///
/// `true` means the pixel is a hole. The grid always has one entry per
/// pixel of the buffer it was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl HoleMask {
    /// Creates a mask with no holes
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    /// Builds a mask marking every pixel whose channels all lie within
    /// `threshold` of the matching entry of `target`
    ///
    /// # Errors
    ///
    /// * `FillError::DimensionMismatch` - If `target` does not have one
    ///   entry per channel of `buffer`
    pub fn from_buffer(buffer: &PixelBuffer, target: &[f32], threshold: f32) -> FillResult<Self> {
        let mut mask = Self::new(0, 0);
        mask.rebuild(buffer, target, threshold)?;
        Ok(mask)
    }

    /// Rebuilds the mask in place from `buffer`
    ///
    /// Storage is resized only when the pixel count changes.
    pub fn rebuild(&mut self, buffer: &PixelBuffer, target: &[f32], threshold: f32) -> FillResult<()> {
        validate_len(buffer.channels(), target.len())?;

        let (width, height) = buffer.dimensions();
        let pixel_count = width as usize * height as usize;
        if self.data.len() != pixel_count {
            self.data = vec![false; pixel_count];
        }
        self.width = width;
        self.height = height;

        let row_len = buffer.row_len();
        if row_len == 0 || width == 0 {
            return Ok(());
        }

        let channels = buffer.channels();
        let classify_row = |(mask_row, samples): (&mut [bool], &[f32])| {
            for (hole, pixel) in mask_row.iter_mut().zip(samples.chunks_exact(channels)) {
                *hole = pixel
                    .iter()
                    .zip(target)
                    .all(|(&value, &wanted)| equal_within(value, wanted, threshold));
            }
        };

        #[cfg(feature = "rayon")]
        self.data
            .par_chunks_mut(width as usize)
            .zip(buffer.as_raw().par_chunks(row_len))
            .for_each(classify_row);

        #[cfg(not(feature = "rayon"))]
        self.data
            .chunks_mut(width as usize)
            .zip(buffer.as_raw().chunks(row_len))
            .for_each(classify_row);

        Ok(())
    }

    /// Copies `src` into `dst`, reusing `dst`'s storage when one is given
    pub fn clone_mask(src: &Self, dst: Option<Self>) -> Self {
        match dst {
            Some(mut mask) => {
                mask.width = src.width;
                mask.height = src.height;
                mask.data.clone_from(&src.data);
                mask
            }
            None => src.clone(),
        }
    }

    /// Returns `true` when no pixel is marked as a hole
    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&hole| hole)
    }

    /// Number of pixels marked as holes
    pub fn hole_count(&self) -> usize {
        self.data.iter().filter(|&&hole| hole).count()
    }

    /// Whether `(x, y)` is a hole; off-grid positions are not
    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.data[self.index(x, y)]
    }

    /// Marks or clears `(x, y)`; off-grid positions are ignored
    pub fn set(&mut self, x: u32, y: u32, hole: bool) {
        if x < self.width && y < self.height {
            let index = self.index(x, y);
            self.data[index] = hole;
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Hole flags of row `y`
    pub(crate) fn row(&self, y: u32) -> &[bool] {
        let start = y as usize * self.width as usize;
        &self.data[start..start + self.width as usize]
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [bool] {
        &mut self.data
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
