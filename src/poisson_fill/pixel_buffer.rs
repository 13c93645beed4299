//! Interleaved `f32` pixel grid used as the engine's working storage.

use crate::error::{FillError, FillResult};
use crate::utils::{clamp_f32_to_primitive, validate_len, validate_non_empty_image};
use crate::Image;
use image::{ImageBuffer, Pixel, Primitive};
use imageproc::definitions::Clamp;

/// Interleaved floating-point pixel grid
///
/// Samples are stored row-major with the channels of one pixel adjacent,
/// so sample `k` of pixel `(x, y)` lives at `(y * width + x) * channels + k`.
/// This is the working representation of the filling engine; images from the
/// `image` crate are converted with [`PixelBuffer::from_image`] and
/// [`PixelBuffer::to_image`].
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: usize,
    data: Vec<f32>,
}

impl PixelBuffer {
    /// Creates a zero-filled buffer
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width as usize * height as usize * channels],
        }
    }

    /// Creates a buffer with every pixel set to `pixel`
    ///
    /// The channel count is taken from the length of `pixel`.
    pub fn from_pixel(width: u32, height: u32, pixel: &[f32]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * pixel.len());
        for _ in 0..count {
            data.extend_from_slice(pixel);
        }
        Self {
            width,
            height,
            channels: pixel.len(),
            data,
        }
    }

    /// Wraps existing interleaved samples
    ///
    /// # Errors
    ///
    /// * `FillError::InvalidInput` - If a dimension or the channel count is zero
    /// * `FillError::DimensionMismatch` - If `data` does not hold exactly
    ///   `width * height * channels` samples
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<f32>) -> FillResult<Self> {
        validate_non_empty_image(width, height, channels)?;
        validate_len(width as usize * height as usize * channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Converts an image into a float buffer without rescaling sample values
    pub fn from_image<P>(image: &Image<P>) -> Self
    where
        P: Pixel,
        P::Subpixel: Into<f32>,
    {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            channels: usize::from(P::CHANNEL_COUNT),
            data: image.as_raw().iter().map(|&s| s.into()).collect(),
        }
    }

    /// Converts the buffer back into an image, clamping into the subpixel range
    ///
    /// # Errors
    ///
    /// * `FillError::DimensionMismatch` - If the pixel type has a different
    ///   channel count than the buffer
    /// * `FillError::ImageBufferCreationFailed` - If the image could not be built
    pub fn to_image<P>(&self) -> FillResult<Image<P>>
    where
        P: Pixel,
        P::Subpixel: Primitive + Clamp<f32>,
    {
        validate_len(usize::from(P::CHANNEL_COUNT), self.channels)?;
        let samples = self
            .data
            .iter()
            .map(|&v| clamp_f32_to_primitive::<P::Subpixel>(v))
            .collect();
        ImageBuffer::from_raw(self.width, self.height, samples)
            .ok_or(FillError::ImageBufferCreationFailed)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of samples in one row
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels
    }

    /// Returns `true` when the buffer has a usable shape and consistent storage
    pub fn is_valid(&self) -> bool {
        validate_non_empty_image(self.width, self.height, self.channels).is_ok()
            && self.data.len() == self.width as usize * self.height as usize * self.channels
    }

    /// Returns `true` when both buffers have the same width, height and channel count
    pub fn similar_shape(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Channel slice of pixel `(x, y)`, or `None` outside the grid
    pub fn at(&self, x: u32, y: u32) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        Some(&self.data[start..start + self.channels])
    }

    /// Mutable channel slice of pixel `(x, y)`, or `None` outside the grid
    pub fn at_mut(&mut self, x: u32, y: u32) -> Option<&mut [f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        let channels = self.channels;
        Some(&mut self.data[start..start + channels])
    }

    /// Channel slice of the pixel displaced by `(dx, dy)` from `(x, y)`
    ///
    /// Off-grid positions yield `None` instead of wrapping or clamping.
    pub fn neighbor(&self, x: u32, y: u32, dx: i32, dy: i32) -> Option<&[f32]> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.at(nx, ny)
    }

    /// Samples of row `y`
    pub fn row(&self, y: u32) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        let len = self.row_len();
        let start = y as usize * len;
        Some(&self.data[start..start + len])
    }

    pub fn as_raw(&self) -> &[f32] {
        &self.data
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    /// Makes `self` a full copy of `other`, reusing storage where possible
    pub fn assign(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.channels = other.channels;
        self.data.clone_from(&other.data);
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels
    }
}
