//! Internal utility functions for poisson-fill.
//!
//! Shared validation and conversion helpers used by the buffer and engine.

use crate::error::{FillError, FillResult};
use image::Primitive;
use imageproc::definitions::Clamp;

/// Clamps a floating-point value to the range of a primitive type.
///
/// # Arguments
///
/// * `value` - The floating-point value to clamp
///
/// # Returns
///
/// The clamped value as the target primitive type
#[inline]
pub fn clamp_f32_to_primitive<T: Primitive + Clamp<f32>>(value: f32) -> T {
    T::clamp(value)
}

/// Validates that a grid has non-zero dimensions and at least one channel.
///
/// # Arguments
///
/// * `width` - The width of the grid
/// * `height` - The height of the grid
/// * `channels` - Channels per pixel
///
/// # Returns
///
/// `Ok(())` if the shape is usable, otherwise `FillError::InvalidInput`
pub fn validate_non_empty_image(width: u32, height: u32, channels: usize) -> FillResult<()> {
    if width == 0 || height == 0 || channels == 0 {
        Err(FillError::InvalidInput {
            width,
            height,
            channels,
        })
    } else {
        Ok(())
    }
}

/// Validates that a slice holds exactly the expected number of elements.
pub fn validate_len(expected: usize, actual: usize) -> FillResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(FillError::DimensionMismatch { expected, actual })
    }
}
