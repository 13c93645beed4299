//! Test utilities for poisson-fill
//!
//! Common fixtures and comparisons for the unit tests.
//! It is only compiled when running tests.

use crate::poisson_fill::pixel_buffer::PixelBuffer;
use image::{ImageBuffer, Luma, Pixel, Primitive};
use imageproc::definitions::Image;

/// Creates a grayscale `f32` image of `1.0` with the given pixels set to `0.0`.
///
/// # Arguments
/// * `width` - Width of the image to create
/// * `height` - Height of the image to create
/// * `holes` - `(x, y)` positions to punch out
pub fn create_hole_image(width: u32, height: u32, holes: &[(u32, u32)]) -> Image<Luma<f32>> {
    let mut image = ImageBuffer::from_pixel(width, height, Luma([1.0f32]));
    for &(x, y) in holes {
        image.put_pixel(x, y, Luma([0.0]));
    }
    image
}

/// Compares two pixel values with a tolerance for floating-point precision errors.
///
/// # Returns
/// `true` if all subpixel values are within the tolerance, `false` otherwise
pub fn pixels_approx_equal<P>(expected: P, actual: P, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    if expected.channels().len() != actual.channels().len() {
        return false;
    }

    expected
        .channels()
        .iter()
        .zip(actual.channels())
        .all(|(&e, &a)| (f32::from(e) - f32::from(a)).abs() <= tolerance)
}

/// Compares two images pixel by pixel with a tolerance for floating-point errors.
///
/// # Returns
/// `true` if all pixels are within tolerance and dimensions match, `false` otherwise
pub fn images_approx_equal<P>(expected: &Image<P>, actual: &Image<P>, tolerance: f32) -> bool
where
    P: Pixel,
    P::Subpixel: Primitive,
    f32: From<P::Subpixel>,
{
    expected.dimensions() == actual.dimensions()
        && expected
            .pixels()
            .zip(actual.pixels())
            .all(|(e, a)| pixels_approx_equal(*e, *a, tolerance))
}

/// Same as [`images_approx_equal`] for float buffers, also comparing channel counts.
pub fn buffers_approx_equal(expected: &PixelBuffer, actual: &PixelBuffer, tolerance: f32) -> bool {
    expected.similar_shape(actual)
        && expected
            .as_raw()
            .iter()
            .zip(actual.as_raw())
            .all(|(e, a)| (e - a).abs() <= tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_hole_image_punches_requested_pixels() {
        let image = create_hole_image(3, 2, &[(0, 0), (2, 1)]);
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(0, 0), &Luma([0.0]));
        assert_eq!(image.get_pixel(1, 0), &Luma([1.0]));
        assert_eq!(image.get_pixel(2, 1), &Luma([0.0]));
    }

    #[test]
    fn images_approx_equal_with_tolerant_comparison_returns_true() {
        let image1 = create_hole_image(2, 2, &[]);
        let mut image2 = create_hole_image(2, 2, &[]);
        image2.put_pixel(0, 0, Luma([1.01]));

        assert!(images_approx_equal(&image1, &image2, 0.02));
        assert!(!images_approx_equal(&image1, &image2, 0.005));
    }

    #[test]
    fn buffers_approx_equal_checks_shape() {
        let a = PixelBuffer::from_pixel(2, 2, &[1.0]);
        let b = PixelBuffer::from_pixel(2, 2, &[1.0, 1.0]);
        assert!(buffers_approx_equal(&a, &a.clone(), 0.0));
        assert!(!buffers_approx_equal(&a, &b, 1.0));
    }
}
