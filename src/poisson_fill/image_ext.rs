use crate::error::FillResult;
use crate::poisson_fill::engine::PoissonFilling;
use crate::poisson_fill::pixel_buffer::PixelBuffer;
use crate::Image;
use image::Pixel;
use imageproc::definitions::Clamp;

/// Hole filling for `image` crate buffers
///
/// Pixels whose every channel equals `hole_value` are treated as missing and
/// reconstructed from their surroundings. Samples are processed as `f32` and
/// clamped back into the subpixel range, so integer images are truncated
/// towards zero after filling.
///
/// # Examples
///
/// ```rust
/// use image::{ImageBuffer, Luma};
/// use poisson_fill::{Image, PoissonFill};
///
/// let mut image: Image<Luma<f32>> = ImageBuffer::from_pixel(5, 5, Luma([0.8]));
/// image.put_pixel(2, 2, Luma([0.0]));
///
/// let filled = image.poisson_fill(0.0).unwrap();
/// assert!((filled.get_pixel(2, 2)[0] - 0.8).abs() < 1e-6);
/// ```
pub trait PoissonFill {
    /// Fills holes with a fresh engine using the default configuration
    fn poisson_fill(&self, hole_value: f32) -> FillResult<Self>
    where
        Self: Sized;

    /// Fills holes with `engine`, reusing its buffers between calls
    fn poisson_fill_with(&self, engine: &mut PoissonFilling, hole_value: f32) -> FillResult<Self>
    where
        Self: Sized;

    /// Fills holes in place
    fn poisson_fill_mut(
        &mut self,
        engine: &mut PoissonFilling,
        hole_value: f32,
    ) -> FillResult<&mut Self>;
}

impl<P> PoissonFill for Image<P>
where
    P: Pixel,
    P::Subpixel: Into<f32> + Clamp<f32>,
{
    fn poisson_fill(&self, hole_value: f32) -> FillResult<Self> {
        self.poisson_fill_with(&mut PoissonFilling::new(), hole_value)
    }

    fn poisson_fill_with(&self, engine: &mut PoissonFilling, hole_value: f32) -> FillResult<Self> {
        let source = PixelBuffer::from_image(self);
        engine.fill(&source, None, hole_value)?.to_image()
    }

    fn poisson_fill_mut(
        &mut self,
        engine: &mut PoissonFilling,
        hole_value: f32,
    ) -> FillResult<&mut Self> {
        *self = self.poisson_fill_with(engine, hole_value)?;
        Ok(self)
    }
}
