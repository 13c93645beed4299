//! Hole filling (inpainting) for float images.
//!
//! Missing pixels are marked with a sentinel value. Each relaxation sweep
//! seeds holes next to known pixels with the mean of those neighbours and
//! then relaxes every originally missing pixel towards a discrete harmonic
//! (zero Laplacian) solution, carrying the boundary gradient inwards.
//!
//! Sweeps run row-parallel with `rayon` when the `rayon` feature is enabled.

mod error;
mod poisson_fill;
#[cfg(test)]
mod test_utils;
mod utils;

use image::ImageBuffer;

pub use error::{FillError, FillResult};
pub use poisson_fill::engine::{FillConfig, FillReport, PoissonFilling};
pub use poisson_fill::hole_mask::{equal_within, HoleMask};
pub use poisson_fill::image_ext::PoissonFill;
pub use poisson_fill::pixel_buffer::PixelBuffer;

pub type Image<P> = ImageBuffer<P, Vec<<P as image::Pixel>::Subpixel>>;
