use thiserror::Error;

/// Result type for hole filling operations
pub type FillResult<T> = Result<T, FillError>;

/// Error type for hole filling operations
///
/// A request that hits the iteration cap with holes left is not an error:
/// the partially filled image is returned and the outcome is recorded in
/// [`FillReport`](crate::FillReport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FillError {
    /// The source image cannot be filled
    ///
    /// This error is returned when the source has a zero dimension, no
    /// channels, or storage that does not match its declared shape.
    /// The engine state is left untouched.
    #[error("Invalid input image: {width}x{height} with {channels} channel(s)")]
    InvalidInput {
        width: u32,
        height: u32,
        channels: usize,
    },

    /// Two shapes that must agree do not
    ///
    /// This error occurs when a mask target vector does not have one entry
    /// per channel, or when raw storage does not match the requested shape.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        /// Expected element count
        expected: usize,
        /// Actual element count
        actual: usize,
    },

    /// Invalid parameter provided to the operation
    ///
    /// This error is returned when a configuration value is outside the
    /// acceptable range, such as a negative or non-finite threshold.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failed to create an ImageBuffer from the filled pixels
    #[error("Failed to create ImageBuffer from filled pixels")]
    ImageBufferCreationFailed,
}
