pub mod engine;
pub mod hole_mask;
pub mod image_ext;
pub mod pixel_buffer;
pub mod relaxation;
