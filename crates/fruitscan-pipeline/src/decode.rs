//! Caller-side image decoding.
//!
//! The analysis itself starts from a [`PixelBuffer`]. This module is a
//! convenience for callers holding an encoded photo: it accepts JPEG,
//! PNG and WebP files up to [`MAX_INPUT_BYTES`] and produces the RGBA
//! buffer the pipeline expects.

use image::ImageFormat;

use crate::types::{AnalysisError, InputDefect, PixelBuffer};

/// Largest encoded image accepted, in bytes (10 MiB).
pub const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;

/// Encoded formats accepted for analysis.
pub const ACCEPTED_FORMATS: [ImageFormat; 3] =
    [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Decode encoded image bytes into an RGBA [`PixelBuffer`].
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if `bytes` is empty, larger
/// than [`MAX_INPUT_BYTES`], not one of [`ACCEPTED_FORMATS`], or
/// corrupt.
pub fn decode_rgba(bytes: &[u8]) -> Result<PixelBuffer, AnalysisError> {
    if bytes.is_empty() {
        return Err(InputDefect::EmptyBytes.into());
    }
    if bytes.len() > MAX_INPUT_BYTES {
        return Err(InputDefect::FileTooLarge {
            size: bytes.len(),
            limit: MAX_INPUT_BYTES,
        }
        .into());
    }

    let format = image::guess_format(bytes).map_err(|_| InputDefect::UnsupportedFormat)?;
    if !ACCEPTED_FORMATS.contains(&format) {
        return Err(InputDefect::UnsupportedFormat.into());
    }

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| InputDefect::Decode(e.to_string()))?;
    Ok(PixelBuffer::from(img.to_rgba8()))
}
