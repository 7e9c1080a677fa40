//! Resampling to a bounded working resolution.
//!
//! The source buffer is scaled by `min(res / width, res / height)` so
//! that the larger axis lands on the working resolution. The scale is
//! not capped at 1: buffers smaller than the working resolution are
//! upscaled, which keeps the pixel count (and therefore the weight of
//! each statistic) comparable across input sizes.
//!
//! When the target size equals the source size the buffer is borrowed
//! unchanged.

use std::borrow::Cow;
use std::fmt;

use image::imageops;
use serde::{Deserialize, Serialize};

use crate::types::{AnalysisError, Dimensions, InputDefect, PixelBuffer};

/// Resampling filter used to reach the working resolution.
///
/// Ordered from fastest/lowest-quality to slowest/highest-quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownsampleFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation: fast, decent quality.
    Triangle,
    /// Bicubic (Catmull-Rom): moderate speed, good quality.
    CatmullRom,
    /// Gaussian: moderate speed, smooth output.
    Gaussian,
    /// Lanczos with 3 lobes: slowest, sharpest.
    Lanczos3,
}

impl Default for DownsampleFilter {
    fn default() -> Self {
        Self::Triangle
    }
}

impl DownsampleFilter {
    /// Convert to the `image` crate's `FilterType`.
    const fn to_image_filter(self) -> imageops::FilterType {
        match self {
            Self::Nearest => imageops::FilterType::Nearest,
            Self::Triangle => imageops::FilterType::Triangle,
            Self::CatmullRom => imageops::FilterType::CatmullRom,
            Self::Gaussian => imageops::FilterType::Gaussian,
            Self::Lanczos3 => imageops::FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for DownsampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("Nearest"),
            Self::Triangle => f.write_str("Triangle"),
            Self::CatmullRom => f.write_str("CatmullRom"),
            Self::Gaussian => f.write_str("Gaussian"),
            Self::Lanczos3 => f.write_str("Lanczos3"),
        }
    }
}

/// Compute the sampled size for a source of the given dimensions.
///
/// Each axis is `round(axis * scale)` with
/// `scale = min(res / width, res / height)`.
///
/// # Errors
///
/// Returns [`InputDefect::EmptyImage`] if the source has a zero axis,
/// and [`InputDefect::DegenerateSample`] if scaling rounds an axis
/// down to zero (e.g. a 1000x1 strip).
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn target_dimensions(
    source: Dimensions,
    working_resolution: u32,
) -> Result<Dimensions, AnalysisError> {
    if source.is_empty() {
        return Err(InputDefect::EmptyImage {
            width: source.width,
            height: source.height,
        }
        .into());
    }

    let res = f64::from(working_resolution);
    let scale = (res / f64::from(source.width)).min(res / f64::from(source.height));

    // Both products are bounded by `res * max(w, h) / max(w, h)` on the
    // long axis, so they fit in u32.
    let width = (f64::from(source.width) * scale).round() as u32;
    let height = (f64::from(source.height) * scale).round() as u32;

    if width == 0 || height == 0 {
        return Err(InputDefect::DegenerateSample {
            width: source.width,
            height: source.height,
        }
        .into());
    }

    Ok(Dimensions { width, height })
}

/// Resample `buffer` to the working resolution with `filter`.
///
/// Returns [`Cow::Borrowed`] when the buffer is already at the target
/// size.
///
/// # Errors
///
/// Propagates the errors of [`target_dimensions`].
pub fn downsample(
    buffer: &PixelBuffer,
    working_resolution: u32,
    filter: DownsampleFilter,
) -> Result<Cow<'_, PixelBuffer>, AnalysisError> {
    let source = buffer.dimensions();
    let target = target_dimensions(source, working_resolution)?;

    if target == source {
        return Ok(Cow::Borrowed(buffer));
    }

    let resized = imageops::resize(
        buffer.as_image(),
        target.width,
        target.height,
        filter.to_image_filter(),
    );
    Ok(Cow::Owned(PixelBuffer::from(resized)))
}
