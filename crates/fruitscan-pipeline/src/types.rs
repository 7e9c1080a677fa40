//! Shared types for the fruitscan analysis pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::downsample::DownsampleFilter;

/// Re-export `RgbaImage` so downstream crates can build a
/// [`PixelBuffer`] from decoded image data without depending on
/// `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Total number of pixels (`width * height`).
    #[must_use]
    pub fn pixel_count(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns `true` if either axis is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A decoded, read-only RGBA pixel buffer.
///
/// Samples are stored row-major as `(R, G, B, A)` byte quadruples.
/// The alpha channel is carried but never read by the analysis.
///
/// A zero-area buffer is representable so that callers can hand over
/// whatever their decoder produced; the pipeline rejects it with
/// [`AnalysisError::InvalidInput`] instead of computing on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer(RgbaImage);

impl PixelBuffer {
    /// Wrap a flat RGBA byte vector.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if `pixels.len()` is not
    /// exactly `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AnalysisError> {
        let expected = usize::try_from(u64::from(width) * u64::from(height) * 4)
            .map_err(|_| InputDefect::TooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(InputDefect::BufferLength {
                expected,
                actual: pixels.len(),
            }
            .into());
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(Self)
            .ok_or_else(|| InputDefect::TooLarge { width, height }.into())
    }

    /// A buffer where every pixel has the same color.
    #[must_use]
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self(RgbaImage::from_pixel(width, height, image::Rgba(rgba)))
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    /// Buffer dimensions.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.0.width(),
            height: self.0.height(),
        }
    }

    /// Number of pixels in the buffer.
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        self.dimensions().pixel_count()
    }

    /// Returns `true` if the buffer holds no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions().is_empty()
    }

    /// The raw row-major RGBA bytes.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.0.as_raw()
    }

    /// Borrow the underlying image.
    #[must_use]
    pub const fn as_image(&self) -> &RgbaImage {
        &self.0
    }

    /// Iterate over the `[R, G, B]` channels of each pixel, ignoring alpha.
    pub fn rgb(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.0.pixels().map(|p| [p.0[0], p.0[1], p.0[2]])
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        Self(image)
    }
}

/// Summary color and texture statistics over a sampled buffer.
///
/// Channel averages and brightness lie in `[0, 255]`; the three
/// percentage fields lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStatistics {
    /// Mean red channel value.
    pub avg_red: f64,
    /// Mean green channel value.
    pub avg_green: f64,
    /// Mean blue channel value.
    pub avg_blue: f64,
    /// Mean of the per-pixel `(R + G + B) / 3` brightness.
    pub brightness: f64,
    /// Spread between the largest and smallest channel average,
    /// relative to the largest, as a percentage.
    pub saturation: f64,
    /// `100 - stddev(brightness) / 2.55`, floored at zero.
    pub uniformity: f64,
    /// Percentage of pixels darker than the dark-pixel threshold.
    pub dark_spot_ratio: f64,
}

/// The closed set of fruit categories the classifier can emit.
///
/// Declaration order is significant: it is the scan order used when
/// picking the highest-scoring category, so on an exact score tie the
/// earlier variant wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FruitKind {
    /// Strong red cast. Also the fallback when no rule fires.
    Apple,
    /// Yellow: red and green high, blue low.
    Banana,
    /// Red and green both raised, highly saturated.
    Orange,
    /// Runner-up to apple on red images.
    Strawberry,
    /// Blue or purple cast. Green images raise it too.
    Grapes,
    /// Runner-up to orange.
    Peach,
    /// Green cast, or runner-up on yellow images.
    Pear,
    /// Runner-up to grapes.
    Plum,
}

impl FruitKind {
    /// All categories, in tie-break order.
    pub const ALL: [Self; 8] = [
        Self::Apple,
        Self::Banana,
        Self::Orange,
        Self::Strawberry,
        Self::Grapes,
        Self::Peach,
        Self::Pear,
        Self::Plum,
    ];

    /// Category used when no classification rule fires.
    pub const DEFAULT: Self = Self::Apple;

    /// Canonical lowercase label (`"apple"`, `"grapes"`, ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::Banana => "banana",
            Self::Orange => "orange",
            Self::Strawberry => "strawberry",
            Self::Grapes => "grapes",
            Self::Peach => "peach",
            Self::Pear => "pear",
            Self::Plum => "plum",
        }
    }

    /// Position in [`FruitKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FruitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FruitKind {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Freshness category derived from a freshness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FreshnessCategory {
    /// Score 80 and above.
    Fresh,
    /// Score 60 to 79.
    Ripe,
    /// Score 40 to 59.
    Overripe,
    /// Score 20 to 39.
    Spoiled,
    /// Score below 20; too dark or damaged to judge.
    Unknown,
}

impl FreshnessCategory {
    /// All categories, from best to worst.
    pub const ALL: [Self; 5] = [
        Self::Fresh,
        Self::Ripe,
        Self::Overripe,
        Self::Spoiled,
        Self::Unknown,
    ];

    /// Map a clamped freshness score to its category.
    ///
    /// Persistence layers that store only the score must use this to
    /// reconstruct the category so they agree with fresh analyses.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Fresh,
            60..80 => Self::Ripe,
            40..60 => Self::Overripe,
            20..40 => Self::Spoiled,
            _ => Self::Unknown,
        }
    }

    /// Canonical label (`"Fresh"`, `"Ripe"`, ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh",
            Self::Ripe => "Ripe",
            Self::Overripe => "Overripe",
            Self::Spoiled => "Spoiled",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for FreshnessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FreshnessCategory {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A label that does not name any known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category label: {0:?}")]
pub struct UnknownLabel(pub String);

/// Fruit classification outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FruitVerdict {
    /// Predicted fruit category.
    pub fruit: FruitKind,
    /// Confidence percentage in `[60, 95]`.
    pub confidence: u8,
}

/// Freshness assessment outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreshnessVerdict {
    /// Category derived from `score`.
    pub category: FreshnessCategory,
    /// Freshness score in `[0, 100]`.
    pub score: u8,
    /// Confidence percentage in `[65, 90]`.
    pub confidence: u8,
    /// Human-readable list of the indicators that fired.
    pub explanation: String,
}

/// Result of analyzing one pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Which fruit the photo most likely shows.
    pub fruit: FruitVerdict,
    /// How fresh that fruit looks.
    pub freshness: FreshnessVerdict,
}

/// Configuration for the analysis pipeline.
///
/// Only the sampling stage is tunable. The classification and
/// freshness thresholds are fixed so that results are reproducible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target size of the sampled buffer. The source is scaled by
    /// `min(res / width, res / height)`, which upscales small inputs.
    pub working_resolution: u32,

    /// Resampling filter used to reach the working resolution.
    pub downsample_filter: DownsampleFilter,
}

impl AnalysisConfig {
    /// Default working resolution in pixels.
    pub const DEFAULT_WORKING_RESOLUTION: u32 = 200;

    /// Largest accepted working resolution. Bounds the sampled buffer
    /// to 4096x4096 pixels whatever the source size.
    pub const MAX_WORKING_RESOLUTION: u32 = 4096;

    /// Default resampling filter.
    pub const DEFAULT_DOWNSAMPLE_FILTER: DownsampleFilter = DownsampleFilter::Triangle;

    /// Check the configuration for values the pipeline cannot use.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::InvalidInput`] if `working_resolution`
    /// is zero or above [`Self::MAX_WORKING_RESOLUTION`].
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.working_resolution == 0 {
            return Err(InputDefect::InvalidConfig(
                "working_resolution must be at least 1".to_string(),
            )
            .into());
        }
        if self.working_resolution > Self::MAX_WORKING_RESOLUTION {
            return Err(InputDefect::InvalidConfig(format!(
                "working_resolution must be at most {}, got {}",
                Self::MAX_WORKING_RESOLUTION,
                self.working_resolution,
            ))
            .into());
        }
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            working_resolution: Self::DEFAULT_WORKING_RESOLUTION,
            downsample_filter: Self::DEFAULT_DOWNSAMPLE_FILTER,
        }
    }
}

/// Errors that can occur during analysis.
///
/// The heuristic stages cannot fail once they have statistics, so
/// every error is some flavor of unusable input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum AnalysisError {
    /// The supplied image, buffer, or configuration cannot be analyzed.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputDefect),
}

impl AnalysisError {
    /// The single message shown to end users for any failure.
    pub const USER_MESSAGE: &'static str =
        "Failed to analyze image. Please ensure the image is valid and try again.";

    /// The underlying defect.
    #[must_use]
    pub const fn defect(&self) -> &InputDefect {
        match self {
            Self::InvalidInput(defect) => defect,
        }
    }

    /// The user-facing message for this error.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        Self::USER_MESSAGE
    }
}

/// What exactly was wrong with the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum InputDefect {
    /// The buffer has zero width or height.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Scaling to the working resolution rounds an axis down to zero.
    #[error("image {width}x{height} is too narrow to sample")]
    DegenerateSample {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// The byte count does not match `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferLength {
        /// Required byte count.
        expected: usize,
        /// Supplied byte count.
        actual: usize,
    },

    /// The buffer is too large to address on this platform.
    #[error("image {width}x{height} is too large")]
    TooLarge {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// The encoded image bytes were empty.
    #[error("input image data is empty")]
    EmptyBytes,

    /// The encoded image exceeds the accepted file size.
    #[error("image file is {size} bytes, limit is {limit}")]
    FileTooLarge {
        /// Supplied size in bytes.
        size: usize,
        /// Maximum accepted size in bytes.
        limit: usize,
    },

    /// The encoded image is not a JPEG, PNG, or WebP file.
    #[error("unsupported image format")]
    UnsupportedFormat,

    /// The image bytes could not be decoded.
    ///
    /// Stores the decoder's message since `image::ImageError` is not
    /// serializable.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// The analysis configuration is unusable.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}
