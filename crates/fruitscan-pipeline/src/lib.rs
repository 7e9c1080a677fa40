//! fruitscan-pipeline: Pure fruit photo analysis pipeline (sans-IO).
//!
//! Turns a decoded RGBA buffer into a fruit verdict and a freshness
//! verdict through:
//! downsample -> color statistics -> fruit classification ->
//! freshness assessment.
//!
//! Every stage is a deterministic function of its input. Nothing is
//! cached between calls, so concurrent analyses of different buffers
//! need no coordination. This crate has **no I/O dependencies**; file
//! reading and history storage belong to the caller.

pub mod classify;
pub mod decode;
pub mod diagnostics;
pub mod downsample;
pub mod features;
pub mod freshness;
pub mod info;
pub mod record;
pub mod types;

pub use downsample::DownsampleFilter;
pub use info::{FruitInfo, fruit_info};
pub use record::AnalysisRecord;
pub use types::{
    AnalysisConfig, AnalysisError, AnalysisResult, ColorStatistics, Dimensions,
    FreshnessCategory, FreshnessVerdict, FruitKind, FruitVerdict, InputDefect, PixelBuffer,
};

/// Analyze `buffer` with the default configuration.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if the buffer has no pixels
/// or is too thin to sample at the working resolution.
pub fn analyze(buffer: &PixelBuffer) -> Result<AnalysisResult, AnalysisError> {
    analyze_with_config(buffer, &AnalysisConfig::default())
}

/// Run the full analysis pipeline.
///
/// # Pipeline steps
///
/// 1. Resample to the working resolution
/// 2. Extract color statistics
/// 3. Classify the fruit
/// 4. Assess freshness
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] if `config` is invalid (its
/// working resolution is zero or above
/// [`AnalysisConfig::MAX_WORKING_RESOLUTION`]), the buffer has no pixels,
/// or it is too thin to sample.
#[tracing::instrument(level = "debug", skip_all, fields(width = buffer.width(), height = buffer.height()))]
pub fn analyze_with_config(
    buffer: &PixelBuffer,
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let stats = sample_statistics(buffer, config)?;

    let fruit = classify::classify(&stats);
    tracing::debug!(fruit = %fruit.fruit, confidence = fruit.confidence, "classified fruit");

    let freshness = freshness::assess(&stats, fruit.fruit);
    tracing::debug!(
        category = %freshness.category,
        score = freshness.score,
        confidence = freshness.confidence,
        "assessed freshness",
    );

    Ok(AnalysisResult { fruit, freshness })
}

/// Resample `buffer` and compute its color statistics, without
/// producing verdicts.
///
/// # Errors
///
/// Same as [`analyze_with_config`].
pub fn sample_statistics(
    buffer: &PixelBuffer,
    config: &AnalysisConfig,
) -> Result<ColorStatistics, AnalysisError> {
    config.validate()?;

    let sampled =
        downsample::downsample(buffer, config.working_resolution, config.downsample_filter)?;
    tracing::debug!(sampled = %sampled.dimensions(), "sampled buffer");

    let stats = features::extract(&sampled)?;
    tracing::debug!(?stats, "extracted color statistics");
    Ok(stats)
}

/// Decode an encoded JPEG, PNG or WebP photo and analyze it.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidInput`] for anything
/// [`decode::decode_rgba`] or [`analyze_with_config`] rejects.
pub fn analyze_bytes(
    image_bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisResult, AnalysisError> {
    let buffer = decode::decode_rgba(image_bytes)?;
    analyze_with_config(&buffer, config)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn png_of(img: &image::RgbaImage) -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn analyze_empty_buffer() {
        let buffer = PixelBuffer::new(0, 0, Vec::new()).unwrap();
        let result = analyze(&buffer);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn analyze_pure_red() {
        let result = analyze(&PixelBuffer::filled(640, 480, [255, 0, 0, 255])).unwrap();
        assert_eq!(
            result.fruit,
            FruitVerdict {
                fruit: FruitKind::Apple,
                confidence: 95
            },
        );
        // Brightness 85 fires nothing; the other three indicators are good.
        assert_eq!(result.freshness.score, 90);
        assert_eq!(result.freshness.category, FreshnessCategory::Fresh);
        assert_eq!(
            result.freshness.explanation,
            "Based on uniform color distribution, minimal dark spots, vibrant color.",
        );
    }

    #[test]
    fn analyze_dark_gray() {
        let result = analyze(&PixelBuffer::filled(300, 300, [30, 30, 30, 255])).unwrap();
        assert_eq!(result.freshness.score, 10);
        assert_eq!(result.freshness.category, FreshnessCategory::Unknown);
        assert_eq!(result.freshness.confidence, 90);
    }

    #[test]
    fn analyze_black() {
        let black = PixelBuffer::filled(8, 8, [0, 0, 0, 255]);
        let stats = sample_statistics(&black, &AnalysisConfig::default()).unwrap();
        assert!(stats.saturation.abs() < f64::EPSILON);
        let result = analyze(&black).unwrap();
        assert_eq!(result.fruit.fruit, FruitKind::Apple);
        assert_eq!(result.fruit.confidence, 60);
    }

    #[test]
    fn analyze_rejects_invalid_config() {
        let config = AnalysisConfig {
            working_resolution: 0,
            ..AnalysisConfig::default()
        };
        let result = analyze_with_config(&PixelBuffer::filled(4, 4, [1, 2, 3, 255]), &config);
        assert!(matches!(
            result,
            Err(AnalysisError::InvalidInput(InputDefect::InvalidConfig(_)))
        ));
    }

    #[test]
    fn analyze_rejects_unbounded_upscale() {
        let pixel = PixelBuffer::filled(1, 1, [200, 40, 40, 255]);
        for working_resolution in [100_000, u32::MAX] {
            let config = AnalysisConfig {
                working_resolution,
                ..AnalysisConfig::default()
            };
            assert!(matches!(
                analyze_with_config(&pixel, &config),
                Err(AnalysisError::InvalidInput(InputDefect::InvalidConfig(_)))
            ));
        }
    }

    #[test]
    fn sample_statistics_upscales_small_input() {
        // A 2x1 black/white image becomes 200x100. Nearest-neighbor
        // never blends, so every sampled pixel is still pure black or
        // pure white and brightness tracks the dark ratio exactly.
        let buffer = PixelBuffer::new(2, 1, vec![0, 0, 0, 255, 255, 255, 255, 255]).unwrap();
        let config = AnalysisConfig {
            downsample_filter: DownsampleFilter::Nearest,
            ..AnalysisConfig::default()
        };
        let stats = sample_statistics(&buffer, &config).unwrap();
        assert!(stats.dark_spot_ratio > 40.0 && stats.dark_spot_ratio < 60.0);
        let expected_brightness = 255.0 * (100.0 - stats.dark_spot_ratio) / 100.0;
        assert!((stats.brightness - expected_brightness).abs() < 1e-9);
    }

    #[test]
    fn analyze_bytes_decodes_png() {
        let img = image::RgbaImage::from_pixel(64, 48, image::Rgba([100, 180, 80, 255]));
        let result = analyze_bytes(&png_of(&img), &AnalysisConfig::default()).unwrap();
        assert_eq!(result.fruit.fruit, FruitKind::Pear);
        assert_eq!(result, analyze(&PixelBuffer::from(img)).unwrap());
    }

    #[test]
    fn analyze_bytes_rejects_corrupt_input() {
        let result = analyze_bytes(&[0xFF, 0x00], &AnalysisConfig::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }
}
