//! Integration test: properties that must hold for every buffer the
//! pipeline accepts.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use fruitscan_pipeline::{
    AnalysisConfig, AnalysisError, AnalysisRecord, DownsampleFilter, FreshnessCategory, FruitKind,
    PixelBuffer, analyze, analyze_with_config, sample_statistics,
};

/// Deterministic pseudo-random buffer (64-bit LCG, upper bits).
fn noise_buffer(width: u32, height: u32, seed: u64) -> PixelBuffer {
    let mut state = seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        for _ in 0..4 {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            pixels.push((state >> 56) as u8);
        }
    }
    PixelBuffer::new(width, height, pixels).unwrap()
}

/// A spread of shapes and contents: noise, solids, gradients.
fn corpus() -> Vec<PixelBuffer> {
    let mut buffers: Vec<PixelBuffer> = (0..12)
        .map(|seed| noise_buffer(17 + seed as u32 * 31, 9 + seed as u32 * 23, seed))
        .collect();
    for rgba in [
        [255, 0, 0, 255],
        [0, 0, 0, 255],
        [255, 255, 255, 255],
        [30, 30, 30, 255],
        [230, 200, 40, 255],
        [110, 40, 150, 255],
        [240, 140, 30, 255],
        [120, 190, 70, 255],
    ] {
        buffers.push(PixelBuffer::filled(320, 240, rgba));
    }
    buffers.push(PixelBuffer::from(image::RgbaImage::from_fn(
        500,
        260,
        |x, y| {
            image::Rgba([
                (x % 256) as u8,
                (y % 256) as u8,
                ((x + y) % 256) as u8,
                255,
            ])
        },
    )));
    buffers
}

#[test]
fn analysis_is_deterministic() {
    for buffer in corpus() {
        let first = analyze(&buffer).unwrap();
        let second = analyze(&buffer.clone()).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn verdicts_stay_in_range() {
    for filter in [
        DownsampleFilter::Nearest,
        DownsampleFilter::Triangle,
        DownsampleFilter::Lanczos3,
    ] {
        let config = AnalysisConfig {
            downsample_filter: filter,
            ..AnalysisConfig::default()
        };
        for buffer in corpus() {
            let stats = sample_statistics(&buffer, &config).unwrap();
            for pct in [stats.saturation, stats.uniformity, stats.dark_spot_ratio] {
                assert!((0.0..=100.0).contains(&pct), "{stats:?}");
            }
            for level in [
                stats.avg_red,
                stats.avg_green,
                stats.avg_blue,
                stats.brightness,
            ] {
                assert!((0.0..=255.0).contains(&level), "{stats:?}");
            }

            let result = analyze_with_config(&buffer, &config).unwrap();
            assert!((60..=95).contains(&result.fruit.confidence));
            assert!(result.freshness.score <= 100);
            assert!((65..=90).contains(&result.freshness.confidence));
            assert_eq!(
                result.freshness.category,
                FreshnessCategory::from_score(result.freshness.score),
            );
            assert!(result.freshness.explanation.ends_with('.'));
        }
    }
}

#[test]
fn uniform_gray_boundary() {
    for level in [0_u8, 1, 59, 60, 61, 200, 255] {
        let buffer = PixelBuffer::filled(250, 180, [level, level, level, 255]);
        let stats = sample_statistics(&buffer, &AnalysisConfig::default()).unwrap();
        assert!((stats.uniformity - 100.0).abs() < 1e-9, "level {level}");
        assert!(stats.saturation.abs() < 1e-9, "level {level}");
        let expected_dark = if level < 60 { 100.0 } else { 0.0 };
        assert!(
            (stats.dark_spot_ratio - expected_dark).abs() < 1e-9,
            "level {level}",
        );
    }
}

#[test]
fn empty_buffers_are_invalid_input() {
    for (w, h) in [(0, 0), (0, 10), (10, 0)] {
        let buffer = PixelBuffer::new(w, h, Vec::new()).unwrap();
        assert!(matches!(
            analyze(&buffer),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}

#[test]
fn pure_red_is_confident_apple() {
    let result = analyze(&PixelBuffer::filled(800, 600, [255, 0, 0, 255])).unwrap();
    assert_eq!(result.fruit.fruit, FruitKind::Apple);
    assert_eq!(result.fruit.confidence, 95);
}

#[test]
fn dark_gray_is_unknown_freshness() {
    let result = analyze(&PixelBuffer::filled(800, 600, [30, 30, 30, 255])).unwrap();
    assert_eq!(result.freshness.score, 10);
    assert_eq!(result.freshness.category, FreshnessCategory::Unknown);
    assert_eq!(result.freshness.confidence, 90);
    assert_eq!(
        result.freshness.explanation,
        "Based on uniform color distribution, significant browning or dark spots, \
         dull appearance, faded color.",
    );
}

#[test]
fn black_does_not_produce_nan() {
    let stats = sample_statistics(
        &PixelBuffer::filled(200, 200, [0, 0, 0, 255]),
        &AnalysisConfig::default(),
    )
    .unwrap();
    assert!(stats.saturation.abs() < f64::EPSILON && !stats.saturation.is_nan());
    let result = analyze(&PixelBuffer::filled(200, 200, [0, 0, 0, 255])).unwrap();
    assert_eq!(result.fruit.fruit, FruitKind::Apple);
    assert_eq!(result.fruit.confidence, 60);
}

#[test]
fn record_reconstructs_category() {
    for buffer in corpus() {
        let result = analyze(&buffer).unwrap();
        let record = AnalysisRecord::from(&result);
        assert_eq!(record.freshness_category(), result.freshness.category);
        assert_eq!(record.fruit, result.fruit.fruit);
    }
}

#[test]
fn concurrent_analyses_are_independent() {
    let buffers = corpus();
    let sequential: Vec<_> = buffers.iter().map(|b| analyze(b).unwrap()).collect();

    let concurrent: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = buffers
            .iter()
            .map(|b| scope.spawn(move || analyze(b).unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("analysis thread panicked"))
            .collect()
    });

    assert_eq!(sequential, concurrent);
}
