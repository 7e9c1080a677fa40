//! Analysis diagnostics: timing and intermediate values for each stage.
//!
//! [`analyze_with_diagnostics`] runs the same stages as
//! [`crate::analyze_with_config`] and records how long each took along
//! with the values it produced. Timestamps come from a caller-supplied
//! [`Clock`] so this crate stays free of platform time APIs.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::downsample::DownsampleFilter;
use crate::types::{
    AnalysisConfig, AnalysisError, AnalysisResult, Dimensions, FreshnessCategory, FruitKind,
    PixelBuffer,
};

/// Source of timestamps for stage timing.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisDiagnostics {
    /// Stage 1: resampling to the working resolution.
    pub downsample: StageDiagnostics,
    /// Stage 2: color statistics.
    pub feature_extraction: StageDiagnostics,
    /// Stage 3: fruit classification.
    pub classification: StageDiagnostics,
    /// Stage 4: freshness assessment.
    pub freshness: StageDiagnostics,
    /// Total wall-clock duration of the analysis (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Input and sample sizes.
    pub summary: AnalysisSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific values.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Resampling metrics.
    Downsample {
        /// Source size.
        source: Dimensions,
        /// Sampled size.
        sampled: Dimensions,
        /// Filter used.
        filter: DownsampleFilter,
        /// Whether the buffer was actually resampled.
        resampled: bool,
    },
    /// Feature extraction metrics.
    FeatureExtraction {
        /// Pixels visited (per pass).
        pixel_count: u64,
        /// Mean brightness.
        brightness: f64,
        /// Saturation percentage.
        saturation: f64,
        /// Uniformity percentage.
        uniformity: f64,
        /// Dark-pixel percentage.
        dark_spot_ratio: f64,
    },
    /// Fruit classification metrics.
    Classification {
        /// Winning category.
        fruit: FruitKind,
        /// Reported confidence.
        confidence: u8,
    },
    /// Freshness assessment metrics.
    Freshness {
        /// Derived category.
        category: FreshnessCategory,
        /// Freshness score.
        score: u8,
        /// Reported confidence.
        confidence: u8,
    },
}

/// Input and sample sizes for one run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Size of the caller's buffer.
    pub source: Dimensions,
    /// Size after resampling.
    pub sampled: Dimensions,
}

/// Run the analysis pipeline, timing each stage with `clock`.
///
/// # Errors
///
/// Same as [`crate::analyze_with_config`].
pub fn analyze_with_diagnostics<C: Clock>(
    buffer: &PixelBuffer,
    config: &AnalysisConfig,
    clock: &C,
) -> Result<(AnalysisResult, AnalysisDiagnostics), AnalysisError> {
    config.validate()?;
    let start = clock.now();

    let t = clock.now();
    let sampled = crate::downsample::downsample(
        buffer,
        config.working_resolution,
        config.downsample_filter,
    )?;
    let summary = AnalysisSummary {
        source: buffer.dimensions(),
        sampled: sampled.dimensions(),
    };
    let downsample = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Downsample {
            source: summary.source,
            sampled: summary.sampled,
            filter: config.downsample_filter,
            resampled: summary.source != summary.sampled,
        },
    };

    let t = clock.now();
    let stats = crate::features::extract(&sampled)?;
    let feature_extraction = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::FeatureExtraction {
            pixel_count: sampled.pixel_count(),
            brightness: stats.brightness,
            saturation: stats.saturation,
            uniformity: stats.uniformity,
            dark_spot_ratio: stats.dark_spot_ratio,
        },
    };

    let t = clock.now();
    let fruit = crate::classify::classify(&stats);
    let classification = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Classification {
            fruit: fruit.fruit,
            confidence: fruit.confidence,
        },
    };

    let t = clock.now();
    let freshness_verdict = crate::freshness::assess(&stats, fruit.fruit);
    let freshness = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Freshness {
            category: freshness_verdict.category,
            score: freshness_verdict.score,
            confidence: freshness_verdict.confidence,
        },
    };

    let diagnostics = AnalysisDiagnostics {
        downsample,
        feature_extraction,
        classification,
        freshness,
        total_duration: clock.elapsed(&start),
        summary,
    };
    let result = AnalysisResult {
        fruit,
        freshness: freshness_verdict,
    };
    Ok((result, diagnostics))
}

impl AnalysisDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Analysis Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Image: {} -> sampled {} ({} pixels)",
            self.summary.source,
            self.summary.sampled,
            self.summary.sampled.pixel_count(),
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Downsample", &self.downsample),
            ("Feature Extraction", &self.feature_extraction),
            ("Classification", &self.classification),
            ("Freshness", &self.freshness),
        ];

        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
pub fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Downsample {
            source,
            sampled,
            filter,
            resampled,
        } => {
            if *resampled {
                format!("{source} -> {sampled} ({filter})")
            } else {
                format!("{source} (unchanged)")
            }
        }
        StageMetrics::FeatureExtraction {
            pixel_count,
            brightness,
            saturation,
            uniformity,
            dark_spot_ratio,
        } => format!(
            "{pixel_count} px, brightness={brightness:.1} sat={saturation:.1}% \
             uniform={uniformity:.1}% dark={dark_spot_ratio:.1}%",
        ),
        StageMetrics::Classification { fruit, confidence } => {
            format!("{fruit} ({confidence}%)")
        }
        StageMetrics::Freshness {
            category,
            score,
            confidence,
        } => format!("{category} score={score} ({confidence}%)"),
    }
}
