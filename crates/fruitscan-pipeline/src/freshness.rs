//! Freshness scoring from brightness, uniformity, dark spots and
//! saturation.
//!
//! The score starts at a neutral 50 and each indicator independently
//! nudges it up or down. Every indicator is judged against the
//! statistics alone, never against the running total.

use crate::types::{ColorStatistics, FreshnessCategory, FreshnessVerdict, FruitKind};

/// Score before any indicator is applied.
pub const BASE_SCORE: i32 = 50;

/// Lowest confidence ever reported for a freshness verdict.
pub const MIN_CONFIDENCE: f64 = 65.0;

/// Highest confidence ever reported for a freshness verdict.
pub const MAX_CONFIDENCE: f64 = 90.0;

/// Explanation used when no indicator fired.
pub const NEUTRAL_EXPLANATION: &str = "Analysis based on overall visual characteristics.";

/// One visual indicator and the two thresholds at which it fires.
struct Indicator {
    /// Reads the statistic this indicator judges.
    value: fn(&ColorStatistics) -> f64,
    /// Fires above this value.
    good_above: f64,
    /// Fires below this value.
    bad_below: f64,
    /// Score change when the good side fires.
    good_delta: i32,
    /// Score change when the bad side fires.
    bad_delta: i32,
    /// Phrase for the good side.
    good_phrase: &'static str,
    /// Phrase for the bad side.
    bad_phrase: &'static str,
}

impl Indicator {
    /// Score delta and phrase for `stats`, or `None` if neither side
    /// fires.
    fn evaluate(&self, stats: &ColorStatistics) -> Option<(i32, &'static str)> {
        let value = (self.value)(stats);
        if value > self.good_above {
            Some((self.good_delta, self.good_phrase))
        } else if value < self.bad_below {
            Some((self.bad_delta, self.bad_phrase))
        } else {
            None
        }
    }
}

const BRIGHTNESS: Indicator = Indicator {
    value: |s| s.brightness,
    good_above: 120.0,
    bad_below: 80.0,
    good_delta: 20,
    bad_delta: -20,
    good_phrase: "bright appearance",
    bad_phrase: "dull appearance",
};

const UNIFORMITY: Indicator = Indicator {
    value: |s| s.uniformity,
    good_above: 70.0,
    bad_below: 50.0,
    good_delta: 15,
    bad_delta: -15,
    good_phrase: "uniform color distribution",
    bad_phrase: "uneven coloring",
};

/// Inverted: a low ratio is the good side.
const DARK_SPOTS: Indicator = Indicator {
    value: |s| -s.dark_spot_ratio,
    good_above: -5.0,
    bad_below: -15.0,
    good_delta: 15,
    bad_delta: -25,
    good_phrase: "minimal dark spots",
    bad_phrase: "significant browning or dark spots",
};

const SATURATION: Indicator = Indicator {
    value: |s| s.saturation,
    good_above: 40.0,
    bad_below: 20.0,
    good_delta: 10,
    bad_delta: -10,
    good_phrase: "vibrant color",
    bad_phrase: "faded color",
};

/// Order in which indicators are listed in the explanation. Scoring is
/// additive, so its order does not matter.
const EXPLANATION_ORDER: [&Indicator; 4] = [&UNIFORMITY, &DARK_SPOTS, &BRIGHTNESS, &SATURATION];

/// Freshness score in `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn score(stats: &ColorStatistics) -> u8 {
    let total: i32 = [&BRIGHTNESS, &UNIFORMITY, &DARK_SPOTS, &SATURATION]
        .into_iter()
        .filter_map(|indicator| indicator.evaluate(stats))
        .map(|(delta, _)| delta)
        .sum();
    // Clamped to [0, 100] before the cast.
    (BASE_SCORE + total).clamp(0, 100) as u8
}

/// Human-readable summary of which indicators fired.
#[must_use]
pub fn explain(stats: &ColorStatistics) -> String {
    let phrases: Vec<&str> = EXPLANATION_ORDER
        .into_iter()
        .filter_map(|indicator| indicator.evaluate(stats))
        .map(|(_, phrase)| phrase)
        .collect();

    if phrases.is_empty() {
        NEUTRAL_EXPLANATION.to_string()
    } else {
        format!("Based on {}.", phrases.join(", "))
    }
}

/// Confidence in a freshness score: grows with distance from neutral.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn confidence(score: u8) -> u8 {
    let distance = (f64::from(score) - f64::from(BASE_SCORE)).abs();
    // Clamped to [65, 90] before the cast.
    (70.0 + distance / 2.0)
        .clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
        .round() as u8
}

/// Assess how fresh the fruit in `stats` looks.
///
/// The fruit is accepted so per-species calibration can be added
/// without changing callers; it does not affect the result today.
#[must_use]
pub fn assess(stats: &ColorStatistics, _fruit: FruitKind) -> FreshnessVerdict {
    let score = score(stats);
    FreshnessVerdict {
        category: FreshnessCategory::from_score(score),
        score,
        confidence: confidence(score),
        explanation: explain(stats),
    }
}
