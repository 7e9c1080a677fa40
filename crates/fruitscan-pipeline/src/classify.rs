//! Fruit classification from averaged channel ratios.
//!
//! Each category starts at a score of zero. A fixed set of color rules
//! then assigns scores; several rules may fire for the same image. The
//! category with the strictly greatest score wins, scanning in
//! [`FruitKind::ALL`] order, so an exact tie goes to the category that
//! comes first.

use std::ops::{Index, IndexMut};

use crate::types::{ColorStatistics, FruitKind, FruitVerdict};

/// Lowest confidence ever reported for a fruit verdict.
pub const MIN_CONFIDENCE: f64 = 60.0;

/// Highest confidence ever reported for a fruit verdict.
pub const MAX_CONFIDENCE: f64 = 95.0;

/// Channel averages expressed as fractions of their sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelRatios {
    /// Red share of the channel sum.
    pub red: f64,
    /// Green share of the channel sum.
    pub green: f64,
    /// Blue share of the channel sum.
    pub blue: f64,
}

impl ChannelRatios {
    /// Normalize the channel averages of `stats`.
    ///
    /// Returns `None` for an all-black image, where the ratios are
    /// undefined.
    #[must_use]
    pub fn from_stats(stats: &ColorStatistics) -> Option<Self> {
        let total = stats.avg_red + stats.avg_green + stats.avg_blue;
        (total > 0.0).then(|| Self {
            red: stats.avg_red / total,
            green: stats.avg_green / total,
            blue: stats.avg_blue / total,
        })
    }
}

/// Per-category scores, indexed by [`FruitKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Scores([f64; FruitKind::ALL.len()]);

impl Scores {
    /// Iterate `(kind, score)` pairs in tie-break order.
    pub fn iter(&self) -> impl Iterator<Item = (FruitKind, f64)> + '_ {
        FruitKind::ALL.into_iter().map(|kind| (kind, self[kind]))
    }

    /// Raise `kind` to `score` if that is higher than its current score.
    fn raise(&mut self, kind: FruitKind, score: f64) {
        self[kind] = self[kind].max(score);
    }

    /// The winning category and its raw score.
    ///
    /// Starts from `(apple, 0.0)` and only replaces the leader on a
    /// strictly greater score.
    #[must_use]
    pub fn best(&self) -> (FruitKind, f64) {
        self.iter()
            .fold((FruitKind::DEFAULT, 0.0), |(best, best_score), (kind, score)| {
                if score > best_score {
                    (kind, score)
                } else {
                    (best, best_score)
                }
            })
    }
}

impl Index<FruitKind> for Scores {
    type Output = f64;

    fn index(&self, kind: FruitKind) -> &f64 {
        &self.0[kind.index()]
    }
}

impl IndexMut<FruitKind> for Scores {
    fn index_mut(&mut self, kind: FruitKind) -> &mut f64 {
        &mut self.0[kind.index()]
    }
}

/// Apply the color rules to `stats` and return every category's score.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn score(stats: &ColorStatistics) -> Scores {
    let mut scores = Scores::default();
    let Some(ChannelRatios { red, green, blue }) = ChannelRatios::from_stats(stats) else {
        return scores;
    };
    let saturation = stats.saturation;

    // Red.
    if red > 0.38 && saturation > 30.0 {
        scores[FruitKind::Apple] = 70.0 + (red - 0.38) * 100.0;
        scores[FruitKind::Strawberry] = 65.0 + (red - 0.38) * 80.0;
    }

    // Yellow.
    if red > 0.36 && green > 0.36 && blue < 0.30 && saturation > 25.0 {
        scores[FruitKind::Banana] = 75.0 + (green - 0.36) * 100.0;
        scores[FruitKind::Pear] = 60.0 + (green - 0.36) * 80.0;
    }

    // Orange.
    if red > 0.37 && green > 0.34 && saturation > 35.0 {
        scores[FruitKind::Orange] = 80.0 + (red - 0.37) * 120.0;
        scores[FruitKind::Peach] = 65.0 + (red - 0.37) * 90.0;
    }

    // Purple / blue.
    if blue > 0.32 || (red > 0.35 && blue > 0.30) {
        scores[FruitKind::Grapes] = 70.0 + (blue - 0.30) * 100.0;
        scores[FruitKind::Plum] = 65.0 + (blue - 0.30) * 90.0;
    }

    // Green. Only ever raises.
    if green > 0.37 && saturation > 20.0 {
        scores.raise(FruitKind::Pear, 70.0 + (green - 0.37) * 100.0);
        scores.raise(FruitKind::Grapes, 60.0 + (green - 0.37) * 80.0);
    }

    scores
}

/// Classify the fruit shown by `stats`.
///
/// Falls back to [`FruitKind::DEFAULT`] at minimum confidence when no
/// rule fires.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn classify(stats: &ColorStatistics) -> FruitVerdict {
    let (fruit, best_score) = score(stats).best();
    // Clamped to [60, 95] before the cast.
    let confidence = best_score.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE).round() as u8;
    FruitVerdict { fruit, confidence }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn stats(avg: [f64; 3], saturation: f64) -> ColorStatistics {
        ColorStatistics {
            avg_red: avg[0],
            avg_green: avg[1],
            avg_blue: avg[2],
            brightness: (avg[0] + avg[1] + avg[2]) / 3.0,
            saturation,
            uniformity: 100.0,
            dark_spot_ratio: 0.0,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}",
        );
    }

    #[test]
    fn pure_red_is_apple() {
        let s = stats([255.0, 0.0, 0.0], 100.0);
        let scores = score(&s);
        assert_close(scores[FruitKind::Apple], 132.0);
        assert_close(scores[FruitKind::Strawberry], 114.6);
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Apple,
                confidence: 95
            },
        );
    }

    #[test]
    fn black_falls_back_to_default() {
        let s = stats([0.0, 0.0, 0.0], 0.0);
        assert_eq!(score(&s), Scores::default());
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Apple,
                confidence: 60
            },
        );
    }

    #[test]
    fn neutral_gray_reads_as_grapes() {
        // Equal thirds: a blue ratio of 1/3 clears the 0.32 purple
        // threshold, and no saturation-gated rule fires.
        let s = stats([128.0, 128.0, 128.0], 0.0);
        let scores = score(&s);
        assert_close(scores[FruitKind::Grapes], 70.0 + (1.0 / 3.0 - 0.30) * 100.0);
        assert_eq!(scores[FruitKind::Apple], 0.0);
        assert_eq!(scores[FruitKind::Pear], 0.0);
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Grapes,
                confidence: 73
            },
        );
    }

    #[test]
    fn purple_is_grapes() {
        // ratios (0.4, 0.133, 0.467)
        let s = stats([120.0, 40.0, 140.0], 100.0 / 140.0 * 100.0);
        let scores = score(&s);
        assert_close(scores[FruitKind::Apple], 72.0);
        assert_close(scores[FruitKind::Grapes], 70.0 + (140.0 / 300.0 - 0.30) * 100.0);
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Grapes,
                confidence: 87
            },
        );
    }

    #[test]
    fn green_is_pear() {
        // ratios (0.278, 0.5, 0.222)
        let s = stats([100.0, 180.0, 80.0], 100.0 / 180.0 * 100.0);
        let scores = score(&s);
        assert_close(scores[FruitKind::Pear], 83.0);
        assert_close(scores[FruitKind::Grapes], 70.4);
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Pear,
                confidence: 83
            },
        );
    }

    #[test]
    fn warm_yellow_scores_orange_highest() {
        // ratios (0.458, 0.417, 0.125): red, yellow, orange and green
        // rules all fire.
        let s = stats([220.0, 200.0, 60.0], 160.0 / 220.0 * 100.0);
        let scores = score(&s);
        assert!(scores[FruitKind::Apple] > 0.0);
        assert!(scores[FruitKind::Banana] > 0.0);
        assert!(scores[FruitKind::Peach] > 0.0);
        assert_eq!(scores[FruitKind::Plum], 0.0);
        assert_eq!(
            classify(&s),
            FruitVerdict {
                fruit: FruitKind::Orange,
                confidence: 91
            },
        );
    }

    #[test]
    fn green_rule_never_lowers_pear() {
        // Yellow rule gives pear 60 + (g - 0.36) * 80; green rule gives
        // 70 + (g - 0.37) * 100, which is higher here.
        let s = stats([150.0, 160.0, 50.0], 70.0);
        let scores = score(&s);
        let green = 160.0 / 360.0;
        assert_close(scores[FruitKind::Pear], 70.0 + (green - 0.37) * 100.0);
    }

    #[test]
    fn low_saturation_suppresses_color_rules() {
        let s = stats([255.0, 0.0, 0.0], 10.0);
        assert_eq!(score(&s)[FruitKind::Apple], 0.0);
    }

    #[test]
    fn tie_goes_to_earlier_category() {
        let mut scores = Scores::default();
        scores[FruitKind::Orange] = 80.0;
        scores[FruitKind::Banana] = 80.0;
        scores[FruitKind::Plum] = 80.0;
        assert_eq!(scores.best(), (FruitKind::Banana, 80.0));
    }

    #[test]
    fn strictly_higher_later_score_wins() {
        let mut scores = Scores::default();
        scores[FruitKind::Apple] = 80.0;
        scores[FruitKind::Plum] = 80.5;
        assert_eq!(scores.best(), (FruitKind::Plum, 80.5));
    }

    #[test]
    fn all_zero_scores_pick_default() {
        assert_eq!(Scores::default().best(), (FruitKind::Apple, 0.0));
    }
}
