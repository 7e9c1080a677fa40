//! Flat record handed to whatever stores analysis history.
//!
//! Only the numeric parts of a result are kept. The freshness category
//! and explanation are not stored; the category is recomputed from the
//! score with [`FreshnessCategory::from_score`].

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisResult, FreshnessCategory, FruitKind};

/// One persisted analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Predicted fruit.
    pub fruit: FruitKind,
    /// Fruit confidence percentage.
    pub confidence: u8,
    /// Freshness score in `[0, 100]`.
    pub freshness_score: u8,
    /// Freshness confidence percentage.
    pub freshness_confidence: u8,
}

impl AnalysisRecord {
    /// Freshness category implied by the stored score.
    #[must_use]
    pub const fn freshness_category(&self) -> FreshnessCategory {
        FreshnessCategory::from_score(self.freshness_score)
    }
}

impl From<&AnalysisResult> for AnalysisRecord {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            fruit: result.fruit.fruit,
            confidence: result.fruit.confidence,
            freshness_score: result.freshness.score,
            freshness_confidence: result.freshness.confidence,
        }
    }
}
