//! Metric catalog and scaling transforms.
//!
//! The catalog is the immutable registry of every raw metric the scoring
//! engine understands. Role configurations may only reference keys that
//! exist here; scaling and inversion defaults come from the catalog entry
//! unless a role overrides them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metric key used for the year-remaining decay multiplier.
pub const YEARS_REMAINING: &str = "years_remaining";

/// How a raw metric value is compressed into [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScalingMode {
    /// value / max, clamped.
    Linear { max: f64 },
    /// ln(value + 1) / ln(max + 1). Compresses heavy-tailed counts
    /// (forward citations span 0..several hundred).
    Log { max: f64 },
    /// sqrt(value) / sqrt(max). Intermediate compression.
    Sqrt { max: f64 },
    /// Five-point analyst rating: (value - 1) / 4.
    Score5,
    /// Threshold table; the value of the highest step at or below the raw
    /// value wins. Used for remaining-term curves.
    Stepped { steps: Vec<Step> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub threshold: f64,
    pub value: f64,
}

/// Where a metric's raw values come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricCategory {
    /// Counted directly from patent/citation records. Always present.
    Quantitative,
    /// Produced by the LLM claim-analysis pipeline. Sparse.
    DerivedText,
    /// Fetched from external services (PTAB, prosecution history). Sparse.
    ExternalApi,
}

/// Immutable catalog entry for one metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub key: String,
    pub category: MetricCategory,
    pub default_weight: f64,
    pub default_scaling: ScalingMode,
    /// Smaller raw value is better (e.g. risk scores) when true.
    pub invert_by_default: bool,
}

impl MetricDefinition {
    fn new(
        key: &str,
        category: MetricCategory,
        default_weight: f64,
        default_scaling: ScalingMode,
    ) -> Self {
        Self {
            key: key.to_string(),
            category,
            default_weight,
            default_scaling,
            invert_by_default: false,
        }
    }
}

/// Registry of every known metric, keyed by metric key.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    defs: BTreeMap<String, MetricDefinition>,
}

impl Default for MetricCatalog {
    /// The 12 metrics scored by the portfolio pipeline:
    /// 4 quantitative + 6 LLM-derived + 2 API-derived.
    fn default() -> Self {
        use MetricCategory::*;
        let defs = [
            MetricDefinition::new(
                "forward_citations",
                Quantitative,
                0.13,
                ScalingMode::Sqrt { max: 500.0 },
            ),
            MetricDefinition::new(
                "competitor_citations",
                Quantitative,
                0.25,
                ScalingMode::Sqrt { max: 50.0 },
            ),
            MetricDefinition::new(
                "competitor_count",
                Quantitative,
                0.08,
                ScalingMode::Linear { max: 10.0 },
            ),
            MetricDefinition::new(
                YEARS_REMAINING,
                Quantitative,
                0.17,
                ScalingMode::Linear { max: 15.0 },
            ),
            MetricDefinition::new("eligibility_score", DerivedText, 0.05, ScalingMode::Score5),
            MetricDefinition::new("validity_score", DerivedText, 0.05, ScalingMode::Score5),
            MetricDefinition::new("claim_breadth", DerivedText, 0.04, ScalingMode::Score5),
            MetricDefinition::new("enforcement_clarity", DerivedText, 0.04, ScalingMode::Score5),
            MetricDefinition::new(
                "design_around_difficulty",
                DerivedText,
                0.04,
                ScalingMode::Score5,
            ),
            MetricDefinition::new(
                "market_relevance_score",
                DerivedText,
                0.05,
                ScalingMode::Score5,
            ),
            MetricDefinition::new("ipr_risk_score", ExternalApi, 0.05, ScalingMode::Score5),
            MetricDefinition::new(
                "prosecution_quality_score",
                ExternalApi,
                0.05,
                ScalingMode::Score5,
            ),
        ];
        Self {
            defs: defs.into_iter().map(|d| (d.key.clone(), d)).collect(),
        }
    }
}

impl MetricCatalog {
    pub fn get(&self, key: &str) -> Option<&MetricDefinition> {
        self.defs.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.defs.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
