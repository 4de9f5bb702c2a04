//! Per-role patent scoring.
//!
//! Weighted sum over normalized metrics with per-patent weight
//! redistribution for missing data, followed by the remaining-term decay
//! multiplier. Scores are 0–100.

use std::collections::BTreeMap;

use ipfolio_common::config::RoleConfig;
use ipfolio_common::metrics::{MetricCatalog, YEARS_REMAINING};

use crate::source::PatentMetrics;
use crate::transform::normalize;

/// Full patent term used by the decay curve.
const FULL_TERM_YEARS: f64 = 15.0;

/// Multiplier floor for expired patents. An expired patent can still carry
/// litigation value for past infringement, so it keeps a penalized score
/// instead of dropping to zero.
const EXPIRED_FLOOR: f64 = 0.3;

/// Result of scoring one patent under one role.
#[derive(Debug, Clone)]
pub struct RoleScore {
    /// base * year multiplier * 100, in [0, 100].
    pub final_score: f64,
    /// Weighted sum over available metrics, in [0, 1].
    pub base_score: f64,
    /// Normalized value per metric that was actually available.
    pub normalized: BTreeMap<String, f64>,
    pub year_multiplier: f64,
}

/// Remaining-term decay multiplier: 0.3 + 0.7 * (years/15)^0.8, capped at
/// 1.0. Zero, negative, or unknown remaining years floor at 0.3.
pub fn year_multiplier(years_remaining: Option<f64>) -> f64 {
    match years_remaining {
        Some(years) if years > 0.0 => {
            let fraction = (years / FULL_TERM_YEARS).min(1.0);
            EXPIRED_FLOOR + (1.0 - EXPIRED_FLOOR) * fraction.powf(0.8)
        }
        _ => EXPIRED_FLOOR,
    }
}

/// Score one patent under one role configuration.
///
/// Returns `None` when the patent produces no score for this role:
/// - no weighted metric has an available value, or
/// - `require_complete_data` is set and any weighted metric is missing.
///
/// Absence is distinct from a zero score; patents without a score for a
/// role simply do not appear in that role's output.
pub fn score_patent(
    patent: &PatentMetrics,
    config: &RoleConfig,
    catalog: &MetricCatalog,
) -> Option<RoleScore> {
    let mut weighted_sum = 0.0;
    let mut available_weight = 0.0;
    let mut normalized = BTreeMap::new();

    for (key, &weight) in &config.weights {
        if weight <= 0.0 {
            continue;
        }
        // Unknown keys are rejected by RoleConfig::validate before scoring.
        let Some(mode) = config.scaling_for(key, catalog) else {
            continue;
        };
        let invert = config.invert_for(key, catalog);

        match normalize(patent.get(key), mode, invert) {
            Some(norm) => {
                weighted_sum += weight * norm;
                available_weight += weight;
                normalized.insert(key.clone(), norm);
            }
            None if config.require_complete_data => {
                // Incomplete patents are excluded outright in this mode.
                return None;
            }
            None => {
                // Redistribute: the metric drops out of numerator and
                // denominator for this patent only.
            }
        }
    }

    if available_weight <= 0.0 {
        return None;
    }

    let base_score = (weighted_sum / available_weight).clamp(0.0, 1.0);
    let ym = year_multiplier(patent.get(YEARS_REMAINING));
    let final_score = (base_score * ym * 100.0).clamp(0.0, 100.0);
    debug_assert!(final_score.is_finite());

    Some(RoleScore {
        final_score,
        base_score,
        normalized,
        year_multiplier: ym,
    })
}
