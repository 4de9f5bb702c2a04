//! Built-in scoring profiles.
//!
//! Read-only presets covering the stakeholder perspectives the portfolio
//! team scores from. User-defined presets live in the config store; these
//! ship with the engine and cannot be deleted.

use ipfolio_common::config::{ConsensusRole, RoleConfig};

/// Identifiers of the built-in profiles, in presentation order.
pub const BUILTIN_PROFILE_IDS: [&str; 6] = [
    "executive",
    "aggressive",
    "moderate",
    "conservative",
    "licensing",
    "quick-wins",
];

/// Look up a built-in profile by id.
pub fn builtin(id: &str) -> Option<RoleConfig> {
    let config = match id {
        // Balanced board-level view across all 12 metrics.
        "executive" => RoleConfig::from_weights([
            ("competitor_citations", 0.25),
            ("forward_citations", 0.13),
            ("years_remaining", 0.17),
            ("competitor_count", 0.08),
            ("eligibility_score", 0.05),
            ("validity_score", 0.05),
            ("claim_breadth", 0.04),
            ("enforcement_clarity", 0.04),
            ("design_around_difficulty", 0.04),
            ("market_relevance_score", 0.05),
            ("ipr_risk_score", 0.05),
            ("prosecution_quality_score", 0.05),
        ]),
        // Litigation-forward: market evidence dominates.
        "aggressive" => RoleConfig::from_weights([
            ("competitor_citations", 0.25),
            ("competitor_count", 0.10),
            ("forward_citations", 0.05),
            ("years_remaining", 0.05),
            ("eligibility_score", 0.15),
            ("validity_score", 0.10),
            ("claim_breadth", 0.05),
            ("enforcement_clarity", 0.10),
            ("market_relevance_score", 0.10),
            ("ipr_risk_score", 0.025),
            ("prosecution_quality_score", 0.025),
        ]),
        "moderate" => RoleConfig::from_weights([
            ("competitor_citations", 0.15),
            ("competitor_count", 0.05),
            ("forward_citations", 0.10),
            ("years_remaining", 0.05),
            ("eligibility_score", 0.15),
            ("validity_score", 0.15),
            ("claim_breadth", 0.10),
            ("enforcement_clarity", 0.10),
            ("market_relevance_score", 0.10),
            ("ipr_risk_score", 0.025),
            ("prosecution_quality_score", 0.025),
        ]),
        // Legal merit first, market evidence second.
        "conservative" => RoleConfig::from_weights([
            ("competitor_citations", 0.10),
            ("competitor_count", 0.05),
            ("forward_citations", 0.05),
            ("years_remaining", 0.05),
            ("eligibility_score", 0.20),
            ("validity_score", 0.20),
            ("claim_breadth", 0.10),
            ("enforcement_clarity", 0.10),
            ("market_relevance_score", 0.05),
            ("ipr_risk_score", 0.05),
            ("prosecution_quality_score", 0.05),
        ]),
        // Licensee pool and negotiation leverage over courtroom strength.
        "licensing" => RoleConfig::from_weights([
            ("competitor_citations", 0.15),
            ("competitor_count", 0.15),
            ("forward_citations", 0.10),
            ("years_remaining", 0.10),
            ("claim_breadth", 0.10),
            ("design_around_difficulty", 0.10),
            ("enforcement_clarity", 0.08),
            ("eligibility_score", 0.07),
            ("validity_score", 0.07),
            ("market_relevance_score", 0.08),
        ]),
        // Clear-cut enforcement targets that can move fast.
        "quick-wins" => RoleConfig::from_weights([
            ("competitor_citations", 0.30),
            ("enforcement_clarity", 0.20),
            ("eligibility_score", 0.15),
            ("design_around_difficulty", 0.10),
            ("competitor_count", 0.10),
            ("ipr_risk_score", 0.10),
            ("years_remaining", 0.05),
        ]),
        _ => return None,
    };
    Some(config)
}

/// All six built-in profiles wrapped as equally weighted consensus roles.
pub fn consensus_default() -> Vec<ConsensusRole> {
    BUILTIN_PROFILE_IDS
        .iter()
        .map(|id| {
            ConsensusRole::new(
                id,
                id,
                100.0 / BUILTIN_PROFILE_IDS.len() as f64,
                builtin(id).expect("builtin profile table out of sync"),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipfolio_common::metrics::MetricCatalog;

    #[test]
    fn test_every_builtin_validates_against_catalog() {
        let catalog = MetricCatalog::default();
        for id in BUILTIN_PROFILE_IDS {
            let config = builtin(id).expect(id);
            config.validate(&catalog).expect(id);
        }
    }

    #[test]
    fn test_builtin_weights_sum_to_one() {
        for id in BUILTIN_PROFILE_IDS {
            let config = builtin(id).unwrap();
            let sum: f64 = config.weights.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{id} weights sum to {sum}");
        }
    }

    #[test]
    fn test_unknown_profile_id() {
        assert!(builtin("shareholder-activist").is_none());
    }

    #[test]
    fn test_consensus_default_weights_sum_to_100() {
        let roles = consensus_default();
        assert_eq!(roles.len(), 6);
        let sum: f64 = roles.iter().map(|r| r.consensus_weight).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }
}
