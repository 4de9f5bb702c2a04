//! Scoring role configuration.
//!
//! A "role" is one independently configured weighted-metric formula
//! (e.g. litigation-aggressive, licensing). Roles can be edited via the
//! web GUI or loaded from YAML/JSON files; consensus runs wrap several
//! roles with relative weights.

use crate::error::{IpfolioError, Result};
use crate::metrics::{MetricCatalog, ScalingMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a single scoring role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Relative metric weights. Only keys with weight > 0 participate.
    pub weights: BTreeMap<String, f64>,

    /// Per-metric scaling overrides; catalog default applies when unset.
    #[serde(default)]
    pub scaling: BTreeMap<String, ScalingMode>,

    /// Per-metric inversion overrides; catalog default applies when unset.
    #[serde(default)]
    pub invert: BTreeMap<String, bool>,

    /// Keep only the top N patents (0 = unlimited).
    #[serde(default)]
    pub top_n: usize,

    /// Exclude patents missing any weighted metric instead of
    /// redistributing weight.
    #[serde(default)]
    pub require_complete_data: bool,
}

impl RoleConfig {
    /// Build a config from a plain weight table, catalog defaults for
    /// everything else.
    pub fn from_weights<I, K>(weights: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        Self {
            weights: weights.into_iter().map(|(k, w)| (k.into(), w)).collect(),
            scaling: BTreeMap::new(),
            invert: BTreeMap::new(),
            top_n: 0,
            require_complete_data: false,
        }
    }

    /// Every referenced metric must exist in the catalog.
    pub fn validate(&self, catalog: &MetricCatalog) -> Result<()> {
        for key in self
            .weights
            .keys()
            .chain(self.scaling.keys())
            .chain(self.invert.keys())
        {
            if !catalog.contains(key) {
                return Err(IpfolioError::UnknownMetric(key.clone()));
            }
        }
        Ok(())
    }

    /// Effective scaling for a metric: role override, else catalog default.
    pub fn scaling_for<'a>(
        &'a self,
        key: &str,
        catalog: &'a MetricCatalog,
    ) -> Option<&'a ScalingMode> {
        self.scaling
            .get(key)
            .or_else(|| catalog.get(key).map(|d| &d.default_scaling))
    }

    /// Effective inversion flag for a metric.
    pub fn invert_for(&self, key: &str, catalog: &MetricCatalog) -> bool {
        self.invert.get(key).copied().unwrap_or_else(|| {
            catalog
                .get(key)
                .map(|d| d.invert_by_default)
                .unwrap_or(false)
        })
    }

    /// Load from a YAML file.
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }
}

/// A role participating in a consensus run, with its relative weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusRole {
    pub role_id: String,
    pub role_name: String,
    /// Relative weight in [0, 100]. The aggregator normalizes by the
    /// actual sum, so edits need not keep the set summing to 100.
    pub consensus_weight: f64,
    pub config: RoleConfig,
}

impl ConsensusRole {
    pub fn new(role_id: &str, role_name: &str, consensus_weight: f64, config: RoleConfig) -> Self {
        Self {
            role_id: role_id.to_string(),
            role_name: role_name.to_string(),
            consensus_weight,
            config,
        }
    }
}

/// Rescale consensus weights to sum to 100, proportionally. If every
/// weight is zero they are redistributed equally instead.
pub fn normalize_weights(roles: &mut [ConsensusRole]) {
    if roles.is_empty() {
        return;
    }
    let sum: f64 = roles.iter().map(|r| r.consensus_weight.max(0.0)).sum();
    if sum > 0.0 {
        for role in roles.iter_mut() {
            role.consensus_weight = role.consensus_weight.max(0.0) / sum * 100.0;
        }
    } else {
        let equal = 100.0 / roles.len() as f64;
        for role in roles.iter_mut() {
            role.consensus_weight = equal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_unknown_metric() {
        let catalog = MetricCatalog::default();
        let config = RoleConfig::from_weights([("forward_citations", 0.5), ("page_views", 0.5)]);
        let err = config.validate(&catalog).unwrap_err();
        assert!(matches!(err, IpfolioError::UnknownMetric(ref k) if k == "page_views"));
    }

    #[test]
    fn test_scaling_falls_back_to_catalog_default() {
        let catalog = MetricCatalog::default();
        let mut config = RoleConfig::from_weights([("forward_citations", 1.0)]);
        assert_eq!(
            config.scaling_for("forward_citations", &catalog),
            Some(&ScalingMode::Sqrt { max: 500.0 })
        );
        config
            .scaling
            .insert("forward_citations".into(), ScalingMode::Log { max: 400.0 });
        assert_eq!(
            config.scaling_for("forward_citations", &catalog),
            Some(&ScalingMode::Log { max: 400.0 })
        );
    }

    #[test]
    fn test_normalize_weights_proportional() {
        let config = RoleConfig::from_weights([("forward_citations", 1.0)]);
        let mut roles = vec![
            ConsensusRole::new("a", "A", 30.0, config.clone()),
            ConsensusRole::new("b", "B", 10.0, config),
        ];
        normalize_weights(&mut roles);
        assert!((roles[0].consensus_weight - 75.0).abs() < 1e-9);
        assert!((roles[1].consensus_weight - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_weights_all_zero_becomes_equal() {
        let config = RoleConfig::from_weights([("forward_citations", 1.0)]);
        let mut roles = vec![
            ConsensusRole::new("a", "A", 0.0, config.clone()),
            ConsensusRole::new("b", "B", 0.0, config.clone()),
            ConsensusRole::new("c", "C", 0.0, config),
        ];
        normalize_weights(&mut roles);
        for role in &roles {
            assert!((role.consensus_weight - 100.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_role_config_yaml_roundtrip() {
        let config = RoleConfig::from_weights([("competitor_citations", 0.6), ("validity_score", 0.4)]);
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: RoleConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.weights, config.weights);
        assert_eq!(parsed.top_n, 0);
        assert!(!parsed.require_complete_data);
    }
}
