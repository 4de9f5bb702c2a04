//! Trait for patent metric data access.
//!
//! Abstracts over wherever raw metrics actually live (the candidate store,
//! citation-classification output, LLM analysis cache) so the engine can
//! score without being coupled to any of them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ipfolio_common::metrics::YEARS_REMAINING;

/// One patent's raw metric values. A key absent from `raw` means the
/// metric is missing for this patent (never zero).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatentMetrics {
    pub patent_id: String,
    pub raw: BTreeMap<String, f64>,
}

impl PatentMetrics {
    pub fn new(patent_id: &str) -> Self {
        Self {
            patent_id: patent_id.to_string(),
            raw: BTreeMap::new(),
        }
    }

    /// Add a raw metric value.
    pub fn with(mut self, key: &str, value: f64) -> Self {
        self.raw.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.raw.get(key).copied()
    }
}

/// Candidate filters applied before scoring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricFilters {
    /// Drop patents with fewer remaining years (the pipeline exports use 3.0).
    pub min_years_remaining: Option<f64>,
    /// Restrict to these sector assignments; empty = all sectors.
    #[serde(default)]
    pub sectors: Vec<String>,
}

/// Source of raw per-patent metrics for a scoring pass.
///
/// Implementations can read from:
/// - the candidate/classification output store (production)
/// - a database-backed metric view
/// - in-memory fixtures (testing)
#[async_trait]
pub trait MetricSource: Send + Sync {
    /// Fetch the candidate set with raw metrics, already filtered.
    async fn fetch_metrics(&self, filters: &MetricFilters) -> anyhow::Result<Vec<PatentMetrics>>;
}

// ── In-memory implementation ─────────────────────────────────────────────

/// Metric source backed by an in-memory list, used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetricSource {
    patents: Vec<PatentMetrics>,
    sector_by_patent: BTreeMap<String, String>,
}

impl InMemoryMetricSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a patent's metrics.
    pub fn with(mut self, patent: PatentMetrics) -> Self {
        self.patents.push(patent);
        self
    }

    /// Assign a sector to a patent for filter matching.
    pub fn with_sector(mut self, patent_id: &str, sector: &str) -> Self {
        self.sector_by_patent
            .insert(patent_id.to_string(), sector.to_string());
        self
    }
}

#[async_trait]
impl MetricSource for InMemoryMetricSource {
    async fn fetch_metrics(&self, filters: &MetricFilters) -> anyhow::Result<Vec<PatentMetrics>> {
        let rows = self
            .patents
            .iter()
            .filter(|p| {
                if let Some(min_years) = filters.min_years_remaining {
                    if p.get(YEARS_REMAINING).unwrap_or(0.0) < min_years {
                        return false;
                    }
                }
                if !filters.sectors.is_empty() {
                    match self.sector_by_patent.get(&p.patent_id) {
                        Some(sector) => filters.sectors.iter().any(|s| s == sector),
                        None => false,
                    }
                } else {
                    true
                }
            })
            .cloned()
            .collect();
        Ok(rows)
    }
}
