//! Multi-role consensus aggregation.
//!
//! Runs every participating role's scoring pass concurrently, combines
//! per-role scores via normalized role weights, ranks the result, and
//! diffs ranks against the caller-supplied baseline. Stateless: identical
//! inputs always produce identical output.

use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

use ipfolio_common::config::ConsensusRole;
use ipfolio_common::error::{IpfolioError, Result};
use ipfolio_common::metrics::MetricCatalog;

use crate::rank::{self, RankBaseline};
use crate::scorer::{score_patent, RoleScore};
use crate::source::{MetricFilters, MetricSource};

/// A consensus computation request: which roles participate, which
/// candidates are in scope, and where to cut the ranking off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusRequest {
    pub roles: Vec<ConsensusRole>,
    #[serde(default)]
    pub filters: MetricFilters,
    /// Truncate the consensus ranking to this many patents (0 = unlimited).
    #[serde(default)]
    pub top_n: usize,
    /// When set, every role excludes patents missing any weighted metric,
    /// regardless of the per-role `require_complete_data` setting.
    #[serde(default)]
    pub require_complete_data: bool,
}

/// A role whose data source failed for this run. The role contributes no
/// scores but the aggregation still completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradedRole {
    pub role_id: String,
    pub reason: String,
}

/// One patent in the consensus ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedPatent {
    pub patent_id: String,
    pub rank: u32,
    pub consensus_score: f64,
    /// Score per role that actually scored this patent; absence ≠ zero.
    pub per_role_score: BTreeMap<String, f64>,
    /// `baseline_rank - rank`; `None` for new entrants.
    pub rank_change: Option<i64>,
    /// Normalized metric values, merged across the contributing roles.
    pub normalized_metrics: BTreeMap<String, f64>,
    pub year_multiplier: f64,
}

/// Result of a consensus aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    pub rankings: Vec<RankedPatent>,
    pub degraded: Vec<DegradedRole>,
}

/// One role's completed scoring pass.
struct RolePass {
    role_id: String,
    consensus_weight: f64,
    scores: BTreeMap<String, RoleScore>,
}

/// Run the full consensus pipeline.
///
/// Roles with `consensus_weight <= 0` are discarded up front; a request
/// whose remaining weights sum to zero is a configuration error rather
/// than a division by zero. A single-role request flows through the same
/// path and reproduces that role's individual ranking.
#[instrument(skip_all, fields(roles = request.roles.len(), top_n = request.top_n))]
pub async fn aggregate(
    request: &ConsensusRequest,
    source: &dyn MetricSource,
    catalog: &MetricCatalog,
    baseline: Option<&RankBaseline>,
) -> Result<ConsensusOutcome> {
    let retained: Vec<&ConsensusRole> = request
        .roles
        .iter()
        .filter(|r| r.consensus_weight > 0.0)
        .collect();

    let total_weight: f64 = retained.iter().map(|r| r.consensus_weight).sum();
    if retained.is_empty() || total_weight <= 0.0 {
        return Err(IpfolioError::Config(
            "consensus weights sum to zero; normalize weights before aggregating".to_string(),
        ));
    }

    for role in &retained {
        role.config.validate(catalog)?;
    }

    // Fan-out: every role's pass is independent (pure per patent), so the
    // passes run concurrently; fan-in waits for all of them before
    // combining. A failed fetch degrades that role instead of aborting.
    let passes = join_all(
        retained.iter().map(|role| {
            run_role_pass(
                role,
                source,
                &request.filters,
                catalog,
                request.require_complete_data,
            )
        }),
    )
    .await;

    let mut completed: Vec<RolePass> = Vec::new();
    let mut degraded: Vec<DegradedRole> = Vec::new();
    for pass in passes {
        match pass {
            Ok(pass) => completed.push(pass),
            Err(d) => degraded.push(d),
        }
    }

    // Union of every patent any role scored, then per-patent combination
    // with role weights renormalized over the roles that scored it.
    let mut patents: BTreeMap<String, RankedPatent> = BTreeMap::new();
    for pass in &completed {
        for (patent_id, score) in &pass.scores {
            let entry = patents
                .entry(patent_id.clone())
                .or_insert_with(|| RankedPatent {
                    patent_id: patent_id.clone(),
                    rank: 0,
                    consensus_score: 0.0,
                    per_role_score: BTreeMap::new(),
                    rank_change: None,
                    normalized_metrics: BTreeMap::new(),
                    year_multiplier: score.year_multiplier,
                });
            entry
                .per_role_score
                .insert(pass.role_id.clone(), score.final_score);
            for (key, norm) in &score.normalized {
                entry.normalized_metrics.insert(key.clone(), *norm);
            }
        }
    }

    let role_weights: BTreeMap<&str, f64> = completed
        .iter()
        .map(|p| (p.role_id.as_str(), p.consensus_weight))
        .collect();

    for patent in patents.values_mut() {
        let mut weighted_sum = 0.0;
        let mut weight_sum = 0.0;
        for (role_id, score) in &patent.per_role_score {
            let weight = role_weights.get(role_id.as_str()).copied().unwrap_or(0.0);
            weighted_sum += weight * score;
            weight_sum += weight;
        }
        patent.consensus_score = if weight_sum > 0.0 {
            (weighted_sum / weight_sum).clamp(0.0, 100.0)
        } else {
            0.0
        };
    }

    let scored: Vec<(String, f64)> = patents
        .values()
        .map(|p| (p.patent_id.clone(), p.consensus_score))
        .collect();
    let mut ranked = rank::assign(scored, baseline);
    if request.top_n > 0 {
        ranked.truncate(request.top_n);
    }

    let rankings = ranked
        .into_iter()
        .map(|entry| {
            let mut patent = patents
                .remove(&entry.patent_id)
                .unwrap_or_else(|| RankedPatent {
                    patent_id: entry.patent_id.clone(),
                    rank: 0,
                    consensus_score: entry.score,
                    per_role_score: BTreeMap::new(),
                    rank_change: None,
                    normalized_metrics: BTreeMap::new(),
                    year_multiplier: 0.0,
                });
            patent.rank = entry.rank;
            patent.rank_change = entry.rank_change;
            patent
        })
        .collect();

    debug!(
        degraded = degraded.len(),
        roles = completed.len(),
        "consensus aggregation complete"
    );

    Ok(ConsensusOutcome { rankings, degraded })
}

async fn run_role_pass(
    role: &ConsensusRole,
    source: &dyn MetricSource,
    filters: &MetricFilters,
    catalog: &MetricCatalog,
    require_complete_data: bool,
) -> std::result::Result<RolePass, DegradedRole> {
    let rows = match source.fetch_metrics(filters).await {
        Ok(rows) => rows,
        Err(err) => {
            warn!(role_id = %role.role_id, error = %err, "metric source unavailable; degrading role");
            return Err(DegradedRole {
                role_id: role.role_id.clone(),
                reason: err.to_string(),
            });
        }
    };

    let mut config = role.config.clone();
    config.require_complete_data |= require_complete_data;

    let mut scores = BTreeMap::new();
    for patent in &rows {
        if let Some(score) = score_patent(patent, &config, catalog) {
            scores.insert(patent.patent_id.clone(), score);
        }
    }
    debug!(role_id = %role.role_id, scored = scores.len(), candidates = rows.len(), "role pass complete");

    Ok(RolePass {
        role_id: role.role_id.clone(),
        consensus_weight: role.consensus_weight,
        scores,
    })
}
