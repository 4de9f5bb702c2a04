//! ipfolio-export — CSV serialization of consensus rankings.
//!
//! A pure formatting layer over the engine's output: every field of the
//! ranked list is reproduced, including the per-role score breakdown, and
//! the configuration that produced the ranking rides along as `#`-prefixed
//! header comments so an export is self-describing.

use std::collections::BTreeSet;

use chrono::Utc;
use tracing::debug;

use ipfolio_common::error::{IpfolioError, Result};
use ipfolio_engine::consensus::{ConsensusOutcome, ConsensusRequest};

/// Marker written in the rank-change column for patents absent from the
/// baseline. Distinct from a zero change.
const NEW_ENTRANT: &str = "NEW";

/// Serialize a consensus outcome to CSV.
///
/// Layout: configuration comment lines, then one row per ranked patent
/// with `patent_id, rank, rank_change, consensus_score, year_multiplier`,
/// a `score_<role_id>` column per requested role (blank when the role did
/// not score that patent), and a `norm_<metric>` column for every metric
/// that was normalized for any exported patent.
pub fn export_csv(outcome: &ConsensusOutcome, request: &ConsensusRequest) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("# ipfolio ranking export {}\n", Utc::now().to_rfc3339()));
    out.push_str(&format!("# top_n: {}\n", request.top_n));
    for role in &request.roles {
        out.push_str(&format!(
            "# role: {} ({}) consensus_weight={} weights={}\n",
            role.role_id,
            role.role_name,
            role.consensus_weight,
            serde_json::to_string(&role.config.weights)?,
        ));
    }
    for degraded in &outcome.degraded {
        out.push_str(&format!(
            "# degraded: {} ({})\n",
            degraded.role_id, degraded.reason
        ));
    }

    // Stable column sets: roles in request order, metrics sorted by key.
    let role_ids: Vec<&str> = request.roles.iter().map(|r| r.role_id.as_str()).collect();
    let metric_keys: BTreeSet<&str> = outcome
        .rankings
        .iter()
        .flat_map(|p| p.normalized_metrics.keys().map(|k| k.as_str()))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![
        "patent_id".to_string(),
        "rank".to_string(),
        "rank_change".to_string(),
        "consensus_score".to_string(),
        "year_multiplier".to_string(),
    ];
    header.extend(role_ids.iter().map(|id| format!("score_{id}")));
    header.extend(metric_keys.iter().map(|k| format!("norm_{k}")));
    writer
        .write_record(&header)
        .map_err(|e| IpfolioError::Other(e.into()))?;

    for patent in &outcome.rankings {
        let mut record = vec![
            patent.patent_id.clone(),
            patent.rank.to_string(),
            patent
                .rank_change
                .map(|d| d.to_string())
                .unwrap_or_else(|| NEW_ENTRANT.to_string()),
            format!("{:.2}", patent.consensus_score),
            format!("{:.4}", patent.year_multiplier),
        ];
        for role_id in &role_ids {
            record.push(
                patent
                    .per_role_score
                    .get(*role_id)
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_default(),
            );
        }
        for key in &metric_keys {
            record.push(
                patent
                    .normalized_metrics
                    .get(*key)
                    .map(|n| format!("{n:.4}"))
                    .unwrap_or_default(),
            );
        }
        writer
            .write_record(&record)
            .map_err(|e| IpfolioError::Other(e.into()))?;
    }

    let table = writer
        .into_inner()
        .map_err(|e| IpfolioError::Other(e.into()))?;
    out.push_str(&String::from_utf8(table).map_err(|e| IpfolioError::Other(e.into()))?);

    debug!(rows = outcome.rankings.len(), "csv export complete");
    Ok(out)
}
