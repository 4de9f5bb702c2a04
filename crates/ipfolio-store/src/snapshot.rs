//! Ranking snapshots.
//!
//! A snapshot is an immutable, named capture of a ranking plus the
//! configuration that produced it. Snapshots serve as comparison
//! baselines and, when flagged active, as the score set the rest of the
//! system treats as authoritative. The engine never reads the active
//! flag; that is caller semantics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ipfolio_engine::consensus::{ConsensusRequest, RankedPatent};
use ipfolio_engine::rank::RankBaseline;

/// One row of a materialized ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub patent_id: String,
    pub rank: u32,
    pub score: f64,
    pub rank_change: Option<i64>,
}

impl From<&RankedPatent> for SnapshotEntry {
    fn from(patent: &RankedPatent) -> Self {
        Self {
            patent_id: patent.patent_id.clone(),
            rank: patent.rank,
            score: patent.consensus_score,
            rank_change: patent.rank_change,
        }
    }
}

/// Default score family for snapshots of the consensus pipeline.
pub const SCORE_TYPE_CONSENSUS: &str = "consensus";

/// Immutable point-in-time capture of a ranking and its configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Score family this ranking belongs to ("consensus", or a single
    /// role id for individual-mode captures). Used as a listing filter.
    pub score_type: String,
    pub config: ConsensusRequest,
    pub rankings: Vec<SnapshotEntry>,
    pub active: bool,
}

impl Snapshot {
    pub fn new(name: &str, config: ConsensusRequest, rankings: Vec<SnapshotEntry>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
            score_type: SCORE_TYPE_CONSENSUS.to_string(),
            config,
            rankings,
            active: false,
        }
    }

    pub fn with_score_type(mut self, score_type: &str) -> Self {
        self.score_type = score_type.to_string();
        self
    }

    /// Baseline rank map for diffing a later run against this snapshot.
    pub fn baseline(&self) -> RankBaseline {
        RankBaseline::from_ranks(
            self.rankings
                .iter()
                .map(|e| (e.patent_id.clone(), e.rank))
                .collect::<Vec<_>>(),
        )
    }
}
