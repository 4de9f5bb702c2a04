//! Rank assignment and baseline diffing.
//!
//! Dense 1-based ranks over a scored set, with rank movement computed
//! against a baseline rank map (the previous run or a saved snapshot).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Baseline rank map a new computation's ranks are diffed against.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankBaseline {
    ranks: BTreeMap<String, u32>,
}

impl RankBaseline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a baseline from (patent id, rank) pairs.
    pub fn from_ranks<I, K>(ranks: I) -> Self
    where
        I: IntoIterator<Item = (K, u32)>,
        K: Into<String>,
    {
        Self {
            ranks: ranks.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }

    /// Rebase onto a just-computed ranking, clearing all deltas ("reset").
    pub fn from_ranking(entries: &[RankedEntry]) -> Self {
        Self {
            ranks: entries
                .iter()
                .map(|e| (e.patent_id.clone(), e.rank))
                .collect(),
        }
    }

    pub fn get(&self, patent_id: &str) -> Option<u32> {
        self.ranks.get(patent_id).copied()
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

/// One ranked patent with its movement against the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntry {
    pub patent_id: String,
    /// Dense 1-based rank, no gaps.
    pub rank: u32,
    pub score: f64,
    /// `baseline_rank - rank`; positive = moved up. `None` when the
    /// patent has no baseline entry (a new entrant, distinct from 0).
    pub rank_change: Option<i64>,
}

/// Sort by score descending (ties broken by ascending patent id for
/// reproducible ordering), assign dense 1-based ranks, and diff against
/// the baseline when one is supplied.
pub fn assign(scored: Vec<(String, f64)>, baseline: Option<&RankBaseline>) -> Vec<RankedEntry> {
    let mut scored = scored;
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (patent_id, score))| {
            let rank = (i + 1) as u32;
            let rank_change = baseline
                .and_then(|base| base.get(&patent_id))
                .map(|prev| prev as i64 - rank as i64);
            RankedEntry {
                patent_id,
                rank,
                score,
                rank_change,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_ranks_with_deterministic_ties() {
        let ranked = assign(
            vec![
                ("US-3".to_string(), 50.0),
                ("US-1".to_string(), 80.0),
                ("US-2".to_string(), 50.0),
            ],
            None,
        );
        assert_eq!(ranked[0].patent_id, "US-1");
        assert_eq!(ranked[0].rank, 1);
        // Tied scores: lower patent id first, no shared ranks.
        assert_eq!(ranked[1].patent_id, "US-2");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].patent_id, "US-3");
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_rank_change_sign() {
        let baseline = RankBaseline::from_ranks([("US-1", 10u32)]);
        let ranked = assign(
            vec![
                ("US-1".to_string(), 90.0),
                ("US-2".to_string(), 80.0),
                ("US-3".to_string(), 70.0),
            ],
            Some(&baseline),
        );
        // Improved from 10 to 1: +9.
        assert_eq!(ranked[0].rank_change, Some(9));
    }

    #[test]
    fn test_new_entrant_has_no_rank_change() {
        let baseline = RankBaseline::from_ranks([("US-1", 1u32)]);
        let ranked = assign(
            vec![("US-1".to_string(), 90.0), ("US-9".to_string(), 95.0)],
            Some(&baseline),
        );
        assert_eq!(ranked[0].patent_id, "US-9");
        assert_eq!(ranked[0].rank_change, None);
        // US-1 slipped from 1 to 2.
        assert_eq!(ranked[1].rank_change, Some(-1));
    }

    #[test]
    fn test_reset_rebases_baseline() {
        let ranked = assign(
            vec![("US-1".to_string(), 90.0), ("US-2".to_string(), 80.0)],
            None,
        );
        let rebased = RankBaseline::from_ranking(&ranked);
        let again = assign(
            vec![("US-1".to_string(), 90.0), ("US-2".to_string(), 80.0)],
            Some(&rebased),
        );
        // Identical ranking against its own baseline: all deltas zero.
        assert!(again.iter().all(|e| e.rank_change == Some(0)));
    }
}
