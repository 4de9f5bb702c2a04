//! In-memory `ConfigStore` implementation.
//!
//! Seeded with the built-in profiles as read-only presets. Used by tests
//! and by embedders that do not need durability.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use ipfolio_common::error::{IpfolioError, Result};
use ipfolio_engine::consensus::ConsensusRequest;
use ipfolio_engine::profiles;

use crate::snapshot::{Snapshot, SnapshotEntry};
use crate::store::{ConfigStore, Preset, PresetKind};

#[derive(Default)]
struct Inner {
    presets: BTreeMap<Uuid, Preset>,
    snapshots: BTreeMap<Uuid, Snapshot>,
}

pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Empty store seeded with the built-in role presets.
    pub fn new() -> Self {
        let mut inner = Inner::default();
        for id in profiles::BUILTIN_PROFILE_IDS {
            let config = profiles::builtin(id).expect("builtin profile table out of sync");
            let preset = Preset::builtin(id, PresetKind::Role { config });
            inner.presets.insert(preset.id, preset);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn list_presets(&self) -> Result<Vec<Preset>> {
        let inner = self.inner.read().await;
        Ok(inner.presets.values().cloned().collect())
    }

    async fn save_preset(&self, preset: Preset) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.presets.get(&preset.id) {
            if existing.builtin {
                return Err(IpfolioError::Store(format!(
                    "preset '{}' is built-in and read-only",
                    existing.name
                )));
            }
        }
        debug!(name = %preset.name, "saving preset");
        inner.presets.insert(preset.id, preset);
        Ok(())
    }

    async fn delete_preset(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.presets.get(&id) {
            None => Err(IpfolioError::NotFound(format!("preset {id}"))),
            Some(preset) if preset.builtin => Err(IpfolioError::Store(format!(
                "preset '{}' is built-in and cannot be deleted",
                preset.name
            ))),
            Some(_) => {
                inner.presets.remove(&id);
                Ok(())
            }
        }
    }

    async fn list_snapshots(&self, score_type: Option<&str>) -> Result<Vec<Snapshot>> {
        let inner = self.inner.read().await;
        let mut snapshots: Vec<Snapshot> = inner
            .snapshots
            .values()
            .filter(|s| score_type.map_or(true, |t| s.score_type == t))
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(snapshots)
    }

    async fn get_snapshot(&self, id: Uuid) -> Result<Snapshot> {
        let inner = self.inner.read().await;
        inner
            .snapshots
            .get(&id)
            .cloned()
            .ok_or_else(|| IpfolioError::NotFound(format!("snapshot {id}")))
    }

    async fn save_snapshot(
        &self,
        name: &str,
        config: ConsensusRequest,
        rankings: Vec<SnapshotEntry>,
        set_active: bool,
    ) -> Result<Snapshot> {
        let mut snapshot = Snapshot::new(name, config, rankings);
        snapshot.active = set_active;

        let mut inner = self.inner.write().await;
        if set_active {
            for other in inner.snapshots.values_mut() {
                other.active = false;
            }
        }
        debug!(name, id = %snapshot.id, active = set_active, "saving snapshot");
        inner.snapshots.insert(snapshot.id, snapshot.clone());
        Ok(snapshot)
    }

    async fn activate_snapshot(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        if !inner.snapshots.contains_key(&id) {
            return Err(IpfolioError::NotFound(format!("snapshot {id}")));
        }
        for (other_id, snapshot) in inner.snapshots.iter_mut() {
            snapshot.active = *other_id == id;
        }
        Ok(())
    }

    async fn deactivate_snapshot(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        match inner.snapshots.get_mut(&id) {
            None => Err(IpfolioError::NotFound(format!("snapshot {id}"))),
            Some(snapshot) => {
                snapshot.active = false;
                Ok(())
            }
        }
    }

    async fn delete_snapshot(&self, id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .snapshots
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| IpfolioError::NotFound(format!("snapshot {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipfolio_common::config::RoleConfig;
    use ipfolio_engine::source::MetricFilters;

    fn empty_config() -> ConsensusRequest {
        ConsensusRequest {
            roles: vec![],
            filters: MetricFilters::default(),
            top_n: 0,
            require_complete_data: false,
        }
    }

    fn entry(patent_id: &str, rank: u32) -> SnapshotEntry {
        SnapshotEntry {
            patent_id: patent_id.to_string(),
            rank,
            score: 100.0 - rank as f64,
            rank_change: None,
        }
    }

    #[tokio::test]
    async fn test_seeded_with_builtin_presets() {
        let store = MemoryStore::new();
        let presets = store.list_presets().await.unwrap();
        assert_eq!(presets.len(), 6);
        assert!(presets.iter().all(|p| p.builtin));
    }

    #[tokio::test]
    async fn test_builtin_presets_are_read_only() {
        let store = MemoryStore::new();
        let builtin = store.list_presets().await.unwrap().remove(0);

        let err = store.delete_preset(builtin.id).await.unwrap_err();
        assert!(matches!(err, IpfolioError::Store(_)));

        let overwrite = Preset {
            builtin: false,
            ..builtin.clone()
        };
        let err = store.save_preset(overwrite).await.unwrap_err();
        assert!(matches!(err, IpfolioError::Store(_)));
    }

    #[tokio::test]
    async fn test_user_preset_lifecycle() {
        let store = MemoryStore::new();
        let preset = Preset::user(
            "my-litigation-mix",
            PresetKind::Role {
                config: RoleConfig::from_weights([("competitor_citations", 1.0)]),
            },
        );
        let id = preset.id;
        store.save_preset(preset).await.unwrap();
        assert_eq!(store.list_presets().await.unwrap().len(), 7);

        store.delete_preset(id).await.unwrap();
        assert_eq!(store.list_presets().await.unwrap().len(), 6);

        let err = store.delete_preset(id).await.unwrap_err();
        assert!(matches!(err, IpfolioError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_at_most_one_active_snapshot() {
        let store = MemoryStore::new();
        let first = store
            .save_snapshot("jan-run", empty_config(), vec![entry("US-1", 1)], true)
            .await
            .unwrap();
        let second = store
            .save_snapshot("feb-run", empty_config(), vec![entry("US-1", 1)], true)
            .await
            .unwrap();

        let snapshots = store.list_snapshots(None).await.unwrap();
        let active: Vec<_> = snapshots.iter().filter(|s| s.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, second.id);

        store.activate_snapshot(first.id).await.unwrap();
        let snapshots = store.list_snapshots(None).await.unwrap();
        let active: Vec<_> = snapshots.iter().filter(|s| s.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first.id);

        store.deactivate_snapshot(first.id).await.unwrap();
        let snapshots = store.list_snapshots(None).await.unwrap();
        assert!(snapshots.iter().all(|s| !s.active));
    }

    #[tokio::test]
    async fn test_list_snapshots_filters_by_score_type() {
        let store = MemoryStore::new();
        store
            .save_snapshot("jan-run", empty_config(), vec![entry("US-1", 1)], false)
            .await
            .unwrap();

        let consensus = store.list_snapshots(Some("consensus")).await.unwrap();
        assert_eq!(consensus.len(), 1);
        let executive = store.list_snapshots(Some("executive")).await.unwrap();
        assert!(executive.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_delete_and_missing_lookup() {
        let store = MemoryStore::new();
        let snapshot = store
            .save_snapshot("to-delete", empty_config(), vec![entry("US-1", 1)], false)
            .await
            .unwrap();

        assert_eq!(store.get_snapshot(snapshot.id).await.unwrap().name, "to-delete");
        store.delete_snapshot(snapshot.id).await.unwrap();
        let err = store.get_snapshot(snapshot.id).await.unwrap_err();
        assert!(matches!(err, IpfolioError::NotFound(_)));
    }
}
