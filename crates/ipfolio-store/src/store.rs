//! The `ConfigStore` collaborator contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ipfolio_common::config::{ConsensusRole, RoleConfig};
use ipfolio_common::error::Result;

use crate::snapshot::{Snapshot, SnapshotEntry};
use ipfolio_engine::consensus::ConsensusRequest;

/// What a named preset holds: a single role's formula or a whole
/// consensus role set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresetKind {
    Role { config: RoleConfig },
    Consensus { roles: Vec<ConsensusRole> },
}

/// A named, reusable configuration. Built-in presets ship with the
/// engine and are read-only; user presets are mutable and deletable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub id: Uuid,
    pub name: String,
    pub kind: PresetKind,
    pub builtin: bool,
    pub created_at: DateTime<Utc>,
}

impl Preset {
    pub fn user(name: &str, kind: PresetKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            builtin: false,
            created_at: Utc::now(),
        }
    }

    pub fn builtin(name: &str, kind: PresetKind) -> Self {
        Self {
            builtin: true,
            ..Self::user(name, kind)
        }
    }
}

/// Durable, queryable storage for presets and snapshots.
///
/// Discipline is read-your-writes; the store makes no intra-store
/// concurrency guarantees beyond that and the engine needs none.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn list_presets(&self) -> Result<Vec<Preset>>;

    /// Insert or replace by id. Replacing a built-in preset is an error.
    async fn save_preset(&self, preset: Preset) -> Result<()>;

    /// Delete by id. Built-in presets cannot be deleted.
    async fn delete_preset(&self, id: Uuid) -> Result<()>;

    /// Snapshots, newest first, optionally filtered by score family.
    async fn list_snapshots(&self, score_type: Option<&str>) -> Result<Vec<Snapshot>>;

    async fn get_snapshot(&self, id: Uuid) -> Result<Snapshot>;

    /// Persist a ranking capture. With `set_active`, the new snapshot
    /// becomes the single active one.
    async fn save_snapshot(
        &self,
        name: &str,
        config: ConsensusRequest,
        rankings: Vec<SnapshotEntry>,
        set_active: bool,
    ) -> Result<Snapshot>;

    /// Mark a snapshot active, deactivating any other.
    async fn activate_snapshot(&self, id: Uuid) -> Result<()>;

    async fn deactivate_snapshot(&self, id: Uuid) -> Result<()>;

    async fn delete_snapshot(&self, id: Uuid) -> Result<()>;
}
