//! ipfolio-store — Durable preset and snapshot storage contract.
//!
//! The engine itself is stateless; everything a user names and keeps —
//! role presets, consensus configurations, ranking snapshots — goes
//! through the [`ConfigStore`] trait. The in-memory implementation backs
//! tests and embedders; production deployments plug in their own.

pub mod snapshot;
pub mod store;
pub mod memory;

pub use memory::MemoryStore;
pub use snapshot::{Snapshot, SnapshotEntry};
pub use store::{ConfigStore, Preset, PresetKind};
