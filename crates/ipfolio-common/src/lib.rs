//! ipfolio-common — Shared types, errors, and scoring configuration used across all ipfolio crates.

pub mod error;
pub mod metrics;
pub mod config;

// Re-export commonly used types
pub use error::{IpfolioError, Result};
pub use metrics::{MetricCatalog, MetricCategory, MetricDefinition, ScalingMode, Step};
pub use config::{ConsensusRole, RoleConfig};
