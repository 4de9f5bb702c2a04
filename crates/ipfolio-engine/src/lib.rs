//! ipfolio-engine — Multi-role weighted consensus scoring for patent portfolios.
//!
//! Each scoring role turns a patent's raw metrics into a 0–100 score; the
//! consensus aggregator combines several roles' scores via normalized role
//! weights, ranks the result, and diffs ranks against a caller-supplied
//! baseline. The engine is stateless: persistence lives behind the
//! `ipfolio-store` collaborator and data access behind [`source::MetricSource`].

pub mod transform;
pub mod source;
pub mod scorer;
pub mod rank;
pub mod consensus;
pub mod profiles;

pub use consensus::{aggregate, ConsensusOutcome, ConsensusRequest, DegradedRole, RankedPatent};
pub use rank::{RankBaseline, RankedEntry};
pub use scorer::{score_patent, year_multiplier, RoleScore};
pub use source::{InMemoryMetricSource, MetricFilters, MetricSource, PatentMetrics};
