//! # VillageStay Projections
//!
//! The aggregation and reporting engine: village-level and user-level
//! statistics derived by grouping booking records, powering the village
//! leaderboard and the impact dashboards.
//!
//! - [`impact`] — pure grouping functions over booking slices, plus the
//!   aggregate row types
//! - [`queries`] — the [`queries::ImpactQueries`] read-side trait and its
//!   fold-over-a-store implementation
//! - [`postgres`] — the SQL-backed implementation pushing the grouping
//!   into the database

pub mod impact;
pub mod postgres;
pub mod queries;

pub use impact::{
    counts_toward_platform, platform_stats, user_impact, village_totals, PlatformImpactStats,
    UserImpact, VillageTotal,
};
pub use postgres::PostgresImpactQueries;
pub use queries::{ImpactQueries, StoreImpactQueries};
