//! # VillageStay Testing
//!
//! Testing utilities for the VillageStay platform:
//!
//! - [`mocks::FixedClock`] — deterministic time for sweep and snapshot
//!   tests
//! - [`stores::InMemoryStore`] — a single in-process store implementing
//!   the package catalog, booking store, and user directory traits, with
//!   fault injection for the lost-earnings-credit path
//! - [`fixtures`] — builders for packages, users, and booking commands
//!
//! The in-memory store is also suitable for demos and single-node
//! deployments that do not want postgres; its trait semantics (sweep
//! cutoff, atomic cancel, creation-order listings) intentionally mirror
//! the postgres implementations.

pub mod fixtures;
pub mod mocks;
pub mod stores;

pub use fixtures::{booking_command, package, user};
pub use mocks::FixedClock;
pub use stores::InMemoryStore;
