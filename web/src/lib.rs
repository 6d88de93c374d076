//! # VillageStay Web
//!
//! The HTTP surface of the VillageStay booking platform: an Axum
//! application exposing the package catalog, the booking lifecycle, and
//! the impact reporting queries.
//!
//! Transport concerns live here and nowhere else — authentication happens
//! upstream (the gateway injects the verified requester id as a header),
//! and handlers are thin adapters over the `villagestay-core` service and
//! the `villagestay-projections` queries.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use extractors::{Requester, REQUESTER_HEADER};
pub use routes::build_router;
pub use state::AppState;
