//! HTTP handlers, grouped by surface.
//!
//! - [`packages`] — catalog endpoints (create, list, get, update)
//! - [`bookings`] — the booking lifecycle surface
//! - [`impact`] — leaderboard and impact dashboards
//! - [`health`] — liveness and readiness probes

pub mod bookings;
pub mod health;
pub mod impact;
pub mod packages;
