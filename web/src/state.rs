//! Application state for the VillageStay HTTP server.

use std::sync::Arc;
use villagestay_core::booking::BookingService;
use villagestay_core::environment::Clock;
use villagestay_core::store::PackageCatalog;
use villagestay_projections::ImpactQueries;

/// Shared resources available to every HTTP handler.
///
/// Cloned (cheaply, via `Arc`) per request. Collaborators are trait
/// objects, so the same router serves postgres in production and the
/// in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    /// The booking lifecycle manager
    pub service: Arc<BookingService>,
    /// The package catalog, for the catalog-facing endpoints
    pub catalog: Arc<dyn PackageCatalog>,
    /// The impact aggregation queries
    pub impact: Arc<dyn ImpactQueries>,
    /// Reference clock, used for catalog record timestamps
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Assemble the application state
    #[must_use]
    pub fn new(
        service: Arc<BookingService>,
        catalog: Arc<dyn PackageCatalog>,
        impact: Arc<dyn ImpactQueries>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            service,
            catalog,
            impact,
            clock,
        }
    }
}
