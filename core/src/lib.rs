//! # VillageStay Core
//!
//! Domain model and business logic for the VillageStay village-tourism
//! booking platform.
//!
//! Travelers book guided village stays ("packages"); every booking records
//! a fixed-percentage split of its total across the homestay family, the
//! local guide, food suppliers, and the village community fund. The split
//! is captured once, at creation, in an immutable impact snapshot, and the
//! partner village's cumulative earnings counter is credited with the
//! total.
//!
//! ## Crate layout
//!
//! - [`types`] — identifiers, [`types::Money`], package and booking
//!   records, the impact snapshot
//! - [`impact`] — the pure split engine (50/25/15/remainder)
//! - [`booking`] — the lifecycle manager: creation, departure sweep,
//!   cancellation, history deletion, joined listings, reconciliation
//! - [`store`] — async traits for the package catalog, booking store, and
//!   user directory
//! - [`environment`] — injected dependencies ([`environment::Clock`])
//! - [`error`] — the [`error::CoreError`] / [`error::StoreError`] taxonomy
//!
//! Storage implementations live in the `villagestay-postgres` (production)
//! and `villagestay-testing` (in-memory) crates; aggregation queries over
//! booking records live in `villagestay-projections`.

pub mod booking;
pub mod environment;
pub mod error;
pub mod impact;
pub mod store;
pub mod types;

pub use booking::{
    BookingService, CreateBooking, CreatedBooking, DeletionPolicy, ListingScope,
    ReconciledPackage,
};
pub use environment::{Clock, SystemClock};
pub use error::{CoreError, StoreError};
pub use impact::{split, ImpactSplit};
pub use store::{
    BookingFilter, BookingStore, LedgerStatus, PackageCatalog, StatusFilter, UserDirectory,
};
pub use types::{
    Booking, BookingId, BookingStatus, BookingView, HomestayType, ImpactSnapshot, Money, Package,
    PackageId, PackageSummary, PaymentStatus, UserId, UserProfile,
};
