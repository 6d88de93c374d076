//! Storage and collaborator abstractions.
//!
//! The booking core talks to three collaborators, each behind a
//! dyn-compatible async trait:
//!
//! - [`PackageCatalog`] — the read-mostly package store, plus the one write
//!   the core performs against it: the atomic cumulative-earnings credit.
//! - [`BookingStore`] — the booking records themselves.
//! - [`UserDirectory`] — read-only buyer profiles, used for listing joins
//!   and buyer-side search.
//!
//! Production implementations live in `villagestay-postgres`; in-memory
//! implementations for tests and small deployments live in
//! `villagestay-testing`.

use crate::error::StoreError;
use crate::types::{Booking, BookingId, BookingStatus, Money, Package, PackageId, UserId, UserProfile};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Lifecycle-status predicate for listing queries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    /// Bookings whose status equals the given one
    Is(BookingStatus),
    /// Bookings whose status differs from the given one
    IsNot(BookingStatus),
}

impl StatusFilter {
    /// Whether `status` passes this predicate
    #[must_use]
    pub fn matches(&self, status: BookingStatus) -> bool {
        match self {
            Self::Is(wanted) => status == *wanted,
            Self::IsNot(unwanted) => status != *unwanted,
        }
    }
}

/// Row-level filter for [`BookingStore::list`]
#[derive(Clone, Copy, Debug, Default)]
pub struct BookingFilter {
    /// Restrict to one buyer
    pub buyer: Option<UserId>,
    /// Restrict by lifecycle status
    pub status: Option<StatusFilter>,
}

impl BookingFilter {
    /// Whether `booking` passes this filter
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        if let Some(buyer) = self.buyer {
            if booking.buyer != buyer {
                return false;
            }
        }
        if let Some(status) = self.status {
            if !status.matches(booking.status) {
                return false;
            }
        }
        true
    }
}

/// Whether a booking's earnings credit landed alongside the booking write.
///
/// The booking insert and the catalog's cumulative-earnings increment form
/// one logical unit of work. Stores with transactions perform them
/// atomically and always answer [`LedgerStatus::Recorded`]. A store that
/// cannot, and loses the increment after the insert succeeded, answers
/// [`LedgerStatus::Lagged`] so the caller can surface the under-counted
/// aggregate instead of reporting a clean success. The repair path is
/// recomputing the counters from booking sums, never an inline retry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerStatus {
    /// Booking and earnings credit were both persisted
    Recorded,
    /// The booking was persisted but the earnings credit was lost; the
    /// package's cumulative counter under-reports until reconciled
    Lagged,
}

/// The package catalog collaborator.
#[async_trait]
pub trait PackageCatalog: Send + Sync {
    /// Fetch a package by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn get(&self, id: PackageId) -> Result<Option<Package>, StoreError>;

    /// All packages, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn all(&self) -> Result<Vec<Package>, StoreError>;

    /// Persist a new package.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn insert(&self, package: &Package) -> Result<(), StoreError>;

    /// Replace an existing package; answers whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn update(&self, package: &Package) -> Result<bool, StoreError>;

    /// Atomically credit `amount` to the package's cumulative village
    /// earnings; answers whether the package existed.
    ///
    /// Concurrent credits against the same package must not lose updates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn add_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError>;

    /// Overwrite the cumulative earnings counter. Reserved for the
    /// reconciliation job; regular code paths only ever credit.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn set_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError>;
}

/// The booking record store.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a freshly created booking and credit its total to the
    /// package's cumulative village earnings, as one unit of work where
    /// the storage engine supports it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the booking write itself fails; a lost
    /// earnings credit after a successful write is reported through
    /// [`LedgerStatus::Lagged`], not as an error.
    async fn record(&self, booking: &Booking) -> Result<LedgerStatus, StoreError>;

    /// Fetch a booking by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError>;

    /// Bookings passing `filter`, ordered by creation time ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, StoreError>;

    /// Bulk-advance every `Booked` record dated strictly before `cutoff`
    /// to `Completed`; answers how many records changed.
    ///
    /// Running it twice with the same cutoff changes nothing the second
    /// time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn complete_departed(&self, cutoff: NaiveDate) -> Result<u64, StoreError>;

    /// Atomically set status `Cancelled` and payment `Refunded` on a
    /// booking that is still `Booked`; answers whether such a record
    /// existed. Terminal records are left untouched — `Completed` and
    /// `Cancelled` have no outgoing transitions.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn cancel(&self, id: BookingId) -> Result<bool, StoreError>;

    /// Permanently delete a booking; answers whether it existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the storage call fails.
    async fn delete(&self, id: BookingId) -> Result<bool, StoreError>;
}

/// The external user directory, consumed read-only.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Fetch a user's profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory call fails.
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_predicates() {
        let current = StatusFilter::Is(BookingStatus::Booked);
        assert!(current.matches(BookingStatus::Booked));
        assert!(!current.matches(BookingStatus::Completed));

        let history = StatusFilter::IsNot(BookingStatus::Booked);
        assert!(!history.matches(BookingStatus::Booked));
        assert!(history.matches(BookingStatus::Completed));
        assert!(history.matches(BookingStatus::Cancelled));
    }
}
