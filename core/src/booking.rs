//! The booking lifecycle manager.
//!
//! Owns every state transition a booking can undergo: creation with an
//! embedded impact snapshot, the time-driven departure sweep, traveler
//! cancellation, and history deletion. Listing queries live here too since
//! they run the sweep inline and join bookings against the package catalog
//! and user directory.

use crate::environment::Clock;
use crate::error::CoreError;
use crate::impact;
use crate::store::{
    BookingFilter, BookingStore, LedgerStatus, PackageCatalog, StatusFilter, UserDirectory,
};
use crate::types::{
    Booking, BookingId, BookingStatus, BookingView, ImpactSnapshot, Money, PackageId,
    PackageSummary, PaymentStatus, UserId,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Named policy governing history deletion.
///
/// The platform has always allowed a traveler to delete any of their own
/// bookings, active ones included, because the delete action is only ever
/// exposed on history views. `TerminalStatesOnly` closes that gap for
/// deployments that want the stricter rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeletionPolicy {
    /// A booking may be deleted in any lifecycle state
    #[default]
    AnyLifecycleState,
    /// Only `Completed` and `Cancelled` bookings may be deleted
    TerminalStatesOnly,
}

/// Whose bookings a listing query covers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingScope {
    /// Every buyer's bookings (admin views). Search terms match buyer
    /// username or email.
    Global,
    /// One buyer's bookings. Search terms match the package name.
    User(UserId),
}

/// Command to create a booking
#[derive(Clone, Debug)]
pub struct CreateBooking {
    /// The package being booked
    pub package_id: PackageId,
    /// The traveler buying it
    pub buyer: UserId,
    /// Travel date
    pub date: NaiveDate,
    /// Party size, at least 1
    pub persons: u32,
    /// Total paid, in whole rupees.
    ///
    /// The total is taken from the caller rather than recomputed from the
    /// package price and party size; offer pricing and group adjustments
    /// settle on the client side. This is a deliberate trust boundary —
    /// the payment layer in front of this service is what vouches for the
    /// figure.
    pub total_price: Money,
}

/// Result of a successful booking creation
#[derive(Clone, Debug)]
pub struct CreatedBooking {
    /// The persisted booking
    pub booking: Booking,
    /// Set when the booking was persisted but the package's cumulative
    /// earnings credit was lost. The named package under-reports until the
    /// reconciliation job runs.
    pub ledger_lag: Option<PackageId>,
}

/// A package whose cumulative earnings counter was corrected by the
/// reconciliation job
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconciledPackage {
    /// The corrected package
    pub package_id: PackageId,
    /// The counter value before correction
    pub recorded: Money,
    /// The recomputed value now stored
    pub actual: Money,
}

/// The booking service.
///
/// All collaborators are injected as trait objects, so the same service
/// runs against postgres in production and against in-memory stores in
/// tests.
pub struct BookingService {
    catalog: Arc<dyn PackageCatalog>,
    bookings: Arc<dyn BookingStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
    deletion_policy: DeletionPolicy,
}

impl BookingService {
    /// Create a service with the default [`DeletionPolicy`]
    #[must_use]
    pub fn new(
        catalog: Arc<dyn PackageCatalog>,
        bookings: Arc<dyn BookingStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            bookings,
            users,
            clock,
            deletion_policy: DeletionPolicy::default(),
        }
    }

    /// Override the history-deletion policy
    #[must_use]
    pub const fn with_deletion_policy(mut self, policy: DeletionPolicy) -> Self {
        self.deletion_policy = policy;
        self
    }

    /// Create a booking for `command.buyer` on `command.package_id`.
    ///
    /// The package's current village, guide, and stay-type metadata are
    /// copied into the booking's impact snapshot together with the split of
    /// `total_price`, and the package's cumulative village earnings are
    /// credited with the total. The snapshot is never touched again, so
    /// later package edits do not rewrite history.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the package does not exist
    /// - [`CoreError::Invalid`] if `persons` is zero
    /// - [`CoreError::Unavailable`] if the booking write fails
    #[tracing::instrument(skip(self, command), fields(package_id = %command.package_id, buyer = %command.buyer))]
    pub async fn create_booking(
        &self,
        command: CreateBooking,
    ) -> Result<CreatedBooking, CoreError> {
        if command.persons == 0 {
            return Err(CoreError::Invalid(
                "party size must be at least 1".to_string(),
            ));
        }

        let package = self
            .catalog
            .get(command.package_id)
            .await?
            .ok_or_else(|| CoreError::not_found("package", command.package_id))?;

        let parts = impact::split(command.total_price);
        let booking = Booking {
            id: BookingId::new(),
            buyer: command.buyer,
            package_id: package.id,
            date: command.date,
            persons: command.persons,
            total_price: command.total_price,
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Paid,
            impact: ImpactSnapshot {
                village: package.village.clone(),
                guide_name: package.guide_name.clone(),
                homestay_type: package.homestay_type,
                homestay: parts.homestay,
                guide: parts.guide,
                food: parts.food,
                community: parts.community,
                total_village_income: command.total_price,
            },
            created_at: self.clock.now(),
        };

        let ledger = self.bookings.record(&booking).await?;
        let ledger_lag = match ledger {
            LedgerStatus::Recorded => None,
            LedgerStatus::Lagged => {
                // Not retried here: a blind retry could double-credit. The
                // reconciliation job recomputes the counter from booking
                // sums instead.
                tracing::warn!(
                    package_id = %package.id,
                    amount = %command.total_price,
                    "village earnings credit lost; counter under-reports until reconciled"
                );
                Some(package.id)
            },
        };

        tracing::info!(booking_id = %booking.id, total = %booking.total_price, "booking created");
        Ok(CreatedBooking {
            booking,
            ledger_lag,
        })
    }

    /// Advance every `Booked` record dated strictly before `today` to
    /// `Completed`.
    ///
    /// Idempotent: a second run with the same date changes nothing. Listing
    /// queries call this inline with the injected clock's date, so a
    /// booking becomes `Completed` when next observed rather than exactly
    /// at midnight; schedulers may also call it directly.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unavailable`] if the bulk update fails.
    #[tracing::instrument(skip(self))]
    pub async fn auto_complete_departed(&self, today: NaiveDate) -> Result<u64, CoreError> {
        let completed = self.bookings.complete_departed(today).await?;
        if completed > 0 {
            tracing::info!(completed, "departed bookings marked completed");
        }
        Ok(completed)
    }

    /// Active (`Booked`) bookings in `scope`, joined and searchable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unavailable`] if a storage call fails.
    pub async fn list_current(
        &self,
        scope: ListingScope,
        search_term: &str,
    ) -> Result<Vec<BookingView>, CoreError> {
        self.list(scope, StatusFilter::Is(BookingStatus::Booked), search_term)
            .await
    }

    /// Archived (`Completed` or `Cancelled`) bookings in `scope`, joined
    /// and searchable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unavailable`] if a storage call fails.
    pub async fn list_history(
        &self,
        scope: ListingScope,
        search_term: &str,
    ) -> Result<Vec<BookingView>, CoreError> {
        self.list(
            scope,
            StatusFilter::IsNot(BookingStatus::Booked),
            search_term,
        )
        .await
    }

    async fn list(
        &self,
        scope: ListingScope,
        status: StatusFilter,
        search_term: &str,
    ) -> Result<Vec<BookingView>, CoreError> {
        self.auto_complete_departed(self.clock.today()).await?;

        let filter = BookingFilter {
            buyer: match scope {
                ListingScope::Global => None,
                ListingScope::User(buyer) => Some(buyer),
            },
            status: Some(status),
        };
        let bookings = self.bookings.list(filter).await?;

        // Join first, filter after: a booking whose buyer or package cannot
        // be resolved, or whose joined side misses the search term, drops
        // out of the listing entirely.
        let mut views = Vec::with_capacity(bookings.len());
        for booking in bookings {
            let Some(buyer) = self.users.get(booking.buyer).await? else {
                continue;
            };
            let Some(package) = self.catalog.get(booking.package_id).await? else {
                continue;
            };

            let matched = match scope {
                ListingScope::Global => {
                    contains_ci(&buyer.username, search_term)
                        || contains_ci(&buyer.email, search_term)
                },
                ListingScope::User(_) => contains_ci(&package.name, search_term),
            };
            if !matched {
                continue;
            }

            views.push(BookingView {
                booking,
                buyer,
                package: PackageSummary::from(&package),
            });
        }
        Ok(views)
    }

    /// Cancel a booking on behalf of `requester`.
    ///
    /// Sets status `Cancelled` and payment `Refunded` in one store
    /// operation. Both states are terminal; there is no un-cancel.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the booking does not exist
    /// - [`CoreError::Forbidden`] if `requester` is not the buyer
    /// - [`CoreError::Invalid`] if the booking already reached a terminal
    ///   state
    /// - [`CoreError::Unavailable`] if a storage call fails
    #[tracing::instrument(skip(self), fields(booking_id = %id, requester = %requester))]
    pub async fn cancel_booking(
        &self,
        id: BookingId,
        requester: UserId,
    ) -> Result<(), CoreError> {
        let booking = self
            .bookings
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("booking", id))?;
        if booking.buyer != requester {
            return Err(CoreError::Forbidden(
                "you can only cancel your own bookings".to_string(),
            ));
        }
        if booking.status.is_terminal() {
            return Err(CoreError::Invalid(
                "only active bookings can be cancelled".to_string(),
            ));
        }

        if self.bookings.cancel(id).await? {
            tracing::info!("booking cancelled and payment refunded");
            Ok(())
        } else {
            // The record left the Booked state between the check and the
            // write (departure sweep, most likely).
            Err(CoreError::Invalid(
                "booking is no longer active".to_string(),
            ))
        }
    }

    /// Permanently delete a booking from `owner`'s history on behalf of
    /// `requester`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::Forbidden`] if `requester` is not `owner`, or the
    ///   booking belongs to someone else
    /// - [`CoreError::NotFound`] if the booking does not exist
    /// - [`CoreError::Invalid`] if the configured [`DeletionPolicy`]
    ///   forbids deleting the booking in its current state
    /// - [`CoreError::Unavailable`] if a storage call fails
    #[tracing::instrument(skip(self), fields(booking_id = %id, requester = %requester))]
    pub async fn delete_history(
        &self,
        id: BookingId,
        owner: UserId,
        requester: UserId,
    ) -> Result<(), CoreError> {
        if owner != requester {
            return Err(CoreError::Forbidden(
                "you can only delete your own booking history".to_string(),
            ));
        }

        let booking = self
            .bookings
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("booking", id))?;
        if booking.buyer != requester {
            return Err(CoreError::Forbidden(
                "you can only delete your own booking history".to_string(),
            ));
        }
        if self.deletion_policy == DeletionPolicy::TerminalStatesOnly
            && !booking.status.is_terminal()
        {
            return Err(CoreError::Invalid(
                "active bookings cannot be deleted; cancel first".to_string(),
            ));
        }

        if self.bookings.delete(id).await? {
            tracing::info!("booking history deleted");
            Ok(())
        } else {
            Err(CoreError::not_found("booking", id))
        }
    }

    /// Recompute every package's cumulative village earnings from the sum
    /// of its bookings' totals and overwrite counters that drifted.
    ///
    /// This is the repair path for a lost earnings credit
    /// ([`LedgerStatus::Lagged`]). Returns the packages that were
    /// corrected.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Unavailable`] if a storage call fails.
    #[tracing::instrument(skip(self))]
    pub async fn reconcile_village_earnings(
        &self,
    ) -> Result<Vec<ReconciledPackage>, CoreError> {
        let bookings = self.bookings.list(BookingFilter::default()).await?;
        let packages = self.catalog.all().await?;

        let mut corrected = Vec::new();
        for package in packages {
            let actual = bookings
                .iter()
                .filter(|b| b.package_id == package.id)
                .fold(Money::ZERO, |sum, b| sum.saturating_add(b.total_price));
            if actual == package.total_village_earnings {
                continue;
            }

            self.catalog.set_village_earnings(package.id, actual).await?;
            tracing::warn!(
                package_id = %package.id,
                recorded = %package.total_village_earnings,
                actual = %actual,
                "village earnings counter corrected"
            );
            corrected.push(ReconciledPackage {
                package_id: package.id,
                recorded: package.total_village_earnings,
                actual,
            });
        }
        Ok(corrected)
    }
}

/// Case-insensitive substring match; an empty needle matches everything
fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_term_matches_everything() {
        assert!(contains_ci("anything", ""));
        assert!(contains_ci("", ""));
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        assert!(contains_ci("Araku Valley Homestay", "araku"));
        assert!(contains_ci("priya@example.com", "PRIYA"));
        assert!(!contains_ci("Araku Valley Homestay", "kerala"));
    }
}
