//! Query-side abstraction over the impact aggregates.
//!
//! HTTP handlers depend on [`ImpactQueries`] rather than a concrete
//! backend, so the same router serves the SQL-backed aggregates in
//! production and the in-memory fold in tests and small deployments.

use crate::impact::{self, PlatformImpactStats, UserImpact, VillageTotal};
use async_trait::async_trait;
use std::sync::Arc;
use villagestay_core::error::StoreError;
use villagestay_core::store::{BookingFilter, BookingStore};
use villagestay_core::types::UserId;

/// Read-side interface for the impact aggregates.
#[async_trait]
pub trait ImpactQueries: Send + Sync {
    /// Per-village income and booking counts (the leaderboard).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    async fn village_totals(&self) -> Result<Vec<VillageTotal>, StoreError>;

    /// One user's lifetime impact figure.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    async fn user_impact(&self, user: UserId) -> Result<UserImpact, StoreError>;

    /// Platform-wide dashboard figures over paid bookings.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying query fails.
    async fn platform_stats(&self) -> Result<PlatformImpactStats, StoreError>;
}

/// [`ImpactQueries`] computed by folding over a [`BookingStore`].
///
/// Loads the full booking set and applies the pure aggregation functions.
/// Fine for in-memory stores and modest datasets; the SQL-backed
/// implementation pushes the same grouping into the database instead.
pub struct StoreImpactQueries {
    bookings: Arc<dyn BookingStore>,
}

impl StoreImpactQueries {
    /// Aggregate over `bookings`
    #[must_use]
    pub fn new(bookings: Arc<dyn BookingStore>) -> Self {
        Self { bookings }
    }
}

#[async_trait]
impl ImpactQueries for StoreImpactQueries {
    async fn village_totals(&self) -> Result<Vec<VillageTotal>, StoreError> {
        let bookings = self.bookings.list(BookingFilter::default()).await?;
        Ok(impact::village_totals(&bookings))
    }

    async fn user_impact(&self, user: UserId) -> Result<UserImpact, StoreError> {
        let bookings = self
            .bookings
            .list(BookingFilter {
                buyer: Some(user),
                status: None,
            })
            .await?;
        Ok(impact::user_impact(&bookings, user))
    }

    async fn platform_stats(&self) -> Result<PlatformImpactStats, StoreError> {
        let bookings = self.bookings.list(BookingFilter::default()).await?;
        Ok(impact::platform_stats(&bookings))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;
    use villagestay_core::impact::split;
    use villagestay_core::types::{
        Booking, BookingId, BookingStatus, HomestayType, ImpactSnapshot, Money, PackageId,
        PaymentStatus,
    };
    use villagestay_testing::InMemoryStore;

    async fn seed(store: &InMemoryStore, buyer: UserId, village: &str, total: u64) {
        let total = Money::from_rupees(total);
        let parts = split(total);
        let booking = Booking {
            id: BookingId::new(),
            buyer,
            package_id: PackageId::new(),
            date: Utc::now().date_naive(),
            persons: 1,
            total_price: total,
            status: BookingStatus::Booked,
            payment_status: PaymentStatus::Paid,
            impact: ImpactSnapshot {
                village: village.to_string(),
                guide_name: "Ravi".to_string(),
                homestay_type: HomestayType::Homestay,
                homestay: parts.homestay,
                guide: parts.guide,
                food: parts.food,
                community: parts.community,
                total_village_income: total,
            },
            created_at: Utc::now(),
        };
        store.record(&booking).await.unwrap();
    }

    #[tokio::test]
    async fn store_backed_queries_match_the_pure_aggregation() {
        let store = Arc::new(InMemoryStore::new());
        let priya = UserId::new();
        let vikram = UserId::new();
        seed(&store, priya, "Araku", 997).await;
        seed(&store, priya, "Araku", 503).await;
        seed(&store, vikram, "Kibber", 1_200).await;

        let queries = StoreImpactQueries::new(store);

        let mut totals = queries.village_totals().await.unwrap();
        totals.sort_by(|a, b| a.village.cmp(&b.village));
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].village, "Araku");
        assert_eq!(totals[0].total_income, Money::from_rupees(1_500));
        assert_eq!(totals[0].bookings, 2);

        let impact = queries.user_impact(priya).await.unwrap();
        assert_eq!(impact.total_impact, Money::from_rupees(1_500));
        assert_eq!(impact.trips, 2);

        let stats = queries.platform_stats().await.unwrap();
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.total_money_moved, Money::from_rupees(2_700));
        assert_eq!(stats.villages_supported, 2);
    }
}
