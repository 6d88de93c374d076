//! Impact aggregation over booking records.
//!
//! Everything here derives from the bookings' impact snapshots alone — the
//! package catalog's own village list never feeds these figures, so a
//! village appears exactly when at least one booking carries its name.
//!
//! Two aggregate surfaces exist side by side and must stay in step:
//! [`village_totals`] (the leaderboard, over every booking) and
//! [`platform_stats`] (the impact dashboard, over paid bookings). Both
//! read the same records, and the paid filter is the single
//! [`counts_toward_platform`] predicate comparing against
//! [`PaymentStatus::Paid`] — there is deliberately no second spelling of
//! that status anywhere.

use serde::Serialize;
use std::collections::BTreeMap;
use villagestay_core::types::{Booking, Money, PaymentStatus, UserId};

/// One village's aggregate row in the leaderboard
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageTotal {
    /// Village name, as captured in booking snapshots
    pub village: String,
    /// Sum of `total_village_income` across the village's bookings
    pub total_income: Money,
    /// Number of bookings naming the village
    pub bookings: u64,
}

/// One traveler's lifetime impact figure
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImpact {
    /// Sum of `total_village_income` across all the user's bookings,
    /// cancelled trips included
    pub total_impact: Money,
    /// Number of bookings, in any lifecycle state
    pub trips: u64,
}

/// Platform-wide impact dashboard figures, over paid bookings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformImpactStats {
    /// Number of paid bookings
    pub total_bookings: u64,
    /// Sum of booking totals
    pub total_money_moved: Money,
    /// Number of distinct villages named by paid bookings
    pub villages_supported: u64,
    /// Sum of homestay-family shares
    pub homestay_income: Money,
    /// Sum of local-guide shares
    pub guide_income: Money,
    /// Sum of food-supplier shares
    pub farmer_income: Money,
    /// Sum of community-fund shares
    pub community_funds: Money,
}

/// The one payment predicate the platform dashboard filters on
#[must_use]
pub fn counts_toward_platform(booking: &Booking) -> bool {
    booking.payment_status == PaymentStatus::Paid
}

/// Group bookings by snapshot village, summing income and counting trips.
///
/// Bookings whose snapshot carries no village name are skipped. Every
/// lifecycle and payment state counts; order of the result is unspecified.
#[must_use]
pub fn village_totals(bookings: &[Booking]) -> Vec<VillageTotal> {
    let mut groups: BTreeMap<&str, (Money, u64)> = BTreeMap::new();
    for booking in bookings {
        if booking.impact.village.is_empty() {
            continue;
        }
        let entry = groups
            .entry(booking.impact.village.as_str())
            .or_insert((Money::ZERO, 0));
        entry.0 = entry.0.saturating_add(booking.impact.total_village_income);
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(village, (total_income, bookings))| VillageTotal {
            village: village.to_string(),
            total_income,
            bookings,
        })
        .collect()
}

/// One user's lifetime impact: income sum and trip count over ALL their
/// bookings, whatever the lifecycle or payment state — a cancelled trip
/// still moved money through the village when it was sold.
#[must_use]
pub fn user_impact(bookings: &[Booking], user: UserId) -> UserImpact {
    bookings
        .iter()
        .filter(|b| b.buyer == user)
        .fold(UserImpact::default(), |acc, b| UserImpact {
            total_impact: acc.total_impact.saturating_add(b.impact.total_village_income),
            trips: acc.trips + 1,
        })
}

/// Platform-wide dashboard figures over paid bookings
#[must_use]
pub fn platform_stats(bookings: &[Booking]) -> PlatformImpactStats {
    let mut stats = PlatformImpactStats::default();
    let mut villages: std::collections::BTreeSet<&str> = std::collections::BTreeSet::new();

    for booking in bookings.iter().filter(|b| counts_toward_platform(b)) {
        stats.total_bookings += 1;
        stats.total_money_moved = stats.total_money_moved.saturating_add(booking.total_price);
        stats.homestay_income = stats.homestay_income.saturating_add(booking.impact.homestay);
        stats.guide_income = stats.guide_income.saturating_add(booking.impact.guide);
        stats.farmer_income = stats.farmer_income.saturating_add(booking.impact.food);
        stats.community_funds = stats.community_funds.saturating_add(booking.impact.community);
        if !booking.impact.village.is_empty() {
            villages.insert(booking.impact.village.as_str());
        }
    }

    stats.villages_supported = villages.len() as u64;
    stats
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::Utc;
    use villagestay_core::impact::split;
    use villagestay_core::types::{
        Booking, BookingId, BookingStatus, HomestayType, ImpactSnapshot, PackageId,
    };

    fn booking(
        buyer: UserId,
        village: &str,
        total: u64,
        status: BookingStatus,
        payment: PaymentStatus,
    ) -> Booking {
        let total = Money::from_rupees(total);
        let parts = split(total);
        Booking {
            id: BookingId::new(),
            buyer,
            package_id: PackageId::new(),
            date: Utc::now().date_naive(),
            persons: 2,
            total_price: total,
            status,
            payment_status: payment,
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
        }
    }

    #[test]
    fn village_totals_group_and_count_exactly() {
        let buyer = UserId::new();
        let bookings = vec![
            booking(buyer, "A", 400, BookingStatus::Booked, PaymentStatus::Paid),
            booking(buyer, "A", 350, BookingStatus::Completed, PaymentStatus::Paid),
            booking(buyer, "A", 250, BookingStatus::Cancelled, PaymentStatus::Refunded),
            booking(buyer, "B", 300, BookingStatus::Booked, PaymentStatus::Paid),
            booking(buyer, "B", 200, BookingStatus::Booked, PaymentStatus::Paid),
        ];

        let mut totals = village_totals(&bookings);
        totals.sort_by(|a, b| a.village.cmp(&b.village));
        assert_eq!(
            totals,
            vec![
                VillageTotal {
                    village: "A".to_string(),
                    total_income: Money::from_rupees(1_000),
                    bookings: 3,
                },
                VillageTotal {
                    village: "B".to_string(),
                    total_income: Money::from_rupees(500),
                    bookings: 2,
                },
            ]
        );
    }

    #[test]
    fn bookings_without_a_village_never_surface() {
        let buyer = UserId::new();
        let bookings = vec![booking(buyer, "", 900, BookingStatus::Booked, PaymentStatus::Paid)];
        assert!(village_totals(&bookings).is_empty());

        let stats = platform_stats(&bookings);
        assert_eq!(stats.villages_supported, 0);
        assert_eq!(stats.total_bookings, 1);
    }

    #[test]
    fn user_impact_counts_cancelled_trips() {
        let buyer = UserId::new();
        let other = UserId::new();
        let bookings = vec![
            booking(buyer, "A", 300, BookingStatus::Booked, PaymentStatus::Paid),
            booking(buyer, "A", 200, BookingStatus::Cancelled, PaymentStatus::Refunded),
            booking(other, "A", 999, BookingStatus::Booked, PaymentStatus::Paid),
        ];

        let impact = user_impact(&bookings, buyer);
        assert_eq!(impact.total_impact, Money::from_rupees(500));
        assert_eq!(impact.trips, 2);
    }

    #[test]
    fn user_with_no_bookings_defaults_to_zero() {
        assert_eq!(user_impact(&[], UserId::new()), UserImpact::default());
    }

    #[test]
    fn platform_stats_cover_only_paid_bookings() {
        let buyer = UserId::new();
        let bookings = vec![
            booking(buyer, "A", 997, BookingStatus::Booked, PaymentStatus::Paid),
            booking(buyer, "B", 500, BookingStatus::Completed, PaymentStatus::Paid),
            booking(buyer, "C", 800, BookingStatus::Cancelled, PaymentStatus::Refunded),
            booking(buyer, "D", 700, BookingStatus::Booked, PaymentStatus::Pending),
        ];

        let stats = platform_stats(&bookings);
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.total_money_moved, Money::from_rupees(1_497));
        assert_eq!(stats.villages_supported, 2);
        // Split sums reconcile category-by-category with the split engine
        assert_eq!(stats.homestay_income, Money::from_rupees(498 + 250));
        assert_eq!(stats.guide_income, Money::from_rupees(249 + 125));
        assert_eq!(stats.farmer_income, Money::from_rupees(149 + 75));
        assert_eq!(stats.community_funds, Money::from_rupees(101 + 50));
    }

    /// Both aggregate surfaces read the same records with the same payment
    /// value bookings are created with: while nothing is refunded, the
    /// dashboard's money-moved figure equals the leaderboard's income sum.
    #[test]
    fn dashboard_and_leaderboard_agree_over_never_refunded_bookings() {
        let buyer = UserId::new();
        let bookings = vec![
            booking(buyer, "A", 997, BookingStatus::Booked, PaymentStatus::Paid),
            booking(buyer, "A", 503, BookingStatus::Completed, PaymentStatus::Paid),
            booking(buyer, "B", 1_200, BookingStatus::Booked, PaymentStatus::Paid),
        ];

        let leaderboard_sum = village_totals(&bookings)
            .iter()
            .fold(Money::ZERO, |sum, v| sum.saturating_add(v.total_income));
        let stats = platform_stats(&bookings);
        assert_eq!(stats.total_money_moved, leaderboard_sum);
        assert_eq!(
            stats.total_bookings,
            village_totals(&bookings).iter().map(|v| v.bookings).sum::<u64>()
        );
    }
}
