//! Fixture builders for tests.

use chrono::{NaiveDate, Utc};
use villagestay_core::booking::CreateBooking;
use villagestay_core::types::{
    HomestayType, Money, Package, PackageId, UserId, UserProfile,
};

/// A package partnered with `village` and guided by `guide_name`.
///
/// Pricing defaults to ₹10,000 with no active offer; the earnings counter
/// starts at zero.
#[must_use]
pub fn package(name: &str, village: &str, guide_name: &str) -> Package {
    Package {
        id: PackageId::new(),
        name: name.to_string(),
        description: format!("Three days with a host family in {village}"),
        destination: village.to_string(),
        days: 3,
        nights: 2,
        accommodation: "Family homestay".to_string(),
        transportation: "Shared jeep from the railhead".to_string(),
        meals: "Home-cooked, thrice daily".to_string(),
        activities: "Farm work, weaving, forest walk".to_string(),
        price: Money::from_rupees(10_000),
        offer: false,
        discount_price: Money::ZERO,
        guide_name: guide_name.to_string(),
        village: village.to_string(),
        homestay_type: HomestayType::Homestay,
        total_village_earnings: Money::ZERO,
        created_at: Utc::now(),
    }
}

/// A user profile named `username`, with a derived example email
#[must_use]
pub fn user(username: &str) -> UserProfile {
    UserProfile {
        id: UserId::new(),
        username: username.to_string(),
        email: format!("{}@example.com", username.to_lowercase()),
    }
}

/// A create-booking command for two travelers
#[must_use]
pub const fn booking_command(
    package_id: PackageId,
    buyer: UserId,
    date: NaiveDate,
    total_price: Money,
) -> CreateBooking {
    CreateBooking {
        package_id,
        buyer,
        date,
        persons: 2,
        total_price,
    }
}
