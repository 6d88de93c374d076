//! Domain types for the VillageStay booking platform.
//!
//! This module contains the value objects and entities shared by every other
//! crate: identifiers, the rupee-denominated [`Money`] type, the package and
//! booking records, and the impact snapshot embedded in each booking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a package
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(Uuid);

impl PackageId {
    /// Creates a new random `PackageId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PackageId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PackageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a user (traveler or admin)
///
/// User records themselves live in the external user directory; the core only
/// carries the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `UserId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (whole rupees; the platform is single-currency INR)
// ============================================================================

/// A rupee amount.
///
/// The platform records whole-rupee amounts only, so `Money` wraps a `u64`
/// rupee count. Negative amounts are unrepresentable, which discharges the
/// non-negativity contract of the impact split engine at the type level.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// The zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from whole rupees
    #[must_use]
    pub const fn from_rupees(rupees: u64) -> Self {
        Self(rupees)
    }

    /// Returns the amount in whole rupees
    #[must_use]
    pub const fn rupees(&self) -> u64 {
        self.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtracts `other` from `self` with underflow checking
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(diff) => Some(Self(diff)),
            None => None,
        }
    }

    /// Adds two amounts, saturating at `u64::MAX`
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// The floor of `percent`% of this amount.
    ///
    /// Computed in 128-bit intermediates, so it cannot overflow for any
    /// `u64` amount and any percentage up to 100.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // product / 100 always fits in u64
    pub const fn percent_floor(self, percent: u64) -> Self {
        Self((self.0 as u128 * percent as u128 / 100) as u64)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

// ============================================================================
// Enumerations
// ============================================================================

/// The kind of accommodation a package offers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HomestayType {
    /// A family homestay
    #[default]
    Homestay,
    /// A working farm stay
    Farmstay,
    /// A traditional mud house
    MudHouse,
    /// An eco lodge
    EcoLodge,
    /// A standard hotel
    StandardHotel,
}

impl HomestayType {
    /// Stable string form, used for storage and display
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Homestay => "Homestay",
            Self::Farmstay => "Farmstay",
            Self::MudHouse => "Mud House",
            Self::EcoLodge => "Eco Lodge",
            Self::StandardHotel => "Standard Hotel",
        }
    }
}

impl fmt::Display for HomestayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomestayType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Homestay" => Ok(Self::Homestay),
            "Farmstay" => Ok(Self::Farmstay),
            "Mud House" => Ok(Self::MudHouse),
            "Eco Lodge" => Ok(Self::EcoLodge),
            "Standard Hotel" => Ok(Self::StandardHotel),
            other => Err(format!("unknown homestay type: {other}")),
        }
    }
}

/// Lifecycle status of a booking.
///
/// Transitions are one-directional: `Booked → Completed` (time-driven, via
/// the departure sweep) or `Booked → Cancelled` (traveler-driven). Both
/// `Completed` and `Cancelled` are terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Active: the trip has not happened yet
    #[default]
    Booked,
    /// The travel date has passed
    Completed,
    /// The traveler cancelled before the trip
    Cancelled,
}

impl BookingStatus {
    /// Stable string form, used for storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Whether no further lifecycle transition can leave this status
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Booked" => Ok(Self::Booked),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Payment status of a booking, tracked independently of the lifecycle.
///
/// There is exactly one spelling of each variant; every aggregation path
/// compares against the same enum value rather than against strings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment has not been captured yet
    #[default]
    Pending,
    /// Payment was captured
    Paid,
    /// Payment was returned after a cancellation
    Refunded,
}

impl PaymentStatus {
    /// Stable string form, used for storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Paid => "Paid",
            Self::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Refunded" => Ok(Self::Refunded),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

// ============================================================================
// Package
// ============================================================================

/// A bookable village-stay offering.
///
/// Owned by the package catalog. Bookings copy the village partnership
/// fields (`village`, `guide_name`, `homestay_type`) into their impact
/// snapshot at creation time, so later edits here never rewrite history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Package identifier
    pub id: PackageId,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Destination shown to travelers
    pub destination: String,
    /// Trip length in days
    pub days: u32,
    /// Trip length in nights
    pub nights: u32,
    /// Accommodation description
    pub accommodation: String,
    /// Transportation description
    pub transportation: String,
    /// Meals description
    pub meals: String,
    /// Activities description
    pub activities: String,
    /// Base price per person
    pub price: Money,
    /// Whether a discounted offer price is active
    pub offer: bool,
    /// Discounted price; meaningful only when `offer` is set, and then it
    /// must be strictly below `price` (enforced at catalog-write time)
    pub discount_price: Money,
    /// Name of the local guide partnered with this package
    pub guide_name: String,
    /// Partner village; empty when the package has no village partner
    pub village: String,
    /// Kind of accommodation
    pub homestay_type: HomestayType,
    /// Cumulative earnings credited to the partner village.
    ///
    /// Monotonically increasing counter, bumped by the booking total on
    /// every successful booking.
    pub total_village_earnings: Money,
    /// When the package was created
    pub created_at: DateTime<Utc>,
}

impl Package {
    /// Whether the package carries village partnership data
    #[must_use]
    pub fn has_village(&self) -> bool {
        !self.village.is_empty()
    }
}

/// The package fields a booking listing exposes alongside each booking
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSummary {
    /// Package identifier
    pub id: PackageId,
    /// Display name
    pub name: String,
    /// Destination shown to travelers
    pub destination: String,
    /// Base price per person
    pub price: Money,
    /// Whether a discounted offer price is active
    pub offer: bool,
    /// Discounted price
    pub discount_price: Money,
}

impl From<&Package> for PackageSummary {
    fn from(package: &Package) -> Self {
        Self {
            id: package.id,
            name: package.name.clone(),
            destination: package.destination.clone(),
            price: package.price,
            offer: package.offer,
            discount_price: package.discount_price,
        }
    }
}

// ============================================================================
// Impact snapshot
// ============================================================================

/// The immutable record of how one booking's total was split.
///
/// Captured once, at booking creation, from the package's then-current
/// partnership metadata and the split engine's output. It is never
/// recomputed, so `homestay + guide + food + community` equals
/// `total_village_income` equals the booking total for the life of the
/// record, whatever happens to the referenced package afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactSnapshot {
    /// Partner village at booking time; empty when the package had none
    pub village: String,
    /// Local guide at booking time
    pub guide_name: String,
    /// Accommodation kind at booking time
    pub homestay_type: HomestayType,
    /// Share paid to the homestay family
    pub homestay: Money,
    /// Share paid to the local guide
    pub guide: Money,
    /// Share paid to food suppliers
    pub food: Money,
    /// Share paid into the community fund
    pub community: Money,
    /// Sum of the four shares; always equals the booking total
    pub total_village_income: Money,
}

impl ImpactSnapshot {
    /// Whether the four shares reconcile with the recorded total
    #[must_use]
    pub fn reconciles(&self) -> bool {
        self.homestay
            .checked_add(self.guide)
            .and_then(|sum| sum.checked_add(self.food))
            .and_then(|sum| sum.checked_add(self.community))
            == Some(self.total_village_income)
    }
}

// ============================================================================
// Booking
// ============================================================================

/// A single purchase of a package by a buyer for a date and party size
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// The traveler who bought the package
    pub buyer: UserId,
    /// The package that was booked
    pub package_id: PackageId,
    /// Travel date
    pub date: NaiveDate,
    /// Party size, at least 1
    pub persons: u32,
    /// Total paid, in whole rupees
    pub total_price: Money,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Impact snapshot captured at creation
    pub impact: ImpactSnapshot,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// User directory records and listing views
// ============================================================================

/// Read-only profile of a user, as supplied by the external user directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier
    pub id: UserId,
    /// Login name
    pub username: String,
    /// Contact email
    pub email: String,
}

/// A booking joined with its buyer profile and package summary.
///
/// Listing queries return views rather than bare bookings: the buyer and
/// package are resolved first, and search filters run against the joined
/// fields. A booking whose buyer or package cannot be resolved is dropped
/// from the listing entirely.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BookingView {
    /// The booking record
    pub booking: Booking,
    /// The resolved buyer profile
    pub buyer: UserProfile,
    /// The resolved package summary
    pub package: PackageSummary,
}
