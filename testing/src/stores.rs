//! In-memory implementations of the VillageStay storage traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use villagestay_core::error::StoreError;
use villagestay_core::store::{
    BookingFilter, BookingStore, LedgerStatus, PackageCatalog, UserDirectory,
};
use villagestay_core::types::{
    Booking, BookingId, BookingStatus, Money, Package, PackageId, PaymentStatus, UserId,
    UserProfile,
};

#[derive(Default)]
struct Inner {
    packages: HashMap<PackageId, Package>,
    bookings: Vec<Booking>,
    users: HashMap<UserId, UserProfile>,
}

/// A single in-process store implementing [`PackageCatalog`],
/// [`BookingStore`], and [`UserDirectory`].
///
/// All state sits behind one mutex, so the booking insert and the earnings
/// credit in [`BookingStore::record`] are trivially atomic — unless the
/// earnings fault is armed via [`InMemoryStore::fail_next_earnings_credit`],
/// which drops exactly one credit after the insert to exercise the
/// ledger-lag path.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
    drop_next_credit: AtomicBool,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user profile into the directory
    ///
    /// # Panics
    ///
    /// Panics if the store mutex is poisoned.
    #[allow(clippy::unwrap_used)] // seeding helper, test-setup ergonomics
    pub fn put_user(&self, user: UserProfile) {
        self.inner.lock().unwrap().users.insert(user.id, user);
    }

    /// Arm the fault that loses the next booking's earnings credit.
    ///
    /// The next [`BookingStore::record`] call persists its booking but
    /// reports [`LedgerStatus::Lagged`]; subsequent calls behave normally.
    pub fn fail_next_earnings_credit(&self) {
        self.drop_next_credit.store(true, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl PackageCatalog for InMemoryStore {
    async fn get(&self, id: PackageId) -> Result<Option<Package>, StoreError> {
        Ok(self.lock()?.packages.get(&id).cloned())
    }

    async fn all(&self) -> Result<Vec<Package>, StoreError> {
        let inner = self.lock()?;
        let mut packages: Vec<Package> = inner.packages.values().cloned().collect();
        packages.sort_by_key(|p| p.created_at);
        Ok(packages)
    }

    async fn insert(&self, package: &Package) -> Result<(), StoreError> {
        self.lock()?.packages.insert(package.id, package.clone());
        Ok(())
    }

    async fn update(&self, package: &Package) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        if inner.packages.contains_key(&package.id) {
            inner.packages.insert(package.id, package.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn add_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner.packages.get_mut(&id) {
            Some(package) => {
                package.total_village_earnings =
                    package.total_village_earnings.saturating_add(amount);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn set_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner.packages.get_mut(&id) {
            Some(package) => {
                package.total_village_earnings = amount;
                Ok(true)
            },
            None => Ok(false),
        }
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn record(&self, booking: &Booking) -> Result<LedgerStatus, StoreError> {
        let mut inner = self.lock()?;
        inner.bookings.push(booking.clone());

        if self.drop_next_credit.swap(false, Ordering::SeqCst) {
            return Ok(LedgerStatus::Lagged);
        }
        if let Some(package) = inner.packages.get_mut(&booking.package_id) {
            package.total_village_earnings = package
                .total_village_earnings
                .saturating_add(booking.total_price);
        }
        Ok(LedgerStatus::Recorded)
    }

    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        Ok(self.lock()?.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let inner = self.lock()?;
        let mut matched: Vec<Booking> = inner
            .bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matched.sort_by_key(|b| b.created_at);
        Ok(matched)
    }

    async fn complete_departed(&self, cutoff: NaiveDate) -> Result<u64, StoreError> {
        let mut inner = self.lock()?;
        let mut completed = 0;
        for booking in &mut inner.bookings {
            if booking.status == BookingStatus::Booked && booking.date < cutoff {
                booking.status = BookingStatus::Completed;
                completed += 1;
            }
        }
        Ok(completed)
    }

    async fn cancel(&self, id: BookingId) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        match inner
            .bookings
            .iter_mut()
            .find(|b| b.id == id && b.status == BookingStatus::Booked)
        {
            Some(booking) => {
                booking.status = BookingStatus::Cancelled;
                booking.payment_status = PaymentStatus::Refunded;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    async fn delete(&self, id: BookingId) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        let before = inner.bookings.len();
        inner.bookings.retain(|b| b.id != id);
        Ok(inner.bookings.len() < before)
    }
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }
}
