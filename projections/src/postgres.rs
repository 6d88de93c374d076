//! SQL-backed impact aggregates.
//!
//! Pushes the same grouping the pure functions in [`crate::impact`]
//! perform down into postgres. Column semantics match the
//! `villagestay-postgres` migrations; the paid filter binds the stable
//! string form of [`PaymentStatus::Paid`], the same value bookings are
//! written with.

use crate::impact::{PlatformImpactStats, UserImpact, VillageTotal};
use crate::queries::ImpactQueries;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use villagestay_core::error::StoreError;
use villagestay_core::types::{Money, PaymentStatus, UserId};

/// [`ImpactQueries`] evaluated as SQL aggregates over the bookings table.
#[derive(Clone)]
pub struct PostgresImpactQueries {
    pool: Arc<PgPool>,
}

impl PostgresImpactQueries {
    /// Aggregate over the bookings table reachable through `pool`
    #[must_use]
    pub const fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

fn db_err(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn rupees(value: i64, column: &str) -> Result<Money, StoreError> {
    u64::try_from(value)
        .map(Money::from_rupees)
        .map_err(|_| StoreError::Corrupt(format!("negative rupee amount in {column}")))
}

fn count(value: i64, column: &str) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative count in {column}")))
}

#[async_trait]
impl ImpactQueries for PostgresImpactQueries {
    #[tracing::instrument(skip(self))]
    async fn village_totals(&self) -> Result<Vec<VillageTotal>, StoreError> {
        let rows: Vec<(String, i64, i64)> = sqlx::query_as(
            "SELECT impact_village,
                    COALESCE(SUM(impact_total), 0)::BIGINT,
                    COUNT(*)::BIGINT
             FROM bookings
             WHERE impact_village <> ''
             GROUP BY impact_village",
        )
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        rows.into_iter()
            .map(|(village, total_income, bookings)| {
                Ok(VillageTotal {
                    village,
                    total_income: rupees(total_income, "impact_total")?,
                    bookings: count(bookings, "bookings")?,
                })
            })
            .collect()
    }

    #[tracing::instrument(skip(self))]
    async fn user_impact(&self, user: UserId) -> Result<UserImpact, StoreError> {
        let (total_impact, trips): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(impact_total), 0)::BIGINT, COUNT(*)::BIGINT
             FROM bookings
             WHERE buyer_id = $1",
        )
        .bind(user.as_uuid())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        Ok(UserImpact {
            total_impact: rupees(total_impact, "impact_total")?,
            trips: count(trips, "trips")?,
        })
    }

    #[tracing::instrument(skip(self))]
    async fn platform_stats(&self) -> Result<PlatformImpactStats, StoreError> {
        let row: (i64, i64, i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*)::BIGINT,
                    COALESCE(SUM(total_price), 0)::BIGINT,
                    (COUNT(DISTINCT impact_village) FILTER (WHERE impact_village <> ''))::BIGINT,
                    COALESCE(SUM(impact_homestay), 0)::BIGINT,
                    COALESCE(SUM(impact_guide), 0)::BIGINT,
                    COALESCE(SUM(impact_food), 0)::BIGINT,
                    COALESCE(SUM(impact_community), 0)::BIGINT
             FROM bookings
             WHERE payment_status = $1",
        )
        .bind(PaymentStatus::Paid.as_str())
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        Ok(PlatformImpactStats {
            total_bookings: count(row.0, "total_bookings")?,
            total_money_moved: rupees(row.1, "total_price")?,
            villages_supported: count(row.2, "villages_supported")?,
            homestay_income: rupees(row.3, "impact_homestay")?,
            guide_income: rupees(row.4, "impact_guide")?,
            farmer_income: rupees(row.5, "impact_food")?,
            community_funds: rupees(row.6, "impact_community")?,
        })
    }
}
