//! `BookingStore` implementation.

use crate::catalog::{rupees_from_row, rupees_to_db};
use crate::{db_err, PostgresStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgRow;
use sqlx::{QueryBuilder, Row};
use villagestay_core::error::StoreError;
use villagestay_core::store::{BookingFilter, BookingStore, LedgerStatus, StatusFilter};
use villagestay_core::types::{
    Booking, BookingId, BookingStatus, HomestayType, ImpactSnapshot, PackageId, PaymentStatus,
    UserId,
};

const BOOKING_COLUMNS: &str = "id, buyer_id, package_id, travel_date, persons, total_price, \
     status, payment_status, impact_village, impact_guide_name, impact_homestay_type, \
     impact_homestay, impact_guide, impact_food, impact_community, impact_total, created_at";

fn booking_from_row(row: &PgRow) -> Result<Booking, StoreError> {
    let persons: i32 = row.try_get("persons").map_err(db_err)?;
    let status: String = row.try_get("status").map_err(db_err)?;
    let payment_status: String = row.try_get("payment_status").map_err(db_err)?;
    let homestay_type: String = row.try_get("impact_homestay_type").map_err(db_err)?;

    Ok(Booking {
        id: BookingId::from_uuid(row.try_get("id").map_err(db_err)?),
        buyer: UserId::from_uuid(row.try_get("buyer_id").map_err(db_err)?),
        package_id: PackageId::from_uuid(row.try_get("package_id").map_err(db_err)?),
        date: row.try_get("travel_date").map_err(db_err)?,
        persons: u32::try_from(persons)
            .map_err(|_| StoreError::Corrupt("negative party size".to_string()))?,
        total_price: rupees_from_row(row, "total_price")?,
        status: status.parse::<BookingStatus>().map_err(StoreError::Corrupt)?,
        payment_status: payment_status
            .parse::<PaymentStatus>()
            .map_err(StoreError::Corrupt)?,
        impact: ImpactSnapshot {
            village: row.try_get("impact_village").map_err(db_err)?,
            guide_name: row.try_get("impact_guide_name").map_err(db_err)?,
            homestay_type: homestay_type
                .parse::<HomestayType>()
                .map_err(StoreError::Corrupt)?,
            homestay: rupees_from_row(row, "impact_homestay")?,
            guide: rupees_from_row(row, "impact_guide")?,
            food: rupees_from_row(row, "impact_food")?,
            community: rupees_from_row(row, "impact_community")?,
            total_village_income: rupees_from_row(row, "impact_total")?,
        },
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl BookingStore for PostgresStore {
    /// The booking insert and the village-earnings credit commit inside
    /// one transaction; either both land or neither does, so this
    /// implementation never reports [`LedgerStatus::Lagged`].
    #[tracing::instrument(skip(self, booking), fields(booking_id = %booking.id))]
    async fn record(&self, booking: &Booking) -> Result<LedgerStatus, StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        sqlx::query(
            "INSERT INTO bookings (id, buyer_id, package_id, travel_date, persons, total_price, \
             status, payment_status, impact_village, impact_guide_name, impact_homestay_type, \
             impact_homestay, impact_guide, impact_food, impact_community, impact_total, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
        )
        .bind(booking.id.as_uuid())
        .bind(booking.buyer.as_uuid())
        .bind(booking.package_id.as_uuid())
        .bind(booking.date)
        .bind(i32::try_from(booking.persons).map_err(|_| {
            StoreError::Corrupt("party size exceeds the storage range".to_string())
        })?)
        .bind(rupees_to_db(booking.total_price, "total_price")?)
        .bind(booking.status.as_str())
        .bind(booking.payment_status.as_str())
        .bind(&booking.impact.village)
        .bind(&booking.impact.guide_name)
        .bind(booking.impact.homestay_type.as_str())
        .bind(rupees_to_db(booking.impact.homestay, "impact_homestay")?)
        .bind(rupees_to_db(booking.impact.guide, "impact_guide")?)
        .bind(rupees_to_db(booking.impact.food, "impact_food")?)
        .bind(rupees_to_db(booking.impact.community, "impact_community")?)
        .bind(rupees_to_db(booking.impact.total_village_income, "impact_total")?)
        .bind(booking.created_at)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        sqlx::query(
            "UPDATE packages SET total_village_earnings = total_village_earnings + $2 \
             WHERE id = $1",
        )
        .bind(booking.package_id.as_uuid())
        .bind(rupees_to_db(booking.total_price, "total_village_earnings")?)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        tx.commit().await.map_err(db_err)?;

        metrics::counter!("villagestay_bookings_recorded_total").increment(1);
        Ok(LedgerStatus::Recorded)
    }

    #[tracing::instrument(skip(self), fields(booking_id = %id))]
    async fn get(&self, id: BookingId) -> Result<Option<Booking>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        row.as_ref().map(booking_from_row).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, StoreError> {
        let mut query: QueryBuilder<'_, sqlx::Postgres> = QueryBuilder::new(format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE TRUE"
        ));
        if let Some(buyer) = filter.buyer {
            query.push(" AND buyer_id = ");
            query.push_bind(*buyer.as_uuid());
        }
        match filter.status {
            Some(StatusFilter::Is(status)) => {
                query.push(" AND status = ");
                query.push_bind(status.as_str());
            },
            Some(StatusFilter::IsNot(status)) => {
                query.push(" AND status <> ");
                query.push_bind(status.as_str());
            },
            None => {},
        }
        query.push(" ORDER BY created_at ASC");

        let rows = query
            .build()
            .fetch_all(self.pool.as_ref())
            .await
            .map_err(db_err)?;
        rows.iter().map(booking_from_row).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn complete_departed(&self, cutoff: NaiveDate) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $1 WHERE status = $2 AND travel_date < $3",
        )
        .bind(BookingStatus::Completed.as_str())
        .bind(BookingStatus::Booked.as_str())
        .bind(cutoff)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        let completed = result.rows_affected();
        if completed > 0 {
            metrics::counter!("villagestay_bookings_completed_total").increment(completed);
        }
        Ok(completed)
    }

    #[tracing::instrument(skip(self), fields(booking_id = %id))]
    async fn cancel(&self, id: BookingId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = $2, payment_status = $3 \
             WHERE id = $1 AND status = $4",
        )
        .bind(id.as_uuid())
        .bind(BookingStatus::Cancelled.as_str())
        .bind(PaymentStatus::Refunded.as_str())
        .bind(BookingStatus::Booked.as_str())
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        let cancelled = result.rows_affected() > 0;
        if cancelled {
            metrics::counter!("villagestay_bookings_cancelled_total").increment(1);
        }
        Ok(cancelled)
    }

    #[tracing::instrument(skip(self), fields(booking_id = %id))]
    async fn delete(&self, id: BookingId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool.as_ref())
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
