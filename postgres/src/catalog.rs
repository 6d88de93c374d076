//! `PackageCatalog` implementation.

use crate::{db_err, PostgresStore};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::Row;
use villagestay_core::error::StoreError;
use villagestay_core::store::PackageCatalog;
use villagestay_core::types::{HomestayType, Money, Package, PackageId};

const PACKAGE_COLUMNS: &str = "id, name, description, destination, days, nights, \
     accommodation, transportation, meals, activities, price, offer, discount_price, \
     guide_name, village, homestay_type, total_village_earnings, created_at";

pub(crate) fn rupees_from_row(row: &PgRow, column: &str) -> Result<Money, StoreError> {
    let raw: i64 = row.try_get(column).map_err(db_err)?;
    u64::try_from(raw)
        .map(Money::from_rupees)
        .map_err(|_| StoreError::Corrupt(format!("negative rupee amount in {column}")))
}

pub(crate) fn rupees_to_db(amount: Money, column: &str) -> Result<i64, StoreError> {
    i64::try_from(amount.rupees())
        .map_err(|_| StoreError::Corrupt(format!("{column} exceeds the storage range")))
}

fn package_from_row(row: &PgRow) -> Result<Package, StoreError> {
    let homestay_type: String = row.try_get("homestay_type").map_err(db_err)?;
    let days: i32 = row.try_get("days").map_err(db_err)?;
    let nights: i32 = row.try_get("nights").map_err(db_err)?;

    Ok(Package {
        id: PackageId::from_uuid(row.try_get("id").map_err(db_err)?),
        name: row.try_get("name").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        destination: row.try_get("destination").map_err(db_err)?,
        days: u32::try_from(days)
            .map_err(|_| StoreError::Corrupt("negative days".to_string()))?,
        nights: u32::try_from(nights)
            .map_err(|_| StoreError::Corrupt("negative nights".to_string()))?,
        accommodation: row.try_get("accommodation").map_err(db_err)?,
        transportation: row.try_get("transportation").map_err(db_err)?,
        meals: row.try_get("meals").map_err(db_err)?,
        activities: row.try_get("activities").map_err(db_err)?,
        price: rupees_from_row(row, "price")?,
        offer: row.try_get("offer").map_err(db_err)?,
        discount_price: rupees_from_row(row, "discount_price")?,
        guide_name: row.try_get("guide_name").map_err(db_err)?,
        village: row.try_get("village").map_err(db_err)?,
        homestay_type: homestay_type
            .parse::<HomestayType>()
            .map_err(StoreError::Corrupt)?,
        total_village_earnings: rupees_from_row(row, "total_village_earnings")?,
        created_at: row.try_get("created_at").map_err(db_err)?,
    })
}

#[async_trait]
impl PackageCatalog for PostgresStore {
    #[tracing::instrument(skip(self), fields(package_id = %id))]
    async fn get(&self, id: PackageId) -> Result<Option<Package>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        row.as_ref().map(package_from_row).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn all(&self) -> Result<Vec<Package>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY created_at ASC"
        ))
        .fetch_all(self.pool.as_ref())
        .await
        .map_err(db_err)?;

        rows.iter().map(package_from_row).collect()
    }

    #[tracing::instrument(skip(self, package), fields(package_id = %package.id))]
    async fn insert(&self, package: &Package) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO packages (id, name, description, destination, days, nights, \
             accommodation, transportation, meals, activities, price, offer, discount_price, \
             guide_name, village, homestay_type, total_village_earnings, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)",
        )
        .bind(package.id.as_uuid())
        .bind(&package.name)
        .bind(&package.description)
        .bind(&package.destination)
        .bind(i32::try_from(package.days).map_err(|_| StoreError::Corrupt("days exceeds the storage range".to_string()))?)
        .bind(i32::try_from(package.nights).map_err(|_| StoreError::Corrupt("nights exceeds the storage range".to_string()))?)
        .bind(&package.accommodation)
        .bind(&package.transportation)
        .bind(&package.meals)
        .bind(&package.activities)
        .bind(rupees_to_db(package.price, "price")?)
        .bind(package.offer)
        .bind(rupees_to_db(package.discount_price, "discount_price")?)
        .bind(&package.guide_name)
        .bind(&package.village)
        .bind(package.homestay_type.as_str())
        .bind(rupees_to_db(package.total_village_earnings, "total_village_earnings")?)
        .bind(package.created_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;
        Ok(())
    }

    #[tracing::instrument(skip(self, package), fields(package_id = %package.id))]
    async fn update(&self, package: &Package) -> Result<bool, StoreError> {
        // The earnings counter is deliberately absent: regular edits must
        // not race the concurrent credit path.
        let result = sqlx::query(
            "UPDATE packages SET name = $2, description = $3, destination = $4, days = $5, \
             nights = $6, accommodation = $7, transportation = $8, meals = $9, activities = $10, \
             price = $11, offer = $12, discount_price = $13, guide_name = $14, village = $15, \
             homestay_type = $16 \
             WHERE id = $1",
        )
        .bind(package.id.as_uuid())
        .bind(&package.name)
        .bind(&package.description)
        .bind(&package.destination)
        .bind(i32::try_from(package.days).map_err(|_| StoreError::Corrupt("days exceeds the storage range".to_string()))?)
        .bind(i32::try_from(package.nights).map_err(|_| StoreError::Corrupt("nights exceeds the storage range".to_string()))?)
        .bind(&package.accommodation)
        .bind(&package.transportation)
        .bind(&package.meals)
        .bind(&package.activities)
        .bind(rupees_to_db(package.price, "price")?)
        .bind(package.offer)
        .bind(rupees_to_db(package.discount_price, "discount_price")?)
        .bind(&package.guide_name)
        .bind(&package.village)
        .bind(package.homestay_type.as_str())
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(package_id = %id, amount = %amount))]
    async fn add_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError> {
        // Single-statement read-modify-write; concurrent credits serialize
        // on the row lock and never lose updates.
        let result = sqlx::query(
            "UPDATE packages SET total_village_earnings = total_village_earnings + $2 \
             WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(rupees_to_db(amount, "total_village_earnings")?)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(package_id = %id, amount = %amount))]
    async fn set_village_earnings(
        &self,
        id: PackageId,
        amount: Money,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE packages SET total_village_earnings = $2 WHERE id = $1",
        )
        .bind(id.as_uuid())
        .bind(rupees_to_db(amount, "total_village_earnings")?)
        .execute(self.pool.as_ref())
        .await
        .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
