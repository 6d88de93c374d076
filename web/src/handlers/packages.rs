//! Package catalog endpoints.
//!
//! The catalog is a collaborator of the booking core rather than part of
//! it, but the platform still needs a write surface for it. The one
//! invariant enforced here is the offer rule: an active offer price must
//! be strictly below the base price. Bookings rely on that holding at
//! catalog-write time.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use villagestay_core::types::{HomestayType, Money, Package, PackageId};

/// Request to create or update a package.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageRequest {
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
    /// Base price per person, in whole rupees
    pub price: u64,
    /// Whether a discounted offer price is active
    #[serde(default)]
    pub offer: bool,
    /// Discounted price, in whole rupees
    #[serde(default)]
    pub discount_price: u64,
    /// Name of the local guide partnered with this package
    #[serde(default)]
    pub guide_name: String,
    /// Partner village
    #[serde(default)]
    pub village: String,
    /// Kind of accommodation
    #[serde(default)]
    pub homestay_type: HomestayType,
}

impl PackageRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if self.offer && self.discount_price >= self.price {
            return Err(ApiError::bad_request(
                "offer price must be below the base price",
            ));
        }
        Ok(())
    }
}

/// Response wrapping a single package.
#[derive(Debug, Serialize)]
pub struct PackageResponse {
    /// Operation outcome
    pub success: bool,
    /// Message for the caller
    pub message: String,
    /// The package record
    pub package: Package,
}

/// Response wrapping the package listing.
#[derive(Debug, Serialize)]
pub struct PackageListResponse {
    /// Operation outcome
    pub success: bool,
    /// The catalog, in creation order
    pub packages: Vec<Package>,
}

/// Create a package.
///
/// # Errors
///
/// Returns 400 when the offer invariant is violated, 503 on storage
/// failure.
pub async fn create_package(
    State(state): State<AppState>,
    Json(request): Json<PackageRequest>,
) -> Result<(StatusCode, Json<PackageResponse>), ApiError> {
    request.validate()?;

    let package = Package {
        id: PackageId::new(),
        name: request.name,
        description: request.description,
        destination: request.destination,
        days: request.days,
        nights: request.nights,
        accommodation: request.accommodation,
        transportation: request.transportation,
        meals: request.meals,
        activities: request.activities,
        price: Money::from_rupees(request.price),
        offer: request.offer,
        discount_price: Money::from_rupees(request.discount_price),
        guide_name: request.guide_name,
        village: request.village,
        homestay_type: request.homestay_type,
        total_village_earnings: Money::ZERO,
        created_at: state.clock.now(),
    };
    state
        .catalog
        .insert(&package)
        .await
        .map_err(villagestay_core::CoreError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(PackageResponse {
            success: true,
            message: "Package created!".to_string(),
            package,
        }),
    ))
}

/// List the catalog.
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn list_packages(
    State(state): State<AppState>,
) -> Result<Json<PackageListResponse>, ApiError> {
    let packages = state
        .catalog
        .all()
        .await
        .map_err(villagestay_core::CoreError::from)?;
    Ok(Json(PackageListResponse {
        success: true,
        packages,
    }))
}

/// Fetch one package.
///
/// # Errors
///
/// Returns 404 when the package does not exist, 503 on storage failure.
pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PackageResponse>, ApiError> {
    let id = PackageId::from_uuid(id);
    let package = state
        .catalog
        .get(id)
        .await
        .map_err(villagestay_core::CoreError::from)?
        .ok_or_else(|| ApiError::not_found(format!("package {id} not found")))?;

    Ok(Json(PackageResponse {
        success: true,
        message: String::new(),
        package,
    }))
}

/// Update a package.
///
/// The cumulative earnings counter is not editable through this endpoint;
/// it only moves through bookings and the reconciliation job. Existing
/// bookings keep their snapshots regardless of what changes here.
///
/// # Errors
///
/// Returns 400 when the offer invariant is violated, 404 when the package
/// does not exist, 503 on storage failure.
pub async fn update_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PackageRequest>,
) -> Result<Json<PackageResponse>, ApiError> {
    request.validate()?;

    let id = PackageId::from_uuid(id);
    let existing = state
        .catalog
        .get(id)
        .await
        .map_err(villagestay_core::CoreError::from)?
        .ok_or_else(|| ApiError::not_found(format!("package {id} not found")))?;

    let package = Package {
        id,
        name: request.name,
        description: request.description,
        destination: request.destination,
        days: request.days,
        nights: request.nights,
        accommodation: request.accommodation,
        transportation: request.transportation,
        meals: request.meals,
        activities: request.activities,
        price: Money::from_rupees(request.price),
        offer: request.offer,
        discount_price: Money::from_rupees(request.discount_price),
        guide_name: request.guide_name,
        village: request.village,
        homestay_type: request.homestay_type,
        total_village_earnings: existing.total_village_earnings,
        created_at: existing.created_at,
    };
    let updated = state
        .catalog
        .update(&package)
        .await
        .map_err(villagestay_core::CoreError::from)?;
    if !updated {
        return Err(ApiError::not_found(format!("package {id} not found")));
    }

    Ok(Json(PackageResponse {
        success: true,
        message: "Package updated!".to_string(),
        package,
    }))
}
