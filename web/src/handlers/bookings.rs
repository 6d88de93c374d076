//! Booking lifecycle endpoints.
//!
//! Listing endpoints run the departure sweep inline before they read, so a
//! past-dated booking shows up as `Completed` the next time anyone looks,
//! without any background scheduler.

use crate::error::ApiError;
use crate::extractors::Requester;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use villagestay_core::booking::{CreateBooking, ListingScope};
use villagestay_core::types::{Booking, BookingId, BookingView, Money, PackageId, UserId};

/// Request to book a package.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    /// The buyer; must match the authenticated requester
    pub buyer_id: Uuid,
    /// Travel date (ISO `YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Party size
    pub persons: u32,
    /// Total paid, in whole rupees. Offer pricing and per-person
    /// arithmetic settle client-side; the payment layer vouches for the
    /// figure.
    pub total_price: u64,
}

/// Response after booking a package.
#[derive(Debug, Serialize)]
pub struct CreateBookingResponse {
    /// Operation outcome
    pub success: bool,
    /// Message for the caller
    pub message: String,
    /// Fixed currency tag for the amounts in `booking`
    pub currency: &'static str,
    /// The created booking, impact snapshot included
    pub booking: Booking,
}

/// Query string accepted by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Case-insensitive substring filter; matches buyer username/email on
    /// the global listings and package name on the per-user listings
    #[serde(default)]
    pub search_term: String,
}

/// Response wrapping a booking listing.
#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    /// Whether anything matched
    pub success: bool,
    /// The joined booking views, oldest first
    pub bookings: Vec<BookingView>,
    /// Empty-result hint, mirroring the listing contract
    pub message: String,
}

impl BookingListResponse {
    fn from_views(bookings: Vec<BookingView>) -> Self {
        let success = !bookings.is_empty();
        Self {
            success,
            message: if success {
                String::new()
            } else {
                "No Bookings Available".to_string()
            },
            bookings,
        }
    }
}

/// Response for cancel/delete operations.
#[derive(Debug, Serialize)]
pub struct BookingActionResponse {
    /// Operation outcome
    pub success: bool,
    /// Message for the caller
    pub message: String,
}

/// Book a package.
///
/// # Errors
///
/// Returns 403 when the body's buyer differs from the requester, 404 for
/// an unknown package, 400 for a zero party size, 503 on storage failure.
pub async fn create_booking(
    Requester(requester): Requester,
    State(state): State<AppState>,
    Path(package_id): Path<Uuid>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<CreateBookingResponse>), ApiError> {
    let buyer = UserId::from_uuid(request.buyer_id);
    if buyer != requester {
        return Err(ApiError::forbidden("you can only book for yourself"));
    }

    let created = state
        .service
        .create_booking(CreateBooking {
            package_id: PackageId::from_uuid(package_id),
            buyer,
            date: request.date,
            persons: request.persons,
            total_price: Money::from_rupees(request.total_price),
        })
        .await?;

    let message = if created.ledger_lag.is_some() {
        "Package booked; village earnings ledger is catching up".to_string()
    } else {
        "Package booked and village funds distributed!".to_string()
    };
    Ok((
        StatusCode::CREATED,
        Json(CreateBookingResponse {
            success: true,
            message,
            currency: "INR",
            booking: created.booking,
        }),
    ))
}

/// Active bookings across all buyers (admin view).
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn list_current_bookings(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let views = state
        .service
        .list_current(ListingScope::Global, &query.search_term)
        .await?;
    Ok(Json(BookingListResponse::from_views(views)))
}

/// Archived bookings across all buyers (admin view).
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn list_booking_history(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let views = state
        .service
        .list_history(ListingScope::Global, &query.search_term)
        .await?;
    Ok(Json(BookingListResponse::from_views(views)))
}

fn require_self(requester: UserId, path_user: Uuid, action: &str) -> Result<UserId, ApiError> {
    let path_user = UserId::from_uuid(path_user);
    if requester == path_user {
        Ok(path_user)
    } else {
        Err(ApiError::forbidden(format!(
            "you can only {action} your own bookings"
        )))
    }
}

/// One traveler's active bookings.
///
/// # Errors
///
/// Returns 403 when the path user differs from the requester, 503 on
/// storage failure.
pub async fn list_user_current_bookings(
    Requester(requester): Requester,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let user = require_self(requester, user_id, "list")?;
    let views = state
        .service
        .list_current(ListingScope::User(user), &query.search_term)
        .await?;
    Ok(Json(BookingListResponse::from_views(views)))
}

/// One traveler's archived bookings.
///
/// # Errors
///
/// Returns 403 when the path user differs from the requester, 503 on
/// storage failure.
pub async fn list_user_booking_history(
    Requester(requester): Requester,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<BookingListResponse>, ApiError> {
    let user = require_self(requester, user_id, "list")?;
    let views = state
        .service
        .list_history(ListingScope::User(user), &query.search_term)
        .await?;
    Ok(Json(BookingListResponse::from_views(views)))
}

/// Cancel a booking: status becomes `Cancelled` and the payment is
/// refunded, atomically. Both states are terminal.
///
/// # Errors
///
/// Returns 403 for a requester who is not the buyer, 404 for an unknown
/// booking, 503 on storage failure.
pub async fn cancel_booking(
    Requester(requester): Requester,
    State(state): State<AppState>,
    Path((user_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookingActionResponse>, ApiError> {
    require_self(requester, user_id, "cancel")?;
    state
        .service
        .cancel_booking(BookingId::from_uuid(booking_id), requester)
        .await?;
    Ok(Json(BookingActionResponse {
        success: true,
        message: "Booking cancelled and payment refunded!".to_string(),
    }))
}

/// Delete a booking from the requester's history.
///
/// # Errors
///
/// Returns 403 for a requester who does not own the record, 404 for an
/// unknown booking, 400 when the configured deletion policy forbids the
/// booking's state, 503 on storage failure.
pub async fn delete_booking_history(
    Requester(requester): Requester,
    State(state): State<AppState>,
    Path((user_id, booking_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookingActionResponse>, ApiError> {
    let owner = require_self(requester, user_id, "delete")?;
    state
        .service
        .delete_history(BookingId::from_uuid(booking_id), owner, requester)
        .await?;
    Ok(Json(BookingActionResponse {
        success: true,
        message: "Booking history deleted!".to_string(),
    }))
}
