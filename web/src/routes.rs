//! Router configuration for the VillageStay server.

use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::{bookings, impact, packages};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// All business endpoints sit under `/api`; health probes sit at the root
/// and skip authentication entirely.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Package catalog
        .route("/packages", post(packages::create_package))
        .route("/packages", get(packages::list_packages))
        .route("/packages/:id", get(packages::get_package))
        .route("/packages/:id", put(packages::update_package))
        // Booking lifecycle
        .route("/bookings/:package_id", post(bookings::create_booking))
        .route("/bookings/current", get(bookings::list_current_bookings))
        .route("/bookings/history", get(bookings::list_booking_history))
        .route(
            "/users/:user_id/bookings/current",
            get(bookings::list_user_current_bookings),
        )
        .route(
            "/users/:user_id/bookings/history",
            get(bookings::list_user_booking_history),
        )
        .route(
            "/users/:user_id/bookings/:id/cancel",
            post(bookings::cancel_booking),
        )
        .route(
            "/users/:user_id/bookings/:id",
            delete(bookings::delete_booking_history),
        )
        // Impact reporting
        .route("/impact/villages", get(impact::village_totals))
        .route("/impact/users/:user_id", get(impact::user_impact))
        .route("/impact/stats", get(impact::platform_stats))
        .route("/impact/reconcile", post(impact::reconcile_earnings));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
