//! HTTP API integration tests.
//!
//! Drives the real router against the in-memory store: package creation,
//! the booking round trip with its impact snapshot, ownership guards on
//! the user-scoped routes, and the impact reporting endpoints.

#![allow(clippy::unwrap_used)] // Integration tests can unwrap for setup
#![allow(clippy::expect_used)]

use axum_test::TestServer;
use http::{HeaderName, HeaderValue};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;
use villagestay_core::types::UserProfile;
use villagestay_core::{BookingService, UserId};
use villagestay_projections::StoreImpactQueries;
use villagestay_testing::{user, FixedClock, InMemoryStore};
use villagestay_web::{build_router, AppState, REQUESTER_HEADER};

const TODAY: &str = "2025-06-15";

struct TestApp {
    server: TestServer,
    store: Arc<InMemoryStore>,
}

fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let clock = Arc::new(FixedClock::at_midnight(TODAY.parse().unwrap()));
    let service = Arc::new(BookingService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        clock.clone(),
    ));
    let impact = Arc::new(StoreImpactQueries::new(store.clone()));
    let state = AppState::new(service, store.clone(), impact, clock);
    let server = TestServer::new(build_router(state)).unwrap();
    TestApp { server, store }
}

fn as_user(id: UserId) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static(REQUESTER_HEADER),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    )
}

fn seeded_traveler(app: &TestApp, username: &str) -> UserProfile {
    let profile = user(username);
    app.store.put_user(profile.clone());
    profile
}

async fn create_package(app: &TestApp, name: &str, village: &str) -> Uuid {
    let response = app
        .server
        .post("/api/packages")
        .json(&json!({
            "name": name,
            "description": "Three days with a host family",
            "destination": village,
            "days": 3,
            "nights": 2,
            "accommodation": "Family homestay",
            "transportation": "Shared jeep",
            "meals": "Home-cooked",
            "activities": "Farm work and forest walks",
            "price": 10_000,
            "guideName": "Ravi",
            "village": village,
            "homestayType": "Homestay"
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    let body: Value = response.json();
    Uuid::parse_str(body["package"]["id"].as_str().unwrap()).unwrap()
}

async fn book(
    app: &TestApp,
    package_id: Uuid,
    traveler: &UserProfile,
    date: &str,
    total: u64,
) -> Value {
    let (name, value) = as_user(traveler.id);
    let response = app
        .server
        .post(&format!("/api/bookings/{package_id}"))
        .add_header(name, value)
        .json(&json!({
            "buyerId": traveler.id,
            "date": date,
            "persons": 2,
            "totalPrice": total
        }))
        .await;
    response.assert_status(http::StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = spawn_app();
    app.server.get("/health").await.assert_status_ok();
    app.server.get("/ready").await.assert_status_ok();
}

#[tokio::test]
async fn booking_a_package_returns_the_impact_snapshot() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;

    let body = book(&app, package_id, &traveler, "2025-06-20", 997).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["currency"], json!("INR"));

    let booking = &body["booking"];
    assert_eq!(booking["status"], json!("Booked"));
    assert_eq!(booking["paymentStatus"], json!("Paid"));
    assert_eq!(booking["impact"]["homestay"], json!(498));
    assert_eq!(booking["impact"]["guide"], json!(249));
    assert_eq!(booking["impact"]["food"], json!(149));
    assert_eq!(booking["impact"]["community"], json!(101));
    assert_eq!(booking["impact"]["totalVillageIncome"], json!(997));
    assert_eq!(booking["impact"]["village"], json!("Araku"));

    // The catalog's earnings counter grew by exactly the booking total
    let response = app.server.get(&format!("/api/packages/{package_id}")).await;
    let body: Value = response.json();
    assert_eq!(body["package"]["totalVillageEarnings"], json!(997));
}

#[tokio::test]
async fn booking_requires_the_requester_header() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;

    let response = app
        .server
        .post(&format!("/api/bookings/{package_id}"))
        .json(&json!({
            "buyerId": traveler.id,
            "date": "2025-06-20",
            "persons": 2,
            "totalPrice": 500
        }))
        .await;
    response.assert_status(http::StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_for_someone_else_is_forbidden() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");
    let other = seeded_traveler(&app, "vikram");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;

    let (name, value) = as_user(other.id);
    let response = app
        .server
        .post(&format!("/api/bookings/{package_id}"))
        .add_header(name, value)
        .json(&json!({
            "buyerId": traveler.id,
            "date": "2025-06-20",
            "persons": 2,
            "totalPrice": 500
        }))
        .await;
    response.assert_status(http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn booking_an_unknown_package_is_not_found() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");

    let (name, value) = as_user(traveler.id);
    let response = app
        .server
        .post(&format!("/api/bookings/{}", Uuid::new_v4()))
        .add_header(name, value)
        .json(&json!({
            "buyerId": traveler.id,
            "date": "2025-06-20",
            "persons": 2,
            "totalPrice": 500
        }))
        .await;
    response.assert_status(http::StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn offer_packages_must_discount_below_the_base_price() {
    let app = spawn_app();
    let response = app
        .server
        .post("/api/packages")
        .json(&json!({
            "name": "Bad Offer",
            "description": "d",
            "destination": "Araku",
            "days": 1,
            "nights": 1,
            "accommodation": "a",
            "transportation": "t",
            "meals": "m",
            "activities": "ac",
            "price": 1_000,
            "offer": true,
            "discountPrice": 1_000
        }))
        .await;
    response.assert_status(http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancel_round_trip_moves_the_booking_into_history() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;
    let body = book(&app, package_id, &traveler, "2025-06-20", 1_000).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    // A stranger cannot cancel it
    let stranger = seeded_traveler(&app, "vikram");
    let (name, value) = as_user(stranger.id);
    let response = app
        .server
        .post(&format!(
            "/api/users/{}/bookings/{booking_id}/cancel",
            stranger.id
        ))
        .add_header(name, value)
        .await;
    response.assert_status(http::StatusCode::FORBIDDEN);

    // The owner can
    let (name, value) = as_user(traveler.id);
    let response = app
        .server
        .post(&format!(
            "/api/users/{}/bookings/{booking_id}/cancel",
            traveler.id
        ))
        .add_header(name, value)
        .await;
    response.assert_status_ok();

    // Current listing is empty, history carries the refunded record
    let (name, value) = as_user(traveler.id);
    let response = app
        .server
        .get(&format!("/api/users/{}/bookings/current", traveler.id))
        .add_header(name, value)
        .await;
    let body: Value = response.json();
    assert_eq!(body["bookings"].as_array().unwrap().len(), 0);
    assert_eq!(body["success"], json!(false));

    let (name, value) = as_user(traveler.id);
    let response = app
        .server
        .get(&format!("/api/users/{}/bookings/history", traveler.id))
        .add_header(name, value)
        .await;
    let body: Value = response.json();
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["booking"]["status"], json!("Cancelled"));
    assert_eq!(bookings[0]["booking"]["paymentStatus"], json!("Refunded"));
}

#[tokio::test]
async fn user_scoped_listings_reject_other_users() {
    let app = spawn_app();
    let traveler = seeded_traveler(&app, "priya");
    let stranger = seeded_traveler(&app, "vikram");

    let (name, value) = as_user(stranger.id);
    let response = app
        .server
        .get(&format!("/api/users/{}/bookings/current", traveler.id))
        .add_header(name, value)
        .await;
    response.assert_status(http::StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn global_listings_filter_by_buyer_search_term() {
    let app = spawn_app();
    let priya = seeded_traveler(&app, "priya");
    let vikram = seeded_traveler(&app, "vikram");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;
    book(&app, package_id, &priya, "2025-06-20", 1_000).await;
    book(&app, package_id, &vikram, "2025-06-21", 2_000).await;

    let response = app
        .server
        .get("/api/bookings/current?searchTerm=PRIYA")
        .await;
    let body: Value = response.json();
    let bookings = body["bookings"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["buyer"]["username"], json!("priya"));
}

#[tokio::test]
async fn impact_endpoints_report_the_booked_totals() {
    let app = spawn_app();
    let priya = seeded_traveler(&app, "priya");
    let araku = create_package(&app, "Araku Valley Stay", "Araku").await;
    let kibber = create_package(&app, "Spiti Farmstay Week", "Kibber").await;
    book(&app, araku, &priya, "2025-06-20", 997).await;
    book(&app, araku, &priya, "2025-06-22", 503).await;
    book(&app, kibber, &priya, "2025-06-25", 1_200).await;

    // Leaderboard
    let response = app.server.get("/api/impact/villages").await;
    let mut villages: Vec<Value> = response.json();
    villages.sort_by_key(|v| v["village"].as_str().unwrap_or_default().to_string());
    assert_eq!(villages.len(), 2);
    assert_eq!(villages[0]["village"], json!("Araku"));
    assert_eq!(villages[0]["totalIncome"], json!(1_500));
    assert_eq!(villages[0]["bookings"], json!(2));

    // Per-user impact
    let response = app
        .server
        .get(&format!("/api/impact/users/{}", priya.id))
        .await;
    let body: Value = response.json();
    assert_eq!(body["totalImpact"], json!(2_700));
    assert_eq!(body["trips"], json!(3));

    // Platform dashboard
    let response = app.server.get("/api/impact/stats").await;
    let body: Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["totalBookings"], json!(3));
    assert_eq!(body["totalMoneyMoved"], json!(2_700));
    assert_eq!(body["villagesSupported"], json!(2));

    // Category sums reconcile with the money moved
    let split_sum = body["homestayIncome"].as_u64().unwrap()
        + body["guideIncome"].as_u64().unwrap()
        + body["farmerIncome"].as_u64().unwrap()
        + body["communityFunds"].as_u64().unwrap();
    assert_eq!(split_sum, 2_700);
}

#[tokio::test]
async fn user_impact_still_counts_cancelled_trips() {
    let app = spawn_app();
    let priya = seeded_traveler(&app, "priya");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;
    book(&app, package_id, &priya, "2025-06-20", 300).await;
    let body = book(&app, package_id, &priya, "2025-06-21", 200).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (name, value) = as_user(priya.id);
    app.server
        .post(&format!(
            "/api/users/{}/bookings/{booking_id}/cancel",
            priya.id
        ))
        .add_header(name, value)
        .await
        .assert_status_ok();

    let response = app
        .server
        .get(&format!("/api/impact/users/{}", priya.id))
        .await;
    let body: Value = response.json();
    assert_eq!(body["totalImpact"], json!(500));
    assert_eq!(body["trips"], json!(2));
}

#[tokio::test]
async fn delete_removes_a_record_from_history() {
    let app = spawn_app();
    let priya = seeded_traveler(&app, "priya");
    let package_id = create_package(&app, "Araku Valley Stay", "Araku").await;
    // Dated in the past: the next listing sweep completes it
    let body = book(&app, package_id, &priya, "2025-06-01", 400).await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (name, value) = as_user(priya.id);
    let response = app
        .server
        .get(&format!("/api/users/{}/bookings/history", priya.id))
        .add_header(name, value)
        .await;
    let listed: Value = response.json();
    assert_eq!(listed["bookings"].as_array().unwrap().len(), 1);

    let (name, value) = as_user(priya.id);
    app.server
        .delete(&format!("/api/users/{}/bookings/{booking_id}", priya.id))
        .add_header(name, value)
        .await
        .assert_status_ok();

    let (name, value) = as_user(priya.id);
    let response = app
        .server
        .get(&format!("/api/users/{}/bookings/history", priya.id))
        .add_header(name, value)
        .await;
    let listed: Value = response.json();
    assert_eq!(listed["bookings"].as_array().unwrap().len(), 0);
}
