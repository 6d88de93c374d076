//! Impact reporting endpoints: the village leaderboard, per-user impact,
//! and the platform-wide dashboard.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use villagestay_core::booking::ReconciledPackage;
use villagestay_core::types::UserId;
use villagestay_projections::{PlatformImpactStats, UserImpact, VillageTotal};

/// Village leaderboard: income and booking counts per village, derived
/// purely from booking snapshots.
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn village_totals(
    State(state): State<AppState>,
) -> Result<Json<Vec<VillageTotal>>, ApiError> {
    let totals = state
        .impact
        .village_totals()
        .await
        .map_err(villagestay_core::CoreError::from)?;
    Ok(Json(totals))
}

/// One traveler's lifetime impact figure. Every booking counts, cancelled
/// trips included.
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn user_impact(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserImpact>, ApiError> {
    let impact = state
        .impact
        .user_impact(UserId::from_uuid(user_id))
        .await
        .map_err(villagestay_core::CoreError::from)?;
    Ok(Json(impact))
}

/// Platform dashboard response.
#[derive(Debug, Serialize)]
pub struct PlatformStatsResponse {
    /// Operation outcome
    pub success: bool,
    /// The dashboard figures
    #[serde(flatten)]
    pub stats: PlatformImpactStats,
}

/// Platform-wide impact figures over paid bookings.
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn platform_stats(
    State(state): State<AppState>,
) -> Result<Json<PlatformStatsResponse>, ApiError> {
    let stats = state
        .impact
        .platform_stats()
        .await
        .map_err(villagestay_core::CoreError::from)?;
    Ok(Json(PlatformStatsResponse {
        success: true,
        stats,
    }))
}

/// One corrected counter in the reconciliation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledEntry {
    /// The corrected package
    pub package_id: Uuid,
    /// Counter value before correction, in whole rupees
    pub recorded: u64,
    /// Recomputed value now stored, in whole rupees
    pub actual: u64,
}

impl From<ReconciledPackage> for ReconciledEntry {
    fn from(entry: ReconciledPackage) -> Self {
        Self {
            package_id: *entry.package_id.as_uuid(),
            recorded: entry.recorded.rupees(),
            actual: entry.actual.rupees(),
        }
    }
}

/// Reconciliation response.
#[derive(Debug, Serialize)]
pub struct ReconcileResponse {
    /// Operation outcome
    pub success: bool,
    /// Counters that were corrected; empty when everything already agreed
    pub corrected: Vec<ReconciledEntry>,
}

/// Recompute every package's cumulative earnings counter from booking
/// sums. The repair path for a lost earnings credit; safe to run any time.
///
/// # Errors
///
/// Returns 503 on storage failure.
pub async fn reconcile_earnings(
    State(state): State<AppState>,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let corrected = state.service.reconcile_village_earnings().await?;
    Ok(Json(ReconcileResponse {
        success: true,
        corrected: corrected.into_iter().map(ReconciledEntry::from).collect(),
    }))
}
