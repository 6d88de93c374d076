//! Request extractors.

use crate::error::ApiError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;
use villagestay_core::types::UserId;

/// Header carrying the authenticated requester's id.
///
/// Authentication itself happens upstream; the gateway strips any
/// client-supplied value and injects the verified identity here.
pub const REQUESTER_HEADER: &str = "x-user-id";

/// The authenticated requester, extracted from [`REQUESTER_HEADER`].
///
/// Rejects with 401 when the header is missing or not a UUID.
#[derive(Clone, Copy, Debug)]
pub struct Requester(pub UserId);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(REQUESTER_HEADER)
            .ok_or_else(|| ApiError::unauthorized("missing x-user-id header"))?;
        let raw = value
            .to_str()
            .map_err(|_| ApiError::unauthorized("malformed x-user-id header"))?;
        let id = Uuid::parse_str(raw)
            .map_err(|_| ApiError::unauthorized("malformed x-user-id header"))?;
        Ok(Self(UserId::from_uuid(id)))
    }
}
