//! Trust profile HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users/{user_id}/trust
//! POST /api/v1/users/{user_id}/warnings
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::ApplyWarningRequest;
use crate::domain::scoring::TrustProfile;
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::state::HttpState;

/// Response payload for a trust profile read.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrustProfileResponseBody {
    #[schema(format = "uuid")]
    pub user_id: String,
    /// Aura tone: warm, neutral, or cool.
    pub aura_tone: String,
    pub aura_intensity: f64,
    pub aura_score: f64,
    pub constellation_score: f64,
}

impl From<TrustProfile> for TrustProfileResponseBody {
    fn from(profile: TrustProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            aura_tone: profile.aura_tone.to_string(),
            aura_intensity: profile.aura_intensity,
            aura_score: profile.aura_score,
            constellation_score: profile.constellation_score,
        }
    }
}

/// Request payload for recording a moderation warning.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyWarningRequestBody {
    /// Positive severity; the constellation deduction saturates at the
    /// configured cap.
    pub severity: u32,
}

/// Read a user's trust profile.
///
/// Any authenticated caller may view any profile; the aura and constellation
/// are public reputation signals.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/trust",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    responses(
        (status = 200, description = "Current trust profile", body = TrustProfileResponseBody),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["trust"],
    operation_id = "getTrustProfile"
)]
#[get("/users/{user_id}/trust")]
pub async fn get_trust_profile(
    state: web::Data<HttpState>,
    _caller: Caller,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<TrustProfileResponseBody>> {
    let profile = state.trust_query.trust_profile(path.into_inner()).await?;
    Ok(web::Json(TrustProfileResponseBody::from(profile)))
}

/// Record a moderation warning against a user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/warnings",
    params(("user_id" = Uuid, Path, description = "User identifier")),
    request_body = ApplyWarningRequestBody,
    responses(
        (status = 200, description = "Adjusted trust profile", body = TrustProfileResponseBody),
        (status = 400, description = "Invalid severity", body = Error),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["trust"],
    operation_id = "applyWarning"
)]
#[post("/users/{user_id}/warnings")]
pub async fn apply_warning(
    state: web::Data<HttpState>,
    _caller: Caller,
    path: web::Path<Uuid>,
    payload: web::Json<ApplyWarningRequestBody>,
) -> ApiResult<web::Json<TrustProfileResponseBody>> {
    let adjusted = state
        .trust
        .apply_warning(ApplyWarningRequest {
            user_id: path.into_inner(),
            severity: payload.severity,
        })
        .await?;

    Ok(web::Json(TrustProfileResponseBody::from(adjusted)))
}

#[cfg(test)]
#[path = "trust_tests.rs"]
mod tests;
