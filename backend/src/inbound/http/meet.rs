//! Rendezvous HTTP handlers.
//!
//! ```text
//! POST /api/v1/trips/{trip_id}/meet/press
//! GET  /api/v1/trips/{trip_id}/meet
//! POST /api/v1/trips/{trip_id}/cancel
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::{CancelTripRequest, MeetStatusRequest, PressMeetRequest, PressOutcome};
use crate::domain::rendezvous::MeetStatus;
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::state::HttpState;

/// Response payload for a meet button press.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum PressResponseBody {
    /// A countdown is running; the other participant has until `expiresAt`.
    #[serde(rename_all = "camelCase")]
    Countdown {
        #[schema(format = "uuid")]
        started_by: String,
        #[schema(format = "date-time")]
        expires_at: String,
    },
    /// Both pressed inside the window; the meeting is confirmed.
    #[serde(rename_all = "camelCase")]
    Met {
        #[schema(format = "date-time")]
        met_at: String,
    },
}

impl From<PressOutcome> for PressResponseBody {
    fn from(outcome: PressOutcome) -> Self {
        match outcome {
            PressOutcome::Countdown {
                started_by,
                expires_at,
            } => Self::Countdown {
                started_by: started_by.to_string(),
                expires_at: expires_at.to_rfc3339(),
            },
            PressOutcome::Met { met_at } => Self::Met {
                met_at: met_at.to_rfc3339(),
            },
        }
    }
}

/// Response payload for the meet status view.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum MeetStatusResponseBody {
    /// The meeting is confirmed.
    #[serde(rename_all = "camelCase")]
    Met {
        #[schema(format = "date-time")]
        met_at: String,
        method: String,
    },
    /// A countdown is running.
    #[serde(rename_all = "camelCase")]
    Countdown {
        #[schema(format = "uuid")]
        started_by: String,
        #[schema(format = "date-time")]
        expires_at: String,
        seconds_left: i64,
    },
    /// The last countdown lapsed without a second press.
    Expired,
    /// No press has been recorded.
    Idle,
}

impl From<MeetStatus> for MeetStatusResponseBody {
    fn from(status: MeetStatus) -> Self {
        match status {
            MeetStatus::Met { met_at, method } => Self::Met {
                met_at: met_at.to_rfc3339(),
                method: method.to_string(),
            },
            MeetStatus::Countdown {
                started_by,
                expires_at,
                seconds_left,
            } => Self::Countdown {
                started_by: started_by.to_string(),
                expires_at: expires_at.to_rfc3339(),
                seconds_left,
            },
            MeetStatus::Expired => Self::Expired,
            MeetStatus::Idle => Self::Idle,
        }
    }
}

/// Press the meet button on a trip.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{trip_id}/meet/press",
    params(("trip_id" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Countdown started, repeated, or meeting confirmed", body = PressResponseBody),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 403, description = "Caller is not a trip participant", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Trip not confirmable, or a concurrent press won", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rendezvous"],
    operation_id = "pressMeet"
)]
#[post("/trips/{trip_id}/meet/press")]
pub async fn press_meet(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<PressResponseBody>> {
    let outcome = state
        .rendezvous
        .press_meet(PressMeetRequest {
            trip_id: path.into_inner(),
            caller_id: caller.user_id,
        })
        .await?;

    Ok(web::Json(PressResponseBody::from(outcome)))
}

/// View the current rendezvous phase of a trip.
#[utoipa::path(
    get,
    path = "/api/v1/trips/{trip_id}/meet",
    params(("trip_id" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 200, description = "Current rendezvous phase", body = MeetStatusResponseBody),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 403, description = "Caller is not a trip participant", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Trip has no meet state to report", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rendezvous"],
    operation_id = "meetStatus"
)]
#[get("/trips/{trip_id}/meet")]
pub async fn meet_status(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> ApiResult<web::Json<MeetStatusResponseBody>> {
    let status = state
        .rendezvous_query
        .meet_status(MeetStatusRequest {
            trip_id: path.into_inner(),
            caller_id: caller.user_id,
        })
        .await?;

    Ok(web::Json(MeetStatusResponseBody::from(status)))
}

/// Cancel a trip before it is confirmed.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{trip_id}/cancel",
    params(("trip_id" = Uuid, Path, description = "Trip identifier")),
    responses(
        (status = 204, description = "Trip cancelled"),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 403, description = "Caller is not a trip participant", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Trip already met or cancelled", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["rendezvous"],
    operation_id = "cancelTrip"
)]
#[post("/trips/{trip_id}/cancel")]
pub async fn cancel_trip(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    state
        .rendezvous
        .cancel_trip(CancelTripRequest {
            trip_id: path.into_inner(),
            caller_id: caller.user_id,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "meet_tests.rs"]
mod tests;
