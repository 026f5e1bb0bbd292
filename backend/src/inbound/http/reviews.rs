//! Review HTTP handlers.
//!
//! ```text
//! POST /api/v1/trips/{trip_id}/reviews
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::ports::SubmitReviewRequest;
use crate::domain::review::Emotion;
use crate::inbound::http::ApiResult;
use crate::inbound::http::caller::Caller;
use crate::inbound::http::state::HttpState;

/// Request payload for filing a review.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequestBody {
    /// The other trip participant the review is about.
    #[schema(format = "uuid")]
    pub target_id: Uuid,
    /// Sentiment: positive, neutral, or negative.
    pub emotion: String,
    /// Up to three short descriptive tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional free-text comment.
    pub comment: Option<String>,
}

fn parse_emotion(value: &str) -> Result<Emotion, Error> {
    value.parse().map_err(|_| {
        Error::invalid_request("emotion must be positive, neutral, or negative").with_details(
            json!({
                "field": "emotion",
                "value": value,
                "code": "invalid_emotion",
            }),
        )
    })
}

/// File (or overwrite) a review for a completed trip.
#[utoipa::path(
    post,
    path = "/api/v1/trips/{trip_id}/reviews",
    params(("trip_id" = Uuid, Path, description = "Trip identifier")),
    request_body = SubmitReviewRequestBody,
    responses(
        (status = 204, description = "Review recorded and downstream scores refreshed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing caller identity", body = Error),
        (status = 403, description = "Caller or target not on this trip", body = Error),
        (status = 404, description = "Trip not found", body = Error),
        (status = 409, description = "Trip not met or not finished yet", body = Error),
        (status = 503, description = "Service unavailable", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "submitReview"
)]
#[post("/trips/{trip_id}/reviews")]
pub async fn submit_review(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<Uuid>,
    payload: web::Json<SubmitReviewRequestBody>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let emotion = parse_emotion(&payload.emotion)?;

    state
        .reviews
        .submit_review(SubmitReviewRequest {
            reviewer_id: caller.user_id,
            target_id: payload.target_id,
            trip_id: path.into_inner(),
            emotion,
            tags: payload.tags,
            comment: payload.comment,
        })
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "reviews_tests.rs"]
mod tests;
