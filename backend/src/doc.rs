//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers the meet-confirmation, review, trust, and health endpoints
//! together with their request and response schemas. The generated document
//! backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::meet::{MeetStatusResponseBody, PressResponseBody};
use crate::inbound::http::reviews::SubmitReviewRequestBody;
use crate::inbound::http::trust::{ApplyWarningRequestBody, TrustProfileResponseBody};

/// Enrich the generated document with the caller identity header scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "CallerId",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-User-Id",
                "Authenticated user ID injected by the upstream gateway.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Trust engine API",
        description = "HTTP interface for meet confirmation, reviews, trust profiles, and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("CallerId" = [])),
    paths(
        crate::inbound::http::meet::press_meet,
        crate::inbound::http::meet::meet_status,
        crate::inbound::http::meet::cancel_trip,
        crate::inbound::http::reviews::submit_review,
        crate::inbound::http::trust::get_trust_profile,
        crate::inbound::http::trust::apply_warning,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        PressResponseBody,
        MeetStatusResponseBody,
        SubmitReviewRequestBody,
        TrustProfileResponseBody,
        ApplyWarningRequestBody,
    )),
    tags(
        (name = "rendezvous", description = "Two-party meet confirmation"),
        (name = "reviews", description = "Post-trip reviews"),
        (name = "trust", description = "Trust profiles and moderation warnings"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
