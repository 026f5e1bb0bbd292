//! Tests for trust profile HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockRendezvousCommand, MockRendezvousQuery, MockReviewCommand, MockTrustCommand,
    MockTrustQuery,
};
use crate::domain::scoring::AuraTone;
use crate::inbound::http::caller::CALLER_ID_HEADER;

fn test_app(
    trust: MockTrustCommand,
    trust_query: MockTrustQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState {
        rendezvous: Arc::new(MockRendezvousCommand::new()),
        rendezvous_query: Arc::new(MockRendezvousQuery::new()),
        reviews: Arc::new(MockReviewCommand::new()),
        trust: Arc::new(trust),
        trust_query: Arc::new(trust_query),
    };
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").service(get_trust_profile).service(apply_warning))
}

fn profile(user_id: Uuid) -> TrustProfile {
    TrustProfile {
        user_id,
        aura_tone: AuraTone::Warm,
        aura_intensity: 0.7,
        aura_score: 82.0,
        constellation_score: 44.5,
    }
}

#[actix_web::test]
async fn trust_profiles_serialise_as_camel_case() {
    let user_id = Uuid::new_v4();

    let mut trust_query = MockTrustQuery::new();
    trust_query
        .expect_trust_profile()
        .times(1)
        .return_once(move |_| Ok(profile(user_id)));

    let app = actix_test::init_service(test_app(MockTrustCommand::new(), trust_query)).await;
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{user_id}/trust"))
        .insert_header((CALLER_ID_HEADER, Uuid::new_v4().to_string()))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["userId"], user_id.to_string());
    assert_eq!(body["auraTone"], "warm");
    assert_eq!(body["auraScore"], 82.0);
    assert_eq!(body["constellationScore"], 44.5);
}

#[actix_web::test]
async fn warnings_return_the_adjusted_profile() {
    let user_id = Uuid::new_v4();

    let mut trust = MockTrustCommand::new();
    trust
        .expect_apply_warning()
        .withf(move |request| request.user_id == user_id && request.severity == 12)
        .times(1)
        .return_once(move |_| {
            let mut adjusted = profile(user_id);
            adjusted.aura_score = 74.0;
            Ok(adjusted)
        });

    let app = actix_test::init_service(test_app(trust, MockTrustQuery::new())).await;
    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/users/{user_id}/warnings"))
        .insert_header((CALLER_ID_HEADER, Uuid::new_v4().to_string()))
        .set_json(json!({ "severity": 12 }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["auraScore"], 74.0);
}

#[actix_web::test]
async fn zero_severity_warnings_map_to_400() {
    let mut trust = MockTrustCommand::new();
    trust
        .expect_apply_warning()
        .times(1)
        .return_once(|_| Err(Error::invalid_request("warning severity must be positive")));

    let app = actix_test::init_service(test_app(trust, MockTrustQuery::new())).await;
    let req = actix_test::TestRequest::post()
        .uri(&format!("/api/v1/users/{}/warnings", Uuid::new_v4()))
        .insert_header((CALLER_ID_HEADER, Uuid::new_v4().to_string()))
        .set_json(json!({ "severity": 0 }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn trust_reads_require_a_caller_header() {
    let app = actix_test::init_service(test_app(MockTrustCommand::new(), MockTrustQuery::new()))
        .await;
    let req = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/users/{}/trust", Uuid::new_v4()))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
