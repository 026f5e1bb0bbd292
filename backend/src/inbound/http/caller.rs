//! Caller identity extraction.
//!
//! Authentication happens upstream; by the time a request reaches this
//! service the gateway has verified the caller and stamped their id on the
//! `X-User-Id` header. The extractor only checks presence and shape.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Header carrying the verified caller id.
pub const CALLER_ID_HEADER: &str = "X-User-Id";

/// The authenticated caller, as asserted by the upstream gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
}

fn extract(req: &HttpRequest) -> Result<Caller, Error> {
    let Some(raw) = req.headers().get(CALLER_ID_HEADER) else {
        return Err(Error::unauthorized("missing caller identity header"));
    };

    let text = raw.to_str().map_err(|_| {
        Error::invalid_request("caller identity header must be valid ASCII")
            .with_details(json!({ "header": CALLER_ID_HEADER, "code": "invalid_header" }))
    })?;
    let user_id = Uuid::parse_str(text).map_err(|_| {
        Error::invalid_request("caller identity header must be a UUID").with_details(json!({
            "header": CALLER_ID_HEADER,
            "value": text,
            "code": "invalid_uuid",
        }))
    })?;

    Ok(Caller { user_id })
}

impl FromRequest for Caller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for header extraction.

    use actix_web::test::TestRequest;

    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn well_formed_headers_extract() {
        let id = Uuid::new_v4();
        let req = TestRequest::default()
            .insert_header((CALLER_ID_HEADER, id.to_string()))
            .to_http_request();

        assert_eq!(extract(&req), Ok(Caller { user_id: id }));
    }

    #[test]
    fn missing_headers_are_unauthorised() {
        let req = TestRequest::default().to_http_request();
        let error = extract(&req).expect_err("extraction fails");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn malformed_headers_are_invalid_requests() {
        let req = TestRequest::default()
            .insert_header((CALLER_ID_HEADER, "not-a-uuid"))
            .to_http_request();
        let error = extract(&req).expect_err("extraction fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }
}
