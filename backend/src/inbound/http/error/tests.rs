//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::json;

use crate::domain::{LifecycleError, MissingTarget, PickupPointId, ReceptionId, StorageFailure};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("relation \"receptions\" does not exist")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"query": "latest reception"}))
}

#[fixture]
fn conflict_case(expected_trace_id: String) -> Error {
    Error::conflict("reception 3 is still in progress")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"code": "unclosed_reception_exists", "receptionId": 3}))
}

fn pvz(raw: i64) -> PickupPointId {
    PickupPointId::new(raw).expect("positive id")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no token"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("busy"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[case(LifecycleError::NotFound(MissingTarget::PickupPoint(pvz(999))), StatusCode::NOT_FOUND)]
#[case(
    LifecycleError::UnclosedReceptionExists {
        pvz_id: pvz(1),
        reception_id: ReceptionId::new(2).expect("positive id"),
    },
    StatusCode::CONFLICT
)]
#[case(LifecycleError::AlreadyClosed { pvz_id: pvz(1) }, StatusCode::CONFLICT)]
#[case(
    LifecycleError::Storage(StorageFailure::Unavailable { message: "pool timeout".into() }),
    StatusCode::SERVICE_UNAVAILABLE
)]
#[case(
    LifecycleError::Storage(StorageFailure::Query { message: "syntax".into() }),
    StatusCode::INTERNAL_SERVER_ERROR
)]
fn lifecycle_failures_map_to_statuses(#[case] failure: LifecycleError, #[case] status: StatusCode) {
    let err = Error::from(failure);
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn assert_error_response(
    error: Error,
    expected_status: StatusCode,
    expected_trace_id: Option<&str>,
) -> Error {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);

    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id is valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(
    internal_error_case: Error,
    expected_trace_id: String,
) {
    let redacted = assert_error_response(
        internal_error_case,
        StatusCode::INTERNAL_SERVER_ERROR,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn conflicts_keep_message_and_details(conflict_case: Error, expected_trace_id: String) {
    let payload = assert_error_response(
        conflict_case,
        StatusCode::CONFLICT,
        Some(expected_trace_id.as_str()),
    )
    .await;
    assert_eq!(payload.code(), ErrorCode::Conflict);
    assert_eq!(payload.message(), "reception 3 is still in progress");
    assert_eq!(
        payload
            .details()
            .and_then(|details| details.get("code"))
            .and_then(|code| code.as_str()),
        Some("unclosed_reception_exists")
    );
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "city"}));

    let payload = assert_error_response(error, StatusCode::BAD_REQUEST, None).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.details(), Some(&json!({"field": "city"})));
}

#[given("an unclosed reception failure")]
fn an_unclosed_reception_failure() -> LifecycleError {
    LifecycleError::UnclosedReceptionExists {
        pvz_id: pvz(5),
        reception_id: ReceptionId::new(8).expect("positive id"),
    }
}

#[given("an unavailable storage failure")]
fn an_unavailable_storage_failure() -> LifecycleError {
    LifecycleError::Storage(StorageFailure::Unavailable {
        message: "connection refused".into(),
    })
}

#[when("the adapter maps the failure to an HTTP status")]
fn the_adapter_maps_the_failure(failure: LifecycleError) -> StatusCode {
    super::status_for(Error::from(failure).code())
}

#[then("the status is 409 Conflict")]
fn the_status_is_409_conflict(status: StatusCode) {
    assert_eq!(status, StatusCode::CONFLICT);
}

#[then("the status is 503 Service Unavailable")]
fn the_status_is_503(status: StatusCode) {
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[given("an internal error carrying storage detail")]
fn an_internal_error_carrying_storage_detail() -> Error {
    Error::internal("duplicate key value violates unique constraint")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"constraint": "reception_products_product_id_key"}))
}

#[when("the adapter prepares the client payload")]
fn the_adapter_prepares_the_client_payload(error: Error) -> Error {
    super::client_view(&error)
}

#[then("clients see the generic internal error message")]
fn clients_see_the_generic_message(payload: Error) {
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn unclosed_reception_maps_to_conflict() {
    let failure = an_unclosed_reception_failure();
    let status = the_adapter_maps_the_failure(failure);
    the_status_is_409_conflict(status);
}

#[rstest]
fn unavailable_storage_maps_to_service_unavailable() {
    let failure = an_unavailable_storage_failure();
    let status = the_adapter_maps_the_failure(failure);
    the_status_is_503(status);
}

#[rstest]
fn internal_payloads_are_redacted() {
    let error = an_internal_error_carrying_storage_detail();
    let payload = the_adapter_prepares_the_client_payload(error);
    clients_see_the_generic_message(payload);
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}
