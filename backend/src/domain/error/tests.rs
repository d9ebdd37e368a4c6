//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn trace_id() -> TraceId {
    TRACE_ID.parse().expect("fixture provides a valid UUID")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::validation_failed("bad"), ErrorCode::ValidationFailed)]
#[case(Error::duplicate_name("taken"), ErrorCode::DuplicateName)]
#[case(Error::email_in_use("taken"), ErrorCode::EmailInUse)]
#[case(Error::unauthorized("who"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn try_with_trace_id_rejects_blank_values() {
    let result = Error::invalid_request("bad").try_with_trace_id(" ");
    assert_eq!(result, Err(ErrorValidationError::EmptyTraceId));
}

#[rstest]
fn trace_id_is_absent_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn trace_id_is_captured_in_scope(trace_id: TraceId) {
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_payload() {
    let error = Error::validation_failed("entry failed validation")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "violations": [] }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "validation_failed",
            "message": "entry failed validation",
            "traceId": TRACE_ID,
            "details": { "violations": [] },
        })
    );
}

#[rstest]
fn omits_absent_optional_fields() {
    let value = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(value, json!({ "code": "not_found", "message": "missing" }));
}

#[rstest]
#[tokio::test]
async fn decoding_ignores_ambient_trace_id(trace_id: TraceId) {
    let payload = json!({ "code": "not_found", "message": "missing" });
    let decoded = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("decode error")
    })
    .await;
    assert!(decoded.trace_id().is_none());
}

#[rstest]
fn decoding_rejects_blank_message() {
    let payload = json!({ "code": "not_found", "message": "" });
    assert!(serde_json::from_value::<Error>(payload).is_err());
}
