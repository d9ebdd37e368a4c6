//! Tests for data type HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::UserId;
use crate::middleware::Trace;
use crate::domain::ports::{
    MockAccountsCommand, MockDataTypesCommand, MockDataTypesQuery, MockEntriesCommand,
    MockEntriesQuery,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{memory_state, test_session_middleware};

const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn owner() -> UserId {
    UserId::new(OWNER).expect("fixture owner")
}

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(list_data_types)
                .service(create_data_type)
                .service(get_data_type)
                .service(update_data_type)
                .service(delete_data_type),
        )
}

fn weight_body() -> Value {
    json!({
        "name": "Weight",
        "frequency": "daily",
        "fields": [
            { "name": "kg", "type": "number", "required": false },
            { "name": "note", "type": "text", "required": false }
        ]
    })
}

async fn send(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

#[rstest]
fn omitted_required_flag_defaults_to_true() {
    let field: FieldRequest =
        serde_json::from_value(json!({ "name": "kg", "type": "number" })).expect("field");
    assert!(field.required);
}

#[rstest]
#[case(json!({ "name": "x", "frequency": "hourly", "fields": [] }), "frequency")]
#[case(
    json!({ "name": "x", "frequency": "daily", "fields": [{ "name": "a", "type": "colour" }] }),
    "fields[0].type"
)]
#[case(
    json!({
        "name": "x",
        "frequency": "daily",
        "fields": [{ "id": "nope", "name": "a", "type": "text" }]
    }),
    "fields[0].id"
)]
fn malformed_requests_name_the_offending_property(#[case] body: Value, #[case] field: &str) {
    let request: CreateDataTypeRequest = serde_json::from_value(body).expect("request");
    let err = DataTypeDraft::try_from(request).expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&json!(field))
    );
}

#[actix_web::test]
async fn undecodable_bodies_render_the_error_envelope() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(memory_state(Some(owner()))))
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .wrap(test_session_middleware())
                    .configure(configure),
            ),
    )
    .await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(json!({ "name": "Weight", "fields": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "frequency");
    assert!(body["traceId"].is_string(), "trace id carried: {body}");
}

#[rstest]
fn drafts_convert_back_to_requests() {
    let request: CreateDataTypeRequest = serde_json::from_value(weight_body()).expect("request");
    let draft = DataTypeDraft::try_from(request.clone()).expect("valid draft");
    assert_eq!(CreateDataTypeRequest::from(draft), request);
}

#[actix_web::test]
async fn create_normalises_and_returns_created() {
    let app = actix_test::init_service(test_app(memory_state(Some(owner())))).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(weight_body()),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Weight");
    assert_eq!(body["userId"], OWNER);
    assert_eq!(body["color"], "#3b82f6");
    assert_eq!(body["fields"][0]["required"], true);
    assert_eq!(body["fields"][1]["required"], false);
    assert!(body["fields"][0]["id"].is_string());
}

#[actix_web::test]
async fn duplicate_names_are_rejected() {
    let app = actix_test::init_service(test_app(memory_state(Some(owner())))).await;
    let create = || {
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(weight_body())
    };

    let (first, _) = send(&app, create()).await;
    let (second, body) = send(&app, create()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "duplicate_name");
}

#[actix_web::test]
async fn validation_failures_list_every_violation() {
    let app = actix_test::init_service(test_app(memory_state(Some(owner())))).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(json!({ "name": "  ", "frequency": "daily", "fields": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_failed");
    let violations = body["details"]["violations"]
        .as_array()
        .expect("violations listed");
    assert_eq!(violations.len(), 2);
}

#[actix_web::test]
async fn update_get_and_delete_round_trip() {
    let app = actix_test::init_service(test_app(memory_state(Some(owner())))).await;
    let (_, created) = send(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(weight_body()),
    )
    .await;
    let uri = format!("/api/data-types/{}", created["id"].as_str().expect("id"));

    let (status, updated) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "name": "Body weight", "frequency": "weekly" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Body weight");
    assert_eq!(updated["frequency"], "weekly");
    assert_eq!(updated["fields"], created["fields"]);

    let (status, fetched) = send(&app, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, deleted) = send(&app, actix_test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true }));

    let (status, missing) = send(&app, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["code"], "not_found");
}

#[actix_web::test]
async fn malformed_ids_are_bad_requests() {
    let app = actix_test::init_service(test_app(memory_state(Some(owner())))).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri("/api/data-types/not-a-uuid"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn requests_without_owner_are_unauthorised() {
    let app = actix_test::init_service(test_app(memory_state(None))).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/api/data-types")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn store_outages_surface_as_service_unavailable() {
    let mut query = MockDataTypesQuery::new();
    query
        .expect_list()
        .times(1)
        .returning(|_| Err(Error::service_unavailable("pool exhausted")));
    let state = HttpState::new(HttpStatePorts {
        data_types: Arc::new(MockDataTypesCommand::new()),
        data_types_query: Arc::new(query),
        entries: Arc::new(MockEntriesCommand::new()),
        entries_query: Arc::new(MockEntriesQuery::new()),
        accounts: Arc::new(MockAccountsCommand::new()),
    })
    .with_default_owner(Some(owner()));
    let app = actix_test::init_service(test_app(state)).await;

    let (status, body) = send(&app, actix_test::TestRequest::get().uri("/api/data-types")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}
