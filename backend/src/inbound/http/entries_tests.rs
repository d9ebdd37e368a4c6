//! Tests for entry HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{DataTypeId, ErrorCode, UserId};
use crate::inbound::http::data_types::{create_data_type, delete_data_type};
use crate::inbound::http::test_utils::{memory_state, test_session_middleware};

const OWNER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let owner = UserId::new(OWNER).expect("fixture owner");
    App::new()
        .app_data(web::Data::new(memory_state(Some(owner))))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api")
                .service(create_data_type)
                .service(delete_data_type)
                .service(list_entries)
                .service(create_entry)
                .service(get_entry)
                .service(update_entry)
                .service(delete_entry),
        )
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
    (status, serde_json::from_slice(&body).expect("JSON body"))
}

struct WeightType {
    id: String,
    kg: String,
    note: String,
}

async fn create_weight_type(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
) -> WeightType {
    let (status, body) = send(
        app,
        actix_test::TestRequest::post()
            .uri("/api/data-types")
            .set_json(json!({
                "name": "Weight",
                "frequency": "daily",
                "fields": [
                    { "name": "kg", "type": "number" },
                    { "name": "note", "type": "text", "required": false }
                ]
            })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let text = |pointer: &str| {
        body.pointer(pointer)
            .and_then(Value::as_str)
            .expect("string property")
            .to_owned()
    };
    WeightType {
        id: text("/id"),
        kg: text("/fields/0/id"),
        note: text("/fields/1/id"),
    }
}

fn weigh_in(data_type: &WeightType, date: &str, kg: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri("/api/entries")
        .set_json(json!({
            "dataTypeId": data_type.id,
            "date": date,
            "fields": [{ "fieldId": data_type.kg, "value": kg }]
        }))
}

async fn list(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    query: &str,
) -> Vec<Value> {
    let (status, body) = send(
        app,
        actix_test::TestRequest::get().uri(&format!("/api/entries{query}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().expect("entry array").clone()
}

#[rstest]
fn filters_convert_back_to_query_params() {
    let filter = EntryFilter {
        data_type_id: Some(DataTypeId::random()),
        start: parse_optional_bound(Some("2024-01-01"), START_FIELD, BoundEdge::StartOfDay)
            .expect("valid bound"),
        end: None,
    };
    let params = EntriesQueryParams::from(&filter);
    assert_eq!(params.start_date.as_deref(), Some("2024-01-01T00:00:00Z"));
    assert_eq!(EntryFilter::try_from(params).expect("valid filter"), filter);
}

#[rstest]
#[case("2024-01-31T23:59:59.999Z")]
#[case("2024-01-31T23:59:59.999999Z")]
#[case("2024-01-31T23:59:59.123456789Z")]
fn filter_bounds_keep_their_precision_on_the_wire(#[case] raw: &str) {
    let end = parse_optional_bound(Some(raw), START_FIELD, BoundEdge::EndOfDay)
        .expect("valid bound");
    let filter = EntryFilter {
        data_type_id: None,
        start: None,
        end,
    };
    let params = EntriesQueryParams::from(&filter);
    assert_eq!(params.end_date.as_deref(), Some(raw));
    assert_eq!(EntryFilter::try_from(params).expect("valid filter"), filter);
}

#[rstest]
fn malformed_field_ids_name_their_position() {
    let request = CreateEntryRequest {
        data_type_id: DataTypeId::random().to_string(),
        date: "2024-01-15".to_owned(),
        fields: vec![EntryFieldRequest {
            field_id: "kg".to_owned(),
            value: json!(1),
        }],
    };
    let err = EntryDraft::try_from(request).expect_err("invalid field id");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        err.details().and_then(|details| details.get("field")),
        Some(&json!("fields[0].fieldId"))
    );
}

#[actix_web::test]
async fn numeric_values_round_trip() {
    let app = actix_test::init_service(test_app()).await;
    let weight = create_weight_type(&app).await;

    let (status, created) =
        send(&app, weigh_in(&weight, "2024-01-15T07:00:00Z", json!(72.5))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["fields"][0]["value"], json!(72.5));

    let uri = format!("/api/entries/{}", created["id"].as_str().expect("id"));
    let (status, fetched) = send(&app, actix_test::TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["fields"][0]["value"], json!(72.5));
}

#[actix_web::test]
async fn missing_required_values_persist_nothing() {
    let app = actix_test::init_service(test_app()).await;
    let weight = create_weight_type(&app).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::post().uri("/api/entries").set_json(json!({
            "dataTypeId": weight.id,
            "date": "2024-01-15",
            "fields": [{ "fieldId": weight.note, "value": "skipped" }]
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_failed");
    assert_eq!(
        body["details"]["violations"][0]["code"],
        "missing_required_field"
    );
    assert!(list(&app, "").await.is_empty());
}

#[actix_web::test]
async fn unknown_data_types_are_not_found() {
    let app = actix_test::init_service(test_app()).await;
    let ghost = WeightType {
        id: DataTypeId::random().to_string(),
        kg: DataTypeId::random().to_string(),
        note: DataTypeId::random().to_string(),
    };

    let (status, body) = send(&app, weigh_in(&ghost, "2024-01-15", json!(70))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["details"]["field"], "dataTypeId");
}

#[actix_web::test]
async fn date_range_is_inclusive_and_newest_first() {
    let app = actix_test::init_service(test_app()).await;
    let weight = create_weight_type(&app).await;
    for date in [
        "2023-12-31T23:59:59Z",
        "2024-01-01T00:00:00Z",
        "2024-01-31T23:59:59Z",
        "2024-02-01T00:00:00Z",
    ] {
        let (status, _) = send(&app, weigh_in(&weight, date, json!(70))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let entries = list(&app, "?startDate=2024-01-01&endDate=2024-01-31").await;

    let dates: Vec<&str> = entries
        .iter()
        .filter_map(|entry| entry["date"].as_str())
        .collect();
    assert_eq!(dates.len(), 2);
    assert!(dates[0].starts_with("2024-01-31T23:59:59"));
    assert!(dates[1].starts_with("2024-01-01T00:00:00"));
}

#[rstest]
#[case("?startDate=yesterday", "startDate")]
#[case("?endDate=2024-02-30", "endDate")]
#[case("?dataTypeId=weight", "dataTypeId")]
#[actix_web::test]
async fn malformed_filters_are_bad_requests(#[case] query: &str, #[case] field: &str) {
    let app = actix_test::init_service(test_app()).await;

    let (status, body) = send(
        &app,
        actix_test::TestRequest::get().uri(&format!("/api/entries{query}")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn updates_revalidate_and_deletes_remove() {
    let app = actix_test::init_service(test_app()).await;
    let weight = create_weight_type(&app).await;
    let (_, created) = send(&app, weigh_in(&weight, "2024-01-15", json!(72.5))).await;
    let uri = format!("/api/entries/{}", created["id"].as_str().expect("id"));

    let (status, rejected) = send(
        &app,
        actix_test::TestRequest::put().uri(&uri).set_json(json!({
            "fields": [{ "fieldId": weight.kg, "value": "heavy" }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected["details"]["violations"][0]["code"], "type_mismatch");

    let (status, moved) = send(
        &app,
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "date": "2024-01-16" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(moved["date"].as_str().expect("date").starts_with("2024-01-16"));
    assert_eq!(moved["fields"], created["fields"]);

    let (status, deleted) = send(&app, actix_test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted, json!({ "success": true }));

    let (status, _) = send(&app, actix_test::TestRequest::delete().uri(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn deleting_a_data_type_removes_its_entries() {
    let app = actix_test::init_service(test_app()).await;
    let weight = create_weight_type(&app).await;
    let (status, _) = send(&app, weigh_in(&weight, "2024-01-15", json!(72.5))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        actix_test::TestRequest::delete().uri(&format!("/api/data-types/{}", weight.id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert!(list(&app, "").await.is_empty());
    assert!(
        list(&app, &format!("?dataTypeId={}", weight.id))
            .await
            .is_empty()
    );
}
