//! Tests for the entry service.

use std::sync::Arc;

use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{DataTypeRepositoryError, MockDataTypeRepository, MockEntryRepository};
use crate::domain::test_support::{fixture_clock, fixture_timestamp, weight_data_type};
use crate::domain::{EntryField, EntryFieldInput, ErrorCode, FieldValue};

type Service = EntryService<MockEntryRepository, MockDataTypeRepository>;

fn make_service(entries: MockEntryRepository, data_types: MockDataTypeRepository) -> Service {
    EntryService::new(Arc::new(entries), Arc::new(data_types), fixture_clock())
}

fn data_types_returning(data_type: Option<DataType>) -> MockDataTypeRepository {
    let mut repo = MockDataTypeRepository::new();
    repo.expect_find().return_once(move |_, _| Ok(data_type));
    repo
}

fn kg_input(data_type: &DataType, value: Value) -> EntryFieldInput {
    let field_id = data_type.fields.first().map(|f| f.id).expect("fixture field");
    EntryFieldInput { field_id, value }
}

fn stored_entry(data_type: &DataType) -> Entry {
    let created = fixture_timestamp() - Duration::days(1);
    Entry {
        id: EntryId::random(),
        user_id: data_type.user_id,
        data_type_id: data_type.id,
        date: created,
        fields: vec![EntryField {
            field_id: data_type.fields[0].id,
            value: FieldValue::Number(70.0),
        }],
        created_at: created,
        updated_at: created,
    }
}

fn violation_codes(err: &Error) -> Vec<String> {
    err.details()
        .and_then(|d| d.get("violations"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.get("code").and_then(Value::as_str).map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}

#[rstest]
#[tokio::test]
async fn create_validates_and_stores_entry() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let draft = EntryDraft {
        data_type_id: data_type.id,
        date: fixture_timestamp(),
        fields: vec![kg_input(&data_type, json!("72.5"))],
    };

    let mut entries = MockEntryRepository::new();
    entries
        .expect_insert()
        .withf(move |entry| entry.user_id == owner && entry.fields.len() == 1)
        .times(1)
        .return_once(|_| Ok(()));

    let created = make_service(entries, data_types_returning(Some(data_type.clone())))
        .create(&owner, draft)
        .await
        .expect("create succeeds");

    assert_eq!(created.data_type_id, data_type.id);
    assert_eq!(created.fields[0].value, FieldValue::Number(72.5));
    assert_eq!(created.created_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_for_unknown_data_type_is_not_found() {
    let mut entries = MockEntryRepository::new();
    entries.expect_insert().never();
    let draft = EntryDraft {
        data_type_id: DataTypeId::random(),
        date: fixture_timestamp(),
        fields: Vec::new(),
    };

    let err = make_service(entries, data_types_returning(None))
        .create(&UserId::random(), draft)
        .await
        .expect_err("unknown data type");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
        Some("dataTypeId")
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_values_that_break_the_schema() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let draft = EntryDraft {
        data_type_id: data_type.id,
        date: fixture_timestamp(),
        fields: vec![kg_input(&data_type, json!("heavy"))],
    };
    let mut entries = MockEntryRepository::new();
    entries.expect_insert().never();

    let err = make_service(entries, data_types_returning(Some(data_type)))
        .create(&owner, draft)
        .await
        .expect_err("type mismatch");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(violation_codes(&err), vec!["type_mismatch"]);
}

#[rstest]
#[tokio::test]
async fn create_maps_vanished_data_type_to_not_found() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let data_type_id = data_type.id;
    let draft = EntryDraft {
        data_type_id,
        date: fixture_timestamp(),
        fields: vec![kg_input(&data_type, json!(1))],
    };
    let mut entries = MockEntryRepository::new();
    entries
        .expect_insert()
        .return_once(move |_| Err(EntryRepositoryError::missing_data_type(data_type_id)));

    let err = make_service(entries, data_types_returning(Some(data_type)))
        .create(&owner, draft)
        .await
        .expect_err("race lost");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn update_revalidates_replaced_fields() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let current = stored_entry(&data_type);
    let id = current.id;
    let original_date = current.date;

    let mut entries = MockEntryRepository::new();
    entries.expect_find().return_once(move |_, _| Ok(Some(current)));
    entries.expect_update().times(1).return_once(|_| Ok(true));

    let patch = EntryPatch {
        date: None,
        fields: Some(vec![kg_input(&data_type, json!(68))]),
    };
    let updated = make_service(entries, data_types_returning(Some(data_type)))
        .update(&owner, &id, patch)
        .await
        .expect("update succeeds");

    assert_eq!(updated.fields[0].value, FieldValue::Number(68.0));
    assert_eq!(updated.date, original_date);
    assert_eq!(updated.updated_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn update_of_date_only_skips_schema_lookup() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let current = stored_entry(&data_type);
    let id = current.id;
    let new_date = fixture_timestamp() - Duration::hours(2);

    let mut entries = MockEntryRepository::new();
    entries.expect_find().return_once(move |_, _| Ok(Some(current)));
    entries.expect_update().return_once(|_| Ok(true));
    let mut data_types = MockDataTypeRepository::new();
    data_types.expect_find().never();

    let updated = make_service(entries, data_types)
        .update(
            &owner,
            &id,
            EntryPatch {
                date: Some(new_date),
                fields: None,
            },
        )
        .await
        .expect("update succeeds");

    assert_eq!(updated.date, new_date);
}

#[rstest]
#[tokio::test]
async fn update_of_missing_entry_is_not_found() {
    let mut entries = MockEntryRepository::new();
    entries.expect_find().return_once(|_, _| Ok(None));
    entries.expect_update().never();

    let err = make_service(entries, MockDataTypeRepository::new())
        .update(&UserId::random(), &EntryId::random(), EntryPatch::default())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_maps_repository_outcome(
    #[case] removed: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut entries = MockEntryRepository::new();
    entries.expect_delete().return_once(move |_, _| Ok(removed));

    let result = make_service(entries, MockDataTypeRepository::new())
        .delete(&UserId::random(), &EntryId::random())
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[tokio::test]
async fn list_passes_filter_through() {
    let owner = UserId::random();
    let data_type = weight_data_type(owner);
    let entry = stored_entry(&data_type);
    let expected = vec![entry.clone()];
    let filter = EntryFilter {
        data_type_id: Some(data_type.id),
        ..EntryFilter::default()
    };
    let wanted = filter.clone();

    let mut entries = MockEntryRepository::new();
    entries
        .expect_list()
        .withf(move |requested_owner, requested| *requested_owner == owner && *requested == wanted)
        .return_once(move |_, _| Ok(vec![entry]));

    let listed = make_service(entries, MockDataTypeRepository::new())
        .list(&owner, &filter)
        .await
        .expect("list succeeds");

    assert_eq!(listed, expected);
}

#[rstest]
#[case(EntryRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(EntryRepositoryError::query("bad"), ErrorCode::InternalError)]
#[tokio::test]
async fn get_maps_repository_failures(
    #[case] failure: EntryRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut entries = MockEntryRepository::new();
    entries.expect_find().return_once(move |_, _| Err(failure));

    let err = make_service(entries, MockDataTypeRepository::new())
        .get(&UserId::random(), &EntryId::random())
        .await
        .expect_err("failure propagates");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn data_type_lookup_failures_surface_as_unavailable() {
    let mut data_types = MockDataTypeRepository::new();
    data_types
        .expect_find()
        .return_once(|_, _| Err(DataTypeRepositoryError::connection("down")));
    let draft = EntryDraft {
        data_type_id: DataTypeId::random(),
        date: fixture_timestamp(),
        fields: Vec::new(),
    };

    let err = make_service(MockEntryRepository::new(), data_types)
        .create(&UserId::random(), draft)
        .await
        .expect_err("lookup fails");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
