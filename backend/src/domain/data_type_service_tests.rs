//! Tests for the data type service.

use std::sync::Arc;

use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::{ErrorCode, FieldDraft};
use crate::domain::ports::MockDataTypeRepository;
use crate::domain::test_support::{fixture_clock, fixture_timestamp, weight_data_type, weight_draft};

fn make_service(repo: MockDataTypeRepository) -> DataTypeService<MockDataTypeRepository> {
    DataTypeService::new(Arc::new(repo), fixture_clock())
}

#[rstest]
#[tokio::test]
async fn create_normalises_and_stores_draft() {
    let owner = UserId::random();
    let mut repo = MockDataTypeRepository::new();
    repo.expect_insert()
        .withf(move |data_type| {
            data_type.user_id == owner
                && data_type.fields.first().is_some_and(|field| field.required)
        })
        .times(1)
        .return_once(|_| Ok(()));

    let created = make_service(repo)
        .create(&owner, weight_draft())
        .await
        .expect("create succeeds");

    assert_eq!(created.name, "Weight");
    assert_eq!(created.color, crate::domain::DEFAULT_COLOR);
    assert_eq!(created.created_at, fixture_timestamp());
    assert_eq!(created.updated_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn create_reports_duplicate_names() {
    let mut repo = MockDataTypeRepository::new();
    repo.expect_insert()
        .times(1)
        .return_once(|_| Err(DataTypeRepositoryError::duplicate_name("Weight")));

    let err = make_service(repo)
        .create(&UserId::random(), weight_draft())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::DuplicateName);
    assert_eq!(
        err.details().and_then(|d| d.get("field")).and_then(Value::as_str),
        Some("name")
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_draft_without_touching_storage() {
    let mut repo = MockDataTypeRepository::new();
    repo.expect_insert().never();
    let mut draft = weight_draft();
    draft.name = "   ".to_owned();
    draft.fields.clear();

    let err = make_service(repo)
        .create(&UserId::random(), draft)
        .await
        .expect_err("invalid draft");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    let codes: Vec<&str> = err
        .details()
        .and_then(|d| d.get("violations"))
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(|v| v.get("code").and_then(Value::as_str)).collect())
        .unwrap_or_default();
    assert_eq!(codes, vec!["blank_name", "no_fields"]);
}

#[rstest]
#[tokio::test]
async fn update_merges_patch_and_refreshes_timestamp() {
    let owner = UserId::random();
    let mut current = weight_data_type(owner);
    current.created_at = fixture_timestamp() - chrono::Duration::days(3);
    current.updated_at = current.created_at;
    let id = current.id;
    let created_at = current.created_at;

    let mut repo = MockDataTypeRepository::new();
    repo.expect_find()
        .times(1)
        .return_once(move |_, _| Ok(Some(current)));
    repo.expect_update().times(1).return_once(|_| Ok(true));

    let patch = DataTypePatch {
        name: Some("Body weight".to_owned()),
        color: Some("#ff0000".to_owned()),
        ..DataTypePatch::default()
    };
    let updated = make_service(repo)
        .update(&owner, &id, patch)
        .await
        .expect("update succeeds");

    assert_eq!(updated.id, id);
    assert_eq!(updated.name, "Body weight");
    assert_eq!(updated.color, "#ff0000");
    assert_eq!(updated.created_at, created_at);
    assert_eq!(updated.updated_at, fixture_timestamp());
}

#[rstest]
#[tokio::test]
async fn update_keeps_a_required_field_when_all_are_cleared() {
    let owner = UserId::random();
    let current = weight_data_type(owner);
    let id = current.id;
    let fields: Vec<FieldDraft> = current
        .fields
        .iter()
        .map(|field| FieldDraft {
            id: Some(field.id),
            name: field.name.clone(),
            field_type: field.field_type,
            required: false,
            options: Vec::new(),
            default_value: None,
        })
        .collect();

    let mut repo = MockDataTypeRepository::new();
    repo.expect_find()
        .return_once(move |_, _| Ok(Some(current)));
    repo.expect_update().return_once(|_| Ok(true));

    let updated = make_service(repo)
        .update(
            &owner,
            &id,
            DataTypePatch {
                fields: Some(fields),
                ..DataTypePatch::default()
            },
        )
        .await
        .expect("update succeeds");

    assert!(updated.fields.iter().any(|field| field.required));
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_data_type_is_not_found() {
    let mut repo = MockDataTypeRepository::new();
    repo.expect_find().return_once(|_, _| Ok(None));
    repo.expect_update().never();

    let err = make_service(repo)
        .update(&UserId::random(), &DataTypeId::random(), DataTypePatch::default())
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
    let mut repo = MockDataTypeRepository::new();
    repo.expect_delete().return_once(move |_, _| Ok(removed));

    let result = make_service(repo)
        .delete(&UserId::random(), &DataTypeId::random())
        .await;

    assert_eq!(result.err().map(|err| err.code()), expected);
}

#[rstest]
#[case(DataTypeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(DataTypeRepositoryError::query("syntax"), ErrorCode::InternalError)]
#[tokio::test]
async fn list_maps_repository_failures(
    #[case] failure: DataTypeRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut repo = MockDataTypeRepository::new();
    repo.expect_list_for_owner()
        .return_once(move |_| Err(failure));

    let err = make_service(repo)
        .list(&UserId::random())
        .await
        .expect_err("failure propagates");

    assert_eq!(err.code(), expected);
}

#[rstest]
#[tokio::test]
async fn get_returns_owned_data_type() {
    let owner = UserId::random();
    let stored = weight_data_type(owner);
    let id = stored.id;
    let expected = stored.clone();
    let mut repo = MockDataTypeRepository::new();
    repo.expect_find()
        .withf(move |requested_owner, requested_id| {
            *requested_owner == owner && *requested_id == id
        })
        .return_once(move |_, _| Ok(Some(stored)));

    let found = make_service(repo).get(&owner, &id).await.expect("found");
    assert_eq!(found, expected);
}
