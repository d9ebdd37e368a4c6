//! Checks entry values against the data type they reference.
//!
//! Validation never stops at the first problem: every violation in a
//! submission is reported so clients can highlight all offending fields at
//! once. The module also owns the rule that every data type keeps at least
//! one required field.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::FieldId;
use super::data_type::DataType;
use super::field::{FieldDefinition, FieldType, FieldValue};

/// Raw value submitted for one field of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFieldInput {
    /// Target field.
    pub field_id: FieldId,
    /// Submitted JSON value.
    #[serde(default)]
    pub value: Value,
}

/// Validated value of one field of an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryField {
    /// Field the value belongs to.
    pub field_id: FieldId,
    /// Decoded value.
    #[schema(value_type = Object)]
    pub value: FieldValue,
}

/// A single reason an entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SchemaViolation {
    /// A required field had no value.
    MissingRequiredField {
        /// Offending field.
        field_id: FieldId,
    },
    /// The entry named a field the data type does not define.
    UnknownField {
        /// Offending field.
        field_id: FieldId,
    },
    /// A value did not decode as the declared type.
    TypeMismatch {
        /// Offending field.
        field_id: FieldId,
        /// Declared type.
        expected: FieldType,
    },
    /// The same field was supplied more than once.
    DuplicateField {
        /// Offending field.
        field_id: FieldId,
    },
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField { field_id } => write!(f, "field {field_id} is required"),
            Self::UnknownField { field_id } => write!(f, "field {field_id} is not defined"),
            Self::TypeMismatch { field_id, expected } => {
                write!(f, "field {field_id} must be a {expected} value")
            }
            Self::DuplicateField { field_id } => write!(f, "field {field_id} is repeated"),
        }
    }
}

/// Every violation found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("entry failed validation ({} problem(s))", violations.len())]
pub struct SchemaValidationError {
    /// Violations in discovery order.
    pub violations: Vec<SchemaViolation>,
}

/// Render violations as JSON objects, each carrying its `code`, context
/// fields and a human-readable `message`.
pub(crate) fn violation_details<V>(violations: &[V]) -> Value
where
    V: Serialize + std::fmt::Display,
{
    Value::Array(
        violations
            .iter()
            .map(|violation| {
                let mut rendered = serde_json::to_value(violation).unwrap_or(Value::Null);
                if let Value::Object(map) = &mut rendered {
                    map.insert("message".to_owned(), Value::String(violation.to_string()));
                }
                rendered
            })
            .collect(),
    )
}

/// Force the first field to be required when none is.
///
/// Returns `true` when the list was changed. An empty list is left alone;
/// draft validation rejects it separately.
pub fn ensure_required_field(fields: &mut [FieldDefinition]) -> bool {
    if fields.iter().any(|field| field.required) {
        return false;
    }
    match fields.first_mut() {
        Some(first) => {
            first.required = true;
            info!(
                field_id = %first.id,
                field_name = %first.name,
                "no required field declared; marking first field required"
            );
            true
        }
        None => false,
    }
}

/// Validate submitted values against `data_type`.
///
/// On success returns the decoded, non-empty values in submission order;
/// empty optional values are dropped.
///
/// # Examples
/// ```
/// # use chrono::Utc;
/// # use serde_json::json;
/// # use tracker::domain::{
/// #     DataTypeDraft, DataTypeId, EntryFieldInput, FieldDraft, FieldType, Frequency, UserId,
/// #     validate_entry_fields,
/// # };
/// # let draft = DataTypeDraft {
/// #     name: "Weight".into(), description: None, frequency: Frequency::Daily,
/// #     fields: vec![FieldDraft { id: None, name: "kg".into(), field_type: FieldType::Number,
/// #         required: true, options: vec![], default_value: None }],
/// #     color: None, icon: None,
/// # };
/// # let now = Utc::now();
/// # let content = draft.validate().unwrap();
/// # let data_type = content.into_data_type(DataTypeId::random(), UserId::random(), now, now);
/// let field_id = data_type.fields[0].id;
/// let inputs = [EntryFieldInput { field_id, value: json!(72.5) }];
/// let fields = validate_entry_fields(&data_type, &inputs).unwrap();
/// assert_eq!(serde_json::to_value(&fields[0].value).unwrap(), json!(72.5));
/// ```
pub fn validate_entry_fields(
    data_type: &DataType,
    submitted: &[EntryFieldInput],
) -> Result<Vec<EntryField>, SchemaValidationError> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(submitted.len());

    for input in submitted {
        if !seen.insert(input.field_id) {
            violations.push(SchemaViolation::DuplicateField {
                field_id: input.field_id,
            });
            continue;
        }
        let Some(definition) = data_type.field(&input.field_id) else {
            violations.push(SchemaViolation::UnknownField {
                field_id: input.field_id,
            });
            continue;
        };
        if FieldValue::is_empty_json(&input.value) {
            continue;
        }
        match FieldValue::decode(definition.field_type, &definition.options, &input.value) {
            Ok(value) => accepted.push(EntryField {
                field_id: input.field_id,
                value,
            }),
            Err(mismatch) => violations.push(SchemaViolation::TypeMismatch {
                field_id: input.field_id,
                expected: mismatch.expected,
            }),
        }
    }

    for definition in data_type.fields.iter().filter(|field| field.required) {
        let supplied = submitted
            .iter()
            .any(|input| {
                input.field_id == definition.id && !FieldValue::is_empty_json(&input.value)
            });
        if !supplied {
            violations.push(SchemaViolation::MissingRequiredField {
                field_id: definition.id,
            });
        }
    }

    if violations.is_empty() {
        Ok(accepted)
    } else {
        Err(SchemaValidationError { violations })
    }
}
