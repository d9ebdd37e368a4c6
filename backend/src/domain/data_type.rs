//! Data type definitions: user-defined schemas that entries conform to.
//!
//! Drafts arrive from adapters with loosely validated content. [`DataTypeDraft::validate`]
//! trims names, mints missing field ids, drops options from non-list fields,
//! decodes default values and applies the required-field normalisation before
//! anything reaches a repository.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::field::{FieldDefinition, FieldType, FieldValue};
use super::schema_validator::ensure_required_field;
use super::{DataTypeId, FieldId, UserId};

/// Colour assigned when a draft does not name one.
pub const DEFAULT_COLOR: &str = "#3b82f6";

/// Advisory logging cadence of a data type. Never enforced against entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Once per day.
    Daily,
    /// Once per week.
    Weekly,
    /// Once per month.
    Monthly,
    /// Once per year.
    Yearly,
    /// No expected cadence.
    Timeless,
}

impl Frequency {
    /// Wire and storage name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Timeless => "timeless",
        }
    }

    /// Parse a wire or storage name.
    pub fn parse(raw: &str) -> Option<Self> {
        [
            Self::Daily,
            Self::Weekly,
            Self::Monthly,
            Self::Yearly,
            Self::Timeless,
        ]
        .into_iter()
        .find(|candidate| candidate.as_str() == raw)
    }
}

/// Persisted data type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DataType {
    /// Identifier.
    pub id: DataTypeId,
    /// Owner; unique together with `name`.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Advisory cadence.
    pub frequency: Frequency,
    /// Ordered, non-empty field list with at least one required field.
    pub fields: Vec<FieldDefinition>,
    /// Display colour.
    pub color: String,
    /// Optional icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Creation time.
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl DataType {
    /// Look up a field definition by id.
    pub fn field(&self, id: &FieldId) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| &field.id == id)
    }
}

/// Unvalidated field definition supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDraft {
    /// Existing id to keep; a new one is minted when absent.
    pub id: Option<FieldId>,
    /// Display name.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Required flag.
    pub required: bool,
    /// Options for list fields.
    pub options: Vec<String>,
    /// Raw default value.
    pub default_value: Option<Value>,
}

/// Unvalidated data type content supplied by a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTypeDraft {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Advisory cadence.
    pub frequency: Frequency,
    /// Field definitions in display order.
    pub fields: Vec<FieldDraft>,
    /// Optional colour; [`DEFAULT_COLOR`] when absent or blank.
    pub color: Option<String>,
    /// Optional icon.
    pub icon: Option<String>,
}

/// Partial update of a data type. `None` leaves the current value untouched;
/// a blank description or icon clears it. A supplied field list replaces the
/// current one wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataTypePatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New cadence.
    pub frequency: Option<Frequency>,
    /// Replacement field list.
    pub fields: Option<Vec<FieldDraft>>,
    /// New colour.
    pub color: Option<String>,
    /// New icon.
    pub icon: Option<String>,
}

impl DataTypePatch {
    /// Merge the patch over an existing definition, producing a draft that
    /// still needs validation.
    pub fn apply_to(self, current: &DataType) -> DataTypeDraft {
        let fields = self.fields.unwrap_or_else(|| {
            current
                .fields
                .iter()
                .map(|field| FieldDraft {
                    id: Some(field.id),
                    name: field.name.clone(),
                    field_type: field.field_type,
                    required: field.required,
                    options: field.options.clone(),
                    default_value: field.default_value.as_ref().map(FieldValue::to_json),
                })
                .collect()
        });
        DataTypeDraft {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self.description.or_else(|| current.description.clone()),
            frequency: self.frequency.unwrap_or(current.frequency),
            fields,
            color: self.color.or_else(|| Some(current.color.clone())),
            icon: self.icon.or_else(|| current.icon.clone()),
        }
    }
}

/// Validated content of a data type, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTypeContent {
    /// Trimmed display name.
    pub name: String,
    /// Description, `None` when blank.
    pub description: Option<String>,
    /// Advisory cadence.
    pub frequency: Frequency,
    /// Normalised field list.
    pub fields: Vec<FieldDefinition>,
    /// Display colour.
    pub color: String,
    /// Icon, `None` when blank.
    pub icon: Option<String>,
}

impl DataTypeContent {
    /// Combine validated content with identity and timestamps.
    pub fn into_data_type(
        self,
        id: DataTypeId,
        user_id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DataType {
        DataType {
            id,
            user_id,
            name: self.name,
            description: self.description,
            frequency: self.frequency,
            fields: self.fields,
            color: self.color,
            icon: self.icon,
            created_at,
            updated_at,
        }
    }
}

/// A single problem found in a data type draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum DefinitionViolation {
    /// The data type name was blank.
    BlankName,
    /// The field list was empty.
    NoFields,
    /// A field name was blank.
    BlankFieldName {
        /// Position of the offending field.
        index: usize,
    },
    /// Two fields shared an id.
    #[serde(rename_all = "camelCase")]
    DuplicateFieldId {
        /// Repeated identifier.
        field_id: FieldId,
    },
    /// A default value did not match its field type.
    InvalidDefault {
        /// Position of the offending field.
        index: usize,
        /// Declared type.
        expected: FieldType,
    },
}

impl std::fmt::Display for DefinitionViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => f.write_str("name must not be empty"),
            Self::NoFields => f.write_str("at least one field is required"),
            Self::BlankFieldName { index } => write!(f, "field {index} has an empty name"),
            Self::DuplicateFieldId { field_id } => write!(f, "field id {field_id} is repeated"),
            Self::InvalidDefault { index, expected } => {
                write!(f, "default value of field {index} must be a {expected} value")
            }
        }
    }
}

/// Every problem found in a data type draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("data type definition is invalid ({} problem(s))", violations.len())]
pub struct DefinitionError {
    /// Violations in discovery order.
    pub violations: Vec<DefinitionViolation>,
}

impl DataTypeDraft {
    /// Validate and normalise the draft.
    ///
    /// # Examples
    /// ```
    /// use tracker::domain::{DataTypeDraft, FieldDraft, FieldType, Frequency};
    ///
    /// let draft = DataTypeDraft {
    ///     name: " Weight ".into(),
    ///     description: None,
    ///     frequency: Frequency::Daily,
    ///     fields: vec![FieldDraft {
    ///         id: None,
    ///         name: "kg".into(),
    ///         field_type: FieldType::Number,
    ///         required: false,
    ///         options: vec![],
    ///         default_value: None,
    ///     }],
    ///     color: None,
    ///     icon: None,
    /// };
    /// let content = draft.validate().unwrap();
    /// assert_eq!(content.name, "Weight");
    /// assert!(content.fields[0].required);
    /// ```
    pub fn validate(self) -> Result<DataTypeContent, DefinitionError> {
        let mut violations = Vec::new();
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            violations.push(DefinitionViolation::BlankName);
        }
        if self.fields.is_empty() {
            violations.push(DefinitionViolation::NoFields);
        }

        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());
        for (index, draft) in self.fields.into_iter().enumerate() {
            match build_field(index, draft, &mut seen) {
                Ok(field) => fields.push(field),
                Err(mut problems) => violations.append(&mut problems),
            }
        }

        if !violations.is_empty() {
            return Err(DefinitionError { violations });
        }

        ensure_required_field(&mut fields);
        Ok(DataTypeContent {
            name,
            description: non_blank(self.description),
            frequency: self.frequency,
            fields,
            color: non_blank(self.color).unwrap_or_else(|| DEFAULT_COLOR.to_owned()),
            icon: non_blank(self.icon),
        })
    }
}

fn build_field(
    index: usize,
    draft: FieldDraft,
    seen: &mut HashSet<FieldId>,
) -> Result<FieldDefinition, Vec<DefinitionViolation>> {
    let mut problems = Vec::new();
    let name = draft.name.trim().to_owned();
    if name.is_empty() {
        problems.push(DefinitionViolation::BlankFieldName { index });
    }

    let id = draft.id.unwrap_or_else(FieldId::random);
    if !seen.insert(id) {
        problems.push(DefinitionViolation::DuplicateFieldId { field_id: id });
    }

    let options: Vec<String> = if draft.field_type == FieldType::List {
        draft
            .options
            .into_iter()
            .map(|option| option.trim().to_owned())
            .filter(|option| !option.is_empty())
            .collect()
    } else {
        Vec::new()
    };

    let default_value = match draft.default_value {
        Some(raw) if !FieldValue::is_empty_json(&raw) => {
            match FieldValue::decode(draft.field_type, &options, &raw) {
                Ok(value) => Some(value),
                Err(mismatch) => {
                    problems.push(DefinitionViolation::InvalidDefault {
                        index,
                        expected: mismatch.expected,
                    });
                    None
                }
            }
        }
        _ => None,
    };

    if !problems.is_empty() {
        return Err(problems);
    }
    Ok(FieldDefinition {
        id,
        name,
        field_type: draft.field_type,
        required: draft.required,
        options,
        default_value,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
