//! Field definitions and typed field values.
//!
//! A [`FieldDefinition`] describes one attribute of a data type. Entry values
//! arrive as arbitrary JSON and are decoded into a [`FieldValue`] according
//! to the declared [`FieldType`]; the decoded value serialises back to the
//! same plain JSON shape (`72.5` stays `72.5`).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::FieldId;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text.
    Text,
    /// Floating point number.
    Number,
    /// Yes/no flag.
    Boolean,
    /// One of the field's `options`.
    List,
    /// Rows of string cells.
    Table,
    /// Reference to an uploaded image.
    Image,
    /// Calendar date or timestamp.
    Date,
}

impl FieldType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Text,
        Self::Number,
        Self::Boolean,
        Self::List,
        Self::Table,
        Self::Image,
        Self::Date,
    ];

    /// Wire name of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Table => "table",
            Self::Image => "image",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing an unknown field type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field type: {0}")]
pub struct UnknownFieldType(pub String);

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == s)
            .ok_or_else(|| UnknownFieldType(s.to_owned()))
    }
}

/// One typed attribute of a data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Identifier, unique within the owning data type.
    pub id: FieldId,
    /// Display name.
    pub name: String,
    /// Declared value type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether entries must supply a non-empty value.
    pub required: bool,
    /// Allowed values for `list` fields; empty for every other type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Value suggested to clients when creating an entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub default_value: Option<FieldValue>,
}

/// A decoded entry value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Numeric value; always finite.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// Selected option of a list field.
    List(String),
    /// Table rows.
    Table(Vec<Vec<String>>),
    /// Image reference (file name or URL).
    Image(String),
    /// Date or timestamp, normalised to UTC.
    Date(DateTime<Utc>),
}

/// Raised when a JSON value does not fit the declared field type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected a {expected} value")]
pub struct TypeMismatch {
    /// Declared type of the field.
    pub expected: FieldType,
}

impl FieldValue {
    /// Whether a raw JSON value counts as "no value supplied".
    ///
    /// `null`, blank strings and empty tables are empty; `false` and `0` are
    /// real values.
    pub fn is_empty_json(raw: &Value) -> bool {
        match raw {
            Value::Null => true,
            Value::String(text) => text.trim().is_empty(),
            Value::Array(rows) => rows.is_empty(),
            _ => false,
        }
    }

    /// Decode `raw` as a value of `field_type`.
    ///
    /// `options` constrains `list` values when non-empty. Callers filter
    /// empty values with [`FieldValue::is_empty_json`] first.
    pub fn decode(
        field_type: FieldType,
        options: &[String],
        raw: &Value,
    ) -> Result<Self, TypeMismatch> {
        let mismatch = || TypeMismatch {
            expected: field_type,
        };
        match (field_type, raw) {
            (FieldType::Text, Value::String(text)) => Ok(Self::Text(text.clone())),
            (FieldType::Number, Value::Number(number)) => number
                .as_f64()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(mismatch),
            (FieldType::Number, Value::String(text)) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Self::Number)
                .ok_or_else(mismatch),
            (FieldType::Boolean, Value::Bool(flag)) => Ok(Self::Boolean(*flag)),
            (FieldType::Boolean, Value::String(text)) => match text.trim() {
                "true" => Ok(Self::Boolean(true)),
                "false" => Ok(Self::Boolean(false)),
                _ => Err(mismatch()),
            },
            (FieldType::List, Value::String(choice)) => {
                if options.is_empty() || options.iter().any(|option| option == choice) {
                    Ok(Self::List(choice.clone()))
                } else {
                    Err(mismatch())
                }
            }
            (FieldType::Table, Value::Array(rows)) => {
                decode_table(rows).map(Self::Table).ok_or_else(mismatch)
            }
            (FieldType::Image, Value::String(reference)) if !reference.trim().is_empty() => {
                Ok(Self::Image(reference.clone()))
            }
            (FieldType::Date, Value::String(text)) => {
                parse_date(text).map(Self::Date).ok_or_else(mismatch)
            }
            _ => Err(mismatch()),
        }
    }

    /// Plain JSON representation used on the wire and in storage.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(text) | Self::List(text) | Self::Image(text) => Value::String(text.clone()),
            Self::Number(number) => serde_json::Number::from_f64(*number)
                .map_or(Value::Null, Value::Number),
            Self::Boolean(flag) => Value::Bool(*flag),
            Self::Table(rows) => Value::Array(
                rows.iter()
                    .map(|row| Value::Array(row.iter().cloned().map(Value::String).collect()))
                    .collect(),
            ),
            Self::Date(at) => {
                Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
            }
        }
    }

    /// Structural decoding for values read back without their field type.
    ///
    /// Strings come back as [`FieldValue::Text`]; the JSON form is identical
    /// to the typed original, so responses are unaffected.
    fn from_untyped(raw: Value) -> Option<Self> {
        match raw {
            Value::String(text) => Some(Self::Text(text)),
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::Bool(flag) => Some(Self::Boolean(flag)),
            Value::Array(rows) => decode_table(&rows).map(Self::Table),
            Value::Null | Value::Object(_) => None,
        }
    }
}

fn decode_table(rows: &[Value]) -> Option<Vec<Vec<String>>> {
    rows.iter()
        .map(|row| match row {
            Value::Array(cells) => cells
                .iter()
                .map(|cell| match cell {
                    Value::String(text) => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    Value::Bool(flag) => Some(flag.to_string()),
                    _ => None,
                })
                .collect(),
            _ => None,
        })
        .collect()
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::from_untyped(raw).ok_or_else(|| {
            de::Error::custom("field value must be a string, number, boolean or table")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), true)]
    #[case(json!(""), true)]
    #[case(json!("   "), true)]
    #[case(json!([]), true)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!("x"), false)]
    fn emptiness(#[case] raw: Value, #[case] expected: bool) {
        assert_eq!(FieldValue::is_empty_json(&raw), expected);
    }

    #[rstest]
    #[case(FieldType::Text, json!("hello"), FieldValue::Text("hello".into()))]
    #[case(FieldType::Number, json!(72.5), FieldValue::Number(72.5))]
    #[case(FieldType::Number, json!(" 8 "), FieldValue::Number(8.0))]
    #[case(FieldType::Boolean, json!(false), FieldValue::Boolean(false))]
    #[case(FieldType::Boolean, json!("true"), FieldValue::Boolean(true))]
    #[case(FieldType::Image, json!("photo.png"), FieldValue::Image("photo.png".into()))]
    #[case(
        FieldType::Table,
        json!([["a", 1], ["b", true]]),
        FieldValue::Table(vec![vec!["a".into(), "1".into()], vec!["b".into(), "true".into()]])
    )]
    fn decodes_matching_values(
        #[case] field_type: FieldType,
        #[case] raw: Value,
        #[case] expected: FieldValue,
    ) {
        assert_eq!(FieldValue::decode(field_type, &[], &raw), Ok(expected));
    }

    #[rstest]
    #[case(FieldType::Text, json!(5))]
    #[case(FieldType::Number, json!("heavy"))]
    #[case(FieldType::Boolean, json!("maybe"))]
    #[case(FieldType::Table, json!(["flat"]))]
    #[case(FieldType::Image, json!(3))]
    #[case(FieldType::Date, json!("yesterday"))]
    fn rejects_mismatched_values(#[case] field_type: FieldType, #[case] raw: Value) {
        assert_eq!(
            FieldValue::decode(field_type, &[], &raw),
            Err(TypeMismatch {
                expected: field_type
            })
        );
    }

    #[rstest]
    fn list_values_must_be_declared_options() {
        let options = vec!["good".to_owned(), "bad".to_owned()];
        assert_eq!(
            FieldValue::decode(FieldType::List, &options, &json!("good")),
            Ok(FieldValue::List("good".into()))
        );
        assert!(FieldValue::decode(FieldType::List, &options, &json!("meh")).is_err());
    }

    #[rstest]
    #[case("2024-03-05", "2024-03-05T00:00:00.000Z")]
    #[case("2024-03-05T10:30:00+02:00", "2024-03-05T08:30:00.000Z")]
    fn dates_normalise_to_utc(#[case] raw: &str, #[case] expected: &str) {
        let value = FieldValue::decode(FieldType::Date, &[], &json!(raw)).expect("valid date");
        assert_eq!(value.to_json(), json!(expected));
    }

    #[rstest]
    fn number_serialises_as_plain_json() {
        let value = FieldValue::Number(72.5);
        assert_eq!(serde_json::to_value(&value).expect("serialise"), json!(72.5));
    }

    #[rstest]
    fn untyped_decoding_rejects_objects() {
        assert!(serde_json::from_value::<FieldValue>(json!({ "a": 1 })).is_err());
    }

    #[rstest]
    fn field_type_names_round_trip() {
        for field_type in FieldType::ALL {
            assert_eq!(field_type.as_str().parse::<FieldType>(), Ok(field_type));
        }
        assert!("colour".parse::<FieldType>().is_err());
    }
}
