//! UUID-backed identifiers for users, data types, fields and entries.
//!
//! Each identifier is a distinct type so an entry id can never be passed
//! where a data type id is expected. They serialise as hyphenated strings.

macro_rules! define_uuid_id {
    ($(#[$outer:meta])* $name:ident, $label:literal) => {
        $(#[$outer])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = String, format = Uuid)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Parse an identifier from its textual form.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, IdParseError> {
                raw.as_ref().parse()
            }

            /// Generate a new random identifier.
            pub fn random() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim() != s || s.is_empty() {
                    return Err(IdParseError::new($label, s));
                }
                uuid::Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|_| IdParseError::new($label, s))
            }
        }
    };
}

/// Raised when text cannot be parsed into one of the identifier types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID, got {value:?}")]
pub struct IdParseError {
    /// Human readable label of the identifier kind.
    pub kind: &'static str,
    /// Rejected input.
    pub value: String,
}

impl IdParseError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

define_uuid_id!(
    /// Identifier of a registered user and owner of data types and entries.
    UserId,
    "user id"
);

define_uuid_id!(
    /// Identifier of a data type definition.
    DataTypeId,
    "data type id"
);

define_uuid_id!(
    /// Identifier of a field definition, unique within its data type.
    FieldId,
    "field id"
);

define_uuid_id!(
    /// Identifier of an entry record.
    EntryId,
    "entry id"
);
