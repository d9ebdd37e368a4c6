//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that enforce their rules. Keep
//! types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error and ErrorCode: API error payload and its stable identifier.
//! - DataType and FieldDefinition: user-defined schemas.
//! - Entry: a dated record conforming to one data type.
//! - `validate_entry_fields`: the schema validator.
//! - `DataTypeService`, `EntryService` and `AccountService`: driving port
//!   implementations.

pub mod account_service;
pub mod data_type;
pub mod data_type_service;
pub mod entry;
pub mod entry_service;
pub mod error;
pub mod field;
pub mod ids;
pub mod password;
pub mod ports;
pub mod schema_validator;
pub mod trace_id;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use self::account_service::AccountService;
pub use self::data_type::{
    DEFAULT_COLOR, DataType, DataTypeContent, DataTypeDraft, DataTypePatch, DefinitionError,
    DefinitionViolation, FieldDraft, Frequency,
};
pub use self::data_type_service::DataTypeService;
pub use self::entry::{
    BoundEdge, Entry, EntryDraft, EntryFilter, EntryPatch, day_edge, parse_date_bound,
    sort_newest_first,
};
pub use self::entry_service::EntryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::field::{
    FieldDefinition, FieldType, FieldValue, TypeMismatch, UnknownFieldType, parse_date,
};
pub use self::ids::{DataTypeId, EntryId, FieldId, IdParseError, UserId};
pub use self::password::{Password, PasswordError, PasswordHash};
pub use self::schema_validator::{
    EntryField, EntryFieldInput, SchemaValidationError, SchemaViolation, ensure_required_field,
    validate_entry_fields,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, LoginCredentials, Registration, USER_NAME_MAX, User, UserAccount, UserName,
    UserValidationError,
};
