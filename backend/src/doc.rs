//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` handler, the health probes and the
//! request and response schemas, plus the session cookie security scheme.
//! The document is served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump`.

use crate::domain::{
    DataType, Entry, EntryField, Error, ErrorCode, FieldDefinition, FieldType, Frequency,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::data_types::{
    CreateDataTypeRequest, FieldRequest, UpdateDataTypeRequest,
};
use crate::inbound::http::entries::{CreateEntryRequest, EntryFieldRequest, UpdateEntryRequest};
use crate::inbound::http::schemas::SuccessResponse;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tracker API",
        description = "User-defined data types and dated entries validated against them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::data_types::list_data_types,
        crate::inbound::http::data_types::create_data_type,
        crate::inbound::http::data_types::get_data_type,
        crate::inbound::http::data_types::update_data_type,
        crate::inbound::http::data_types::delete_data_type,
        crate::inbound::http::entries::list_entries,
        crate::inbound::http::entries::create_entry,
        crate::inbound::http::entries::get_entry,
        crate::inbound::http::entries::update_entry,
        crate::inbound::http::entries::delete_entry,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        DataType,
        FieldDefinition,
        FieldType,
        Frequency,
        Entry,
        EntryField,
        Error,
        ErrorCode,
        FieldRequest,
        CreateDataTypeRequest,
        UpdateDataTypeRequest,
        EntryFieldRequest,
        CreateEntryRequest,
        UpdateEntryRequest,
        RegisterRequest,
        LoginRequest,
        SuccessResponse,
    )),
    tags(
        (name = "accounts", description = "Registration and login"),
        (name = "data-types", description = "User-defined data type schemas"),
        (name = "entries", description = "Dated records validated against a data type"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
