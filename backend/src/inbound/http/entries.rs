//! Entry API handlers.
//!
//! ```text
//! GET    /api/entries?dataTypeId=…&startDate=2024-01-01&endDate=2024-01-31
//! POST   /api/entries      {"dataTypeId":"…","date":"2024-01-15",
//!                           "fields":[{"fieldId":"…","value":72.5}]}
//! GET    /api/entries/{id}
//! PUT    /api/entries/{id} {"date":"2024-01-16"}
//! DELETE /api/entries/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BoundEdge, Entry, EntryDraft, EntryFieldInput, EntryFilter, EntryId, EntryPatch, Error,
    FieldId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::SuccessResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_path, invalid_uuid_error, parse_id, parse_optional_bound, parse_optional_id,
    parse_timestamp,
};

const ID_FIELD: FieldName = FieldName::new("id");
const DATA_TYPE_ID_FIELD: FieldName = FieldName::new("dataTypeId");
const DATE_FIELD: FieldName = FieldName::new("date");
const START_FIELD: FieldName = FieldName::new("startDate");
const END_FIELD: FieldName = FieldName::new("endDate");

/// Query string of `GET /api/entries`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EntriesQueryParams {
    /// Only entries of this data type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type_id: Option<String>,
    /// Inclusive lower bound; a bare date means the start of that UTC day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Inclusive upper bound; a bare date means the end of that UTC day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// One submitted value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryFieldRequest {
    pub field_id: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub value: Value,
}

/// Request body for `POST /api/entries`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub data_type_id: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[schema(example = "2024-01-15T09:30:00Z")]
    pub date: String,
    pub fields: Vec<EntryFieldRequest>,
}

/// Request body for `PUT /api/entries/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<EntryFieldRequest>>,
}

/// Path parameters for single entry routes.
#[derive(Debug, Deserialize)]
pub struct EntryPath {
    id: String,
}

impl TryFrom<EntriesQueryParams> for EntryFilter {
    type Error = Error;

    fn try_from(value: EntriesQueryParams) -> Result<Self, Self::Error> {
        Ok(Self {
            data_type_id: parse_optional_id(value.data_type_id.as_deref(), DATA_TYPE_ID_FIELD)?,
            start: parse_optional_bound(
                value.start_date.as_deref(),
                START_FIELD,
                BoundEdge::StartOfDay,
            )?,
            end: parse_optional_bound(value.end_date.as_deref(), END_FIELD, BoundEdge::EndOfDay)?,
        })
    }
}

fn parse_field_inputs(fields: Vec<EntryFieldRequest>) -> Result<Vec<EntryFieldInput>, Error> {
    fields
        .into_iter()
        .enumerate()
        .map(|(index, field)| {
            let field_id = FieldId::new(field.field_id.trim()).map_err(|_| {
                invalid_uuid_error(&field_path(index, "fieldId"), &field.field_id)
            })?;
            Ok(EntryFieldInput {
                field_id,
                value: field.value,
            })
        })
        .collect()
}

impl TryFrom<CreateEntryRequest> for EntryDraft {
    type Error = Error;

    fn try_from(value: CreateEntryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            data_type_id: parse_id(&value.data_type_id, DATA_TYPE_ID_FIELD)?,
            date: parse_timestamp(&value.date, DATE_FIELD)?,
            fields: parse_field_inputs(value.fields)?,
        })
    }
}

impl TryFrom<UpdateEntryRequest> for EntryPatch {
    type Error = Error;

    fn try_from(value: UpdateEntryRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            date: value
                .date
                .as_deref()
                .map(|raw| parse_timestamp(raw, DATE_FIELD))
                .transpose()?,
            fields: value.fields.map(parse_field_inputs).transpose()?,
        })
    }
}

fn wire_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl From<EntryFieldInput> for EntryFieldRequest {
    fn from(value: EntryFieldInput) -> Self {
        Self {
            field_id: value.field_id.to_string(),
            value: value.value,
        }
    }
}

impl From<EntryDraft> for CreateEntryRequest {
    fn from(value: EntryDraft) -> Self {
        Self {
            data_type_id: value.data_type_id.to_string(),
            date: wire_timestamp(value.date),
            fields: value.fields.into_iter().map(EntryFieldRequest::from).collect(),
        }
    }
}

impl From<EntryPatch> for UpdateEntryRequest {
    fn from(value: EntryPatch) -> Self {
        Self {
            date: value.date.map(wire_timestamp),
            fields: value
                .fields
                .map(|fields| fields.into_iter().map(EntryFieldRequest::from).collect()),
        }
    }
}

impl From<&EntryFilter> for EntriesQueryParams {
    fn from(value: &EntryFilter) -> Self {
        Self {
            data_type_id: value.data_type_id.map(|id| id.to_string()),
            start_date: value.start.map(wire_timestamp),
            end_date: value.end.map(wire_timestamp),
        }
    }
}

fn parse_entry_id(path: EntryPath) -> Result<EntryId, Error> {
    parse_id(&path.id, ID_FIELD)
}

/// List the caller's entries, newest first.
#[utoipa::path(
    get,
    path = "/api/entries",
    params(EntriesQueryParams),
    responses(
        (status = 200, description = "Entries ordered by date, newest first", body = [Entry]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["entries"],
    operation_id = "listEntries"
)]
#[get("/entries")]
pub async fn list_entries(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<EntriesQueryParams>,
) -> ApiResult<web::Json<Vec<Entry>>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let filter = EntryFilter::try_from(query.into_inner())?;
    let entries = state.entries_query.list(&owner, &filter).await?;
    Ok(web::Json(entries))
}

/// Record an entry.
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Created entry", body = Entry),
        (status = 400, description = "Values do not match the data type", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Unknown data type", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["entries"],
    operation_id = "createEntry"
)]
#[post("/entries")]
pub async fn create_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateEntryRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.resolve_owner(state.default_owner)?;
    let draft = EntryDraft::try_from(payload.into_inner())?;
    let created = state.entries.create(&owner, draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch one entry.
#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry", body = Entry),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["entries"],
    operation_id = "getEntry"
)]
#[get("/entries/{id}")]
pub async fn get_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EntryPath>,
) -> ApiResult<web::Json<Entry>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_entry_id(path.into_inner())?;
    let entry = state.entries_query.get(&owner, &id).await?;
    Ok(web::Json(entry))
}

/// Edit an entry's date or values.
#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    request_body = UpdateEntryRequest,
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Updated entry", body = Entry),
        (status = 400, description = "Values do not match the data type", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["entries"],
    operation_id = "updateEntry"
)]
#[put("/entries/{id}")]
pub async fn update_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EntryPath>,
    payload: web::Json<UpdateEntryRequest>,
) -> ApiResult<web::Json<Entry>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_entry_id(path.into_inner())?;
    let patch = EntryPatch::try_from(payload.into_inner())?;
    let updated = state.entries.update(&owner, &id, patch).await?;
    Ok(web::Json(updated))
}

/// Delete an entry.
#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(("id" = String, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["entries"],
    operation_id = "deleteEntry"
)]
#[delete("/entries/{id}")]
pub async fn delete_entry(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<EntryPath>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_entry_id(path.into_inner())?;
    state.entries.delete(&owner, &id).await?;
    Ok(web::Json(SuccessResponse::OK))
}

#[cfg(test)]
#[path = "entries_tests.rs"]
mod tests;
