//! Data type API handlers.
//!
//! ```text
//! GET    /api/data-types
//! POST   /api/data-types      {"name":"Weight","frequency":"daily","fields":[...]}
//! GET    /api/data-types/{id}
//! PUT    /api/data-types/{id} {"name":"Body weight"}
//! DELETE /api/data-types/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    DataType, DataTypeDraft, DataTypeId, DataTypePatch, Error, FieldDraft, FieldId, FieldType,
    Frequency,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::SuccessResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, field_path, invalid_choice_error, invalid_uuid_error, parse_id,
};

const FREQUENCIES: [&str; 5] = ["daily", "weekly", "monthly", "yearly", "timeless"];
const FIELD_TYPES: [&str; 7] = ["text", "number", "boolean", "list", "table", "image", "date"];

fn required_by_default() -> bool {
    true
}

/// One field definition in a request body.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldRequest {
    /// Existing field id to keep; omitted for new fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// One of `text`, `number`, `boolean`, `list`, `table`, `image`, `date`.
    #[serde(rename = "type")]
    #[schema(example = "number")]
    pub field_type: String,
    /// Defaults to `true` when omitted.
    #[serde(default = "required_by_default")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub default_value: Option<Value>,
}

/// Request body for `POST /api/data-types`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDataTypeRequest {
    #[schema(example = "Weight")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(example = "daily")]
    pub frequency: String,
    pub fields: Vec<FieldRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Request body for `PUT /api/data-types/{id}`. Omitted properties keep
/// their current value; a supplied `fields` list replaces the current one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDataTypeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldRequest>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// Path parameters for single data type routes.
#[derive(Debug, Deserialize)]
pub struct DataTypePath {
    id: String,
}

const ID_FIELD: FieldName = FieldName::new("id");

fn parse_frequency(raw: &str) -> Result<Frequency, Error> {
    Frequency::parse(&raw.trim().to_ascii_lowercase())
        .ok_or_else(|| invalid_choice_error("frequency", raw, &FREQUENCIES))
}

fn parse_field(index: usize, field: FieldRequest) -> Result<FieldDraft, Error> {
    let id = field
        .id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| {
            FieldId::new(raw.trim()).map_err(|_| invalid_uuid_error(&field_path(index, "id"), raw))
        })
        .transpose()?;
    let field_type = field
        .field_type
        .trim()
        .to_ascii_lowercase()
        .parse::<FieldType>()
        .map_err(|_| {
            invalid_choice_error(&field_path(index, "type"), &field.field_type, &FIELD_TYPES)
        })?;
    Ok(FieldDraft {
        id,
        name: field.name,
        field_type,
        required: field.required,
        options: field.options,
        default_value: field.default_value,
    })
}

fn parse_fields(fields: Vec<FieldRequest>) -> Result<Vec<FieldDraft>, Error> {
    fields
        .into_iter()
        .enumerate()
        .map(|(index, field)| parse_field(index, field))
        .collect()
}

impl TryFrom<CreateDataTypeRequest> for DataTypeDraft {
    type Error = Error;

    fn try_from(value: CreateDataTypeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            frequency: parse_frequency(&value.frequency)?,
            fields: parse_fields(value.fields)?,
            name: value.name,
            description: value.description,
            color: value.color,
            icon: value.icon,
        })
    }
}

impl TryFrom<UpdateDataTypeRequest> for DataTypePatch {
    type Error = Error;

    fn try_from(value: UpdateDataTypeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            frequency: value.frequency.as_deref().map(parse_frequency).transpose()?,
            fields: value.fields.map(parse_fields).transpose()?,
            name: value.name,
            description: value.description,
            color: value.color,
            icon: value.icon,
        })
    }
}

impl From<FieldDraft> for FieldRequest {
    fn from(value: FieldDraft) -> Self {
        Self {
            id: value.id.map(|id| id.to_string()),
            name: value.name,
            field_type: value.field_type.as_str().to_owned(),
            required: value.required,
            options: value.options,
            default_value: value.default_value,
        }
    }
}

impl From<DataTypeDraft> for CreateDataTypeRequest {
    fn from(value: DataTypeDraft) -> Self {
        Self {
            name: value.name,
            description: value.description,
            frequency: value.frequency.as_str().to_owned(),
            fields: value.fields.into_iter().map(FieldRequest::from).collect(),
            color: value.color,
            icon: value.icon,
        }
    }
}

impl From<DataTypePatch> for UpdateDataTypeRequest {
    fn from(value: DataTypePatch) -> Self {
        Self {
            name: value.name,
            description: value.description,
            frequency: value.frequency.map(|frequency| frequency.as_str().to_owned()),
            fields: value
                .fields
                .map(|fields| fields.into_iter().map(FieldRequest::from).collect()),
            color: value.color,
            icon: value.icon,
        }
    }
}

fn parse_data_type_id(path: DataTypePath) -> Result<DataTypeId, Error> {
    parse_id(&path.id, ID_FIELD)
}

/// List the caller's data types.
#[utoipa::path(
    get,
    path = "/api/data-types",
    responses(
        (status = 200, description = "Data types", body = [DataType]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["data-types"],
    operation_id = "listDataTypes"
)]
#[get("/data-types")]
pub async fn list_data_types(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DataType>>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let data_types = state.data_types_query.list(&owner).await?;
    Ok(web::Json(data_types))
}

/// Create a data type.
#[utoipa::path(
    post,
    path = "/api/data-types",
    request_body = CreateDataTypeRequest,
    responses(
        (status = 201, description = "Created data type", body = DataType),
        (status = 400, description = "Invalid definition or duplicate name", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["data-types"],
    operation_id = "createDataType"
)]
#[post("/data-types")]
pub async fn create_data_type(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDataTypeRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.resolve_owner(state.default_owner)?;
    let draft = DataTypeDraft::try_from(payload.into_inner())?;
    let created = state.data_types.create(&owner, draft).await?;
    Ok(HttpResponse::Created().json(created))
}

/// Fetch one data type.
#[utoipa::path(
    get,
    path = "/api/data-types/{id}",
    params(("id" = String, Path, description = "Data type identifier")),
    responses(
        (status = 200, description = "Data type", body = DataType),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["data-types"],
    operation_id = "getDataType"
)]
#[get("/data-types/{id}")]
pub async fn get_data_type(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DataTypePath>,
) -> ApiResult<web::Json<DataType>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_data_type_id(path.into_inner())?;
    let data_type = state.data_types_query.get(&owner, &id).await?;
    Ok(web::Json(data_type))
}

/// Edit a data type.
#[utoipa::path(
    put,
    path = "/api/data-types/{id}",
    request_body = UpdateDataTypeRequest,
    params(("id" = String, Path, description = "Data type identifier")),
    responses(
        (status = 200, description = "Updated data type", body = DataType),
        (status = 400, description = "Invalid definition or duplicate name", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["data-types"],
    operation_id = "updateDataType"
)]
#[put("/data-types/{id}")]
pub async fn update_data_type(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DataTypePath>,
    payload: web::Json<UpdateDataTypeRequest>,
) -> ApiResult<web::Json<DataType>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_data_type_id(path.into_inner())?;
    let patch = DataTypePatch::try_from(payload.into_inner())?;
    let updated = state.data_types.update(&owner, &id, patch).await?;
    Ok(web::Json(updated))
}

/// Delete a data type together with its entries.
#[utoipa::path(
    delete,
    path = "/api/data-types/{id}",
    params(("id" = String, Path, description = "Data type identifier")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["data-types"],
    operation_id = "deleteDataType"
)]
#[delete("/data-types/{id}")]
pub async fn delete_data_type(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DataTypePath>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let owner = session.resolve_owner(state.default_owner)?;
    let id = parse_data_type_id(path.into_inner())?;
    state.data_types.delete(&owner, &id).await?;
    Ok(web::Json(SuccessResponse::OK))
}

#[cfg(test)]
#[path = "data_types_tests.rs"]
mod tests;
