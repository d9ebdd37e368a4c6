//! Reqwest-backed tracker remote.
//!
//! The adapter owns transport details only: URL construction, the cookie
//! jar carrying the login session, status mapping and JSON decoding.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;

use super::remote::{RemoteError, TrackerRemote};
use crate::domain::{
    DataType, DataTypeDraft, DataTypeId, DataTypePatch, Entry, EntryDraft, EntryFilter, EntryId,
    EntryPatch,
};
use crate::inbound::http::accounts::{LoginRequest, RegisterRequest};
use crate::inbound::http::data_types::{CreateDataTypeRequest, UpdateDataTypeRequest};
use crate::inbound::http::entries::{CreateEntryRequest, EntriesQueryParams, UpdateEntryRequest};

const MESSAGE_PREVIEW_LIMIT: usize = 160;

/// Tracker remote speaking the JSON API under `{base_url}/api`.
pub struct HttpTrackerRemote {
    client: Client,
    api: Url,
}

impl HttpTrackerRemote {
    /// Build a remote with an explicit request timeout and its own cookie jar.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::Transport`] when `base_url` is not an absolute
    /// URL or the reqwest client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let mut base = Url::parse(base_url)
            .map_err(|error| RemoteError::transport(format!("invalid base URL: {error}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api = base
            .join("api/")
            .map_err(|error| RemoteError::transport(format!("invalid base URL: {error}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(map_transport_error)?;
        Ok(Self { client, api })
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), RemoteError> {
        let body = RegisterRequest {
            name: name.to_owned(),
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let request = self.client.post(self.url("register")?).json(&body);
        send(request).await.map(drop)
    }

    /// Log in; later requests carry the session cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), RemoteError> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let request = self.client.post(self.url("login")?).json(&body);
        send(request).await.map(drop)
    }

    fn url(&self, path: &str) -> Result<Url, RemoteError> {
        self.api.join(path).map_err(|error| {
            RemoteError::transport(format!("invalid request path {path}: {error}"))
        })
    }
}

fn map_transport_error(error: reqwest::Error) -> RemoteError {
    RemoteError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> RemoteError {
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body_preview(body));
    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    } else {
        message
    };
    RemoteError::status(status.as_u16(), message)
}

fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    compact.chars().take(MESSAGE_PREVIEW_LIMIT).collect()
}

async fn send(request: RequestBuilder) -> Result<Vec<u8>, RemoteError> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    Ok(body.to_vec())
}

async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, RemoteError> {
    let body = send(request).await?;
    serde_json::from_slice(&body).map_err(|error| RemoteError::decode(error.to_string()))
}

#[async_trait]
impl TrackerRemote for HttpTrackerRemote {
    async fn list_data_types(&self) -> Result<Vec<DataType>, RemoteError> {
        fetch(self.client.get(self.url("data-types")?)).await
    }

    async fn create_data_type(&self, draft: DataTypeDraft) -> Result<DataType, RemoteError> {
        let body = CreateDataTypeRequest::from(draft);
        fetch(self.client.post(self.url("data-types")?).json(&body)).await
    }

    async fn update_data_type(
        &self,
        id: &DataTypeId,
        patch: DataTypePatch,
    ) -> Result<DataType, RemoteError> {
        let body = UpdateDataTypeRequest::from(patch);
        let url = self.url(&format!("data-types/{id}"))?;
        fetch(self.client.put(url).json(&body)).await
    }

    async fn delete_data_type(&self, id: &DataTypeId) -> Result<(), RemoteError> {
        let url = self.url(&format!("data-types/{id}"))?;
        send(self.client.delete(url)).await.map(drop)
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>, RemoteError> {
        let query = EntriesQueryParams::from(filter);
        fetch(self.client.get(self.url("entries")?).query(&query)).await
    }

    async fn create_entry(&self, draft: EntryDraft) -> Result<Entry, RemoteError> {
        let body = CreateEntryRequest::from(draft);
        fetch(self.client.post(self.url("entries")?).json(&body)).await
    }

    async fn update_entry(&self, id: &EntryId, patch: EntryPatch) -> Result<Entry, RemoteError> {
        let body = UpdateEntryRequest::from(patch);
        let url = self.url(&format!("entries/{id}"))?;
        fetch(self.client.put(url).json(&body)).await
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<(), RemoteError> {
        let url = self.url(&format!("entries/{id}"))?;
        send(self.client.delete(url)).await.map(drop)
    }
}
