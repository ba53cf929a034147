// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transport for the back-office REST API.

use crate::bulk_import::{BulkImportParams, BulkImportResponse};
use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use backoffice_audit::{AuditLogEntry, AuditLogQuery};
use backoffice_domain::{DomainRecord, EntityType};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const AUDIT_LOGS_PATH: &str = "/audit-logs";
const BULK_IMPORT_PATH: &str = "/admin/products/bulk-import-b2b";

/// The back-office endpoints the undo workflows consume.
#[async_trait]
pub trait BackofficeApi: Send + Sync {
    /// Lists the records of one collection, optionally scoped to a branch.
    async fn list_records(
        &self,
        entity_type: &EntityType,
        branch_id: Option<i64>,
    ) -> Result<Vec<DomainRecord>, ApiError>;

    /// Lists audit log entries matching a query.
    async fn list_audit_logs(&self, query: &AuditLogQuery)
    -> Result<Vec<AuditLogEntry>, ApiError>;

    /// Asks the server to reverse one audit log entry.
    async fn undo_audit_log(&self, log_id: i64) -> Result<(), ApiError>;

    /// Runs the B2B product import. Never subject to a request timeout.
    async fn bulk_import_b2b(
        &self,
        params: &BulkImportParams,
    ) -> Result<BulkImportResponse, ApiError>;
}

/// [`BackofficeApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    token: Option<String>,
    request_timeout: Duration,
    http: reqwest::Client,
}

impl HttpClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidConfig` if the configuration is invalid or
    /// the HTTP stack cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let config = config.validate()?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::InvalidConfig {
                message: err.to_string(),
            })?;

        Ok(Self {
            base_url: config.base_url,
            token: config.token,
            request_timeout: config.request_timeout,
            http,
        })
    }

    /// The normalized API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn timed_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.request(method, path).timeout(self.request_timeout)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        debug!(path, "GET");
        let response = self
            .timed_request(Method::GET, path)
            .query(query)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl BackofficeApi for HttpClient {
    async fn list_records(
        &self,
        entity_type: &EntityType,
        branch_id: Option<i64>,
    ) -> Result<Vec<DomainRecord>, ApiError> {
        let path = entity_type
            .collection_path()
            .ok_or_else(|| ApiError::InvalidInput {
                field: String::from("entity_type"),
                message: format!("'{entity_type}' has no known collection"),
            })?;

        let query: Vec<(&'static str, String)> = branch_id
            .map(|branch_id| vec![("branch_id", branch_id.to_string())])
            .unwrap_or_default();
        let values: Vec<Value> = self.get_json(path, &query).await?;

        values
            .into_iter()
            .map(|value| {
                DomainRecord::from_json(entity_type.clone(), value).map_err(ApiError::from)
            })
            .collect()
    }

    async fn list_audit_logs(
        &self,
        query: &AuditLogQuery,
    ) -> Result<Vec<AuditLogEntry>, ApiError> {
        self.get_json(AUDIT_LOGS_PATH, &query.to_query_pairs()).await
    }

    async fn undo_audit_log(&self, log_id: i64) -> Result<(), ApiError> {
        let path = format!("{AUDIT_LOGS_PATH}/{log_id}/undo");
        debug!(path, "POST");
        let response = self.timed_request(Method::POST, &path).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn bulk_import_b2b(
        &self,
        params: &BulkImportParams,
    ) -> Result<BulkImportResponse, ApiError> {
        debug!(path = BULK_IMPORT_PATH, "POST");
        let response = self
            .request(Method::POST, BULK_IMPORT_PATH)
            .json(params)
            .send()
            .await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<BulkImportResponse>().await?)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message: server_error_message(status, &body),
    })
}

/// Extracts the operator-facing message from an error response.
///
/// The server answers errors with `{"error": "..."}`. Anything else falls
/// back to the raw body, then to the status reason.
pub(crate) fn server_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = fields.get("error") {
            return message.clone();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .map_or_else(|| status.to_string(), str::to_string)
    } else {
        trimmed.to_string()
    }
}
