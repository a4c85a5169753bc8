//! Hetzner DNS API gateway
//!
//! ## API Reference
//!
//! - List Zones: `GET /zones?page=..&per_page=..`
//! - List Records: `GET /records?zone_id=..&page=..&per_page=..`
//! - Create Record: `POST /records`
//! - Delete Record: `DELETE /records/:record_id`
//!
//! Every request carries the `Auth-API-Token` header.

use crate::models::{
    CreateRecordRequest, ErrorResponse, Meta, RecordResponse, RecordsResponse, ZonesResponse,
};
use async_trait::async_trait;
use dnsync_core::config::{DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
use dnsync_core::traits::{NewRecord, ProviderRecord, Zone, ZoneGateway};
use dnsync_core::{Error, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Hetzner DNS API base URL
pub const HETZNER_API_BASE: &str = "https://dns.hetzner.com/api/v1";

/// Header carrying the API token
const AUTH_HEADER: &str = "Auth-API-Token";

/// Typed client for the Hetzner DNS API
///
/// Stateless apart from the credential and HTTP settings it was built with.
/// The Debug implementation does NOT expose the API token.
pub struct HetznerClient {
    /// ⚠️ NEVER log this value
    api_token: String,
    base_url: String,
    page_size: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for HetznerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HetznerClient")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl HetznerClient {
    /// Create a client against the public API with default settings
    pub fn new(api_token: impl Into<String>) -> Result<Self> {
        Self::with_settings(
            api_token,
            HETZNER_API_BASE,
            DEFAULT_PAGE_SIZE,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    /// Create a client
    ///
    /// # Parameters
    ///
    /// - `api_token`: Hetzner DNS API token
    /// - `base_url`: API base URL, without trailing slash
    /// - `page_size`: Items requested per listing page
    /// - `timeout`: Per-request timeout; expiry is a transport error
    pub fn with_settings(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        page_size: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Hetzner API token cannot be empty"));
        }
        if page_size == 0 {
            return Err(Error::config("Page size must be > 0"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_size,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTH_HEADER, &self.api_token)
    }

    /// Send a request and map non-success statuses to errors
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::transport(format!("{}: request timed out", context))
            } else {
                Error::transport(format!("{}: HTTP request failed: {}", context, e))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(status_error(status, &body, context))
    }

    async fn decode<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("{}: failed to read body: {}", context, e)))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::protocol(format!("{}: failed to parse response: {}", context, e)))
    }

    /// Fetch one listing page
    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: &[(&str, &str)],
        page: u32,
        context: &str,
    ) -> Result<T> {
        let request = self
            .request(Method::GET, path)
            .query(filter)
            .query(&[("page", page), ("per_page", self.page_size)]);

        let response = self.send(request, context).await?;
        Self::decode(response, context).await
    }
}

/// Page to request after `requested`, if the API reports more
///
/// Advances from the page that was asked for, not the page the server echoes,
/// so the loop ends after at most `last_page` requests. An empty page ends the
/// listing even if the metadata claims otherwise.
fn next_page(requested: u32, meta: Option<Meta>, received: usize, context: &str) -> Option<u32> {
    let pagination = meta.and_then(|m| m.pagination)?;
    if requested >= pagination.last_page || received == 0 {
        return None;
    }

    debug!("{}: page {} of {}", context, requested, pagination.last_page);
    Some(requested + 1)
}

fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: invalid API token or insufficient permissions. Status: {}",
            context, status
        )),
        404 => Error::not_found(format!("{}: {}", context, message)),
        429 => Error::rate_limited(format!(
            "{}: rate limit exceeded. Status: {}",
            context, status
        )),
        500..=599 => Error::protocol(format!(
            "{}: Hetzner server error (transient): {} - {}",
            context, status, message
        )),
        _ => Error::protocol(format!("{}: {} - {}", context, status, message)),
    }
}

#[async_trait]
impl ZoneGateway for HetznerClient {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        let context = "list zones";
        let mut zones = Vec::new();
        let mut page = 1;

        loop {
            let body: ZonesResponse = self.get_page("/zones", &[], page, context).await?;
            let received = body.zones.len();
            zones.extend(body.zones.into_iter().map(Zone::from));

            match next_page(page, body.meta, received, context) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(zones)
    }

    async fn list_records(&self, zone_id: &str) -> Result<Vec<ProviderRecord>> {
        let context = format!("list records of zone {}", zone_id);
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let body: RecordsResponse = self
                .get_page("/records", &[("zone_id", zone_id)], page, &context)
                .await?;
            let received = body.records.len();
            records.extend(body.records.into_iter().map(ProviderRecord::from));

            match next_page(page, body.meta, received, &context) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(records)
    }

    async fn create_record(&self, record: &NewRecord) -> Result<ProviderRecord> {
        let context = format!(
            "create {} record {} in zone {}",
            record.record_type, record.name, record.zone_id
        );
        let request = self
            .request(Method::POST, "/records")
            .json(&CreateRecordRequest::from(record));

        let response = self.send(request, &context).await?;
        let body: RecordResponse = Self::decode(response, &context).await?;
        Ok(body.record.into())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        let context = format!("delete record {}", record_id);
        let request = self.request(Method::DELETE, &format!("/records/{}", record_id));
        self.send(request, &context).await?;
        Ok(())
    }

    fn gateway_name(&self) -> &'static str {
        "hetzner"
    }
}
