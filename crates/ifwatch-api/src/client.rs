// Sample service HTTP client
//
// Wraps `reqwest::Client` with URL construction, status mapping, and JSON
// decoding for the telemetry sample service. The client does no grouping
// or rate math; it returns rows exactly as the service sends them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{
    DeviceRecord, InterfaceRecord, InterfaceStatusRequest, InterfaceStatusRow, LatestSamplesRequest,
    ReadingRow, SampleRow,
};
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the telemetry sample service.
///
/// All paths are rooted at `{base_url}/api/v1/`. Every method performs
/// exactly one HTTP request.
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StoreClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET /api/v1/interfaces/ids` -- every monitored interface id.
    pub async fn interface_ids(&self) -> Result<Vec<i64>, Error> {
        let url = self.api_url("interfaces/ids")?;
        self.get(url).await
    }

    /// `POST /api/v1/samples/latest` -- newest rows per interface, batched.
    ///
    /// The service may return rows in any order; callers group them.
    pub async fn latest_samples(
        &self,
        request: &LatestSamplesRequest,
    ) -> Result<Vec<SampleRow>, Error> {
        let url = self.api_url("samples/latest")?;
        self.post(url, request).await
    }

    /// `GET /api/v1/interfaces/{id}/samples?from=&to=` -- ascending rows.
    pub async fn samples_window(
        &self,
        interface_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<SampleRow>, Error> {
        let url = self.window_url(&format!("interfaces/{interface_id}/samples"), from, to)?;
        self.get(url).await
    }

    /// `GET /api/v1/interfaces/{id}/readings?from=&to=` -- ascending
    /// transceiver readings.
    pub async fn readings_window(
        &self,
        interface_id: i64,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ReadingRow>, Error> {
        let url = self.window_url(&format!("interfaces/{interface_id}/readings"), from, to)?;
        self.get(url).await
    }

    /// `GET /api/v1/interfaces/{id}` -- static metadata, `None` on 404.
    pub async fn interface(&self, interface_id: i64) -> Result<Option<InterfaceRecord>, Error> {
        let url = self.api_url(&format!("interfaces/{interface_id}"))?;
        match self.get(url).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ── Inventory ────────────────────────────────────────────────────

    /// `GET /api/v1/devices` -- every polled device.
    pub async fn devices(&self) -> Result<Vec<DeviceRecord>, Error> {
        let url = self.api_url("devices")?;
        self.get(url).await
    }

    /// `GET /api/v1/interfaces` -- metadata of every monitored interface.
    pub async fn interfaces(&self) -> Result<Vec<InterfaceRecord>, Error> {
        let url = self.api_url("interfaces")?;
        self.get(url).await
    }

    /// `POST /api/v1/interfaces/status` -- newest sample, transceiver
    /// reading, and module per interface, batched.
    pub async fn interface_status(
        &self,
        request: &InterfaceStatusRequest,
    ) -> Result<Vec<InterfaceStatusRow>, Error> {
        let url = self.api_url("interfaces/status")?;
        self.post(url, request).await
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/v1/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/v1/{path}"))?)
    }

    /// Build an API URL with inclusive `from`/`to` RFC3339 bounds.
    fn window_url(&self, path: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Url, Error> {
        let mut url = self.api_url(path)?;
        url.query_pairs_mut()
            .append_pair("from", &from.to_rfc3339_opts(SecondsFormat::Millis, true))
            .append_pair("to", &to.to_rfc3339_opts(SecondsFormat::Millis, true));
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::parse_json(resp).await
    }

    /// Map the HTTP status, then decode the JSON body.
    async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: format!("sample service rejected credentials (HTTP {status})"),
            });
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                message: preview(&body),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(bytes = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
