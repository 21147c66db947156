// Matrix HTTP client
//
// Wraps `reqwest::Client` with the device's single-endpoint protocol:
// every operation is a POST of `{comhead, language, ...}` to the same path,
// answered by a flat JSON object. The client keeps no session or cache, so
// one instance can be shared freely across tasks.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::error::{Cause, Error};
use crate::models::{CommandReply, DeviceStatus, InputStatus, OutputStatus, Request, VideoStatus};
use crate::transport::TransportConfig;

/// Path of the control endpoint on the device's web server.
pub const API_PATH: &str = "/cgi-bin/instr";

/// Port the device's web server listens on out of the box.
pub const DEFAULT_PORT: u16 = 80;

/// Raw HTTP client for the matrix control API.
///
/// All failures to obtain a JSON object from the device are surfaced as
/// [`Error::Connectivity`] carrying the host and the underlying cause.
#[derive(Debug, Clone)]
pub struct MatrixClient {
    http: reqwest::Client,
    endpoint: Url,
    host: String,
}

impl MatrixClient {
    /// Create a client for `http://{host}:{port}` from a `TransportConfig`.
    pub fn new(host: &str, port: u16, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&format!("http://{host}:{port}"))?;
        let http = transport.build_client()?;
        Ok(Self::with_client(http, &base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// Only the scheme, host and port of `base_url` are used; the request
    /// path is always [`API_PATH`].
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        let mut endpoint = base_url.clone();
        endpoint.set_path(API_PATH);
        endpoint.set_query(None);
        let host = base_url.host_str().unwrap_or_default().to_owned();
        Self {
            http,
            endpoint,
            host,
        }
    }

    /// Host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Full URL of the control endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ── Status queries ───────────────────────────────────────────────

    /// Device identity: model, firmware, network identity.
    pub async fn get_status(&self) -> Result<DeviceStatus, Error> {
        self.request(&Request::query("get status")).await
    }

    /// Routing map, input/output names and power state.
    pub async fn get_video_status(&self) -> Result<VideoStatus, Error> {
        self.request(&Request::query("get video status")).await
    }

    /// Per-output sink detection for the HDMI and HDBaseT legs.
    pub async fn get_output_status(&self) -> Result<OutputStatus, Error> {
        self.request(&Request::query("get output status")).await
    }

    /// Per-input signal detection.
    pub async fn get_input_status(&self) -> Result<InputStatus, Error> {
        self.request(&Request::query("get input status")).await
    }

    /// Check that the device answers at all. Alias for [`get_status`](Self::get_status).
    pub async fn validate_connection(&self) -> Result<DeviceStatus, Error> {
        self.get_status().await
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Route `input` (1-based) to `output` (1-based).
    pub async fn video_switch(&self, input: u8, output: u8) -> Result<CommandReply, Error> {
        let req = Request {
            source: Some([input, output]),
            ..Request::query("video switch")
        };
        self.request(&req).await
    }

    /// Turn the matrix on or put it in standby.
    pub async fn set_power(&self, on: bool) -> Result<CommandReply, Error> {
        let req = Request {
            power: Some(u8::from(on)),
            ..Request::query("set poweronoff")
        };
        self.request(&req).await
    }

    // ── Request helper ───────────────────────────────────────────────

    /// POST one command and decode the JSON object it returns.
    ///
    /// The device's content-type header is unreliable, so the body is read
    /// as text and parsed regardless of what it claims to be.
    async fn request<T: DeserializeOwned>(&self, req: &Request) -> Result<T, Error> {
        debug!(comhead = req.comhead, "POST {}", self.endpoint);

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(req)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| self.fail(req, e))?;

        let body = resp.text().await.map_err(|e| self.fail(req, e))?;

        let value: Value = serde_json::from_str(&body).map_err(|e| self.fail(req, e))?;
        if !value.is_object() {
            return Err(self.fail(req, format!("expected a JSON object, got: {body}")));
        }
        debug!(comhead = req.comhead, response = %value, "device reply");

        serde_json::from_value(value).map_err(|e| self.fail(req, e))
    }

    fn fail(&self, req: &Request, cause: impl Into<Cause>) -> Error {
        let cause = cause.into();
        warn!(host = %self.host, comhead = req.comhead, error = ?cause, "device request failed");
        Error::connectivity(&self.host, cause)
    }
}
