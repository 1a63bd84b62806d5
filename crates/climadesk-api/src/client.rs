// Backend HTTP client
//
// Wraps `reqwest::Client` with URL construction, response classification,
// and the optional `{code, message, data}` result envelope. Endpoint groups
// (auth, rooms, stays, ac, reports) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::TemperatureBounds;
use crate::transport::TransportConfig;

const PREVIEW_LEN: usize = 200;

/// Typed client for the climate-control and billing backend.
///
/// Explicitly constructed from a base URL and transport settings; there is
/// no process-wide instance. Every operation issues at most one request,
/// performs no retries and keeps no cache. Concurrent calls are allowed and
/// are not sequenced against each other, even for the same room: when two
/// AC commands for one room overlap, the backend applies whichever
/// completes last.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    bounds: TemperatureBounds,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:8080/api`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_parts(http, base_url)
    }

    /// Wrap an existing `reqwest::Client` (caller manages headers and timeouts).
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        Self::from_parts(http, base_url)
    }

    fn from_parts(http: reqwest::Client, base_url: Url) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::Setup(format!(
                "base URL must be an http(s) URL, got {base_url}"
            )));
        }
        Ok(Self {
            http,
            base_url,
            bounds: TemperatureBounds::default(),
        })
    }

    /// Replace the accepted target-temperature range.
    pub fn with_temperature_bounds(mut self, bounds: TemperatureBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn temperature_bounds(&self) -> TemperatureBounds {
        self.bounds
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append path segments to the base URL, percent-encoding each one.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        // Checked in the constructor: base URLs are always hierarchical.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    /// POST with a JSON body (`Content-Type: application/json`).
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    /// POST without a body; the room is fully addressed by the path.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments);
        debug!("POST {url}");

        let resp = self.http.post(url).send().await?;
        self.handle_response(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(&self, resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(Error::from_status(
                status.as_u16(),
                backend_message(&body).unwrap_or_else(|| status.to_string()),
            ));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| Error::Unavailable {
            message: format!("response is not JSON: {e} (body preview: {:?})", preview(&body)),
        })?;
        let payload = unwrap_envelope(value)?;

        serde_json::from_value(payload).map_err(|e| Error::Unavailable {
            message: format!(
                "unexpected response shape: {e} (body preview: {:?})",
                preview(&body)
            ),
        })
    }
}

/// Strip a `{code, message, data}` result envelope if present.
///
/// Some deployments answer HTTP 200 with a failure code inside the
/// envelope; that code is classified like an HTTP status.
fn unwrap_envelope(value: Value) -> Result<Value, Error> {
    let Value::Object(mut map) = value else {
        return Ok(value);
    };
    if !(map.contains_key("code") && map.contains_key("data")) {
        return Ok(Value::Object(map));
    }

    let raw_code = map.get("code").cloned().unwrap_or(Value::Null);
    let code = envelope_code(&raw_code);
    if let Some(0 | 200..300) = code {
        return Ok(map.remove("data").unwrap_or(Value::Null));
    }

    // Unparseable codes count as failures.
    let message = map
        .get("message")
        .or_else(|| map.get("msg"))
        .and_then(Value::as_str)
        .map_or_else(|| format!("backend error code {raw_code}"), str::to_owned);
    let status = code.and_then(|c| u16::try_from(c).ok()).unwrap_or(500);
    Err(Error::from_status(status, message))
}

/// Envelope codes arrive as numbers or numeric strings.
fn envelope_code(code: &Value) -> Option<u64> {
    match code {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Extract the backend's error message: a `message`/`error`/`msg` string
/// field of a JSON body, or the raw body text.
fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        for key in ["message", "error", "msg"] {
            if let Some(msg) = map.get(key).and_then(Value::as_str).filter(|m| !m.is_empty()) {
                return Some(msg.to_owned());
            }
        }
    }
    Some(trimmed.to_owned())
}

fn preview(body: &str) -> &str {
    match body.char_indices().nth(PREVIEW_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
