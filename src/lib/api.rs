//! HTTP envelope for Lemon APIs with consistent timeouts and error handling.
//! Every request carries the stored credential as `Authorization`, and every
//! response that returns a rotated credential in `Lemon-Authorization` updates
//! the store before the caller sees the result. Credentials are never logged.

use super::{
    config::AppConfig,
    errors::{AppError, ErrorBody},
    storage::CredentialStore,
};
use reqwest::{
    Method, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{sync::Arc, time::Duration};
use tracing::{Instrument, debug, info_span};
use url::{Url, form_urlencoded};

/// Header carrying the credential on outgoing requests.
pub const AUTHORIZATION_HEADER: &str = "Authorization";
/// Header carrying a rotated credential on responses.
pub const ROTATED_AUTHORIZATION_HEADER: &str = "Lemon-Authorization";

/// Default request timeout applied to every call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

/// How the request data travels.
#[derive(Clone, Debug)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` body built from a JSON object.
    Form(Value),
    /// Query string built from a JSON object.
    Query(Value),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStore>,
}

impl ApiClient {
    /// Builds a client against the resolved API base URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &AppConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            credentials,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Sends one request and returns the decoded JSON body (`Null` when empty).
    ///
    /// # Errors
    /// Returns `AppError::Http` for non-2xx statuses, `Network`/`Timeout` for
    /// transport failures and `Parse` when a success body is not JSON.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<Value, AppError> {
        let mut url = Url::parse(&build_url_with_base(&self.base_url, path))
            .map_err(|err| AppError::Config(format!("Invalid API URL: {err}")))?;

        if let RequestBody::Query(data) = &body {
            let pairs = form_pairs(data);
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let span = info_span!("api.request", http.method = %method, url = %url);

        let mut request = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json");

        // The credential is only held for the duration of this call.
        if let Some(credential) = self.credentials.load()? {
            debug!("attaching stored credential");
            request = request.header(AUTHORIZATION_HEADER, credential.expose_secret());
        }

        request = match body {
            RequestBody::Empty | RequestBody::Query(_) => request,
            RequestBody::Json(data) => request.json(&data),
            RequestBody::Form(data) => request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(encode_form(&data)),
        };

        let response = request
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        self.capture_rotated_credential(response.headers())?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_request_error)?;

        if status.is_success() {
            decode_body(&bytes)
        } else {
            debug!("request failed with status {status}");
            Err(http_error(status, &bytes))
        }
    }

    /// Fetches and decodes JSON.
    ///
    /// # Errors
    /// Same as [`ApiClient::send`], plus `Parse` when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let value = self.send(Method::GET, path, RequestBody::Empty).await?;
        decode(value)
    }

    /// Posts JSON and decodes the response.
    ///
    /// # Errors
    /// Same as [`ApiClient::send`], plus `Serialization` when `body` cannot be encoded.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, AppError> {
        let payload = serde_json::to_value(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let value = self.send(Method::POST, path, RequestBody::Json(payload)).await?;
        decode(value)
    }

    /// Posts url-encoded params and decodes the response.
    ///
    /// # Errors
    /// Same as [`ApiClient::post_json`].
    pub async fn post_params<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        params: &B,
    ) -> Result<T, AppError> {
        let payload = serde_json::to_value(params)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let value = self.send(Method::POST, path, RequestBody::Form(payload)).await?;
        decode(value)
    }

    /// Posts without a body and ignores the response body.
    ///
    /// # Errors
    /// Same as [`ApiClient::send`].
    pub async fn post_empty(&self, path: &str) -> Result<(), AppError> {
        self.send(Method::POST, path, RequestBody::Empty).await?;
        Ok(())
    }

    fn capture_rotated_credential(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(value) = headers
            .get(ROTATED_AUTHORIZATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
        else {
            return Ok(());
        };

        debug!("rotated credential received");
        self.credentials
            .save(&SecretString::from(value.to_string()))
    }
}

/// Decodes a JSON value into `T`.
///
/// # Errors
/// Returns `AppError::Parse` when the value does not match `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Flattens a JSON object into name/value pairs for forms and query strings.
pub(crate) fn form_pairs(data: &Value) -> Vec<(String, String)> {
    match data {
        Value::Object(map) => map
            .iter()
            .map(|(name, value)| (name.clone(), param_value(value)))
            .collect(),
        _ => Vec::new(),
    }
}

fn param_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items
            .iter()
            .map(param_value)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn encode_form(data: &Value) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form_pairs(data))
        .finish()
}

/// Maps transport errors into user-facing variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

fn decode_body(bytes: &[u8]) -> Result<Value, AppError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

fn http_error(status: StatusCode, bytes: &[u8]) -> AppError {
    let payload = serde_json::from_slice::<ErrorBody>(bytes).ok();
    AppError::Http {
        status: status.as_u16(),
        message: sanitize_body(&String::from_utf8_lossy(bytes)),
        payload,
    }
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
