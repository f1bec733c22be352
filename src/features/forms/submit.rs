//! One form submission: a single HTTP call whose failure is folded back into
//! the form as field-level or form-level errors.

use super::state::FormState;
use crate::{
    app_lib::{ApiClient, AppError, ErrorBody, RequestBody, api::decode},
    components::Alerts,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use tracing::{debug, instrument};

/// Exceptions whose `errors` array carries per-field validation messages.
const VALIDATION_EXCEPTIONS: [&str; 4] = [
    "ConstraintViolationException",
    "ExplicitConstraintViolationException",
    "WebExchangeBindException",
    "MultiErrorException",
];
const ACCESS_DENIED_EXCEPTION: &str = "AccessDeniedException";

#[derive(Clone, Debug, Default)]
pub struct SubmitOptions {
    pub data: Value,
    /// Send `data` url-encoded instead of as JSON.
    pub as_param: bool,
    pub success_message: Option<String>,
}

impl SubmitOptions {
    #[must_use]
    pub fn json(data: Value) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn params(data: Value) -> Self {
        Self {
            data,
            as_param: true,
            success_message: None,
        }
    }

    #[must_use]
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }
}

/// A failed submission. The form already holds the resulting errors.
#[derive(Clone, Debug)]
pub struct SubmitError {
    pub status: Option<u16>,
    pub payload: Option<ErrorBody>,
    pub error: AppError,
}

impl SubmitError {
    /// The server's message when present, otherwise the local error text.
    #[must_use]
    pub fn message(&self) -> String {
        self.error.user_message()
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.error)
    }
}

impl std::error::Error for SubmitError {}

impl From<AppError> for SubmitError {
    fn from(error: AppError) -> Self {
        Self {
            status: error.status(),
            payload: error.payload().cloned(),
            error,
        }
    }
}

/// Submits `options.data` to `path` and maps a failure onto `form`.
///
/// # Errors
/// Returns `SubmitError` for any failed request; the form's server errors are
/// populated before returning.
#[instrument(skip(api, alerts, form, options))]
pub async fn submit(
    api: &ApiClient,
    alerts: &mut Alerts,
    form: &mut FormState,
    path: &str,
    method: Method,
    options: SubmitOptions,
) -> Result<Value, SubmitError> {
    form.clear_server_errors();

    let body = request_body(&method, options.data, options.as_param);

    match api.send(method, path, body).await {
        Ok(value) => {
            if let Some(message) = options.success_message {
                alerts.success(message);
            }
            Ok(value)
        }
        Err(err) => {
            debug!("submission failed");
            apply_error(form, &err, options.as_param);
            Err(SubmitError::from(err))
        }
    }
}

/// Like [`submit`], but the response must decode into `T`. The success alert
/// is only pushed once decoding succeeds; an undecodable body is recorded on
/// the form as a server error.
///
/// # Errors
/// Returns `SubmitError` for a failed request or an unexpected response body.
pub async fn submit_as<T: DeserializeOwned>(
    api: &ApiClient,
    alerts: &mut Alerts,
    form: &mut FormState,
    path: &str,
    method: Method,
    mut options: SubmitOptions,
) -> Result<T, SubmitError> {
    let success_message = options.success_message.take();
    let as_param = options.as_param;

    let value = submit(api, alerts, form, path, method, options).await?;
    match decode(value) {
        Ok(decoded) => {
            if let Some(message) = success_message {
                alerts.success(message);
            }
            Ok(decoded)
        }
        Err(err) => {
            debug!("unexpected response body");
            apply_error(form, &err, as_param);
            Err(SubmitError::from(err))
        }
    }
}

fn request_body(method: &Method, data: Value, as_param: bool) -> RequestBody {
    if *method == Method::GET || *method == Method::DELETE {
        return if data.is_null() {
            RequestBody::Empty
        } else {
            RequestBody::Query(data)
        };
    }
    if as_param {
        RequestBody::Form(data)
    } else {
        RequestBody::Json(data)
    }
}

/// Classifies `err` by its exception name and records the result on `form`.
pub fn apply_error(form: &mut FormState, err: &AppError, as_param: bool) {
    let payload = err.payload();
    let exception = payload.and_then(|body| body.exception.as_deref());

    match (exception, payload) {
        (Some(name), Some(body)) if VALIDATION_EXCEPTIONS.contains(&name) => {
            for field_error in &body.errors {
                let field = field_error
                    .field
                    .as_deref()
                    .map(|field| if as_param { field } else { strip_prefix(field) });
                let recorded = field
                    .is_some_and(|field| form.add_field_error(field, field_error.message.clone()));
                if !recorded {
                    form.add_form_error(field_error.message.clone());
                }
            }
        }
        (Some(ACCESS_DENIED_EXCEPTION), _) => {
            form.add_form_error(format!(
                "{}. You might need to login, logout or refresh.",
                err.user_message()
            ));
        }
        _ => form.add_form_error(format!("Server Error: {}", err.user_message())),
    }
}

/// `user.email` becomes `email`; names without a dot are left alone.
fn strip_prefix(field: &str) -> &str {
    field.split_once('.').map_or(field, |(_, rest)| rest)
}
