//! Client wrappers for the Lemon core session endpoints. These helpers keep
//! credential handling inside the envelope so controllers never touch tokens
//! directly.

use crate::{
    app_lib::{ApiClient, AppError, RequestBody},
    components::Alerts,
    features::{
        auth::types::{ContextResponse, LoginRequest, User},
        forms::{FormState, SubmitError, SubmitOptions, submit_as},
    },
};
use reqwest::Method;
use tracing::instrument;

pub const CONTEXT_PATH: &str = "/api/core/context";
pub const LOGIN_PATH: &str = "/api/core/login";
pub const PING_PATH: &str = "/api/core/ping";

/// Fetches the bootstrap context and the current user, if any.
///
/// # Errors
/// Returns `AppError::Http` with status 401 when the stored credential is rejected.
#[instrument(skip(api))]
pub async fn fetch_context(api: &ApiClient) -> Result<ContextResponse, AppError> {
    api.get_json(CONTEXT_PATH).await
}

/// Submits the login form as url-encoded params and returns the signed-in user.
/// The password must never be logged.
///
/// # Errors
/// Returns `SubmitError` on rejection; the form carries the server error.
#[instrument(skip_all)]
pub async fn login(
    api: &ApiClient,
    alerts: &mut Alerts,
    form: &mut FormState,
) -> Result<User, SubmitError> {
    let request = LoginRequest {
        username: form.text("username").to_string(),
        password: form.text("password").to_string(),
    };
    let data = serde_json::to_value(&request).map_err(|err| {
        SubmitError::from(AppError::Serialization(format!(
            "Failed to encode login: {err}"
        )))
    })?;

    submit_as(
        api,
        alerts,
        form,
        LOGIN_PATH,
        Method::POST,
        SubmitOptions::params(data),
    )
    .await
}

/// Checks connectivity and refreshes the credential if the server rotates it.
///
/// # Errors
/// Returns `AppError` if the server is unreachable or answers with an error.
pub async fn ping(api: &ApiClient) -> Result<(), AppError> {
    api.send(Method::GET, PING_PATH, RequestBody::Empty).await?;
    Ok(())
}
