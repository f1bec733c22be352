//! Client helpers for user-related API endpoints. These functions keep endpoint
//! paths centralized and assume the backend enforces authorization.

use crate::{
    app_lib::{ApiClient, AppError},
    components::Alerts,
    features::{
        auth::types::{User, UserId},
        forms::{FormState, SubmitError, SubmitOptions, submit_as},
    },
};
use reqwest::Method;
use serde_json::json;
use tracing::{instrument, warn};

pub const USERS_PATH: &str = "/api/core/users";
pub const FETCH_BY_EMAIL_PATH: &str = "/api/core/users/fetch-by-email";

/// Path of a user resource, optionally followed by a sub-resource.
#[must_use]
pub fn user_path(id: &UserId, suffix: &str) -> String {
    if suffix.is_empty() {
        format!("{USERS_PATH}/{id}")
    } else {
        format!("{USERS_PATH}/{id}/{}", suffix.trim_start_matches('/'))
    }
}

/// Fetches user details by id after basic input validation.
///
/// # Errors
/// Returns `AppError::Config` for a blank id, otherwise the request error.
pub async fn get_user(api: &ApiClient, id: &str) -> Result<User, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::Config("User id is required.".to_string()));
    }

    api.get_json(&user_path(&UserId::from(trimmed), "")).await
}

/// Fetches a user for display; failures become a danger alert carrying the
/// server message.
#[instrument(skip(api, alerts))]
pub async fn fetch_by_id(api: &ApiClient, alerts: &mut Alerts, id: &str) -> Option<User> {
    match get_user(api, id).await {
        Ok(user) => Some(user),
        Err(err) => {
            warn!("failed to fetch user: {err}");
            alerts.danger(err.user_message());
            None
        }
    }
}

/// Looks a user up by email through the form pipeline.
///
/// # Errors
/// Returns `SubmitError` when the lookup fails; the form carries the reason.
pub async fn fetch_by_email(
    api: &ApiClient,
    alerts: &mut Alerts,
    form: &mut FormState,
    email: &str,
) -> Result<User, SubmitError> {
    submit_as(
        api,
        alerts,
        form,
        FETCH_BY_EMAIL_PATH,
        Method::POST,
        SubmitOptions::params(json!({ "email": email })),
    )
    .await
}

/// Asks the server to resend the verification mail for `id` and reports the
/// outcome as an alert.
///
/// # Errors
/// Returns the request error after alerting.
pub async fn resend_verification_mail(
    api: &ApiClient,
    alerts: &mut Alerts,
    id: &UserId,
) -> Result<(), AppError> {
    match api
        .post_empty(&user_path(id, "resend-verification-mail"))
        .await
    {
        Ok(()) => {
            alerts.success("Mail sent. ");
            Ok(())
        }
        Err(err) => {
            alerts.danger(format!("Couldn't send mail: {}", err.user_message()));
            Err(err)
        }
    }
}
