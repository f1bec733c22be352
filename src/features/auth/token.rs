use crate::app_lib::{ApiClient, AppError, CredentialStore};
use crate::features::auth::types::{NewTokenRequest, TokenResponse};
use secrecy::SecretString;

/// Lifetime requested for API keys: roughly one hundred years.
pub const API_KEY_EXPIRATION_MILLIS: i64 = 3_155_695_200_000;

/// Stores `token` as the bearer credential for subsequent requests.
///
/// # Errors
/// Returns `AppError::Storage` if the credential cannot be persisted.
pub fn store_bearer(store: &dyn CredentialStore, token: &str) -> Result<(), AppError> {
    store.save(&SecretString::from(format!("Bearer {token}")))
}

/// Asks the server for a fresh auth token for `username`. Only good admins
/// may request tokens for other users. The token must never be logged.
///
/// # Errors
/// Returns `AppError` if the request fails or the response has no token.
pub async fn fetch_new_auth_token(
    api: &ApiClient,
    username: &str,
    expiration_millis: Option<i64>,
) -> Result<String, AppError> {
    let request = NewTokenRequest {
        username: username.to_string(),
        expiration_millis,
    };
    let response: TokenResponse = api
        .post_params("/api/core/fetch-new-auth-token", &request)
        .await?;
    Ok(response.token)
}
