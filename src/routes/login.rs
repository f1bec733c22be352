//! Login dialog: password login, social login completion and logout.

use crate::{
    app::App,
    app_lib::AppError,
    features::{
        auth::{client, token::store_bearer, types::User},
        forms::{FormState, SubmitError},
    },
};
use tracing::{info, warn};

pub const FIELDS: [&str; 2] = ["username", "password"];

#[derive(Debug)]
pub struct LoginDialog {
    pub form: FormState,
}

impl Default for LoginDialog {
    fn default() -> Self {
        Self {
            form: FormState::with_fields(&FIELDS),
        }
    }
}

impl LoginDialog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs in with the form's username and password.
    ///
    /// # Errors
    /// Returns `SubmitError` when the credentials are rejected. The session is
    /// left as it was.
    pub async fn login(&mut self, app: &mut App) -> Result<User, SubmitError> {
        let user = client::login(&app.api, &mut app.alerts, &mut self.form).await?;
        info!(user_id = %user.id, "signed in");
        app.session.set_current_user(Some(user.clone()));
        Ok(user)
    }
}

/// Completes a social login: the provider hands back a token which becomes
/// the bearer credential, then the context is refetched for the user.
///
/// # Errors
/// Returns the storage or request error after raising a danger alert.
pub async fn social_login_success(app: &mut App, token: &str) -> Result<(), AppError> {
    store_bearer(app.session.credentials().as_ref(), token)?;

    match app.refresh_user().await {
        Ok(_) => Ok(()),
        Err(err) => {
            warn!("social login failed: {err}");
            app.alerts
                .danger(format!("Invalid token {token}. Please retry."));
            Err(err)
        }
    }
}

/// Signs out locally by dropping the stored credential and the user.
///
/// # Errors
/// Returns `AppError::Storage` if the credential cannot be removed.
pub fn logout(app: &mut App) -> Result<(), AppError> {
    app.session.logout()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app_lib::CredentialStore;
    use crate::features::auth::types::Role;
    use crate::test_support::{app_for, can_bind_localhost, offline_app, user, user_json};
    use secrecy::ExposeSecret;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn failed_login_keeps_session() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/core/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "exception": "AccessDeniedException",
                "message": "Bad credentials"
            })))
            .mount(&server)
            .await;

        let current = user("1", "me@example.com", &[Role::Admin]);
        let (mut app, _) = app_for(&server, Some(current.clone()));
        let mut dialog = LoginDialog::new();
        dialog.form.set("username", "me@example.com").set("password", "wrong");

        assert!(dialog.login(&mut app).await.is_err());

        assert_eq!(app.session.current_user(), Some(&current));
        assert_eq!(
            dialog.form.server_errors(),
            ["Bad credentials. You might need to login, logout or refresh.".to_string()]
        );
    }

    #[tokio::test]
    async fn login_replaces_user() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/core/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json(2, "me@example.com", &[])),
            )
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, None);
        let mut dialog = LoginDialog::new();

        let signed_in = dialog.login(&mut app).await.unwrap();

        assert_eq!(signed_in.id.as_str(), "2");
        assert!(app.session.is_authenticated());
    }

    #[tokio::test]
    async fn social_login_stores_bearer_and_loads_user() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .and(header("Authorization", "Bearer social"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "context": {},
                "user": user_json(3, "s@example.com", &[])
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, store) = app_for(&server, None);

        social_login_success(&mut app, "social").await.unwrap();

        assert_eq!(
            app.session.current_user().map(|u| u.email.as_str()),
            Some("s@example.com")
        );
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "Bearer social");
    }

    #[tokio::test]
    async fn social_login_with_bad_token_alerts() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, None);

        assert!(social_login_success(&mut app, "bogus").await.is_err());
        assert_eq!(
            app.alerts.all()[0].message,
            "Invalid token bogus. Please retry."
        );
        assert!(!app.session.is_authenticated());
    }

    #[test]
    fn logout_clears_everything() {
        let (mut app, store) = offline_app(Some(user("1", "a@example.com", &[])), Some("Bearer x"));

        logout(&mut app).unwrap();

        assert!(!app.session.is_authenticated());
        assert!(store.load().unwrap().is_none());
    }
}
