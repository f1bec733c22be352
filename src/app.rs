//! Application context threaded through every controller.
//!
//! `App` owns the API client, the session and the alert list. It is built
//! once by [`App::bootstrap`] from the server context; the context map is
//! immutable afterwards. Controllers receive `&mut App` explicitly, so there
//! is no hidden global state and one form cannot be submitted twice at once.

use crate::{
    app_lib::{ApiClient, AppConfig, AppError, CredentialStore},
    components::{AlertKind, Alerts},
    features::{
        auth::{
            client::{fetch_context, ping},
            state::Session,
            types::{Role, User, UserId},
        },
        users::{self, DerivedFlags, derive_flags},
    },
};
use serde_json::{Map, Value};
use std::{fmt, sync::Arc};
use tracing::{debug, info, instrument, warn};

pub const UNVERIFIED_REMINDER: &str =
    "Your email is not verified yet. Please check your mail or resend the verification mail.";

/// Navigation marker for the top-level menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
    Signup,
}

impl fmt::Display for Page {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Page::Home => "HOME",
            Page::About => "ABOUT",
            Page::Signup => "SIGNUP",
        };
        formatter.write_str(name)
    }
}

#[derive(Debug)]
pub struct App {
    pub api: ApiClient,
    pub session: Session,
    pub alerts: Alerts,
    context: Map<String, Value>,
    active_page: Option<Page>,
}

impl App {
    /// Builds an application context from parts already at hand.
    #[must_use]
    pub fn new(api: ApiClient, session: Session, context: Map<String, Value>) -> Self {
        Self {
            api,
            session,
            alerts: Alerts::new(),
            context,
            active_page: None,
        }
    }

    /// Fetches the server context with any stored credential and builds the app.
    ///
    /// # Errors
    /// Returns `AppError::SessionExpired` when the stored credential is
    /// rejected (it is cleared first, so a retry starts anonymous). Any other
    /// failure also clears the credential and is returned as-is.
    #[instrument(skip_all, fields(api_base_url = %config.api_base_url))]
    pub async fn bootstrap(
        config: &AppConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, AppError> {
        let api = ApiClient::new(config, credentials.clone())?;

        let response = match fetch_context(&api).await {
            Ok(response) => response,
            Err(err) => {
                credentials.clear()?;
                if err.status() == Some(401) {
                    warn!("stored credential rejected");
                    return Err(AppError::SessionExpired(
                        "Stored credential was rejected. Please login again.".to_string(),
                    ));
                }
                warn!("context fetch failed: {err}");
                return Err(err);
            }
        };

        let mut context = response.context;
        if let Some(user) = response.raw_user {
            context.insert("user".to_string(), user);
        }

        info!(
            authenticated = response.user.is_some(),
            "application context loaded"
        );

        let session = Session::new(credentials, response.user);
        Ok(Self::new(api, session, context))
    }

    /// Server-provided configuration, including the user present at bootstrap.
    #[must_use]
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }

    #[must_use]
    pub fn active_page(&self) -> Option<Page> {
        self.active_page
    }

    pub fn set_active_page(&mut self, page: Option<Page>) {
        self.active_page = page;
    }

    /// True when the signed-in user still has to verify their email.
    #[must_use]
    pub fn unverified(&self) -> bool {
        self.session.has_any_role(&[Role::Unverified])
    }

    /// Raises the verification reminder when the signed-in user is
    /// unverified. The text is composed locally, so it goes in as trusted.
    pub fn remind_unverified(&mut self) -> bool {
        if !self.unverified() {
            return false;
        }
        self.alerts.push_trusted(AlertKind::Danger, UNVERIFIED_REMINDER);
        true
    }

    #[must_use]
    pub fn flags(&self, user: &User) -> DerivedFlags {
        derive_flags(user, &self.session)
    }

    /// Fetches a user for display; failures become danger alerts.
    pub async fn fetch_user(&mut self, id: &str) -> Option<User> {
        users::client::fetch_by_id(&self.api, &mut self.alerts, id).await
    }

    /// Refetches the context with the stored credential and replaces the
    /// session user. The bootstrap context itself is left untouched.
    ///
    /// # Errors
    /// Returns the request error; the session is unchanged in that case.
    pub async fn refresh_user(&mut self) -> Result<Option<&User>, AppError> {
        let response = fetch_context(&self.api).await?;
        self.session.set_current_user(response.user);
        Ok(self.session.current_user())
    }

    /// Resends the verification mail to `id`, or to the signed-in user.
    ///
    /// # Errors
    /// Returns `AppError::SessionExpired` when no id is given and nobody is
    /// signed in, otherwise the request error. Both cases raise an alert.
    pub async fn resend_verification_mail(&mut self, id: Option<&UserId>) -> Result<(), AppError> {
        let id = match id.or_else(|| self.session.current_user().map(|user| &user.id)) {
            Some(id) => id.clone(),
            None => {
                self.alerts.danger("Couldn't send mail: Please login first");
                return Err(AppError::SessionExpired("Please login first".to_string()));
            }
        };
        users::client::resend_verification_mail(&self.api, &mut self.alerts, &id).await
    }

    /// Checks that the API answers.
    ///
    /// # Errors
    /// Returns the request error after raising an alert.
    pub async fn ping(&mut self) -> Result<(), AppError> {
        match ping(&self.api).await {
            Ok(()) => {
                debug!("ping completed");
                Ok(())
            }
            Err(err) => {
                self.alerts
                    .danger("Could not ping server. Please try refreshing after sometime");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app_lib::MemoryCredentialStore;
    use crate::test_support::{can_bind_localhost, offline_app, user, user_json};
    use secrecy::ExposeSecret;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> AppConfig {
        AppConfig::resolve("localhost", Some(server.uri().as_str())).unwrap()
    }

    #[tokio::test]
    async fn bootstrap_hydrates_session_and_persists_credential() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Lemon-Authorization", "tok1")
                    .set_body_json(json!({
                        "context": {"reCaptchaSiteKey": "site-key"},
                        "user": {"id": 1, "roles": []}
                    })),
            )
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::new());
        let app = App::bootstrap(&config_for(&server), store.clone())
            .await
            .unwrap();

        assert_eq!(
            app.session.current_user().map(|user| user.id.as_str()),
            Some("1")
        );
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "tok1");
        assert_eq!(app.context_value("reCaptchaSiteKey"), Some(&json!("site-key")));
        assert_eq!(app.context()["user"], json!({"id": 1, "roles": []}));
        assert!(!app.unverified());
    }

    #[tokio::test]
    async fn bootstrap_without_user_is_anonymous() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"context": {}})))
            .mount(&server)
            .await;

        let app = App::bootstrap(&config_for(&server), Arc::new(MemoryCredentialStore::new()))
            .await
            .unwrap();

        assert!(!app.session.is_authenticated());
        assert!(!app.context().contains_key("user"));
    }

    #[tokio::test]
    async fn rejected_credential_is_cleared() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "exception": "BadCredentialsException",
                "message": "Token expired"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_credential("Bearer stale"));
        let err = App::bootstrap(&config_for(&server), store.clone())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::SessionExpired(_)));
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn other_bootstrap_failures_clear_credential_too() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryCredentialStore::with_credential("Bearer any"));
        let err = App::bootstrap(&config_for(&server), store.clone())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn resend_verification_defaults_to_current_user() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/context"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "context": {},
                "user": user_json(5, "u@example.com", &["UNVERIFIED"])
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/core/users/5/resend-verification-mail"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut app = App::bootstrap(&config_for(&server), Arc::new(MemoryCredentialStore::new()))
            .await
            .unwrap();
        assert!(app.unverified());

        app.resend_verification_mail(None).await.unwrap();
        assert_eq!(app.alerts.all()[0].message, "Mail sent. ");
    }

    #[tokio::test]
    async fn resend_verification_needs_a_user() {
        let (mut app, _) = offline_app(None, None);

        let err = app.resend_verification_mail(None).await.unwrap_err();

        assert!(matches!(err, AppError::SessionExpired(_)));
        assert_eq!(
            app.alerts.all()[0].message,
            "Couldn't send mail: Please login first"
        );
    }

    #[test]
    fn unverified_reminder_is_a_trusted_alert() {
        let (mut unverified, _) = offline_app(
            Some(user("5", "u@example.com", &[Role::Unverified])),
            None,
        );
        let (mut verified, _) = offline_app(Some(user("6", "v@example.com", &[])), None);
        let (mut anonymous, _) = offline_app(None, None);

        assert!(unverified.remind_unverified());
        let alert = &unverified.alerts.all()[0];
        assert_eq!(alert.kind, AlertKind::Danger);
        assert_eq!(alert.message, UNVERIFIED_REMINDER);
        assert!(alert.trusted);

        assert!(!verified.remind_unverified());
        assert!(verified.alerts.is_empty());
        assert!(!anonymous.remind_unverified());
        assert!(anonymous.alerts.is_empty());
    }
}
