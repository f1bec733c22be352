use crate::{
    app::App,
    app_lib::AppError,
    features::auth::{
        guards::Denied,
        token::{API_KEY_EXPIRATION_MILLIS, fetch_new_auth_token},
        types::User,
    },
};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

#[derive(Debug)]
pub struct ApiKeyPage {
    pub user: Option<User>,
    api_key: Option<SecretString>,
}

#[derive(Debug)]
pub enum ApiKeyError {
    Denied(Denied),
    Request(AppError),
}

impl fmt::Display for ApiKeyError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKeyError::Denied(denied) => write!(formatter, "{denied}"),
            ApiKeyError::Request(err) => write!(formatter, "{err}"),
        }
    }
}

impl std::error::Error for ApiKeyError {}

impl ApiKeyPage {
    pub async fn open(app: &mut App, id: &str) -> Self {
        Self {
            user: app.fetch_user(id).await,
            api_key: None,
        }
    }

    /// Only viewers who may edit the user may mint keys for them.
    #[must_use]
    pub fn permitted(&self, app: &App) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| app.flags(user).editable)
    }

    /// The key created on this page, if any. Shown once and never logged.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.expose_secret())
    }

    /// Creates a long-lived token for the user.
    ///
    /// # Errors
    /// Returns `ApiKeyError::Denied` when the viewer may not edit the user,
    /// or the request error after raising a danger alert.
    pub async fn create_api_key(&mut self, app: &mut App) -> Result<(), ApiKeyError> {
        if !self.permitted(app) {
            return Err(ApiKeyError::Denied(Denied::NotEditable));
        }
        let email = self
            .user
            .as_ref()
            .map(|user| user.email.clone())
            .unwrap_or_default();

        match fetch_new_auth_token(&app.api, &email, Some(API_KEY_EXPIRATION_MILLIS)).await {
            Ok(token) => {
                self.api_key = Some(SecretString::from(token));
                Ok(())
            }
            Err(err) => {
                app.alerts
                    .danger(format!("Error creating API key: {}", err.user_message()));
                Err(ApiKeyError::Request(err))
            }
        }
    }
}
