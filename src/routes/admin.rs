//! Admin screen: look users up by email and switch into their account.

use crate::{
    app::App,
    app_lib::{AppError, CredentialStore},
    features::{
        auth::{
            guards::{Denied, require_good_admin},
            token::{fetch_new_auth_token, store_bearer},
            types::Role,
        },
        forms::{FormState, SubmitError},
        users::client::fetch_by_email,
    },
    routes::Route,
};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug)]
pub struct AdminPage {
    pub form: FormState,
}

/// Why switching user did not happen.
#[derive(Debug)]
pub enum SwitchUserError {
    Denied(Denied),
    Request(AppError),
}

impl fmt::Display for SwitchUserError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchUserError::Denied(denied) => write!(formatter, "{denied}"),
            SwitchUserError::Request(err) => write!(formatter, "{err}"),
        }
    }
}

impl std::error::Error for SwitchUserError {}

impl Default for AdminPage {
    fn default() -> Self {
        Self {
            form: FormState::with_fields(&["email"]),
        }
    }
}

impl AdminPage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn permitted(app: &App) -> bool {
        app.session.has_any_role(&[Role::Admin])
    }

    /// Looks the form's email up and routes to that user's profile.
    ///
    /// # Errors
    /// Returns `SubmitError` when no such user exists; the form shows why.
    pub async fn fetch_user(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        let email = self.form.text("email").to_string();
        let user = fetch_by_email(&app.api, &mut app.alerts, &mut self.form, &email).await?;
        Ok(Route::Profile { id: user.id })
    }

    /// Signs in as the user with the form's email. Only good admins may.
    ///
    /// # Errors
    /// Returns `SwitchUserError::Denied` for anyone but a good admin, or the
    /// request error when the token cannot be fetched or the switched user
    /// cannot be loaded. In the latter case the admin's credential is restored.
    pub async fn switch_user(&mut self, app: &mut App) -> Result<(), SwitchUserError> {
        require_good_admin(&app.session).map_err(SwitchUserError::Denied)?;

        let email = self.form.text("email").to_string();
        let token = match fetch_new_auth_token(&app.api, &email, None).await {
            Ok(token) => token,
            Err(err) => {
                app.alerts
                    .danger(format!("Could not switch user: {}", err.user_message()));
                return Err(SwitchUserError::Request(err));
            }
        };
        let credentials = app.session.credentials().clone();
        let previous = credentials.load().map_err(SwitchUserError::Request)?;
        store_bearer(credentials.as_ref(), &token).map_err(SwitchUserError::Request)?;

        if let Err(err) = app.refresh_user().await {
            warn!("switched user could not be loaded, restoring credential");
            let restored = match &previous {
                Some(credential) => credentials.save(credential),
                None => credentials.clear(),
            };
            if let Err(restore_err) = restored {
                warn!("failed to restore credential: {restore_err}");
            }
            app.alerts
                .danger(format!("Could not switch user: {}", err.user_message()));
            return Err(SwitchUserError::Request(err));
        }
        info!("switched user");
        app.alerts.success("Switched user");
        Ok(())
    }
}
