pub mod account;
pub mod admin;
pub mod session;
pub mod users;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    app::App,
    app_lib::AppError,
    cli::globals::GlobalArgs,
    components::AlertKind,
    features::forms::{FormState, SubmitError},
};
use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

#[derive(Debug)]
pub enum Action {
    Session(session::Args),
    Account(account::Args),
    Users(users::Args),
    Admin(admin::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Loads the application context. A stored credential the server rejects is
/// dropped and the bootstrap is retried once without it.
///
/// # Errors
/// Returns an error if the API base URL cannot be resolved or the context
/// cannot be fetched.
pub async fn connect(globals: &GlobalArgs) -> Result<App> {
    let config = globals.config()?;
    let store = globals.credential_store();

    match App::bootstrap(&config, store.clone()).await {
        Ok(app) => Ok(app),
        Err(AppError::SessionExpired(message)) => {
            warn!("retrying bootstrap without credential");
            eprintln!("{message}");
            App::bootstrap(&config, store)
                .await
                .context("Failed to load application context")
        }
        Err(err) => Err(err).context("Failed to load application context"),
    }
}

/// Prints and drains pending alerts, danger alerts on stderr. Returns true
/// when any of them was a danger alert.
pub fn print_alerts(app: &mut App) -> bool {
    let mut danger = false;
    for alert in app.alerts.drain() {
        if alert.kind == AlertKind::Danger {
            danger = true;
            eprintln!("{alert}");
        } else {
            println!("{alert}");
        }
    }
    danger
}

/// Prints and drains pending alerts.
///
/// # Errors
/// Returns an error if any of them was a danger alert.
pub fn report(app: &mut App) -> Result<()> {
    if print_alerts(app) {
        Err(anyhow!("Request failed"))
    } else {
        Ok(())
    }
}

/// Prints what a rejected submission left on the form and returns the error.
/// The submission error is what gets returned, whatever the alerts said.
pub fn rejected(app: &mut App, form: &FormState, err: SubmitError) -> anyhow::Error {
    if print_alerts(app) {
        debug!("rejected submission also raised danger alerts");
    }
    for message in form.server_errors() {
        eprintln!("{message}");
    }
    for (field, messages) in form.server_field_errors() {
        for message in messages {
            eprintln!("{field}: {message}");
        }
    }
    anyhow::Error::new(err).context("Request was rejected")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::offline_app;

    #[test]
    fn print_alerts_drains_and_flags_danger() {
        let (mut app, _) = offline_app(None, None);
        app.alerts.success("Profile updated");
        assert!(!print_alerts(&mut app));
        assert!(app.alerts.is_empty());

        app.alerts.success("Mail sent. ");
        app.alerts.push(AlertKind::Danger, "Couldn't send mail: down");
        assert!(print_alerts(&mut app));
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn report_fails_only_on_danger() {
        let (mut app, _) = offline_app(None, None);
        app.alerts.success("Profile updated");
        assert!(report(&mut app).is_ok());

        app.alerts.danger("Couldn't send mail: down");
        assert_eq!(report(&mut app).unwrap_err().to_string(), "Request failed");
        assert!(report(&mut app).is_ok());
    }

    #[test]
    fn rejected_drains_alerts_and_keeps_submission_error() {
        let (mut app, _) = offline_app(None, None);
        app.alerts.danger("Could not switch user: boom");
        let mut form = FormState::with_fields(&["email"]);
        form.add_form_error("Server Error: boom");
        let err = SubmitError::from(AppError::Network("boom".to_string()));

        let err = rejected(&mut app, &form, err);

        assert!(app.alerts.is_empty());
        assert_eq!(err.to_string(), "Request was rejected");
        assert!(err.downcast_ref::<SubmitError>().is_some());
    }
}
