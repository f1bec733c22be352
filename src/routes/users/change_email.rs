//! Email change: request a change (mails a code to the new address), then
//! confirm it with that code.

use crate::{
    app::App,
    app_lib::{AppError, RequestBody, api::decode},
    features::{
        auth::{
            guards::{Denied, require_auth},
            types::{User, UserId},
        },
        forms::{FormState, SubmitError, SubmitOptions, submit},
        users::client::user_path,
    },
    routes::Route,
};
use reqwest::Method;
use serde_json::json;
use tracing::warn;

#[derive(Debug)]
pub struct RequestEmailChangePage {
    pub user: Option<User>,
    pub form: FormState,
}

impl RequestEmailChangePage {
    pub async fn open(app: &mut App, id: &str) -> Self {
        Self {
            user: app.fetch_user(id).await,
            form: FormState::with_fields(&["newEmail", "password"]),
        }
    }

    /// Asks the server to mail a confirmation link to the new address.
    ///
    /// # Errors
    /// Returns `SubmitError` when the user was never loaded or the server
    /// rejects the request.
    pub async fn request_change(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        let Some(id) = self.user.as_ref().map(|user| user.id.clone()) else {
            return Err(SubmitError::from(AppError::Validation(
                "User not loaded".to_string(),
            )));
        };

        let data = self.form.data();
        submit(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            &user_path(&id, "email-change-request"),
            Method::POST,
            SubmitOptions::json(data).with_success_message(
                "A mail containing a link has been sent to the new email id. Click on that link to change your email",
            ),
        )
        .await?;
        Ok(Route::Profile { id })
    }
}

/// Only signed-in users may confirm an email change.
#[must_use]
pub fn permitted(app: &App) -> bool {
    app.session.is_authenticated()
}

/// Confirms the change with the mailed code. The outcome is reported as an
/// alert; the user always lands on `/`.
///
/// # Errors
/// Returns `Denied::NotAuthenticated` without sending anything when nobody is
/// signed in.
pub async fn change_email(app: &mut App, id: &UserId, code: &str) -> Result<Route, Denied> {
    require_auth(&app.session)?;

    let result = app
        .api
        .send(
            Method::POST,
            &user_path(id, "email"),
            RequestBody::Form(json!({ "code": code })),
        )
        .await
        .and_then(decode::<User>);

    match result {
        Ok(user) => {
            app.alerts.success("Email changed.");
            app.session.set_current_user(Some(user));
        }
        Err(err) => {
            warn!("email change failed: {err}");
            app.alerts
                .danger(format!("Changing email failed: {}", err.user_message()));
        }
    }
    Ok(Route::Home)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{app_for, can_bind_localhost, offline_app, user, user_json};
    use wiremock::matchers::{body_json, body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn request_change_posts_new_email_and_password() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/users/5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json(5, "old@example.com", &[])),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/core/users/5/email-change-request"))
            .and(body_json(json!({"newEmail": "new@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, Some(user("5", "old@example.com", &[])));
        let mut page = RequestEmailChangePage::open(&mut app, "5").await;
        page.form.set("newEmail", "new@example.com").set("password", "pw");

        let next = page.request_change(&mut app).await.unwrap();

        assert_eq!(next, Route::parse("/users/5"));
        assert!(app.alerts.all()[0].message.starts_with("A mail containing a link"));
    }

    #[tokio::test]
    async fn change_email_replaces_user() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/core/users/5/email"))
            .and(body_string("code=c0de"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json(5, "new@example.com", &[])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, Some(user("5", "old@example.com", &[])));
        assert!(permitted(&app));

        let next = change_email(&mut app, &UserId::from("5"), "c0de").await.unwrap();

        assert_eq!(next, Route::Home);
        assert_eq!(app.alerts.all()[0].message, "Email changed.");
        assert_eq!(
            app.session.current_user().map(|u| u.email.as_str()),
            Some("new@example.com")
        );
    }

    #[tokio::test]
    async fn change_email_failure_alerts() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/core/users/5/email"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "exception": "AccessDeniedException",
                "message": "Wrong code"
            })))
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, Some(user("5", "old@example.com", &[])));

        change_email(&mut app, &UserId::from("5"), "nope").await.unwrap();

        assert_eq!(app.alerts.all()[0].message, "Changing email failed: Wrong code");
        assert_eq!(
            app.session.current_user().map(|u| u.email.as_str()),
            Some("old@example.com")
        );
    }

    #[tokio::test]
    async fn anonymous_cannot_change_email() {
        let (mut app, _) = offline_app(None, None);
        assert!(!permitted(&app));
        assert_eq!(
            change_email(&mut app, &UserId::from("5"), "c").await,
            Err(Denied::NotAuthenticated)
        );
    }
}
