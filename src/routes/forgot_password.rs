use crate::{
    app::App,
    features::forms::{FormState, SubmitError, SubmitOptions, submit},
    routes::Route,
};
use reqwest::Method;
use serde_json::json;

pub const FORGOT_PASSWORD_PATH: &str = "/api/core/forgot-password";

#[derive(Debug)]
pub struct ForgotPasswordPage {
    pub form: FormState,
}

impl ForgotPasswordPage {
    pub fn open(app: &mut App) -> Self {
        app.set_active_page(None);
        Self {
            form: FormState::with_fields(&["email"]),
        }
    }

    /// Requests a password reset mail for the form's email.
    ///
    /// # Errors
    /// Returns `SubmitError` when the server rejects the request.
    pub async fn forgot_password(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        let data = json!({ "email": self.form.text("email") });
        submit(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            FORGOT_PASSWORD_PATH,
            Method::POST,
            SubmitOptions::params(data).with_success_message(
                "Please check your mail for instructions on how to reset your password.",
            ),
        )
        .await?;
        Ok(Route::Home)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app::Page;
    use crate::test_support::{app_for, can_bind_localhost};
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn forgot_password_posts_email_param() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(FORGOT_PASSWORD_PATH))
            .and(body_string("email=a%40example.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, None);
        app.set_active_page(Some(Page::About));
        let mut page = ForgotPasswordPage::open(&mut app);
        assert_eq!(app.active_page(), None);
        page.form.edit_field("email", "a@example.com");

        assert_eq!(page.forgot_password(&mut app).await.unwrap(), Route::Home);
        assert_eq!(
            app.alerts.all()[0].message,
            "Please check your mail for instructions on how to reset your password."
        );
    }

    #[tokio::test]
    async fn unknown_email_is_a_field_error() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(FORGOT_PASSWORD_PATH))
            .respond_with(ResponseTemplate::new(422).set_body_json(serde_json::json!({
                "exception": "MultiErrorException",
                "errors": [{"field": "email", "message": "Email not found"}]
            })))
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, None);
        let mut page = ForgotPasswordPage::open(&mut app);

        assert!(page.forgot_password(&mut app).await.is_err());
        assert_eq!(page.form.field_errors("email"), ["Email not found".to_string()]);
        assert!(app.alerts.is_empty());
    }
}
