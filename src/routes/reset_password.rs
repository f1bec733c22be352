use crate::{
    app::App,
    app_lib::AppError,
    features::forms::{FormState, SubmitError, SubmitOptions, submit},
    routes::Route,
};
use reqwest::Method;
use serde_json::json;

pub const RESET_PASSWORD_PATH: &str = "/api/core/reset-password/";

#[derive(Debug)]
pub struct ResetPasswordPage {
    pub form: FormState,
    code: Option<String>,
}

impl ResetPasswordPage {
    /// `code` comes from the reset link's query string.
    #[must_use]
    pub fn new(code: Option<String>) -> Self {
        Self {
            form: FormState::with_fields(&["newPassword", "retypePassword"]),
            code,
        }
    }

    /// Sets the new password using the code from the reset mail.
    ///
    /// # Errors
    /// Returns `SubmitError` when the retyped password differs or the server
    /// rejects the code.
    pub async fn reset_password(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        if self.form.text("newPassword") != self.form.text("retypePassword") {
            self.form.clear_server_errors();
            self.form
                .add_field_error("retypePassword", "Passwords do not match");
            return Err(SubmitError::from(AppError::Validation(
                "Passwords do not match".to_string(),
            )));
        }

        let data = json!({
            "newPassword": self.form.text("newPassword"),
            "code": self.code.as_deref().unwrap_or_default(),
        });
        submit(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            RESET_PASSWORD_PATH,
            Method::POST,
            SubmitOptions::json(data).with_success_message("Password changed successfully"),
        )
        .await?;
        Ok(Route::Home)
    }
}
