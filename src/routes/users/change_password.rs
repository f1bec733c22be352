use crate::{
    app::App,
    app_lib::AppError,
    features::{
        auth::types::UserId,
        forms::{FormState, SubmitError, SubmitOptions, submit},
        users::client::user_path,
    },
    routes::Route,
};
use reqwest::Method;

pub const FIELDS: [&str; 3] = ["oldPassword", "password", "retypePassword"];

#[derive(Debug)]
pub struct ChangePasswordPage {
    pub id: UserId,
    pub form: FormState,
}

impl ChangePasswordPage {
    #[must_use]
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            form: FormState::with_fields(&FIELDS),
        }
    }

    /// Changes the password. Passwords are never logged.
    ///
    /// # Errors
    /// Returns `SubmitError` when the retyped password differs (checked
    /// locally) or the server rejects the change.
    pub async fn change_password(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        if self.form.text("password") != self.form.text("retypePassword") {
            self.form.clear_server_errors();
            self.form
                .add_field_error("retypePassword", "Passwords do not match");
            return Err(SubmitError::from(AppError::Validation(
                "Passwords do not match".to_string(),
            )));
        }

        let data = self.form.data();
        submit(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            &user_path(&self.id, "password"),
            Method::POST,
            SubmitOptions::json(data).with_success_message("Password changed successfully"),
        )
        .await?;
        Ok(Route::Home)
    }
}
