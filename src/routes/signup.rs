use crate::{
    app::{App, Page},
    features::{
        auth::types::User,
        forms::{FormState, SubmitError, SubmitOptions, submit_as},
        users::client::USERS_PATH,
    },
    routes::Route,
};
use reqwest::Method;

pub const FIELDS: [&str; 4] = ["email", "name", "password", "captchaResponse"];

#[derive(Debug)]
pub struct SignupPage {
    pub form: FormState,
}

impl SignupPage {
    pub fn open(app: &mut App) -> Self {
        app.set_active_page(Some(Page::Signup));
        Self {
            form: FormState::with_fields(&FIELDS),
        }
    }

    /// Creates the account and signs the new user in.
    ///
    /// # Errors
    /// Returns `SubmitError` when the server rejects the signup; the form
    /// carries the field errors.
    pub async fn signup(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        let data = self.form.data();
        let user: User = submit_as(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            USERS_PATH,
            Method::POST,
            SubmitOptions::json(data)
                .with_success_message("Signed in. Please check your mail for validation email"),
        )
        .await?;

        app.session.set_current_user(Some(user));
        Ok(Route::Home)
    }
}
