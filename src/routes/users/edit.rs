use crate::{
    app::App,
    app_lib::AppError,
    features::{
        auth::types::{Role, User},
        forms::{FormState, SubmitError, SubmitOptions, submit_as},
        users::client::user_path,
    },
    routes::Route,
};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::debug;

pub const FIELDS: [&str; 4] = ["name", "unverified", "blocked", "admin"];

#[derive(Debug)]
pub struct EditUserPage {
    pub user: Option<User>,
    pub form: FormState,
}

impl EditUserPage {
    /// Loads the user and fills the form from it.
    pub async fn open(app: &mut App, id: &str) -> Self {
        let user = app.fetch_user(id).await;
        let mut form = FormState::with_fields(&FIELDS);
        if let Some(user) = &user {
            form.set("name", user.name.as_str())
                .set("unverified", user.has_role(Role::Unverified))
                .set("blocked", user.has_role(Role::Blocked))
                .set("admin", user.has_role(Role::Admin));
        }
        Self { user, form }
    }

    #[must_use]
    pub fn permitted(&self, app: &App) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| app.flags(user).editable)
    }

    /// Roles as ticked on the form.
    #[must_use]
    pub fn selected_roles(&self) -> Vec<Role> {
        [
            ("unverified", Role::Unverified),
            ("blocked", Role::Blocked),
            ("admin", Role::Admin),
        ]
        .into_iter()
        .filter(|(field, _)| self.form.field(field).and_then(Value::as_bool).unwrap_or(false))
        .map(|(_, role)| role)
        .collect()
    }

    /// Sends a JSON patch with the new name and, when the viewer may change
    /// them, the new roles.
    ///
    /// # Errors
    /// Returns `SubmitError` when the user was never loaded or the server
    /// rejects the patch.
    pub async fn update(&mut self, app: &mut App) -> Result<Route, SubmitError> {
        let Some(user) = self.user.as_ref() else {
            return Err(SubmitError::from(AppError::Validation(
                "User not loaded".to_string(),
            )));
        };
        let id = user.id.clone();

        let mut patch = vec![json!({
            "op": "replace",
            "path": "/name",
            "value": self.form.text("name"),
        })];
        if app.flags(user).roles_editable {
            patch.push(json!({
                "op": "replace",
                "path": "/roles",
                "value": self.selected_roles(),
            }));
        } else {
            debug!("roles not editable, leaving them out of the patch");
        }

        let updated: Option<User> = submit_as(
            &app.api,
            &mut app.alerts,
            &mut self.form,
            &user_path(&id, ""),
            Method::PATCH,
            SubmitOptions::json(Value::Array(patch)).with_success_message("Profile updated"),
        )
        .await?;

        if let Some(updated) = updated {
            if app.session.is_current_user(&updated) {
                app.session.set_current_user(Some(updated.clone()));
            }
            self.user = Some(updated);
        }
        Ok(Route::Profile { id })
    }
}
