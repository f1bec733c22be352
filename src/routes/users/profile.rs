use crate::{
    app::App,
    app_lib::AppError,
    features::{
        auth::types::User,
        users::{DerivedFlags, types::roles_str},
    },
};

#[derive(Debug)]
pub struct ProfilePage {
    pub user: Option<User>,
}

impl ProfilePage {
    /// Loads the user to display; a failed fetch leaves an alert and no user.
    pub async fn open(app: &mut App, id: &str) -> Self {
        Self {
            user: app.fetch_user(id).await,
        }
    }

    #[must_use]
    pub fn flags(&self, app: &App) -> Option<DerivedFlags> {
        self.user.as_ref().map(|user| app.flags(user))
    }

    #[must_use]
    pub fn roles(&self) -> Option<String> {
        self.user.as_ref().map(roles_str)
    }

    /// Resends the verification mail of the signed-in user.
    ///
    /// # Errors
    /// Returns the request error after raising an alert.
    pub async fn resend_verification_mail(&self, app: &mut App) -> Result<(), AppError> {
        app.resend_verification_mail(None).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::features::auth::types::Role;
    use crate::test_support::{app_for, can_bind_localhost, user, user_json};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn profile_shows_flags_for_viewer() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/users/2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json(2, "b@example.com", &["BLOCKED"])),
            )
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, Some(user("1", "a@example.com", &[Role::Admin])));
        let page = ProfilePage::open(&mut app, "2").await;

        let flags = page.flags(&app).unwrap();
        assert!(flags.blocked);
        assert!(flags.editable);
        assert!(flags.roles_editable);
        assert_eq!(page.roles().as_deref(), Some("BLOCKED"));
    }

    #[tokio::test]
    async fn missing_user_leaves_alert() {
        if !can_bind_localhost() {
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/core/users/404"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "No user with id 404"
            })))
            .mount(&server)
            .await;

        let (mut app, _) = app_for(&server, None);
        let page = ProfilePage::open(&mut app, "404").await;

        assert!(page.user.is_none());
        assert!(page.flags(&app).is_none());
        assert_eq!(app.alerts.all()[0].message, "No user with id 404");
    }
}
