use crate::{
    app::App,
    app_lib::{RequestBody, api::decode},
    features::{
        auth::types::{User, UserId},
        users::client::user_path,
    },
    routes::Route,
};
use reqwest::Method;
use serde_json::json;
use tracing::warn;

/// Confirms the email address with the code from the verification mail.
/// The outcome is reported as an alert; the user always lands on `/`.
pub async fn verify(app: &mut App, id: &UserId, code: &str) -> Route {
    let result = app
        .api
        .send(
            Method::POST,
            &user_path(id, "verification"),
            RequestBody::Form(json!({ "code": code })),
        )
        .await
        .and_then(decode::<User>);

    match result {
        Ok(user) => {
            app.alerts.success("Verification successful.");
            app.session.set_current_user(Some(user));
        }
        Err(err) => {
            warn!("verification failed: {err}");
            app.alerts
                .danger(format!("Verification failed: {}", err.user_message()));
        }
    }
    Route::Home
}
