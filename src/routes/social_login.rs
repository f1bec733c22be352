use crate::{app::App, app_lib::AppError, routes::login::social_login_success};

/// Landing page of a social login redirect; forwards its token to the login
/// flow.
///
/// # Errors
/// Returns `AppError::Validation` when the redirect carried no token,
/// otherwise whatever the login flow returns.
pub async fn show(app: &mut App, token: Option<&str>) -> Result<(), AppError> {
    match token.map(str::trim).filter(|token| !token.is_empty()) {
        Some(token) => social_login_success(app, token).await,
        None => {
            app.alerts.danger("Invalid token . Please retry.");
            Err(AppError::Validation("Missing social login token".to_string()))
        }
    }
}
