//! Route table and per-screen controllers. Each controller takes the explicit
//! [`crate::app::App`] context and returns the route to show next, if any.

pub mod about;
pub mod admin;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod reset_password;
pub mod signup;
pub mod social_login;
pub mod users;

use crate::features::auth::types::UserId;
use std::fmt;
use url::{Url, form_urlencoded};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Signup,
    Admin,
    ForgotPassword,
    ResetPassword { code: Option<String> },
    SocialLoginSuccess { token: Option<String> },
    Profile { id: UserId },
    EditUser { id: UserId },
    Verify { id: UserId, code: Option<String> },
    ChangePassword { id: UserId },
    RequestEmailChange { id: UserId },
    ChangeEmail { id: UserId, code: Option<String> },
    ApiKey { id: UserId },
}

impl Route {
    /// Resolves a location to a route. Accepts plain paths, full URLs and
    /// hash-style links (`#/users/1/verification?code=x`). Anything unknown
    /// resolves to `Home`.
    #[must_use]
    pub fn parse(location: &str) -> Self {
        let relative = relative_location(location.trim());
        let (path, query) = relative.split_once('?').unwrap_or((relative.as_str(), ""));
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["signup"] => Route::Signup,
            ["admin"] => Route::Admin,
            ["forgot-password"] => Route::ForgotPassword,
            ["reset-password"] => Route::ResetPassword {
                code: param("code"),
            },
            ["social-login-success"] => Route::SocialLoginSuccess {
                token: param("token"),
            },
            ["users", id] => Route::Profile { id: UserId::from(*id) },
            ["users", id, "edit"] => Route::EditUser { id: UserId::from(*id) },
            ["users", id, "verification"] => Route::Verify {
                id: UserId::from(*id),
                code: param("code"),
            },
            ["users", id, "change-password"] => Route::ChangePassword { id: UserId::from(*id) },
            ["users", id, "request-email-change"] => Route::RequestEmailChange {
                id: UserId::from(*id),
            },
            ["users", id, "change-email"] => Route::ChangeEmail {
                id: UserId::from(*id),
                code: param("code"),
            },
            ["users", id, "api-key"] => Route::ApiKey { id: UserId::from(*id) },
            _ => Route::Home,
        }
    }

    /// Path of the route, including its query parameters.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::ResetPassword { code } => with_query("/reset-password", "code", code.as_deref()),
            Route::SocialLoginSuccess { token } => {
                with_query("/social-login-success", "token", token.as_deref())
            }
            Route::Profile { id } => format!("/users/{id}"),
            Route::EditUser { id } => format!("/users/{id}/edit"),
            Route::Verify { id, code } => {
                with_query(&format!("/users/{id}/verification"), "code", code.as_deref())
            }
            Route::ChangePassword { id } => format!("/users/{id}/change-password"),
            Route::RequestEmailChange { id } => format!("/users/{id}/request-email-change"),
            Route::ChangeEmail { id, code } => {
                with_query(&format!("/users/{id}/change-email"), "code", code.as_deref())
            }
            Route::ApiKey { id } => format!("/users/{id}/api-key"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}

/// Strips scheme, host and any hash prefix so only `path?query` remains.
fn relative_location(location: &str) -> String {
    if let Some((_, fragment)) = location.split_once('#') {
        return fragment.trim_start_matches('!').to_string();
    }
    match Url::parse(location) {
        Ok(url) => match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        },
        Err(_) => location.to_string(),
    }
}

fn with_query(path: &str, name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair(name, value)
                .finish();
            format!("{path}?{query}")
        }
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse(""), Route::Home);
        assert_eq!(Route::parse("/about"), Route::About);
        assert_eq!(Route::parse("/signup/"), Route::Signup);
        assert_eq!(Route::parse("/admin"), Route::Admin);
        assert_eq!(
            Route::parse("/users/12/edit"),
            Route::EditUser {
                id: UserId::from("12")
            }
        );
        assert_eq!(
            Route::parse("/users/12/api-key"),
            Route::ApiKey {
                id: UserId::from("12")
            }
        );
    }

    #[test]
    fn parse_reads_query_parameters() {
        assert_eq!(
            Route::parse("/users/3/verification?code=a%2Bb"),
            Route::Verify {
                id: UserId::from("3"),
                code: Some("a+b".to_string())
            }
        );
        assert_eq!(
            Route::parse("/social-login-success?token=xyz"),
            Route::SocialLoginSuccess {
                token: Some("xyz".to_string())
            }
        );
        assert_eq!(
            Route::parse("/reset-password"),
            Route::ResetPassword { code: None }
        );
    }

    #[test]
    fn parse_accepts_full_and_hash_urls() {
        assert_eq!(
            Route::parse("http://localhost:9000/#/users/1/change-email?code=c1"),
            Route::ChangeEmail {
                id: UserId::from("1"),
                code: Some("c1".to_string())
            }
        );
        assert_eq!(
            Route::parse("https://frontend.example.com/users/7"),
            Route::Profile {
                id: UserId::from("7")
            }
        );
        assert_eq!(Route::parse("#!/about"), Route::About);
    }

    #[test]
    fn unmatched_paths_go_home() {
        assert_eq!(Route::parse("/nowhere"), Route::Home);
        assert_eq!(Route::parse("/users/1/unknown"), Route::Home);
        assert_eq!(Route::parse("/users"), Route::Home);
    }

    #[test]
    fn path_round_trips_for_links() {
        let route = Route::Verify {
            id: UserId::from("3"),
            code: Some("a b".to_string()),
        };
        assert_eq!(route.path(), "/users/3/verification?code=a+b");
        assert_eq!(Route::parse(&route.path()), route);
        assert_eq!(Route::Home.to_string(), "/");
    }
}
