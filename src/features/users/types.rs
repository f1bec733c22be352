//! Presentation helpers for users. Flags are derived from the user and the
//! viewing session on every call and never stored on the user itself.

use crate::features::auth::{
    state::Session,
    types::{Role, User, UserId},
};
use serde::Serialize;

/// Role and permission flags for one user as seen by the current viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFlags {
    pub unverified: bool,
    pub blocked: bool,
    pub admin: bool,
    pub good_user: bool,
    pub good_admin: bool,
    /// The viewer may edit this user's profile.
    pub editable: bool,
    /// The viewer may change this user's roles.
    pub roles_editable: bool,
}

#[must_use]
pub fn derive_flags(user: &User, session: &Session) -> DerivedFlags {
    let unverified = user.has_role(Role::Unverified);
    let blocked = user.has_role(Role::Blocked);
    let admin = user.has_role(Role::Admin);
    let good_user = !(unverified || blocked);
    let good_admin = good_user && admin;

    let viewer_is_user = session.is_current_user(user);
    let viewer_good_admin = session.is_authenticated() && session.is_good_admin();

    DerivedFlags {
        unverified,
        blocked,
        admin,
        good_user,
        good_admin,
        editable: session.is_authenticated() && (viewer_is_user || viewer_good_admin),
        roles_editable: viewer_good_admin && !viewer_is_user,
    }
}

/// Roles joined for display, or "No special roles".
#[must_use]
pub fn roles_str(user: &User) -> String {
    if user.roles.is_empty() {
        return "No special roles".to_string();
    }
    user.roles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[must_use]
pub fn profile_link(id: &UserId) -> String {
    format!("/users/{id}")
}

#[must_use]
pub fn edit_link(id: &UserId) -> String {
    format!("/users/{id}/edit")
}

#[must_use]
pub fn change_password_link(id: &UserId) -> String {
    format!("/users/{id}/change-password")
}

#[must_use]
pub fn change_email_link(id: &UserId) -> String {
    format!("/users/{id}/request-email-change")
}

#[must_use]
pub fn api_key_link(id: &UserId) -> String {
    format!("/users/{id}/api-key")
}
