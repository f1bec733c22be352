//! Session state for the client. The session holds the current user in memory
//! and shares the credential store with the HTTP envelope; it is owned by the
//! [`crate::app::App`] context and passed explicitly to controllers. Role
//! checks are computed on every call, so replacing the user never leaves stale
//! derived state behind.

use crate::app_lib::{AppError, CredentialStore};
use crate::features::auth::types::{Role, User};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Session {
    current_user: Option<User>,
    credentials: Arc<dyn CredentialStore>,
}

impl Session {
    pub fn new(credentials: Arc<dyn CredentialStore>, current_user: Option<User>) -> Self {
        Self {
            current_user,
            credentials,
        }
    }

    #[must_use]
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Replaces the current user, e.g. after login, logout or a user switch.
    pub fn set_current_user(&mut self, user: Option<User>) {
        debug!(
            user_id = ?user.as_ref().map(|u| u.id.as_str()),
            "current user changed"
        );
        self.current_user = user;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// True when the current user holds at least one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|user| roles.iter().any(|role| user.has_role(*role)))
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.has_any_role(&[role])
    }

    /// Neither unverified nor blocked. Anonymous sessions count as good users,
    /// matching the role checks above; combine with `is_authenticated` where needed.
    #[must_use]
    pub fn is_good_user(&self) -> bool {
        !(self.has_role(Role::Unverified) || self.has_role(Role::Blocked))
    }

    #[must_use]
    pub fn is_good_admin(&self) -> bool {
        self.has_role(Role::Admin) && self.is_good_user()
    }

    /// True when `user` is the one currently signed in.
    #[must_use]
    pub fn is_current_user(&self, user: &User) -> bool {
        self.current_user
            .as_ref()
            .is_some_and(|current| current.id == user.id)
    }

    #[must_use]
    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Drops the stored credential and the current user.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the credential cannot be removed.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.credentials.clear()?;
        self.set_current_user(None);
        Ok(())
    }
}
