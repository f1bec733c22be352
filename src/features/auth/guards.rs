use crate::features::auth::{
    state::Session,
    types::{Role, User},
};
use std::fmt;

/// Why a screen refused to run. These checks only shape the UI; the API
/// enforces access control on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Denied {
    NotAuthenticated,
    NotAdmin,
    NotGoodAdmin,
    NotEditable,
}

impl fmt::Display for Denied {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Denied::NotAuthenticated => "Please login first",
            Denied::NotAdmin => "Only administrators can access this page",
            Denied::NotGoodAdmin => "Only verified, unblocked administrators can do this",
            Denied::NotEditable => "You are not allowed to edit this user",
        };
        formatter.write_str(message)
    }
}

impl std::error::Error for Denied {}

/// # Errors
/// Returns `Denied::NotAuthenticated` for anonymous sessions.
pub fn require_auth(session: &Session) -> Result<&User, Denied> {
    session.current_user().ok_or(Denied::NotAuthenticated)
}

/// # Errors
/// Returns `Denied` unless the current user holds ADMIN.
pub fn require_admin(session: &Session) -> Result<&User, Denied> {
    let user = require_auth(session)?;
    if session.has_role(Role::Admin) {
        Ok(user)
    } else {
        Err(Denied::NotAdmin)
    }
}

/// # Errors
/// Returns `Denied` unless the current user is a good admin.
pub fn require_good_admin(session: &Session) -> Result<&User, Denied> {
    let user = require_admin(session)?;
    if session.is_good_admin() {
        Ok(user)
    } else {
        Err(Denied::NotGoodAdmin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::MemoryCredentialStore;
    use crate::features::auth::types::UserId;
    use std::sync::Arc;

    fn session(roles: &[Role]) -> Session {
        let user = User {
            id: UserId::from("1"),
            name: String::new(),
            email: "a@example.com".to_string(),
            roles: roles.to_vec(),
            version: None,
        };
        Session::new(Arc::new(MemoryCredentialStore::new()), Some(user))
    }

    #[test]
    fn guards_escalate() {
        let anonymous = Session::new(Arc::new(MemoryCredentialStore::new()), None);
        assert_eq!(require_auth(&anonymous).err(), Some(Denied::NotAuthenticated));
        assert_eq!(require_good_admin(&anonymous).err(), Some(Denied::NotAuthenticated));
        assert!(require_auth(&session(&[])).is_ok());

        assert_eq!(require_admin(&session(&[])).err(), Some(Denied::NotAdmin));
        assert!(require_admin(&session(&[Role::Admin, Role::Blocked])).is_ok());

        assert_eq!(
            require_good_admin(&session(&[Role::Admin, Role::Blocked])).err(),
            Some(Denied::NotGoodAdmin)
        );
        assert!(require_good_admin(&session(&[Role::Admin])).is_ok());
    }
}
