//! Request and response types for session-related API calls. Credential
//! payloads carry passwords and tokens, so they must never be logged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Server-side roles. Unknown role names never grant anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Unverified,
    Blocked,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "ADMIN",
            Role::Unverified => "UNVERIFIED",
            Role::Blocked => "BLOCKED",
            Role::Unknown => "UNKNOWN",
        };
        formatter.write_str(name)
    }
}

/// User identifier; Lemon backends send numeric (JPA) or string (Mongo) ids.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Self(number.to_string()),
            RawId::Text(text) => Self(text),
        })
    }
}

/// A user as returned by the API. Derived flags are computed on demand, see
/// [`crate::features::users::types::derive_flags`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "username")]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub version: Option<i64>,
}

impl User {
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Deserialize)]
struct RawContextResponse {
    #[serde(default)]
    context: Map<String, Value>,
    #[serde(default)]
    user: Option<Value>,
}

/// Payload of `GET /api/core/context`. `raw_user` keeps the user object
/// exactly as sent, including fields `User` does not model.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(try_from = "RawContextResponse")]
pub struct ContextResponse {
    pub context: Map<String, Value>,
    pub user: Option<User>,
    pub raw_user: Option<Value>,
}

impl TryFrom<RawContextResponse> for ContextResponse {
    type Error = serde_json::Error;

    fn try_from(raw: RawContextResponse) -> Result<Self, Self::Error> {
        let user = raw.user.clone().map(serde_json::from_value).transpose()?;
        Ok(Self {
            context: raw.context,
            user,
            raw_user: raw.user,
        })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTokenRequest {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_millis: Option<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
