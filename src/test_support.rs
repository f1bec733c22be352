#![allow(clippy::unwrap_used)]

use crate::app::App;
use crate::app_lib::{ApiClient, AppConfig, MemoryCredentialStore};
use crate::features::auth::{
    state::Session,
    types::{Role, User, UserId},
};
use serde_json::{Map, Value, json};
use std::{net::TcpListener, sync::Arc};
use wiremock::MockServer;

/// Sandboxed runners may forbid binding sockets; HTTP tests skip there.
pub(crate) fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

pub(crate) fn client_for(server: &MockServer, store: Arc<MemoryCredentialStore>) -> ApiClient {
    let config = AppConfig::resolve("localhost", Some(server.uri().as_str())).unwrap();
    ApiClient::new(&config, store).unwrap()
}

pub(crate) fn user_json(id: u64, email: &str, roles: &[&str]) -> Value {
    json!({
        "id": id,
        "name": "Test User",
        "email": email,
        "roles": roles,
        "version": 1
    })
}

/// An app wired to `server` with `user` already signed in.
pub(crate) fn app_for(
    server: &MockServer,
    user: Option<User>,
) -> (App, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::new());
    let api = client_for(server, store.clone());
    let session = Session::new(store.clone(), user);
    (App::new(api, session, Map::new()), store)
}

pub(crate) fn user(id: &str, email: &str, roles: &[Role]) -> User {
    User {
        id: UserId::from(id),
        name: "Test User".to_string(),
        email: email.to_string(),
        roles: roles.to_vec(),
        version: Some(1),
    }
}

/// An app pointing at the default local API, for tests that never send.
pub(crate) fn offline_app(user: Option<User>, credential: Option<&str>) -> (App, Arc<MemoryCredentialStore>) {
    let store = Arc::new(match credential {
        Some(value) => MemoryCredentialStore::with_credential(value),
        None => MemoryCredentialStore::new(),
    });
    let config = AppConfig::resolve("localhost", None).unwrap();
    let api = ApiClient::new(&config, store.clone()).unwrap();
    let session = Session::new(store.clone(), user);
    (App::new(api, session, Map::new()), store)
}
