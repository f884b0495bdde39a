//! The endpoint for fetching the authenticated user.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;

use crate::{AppState, Error, User, UserID, get_user_by_id};

/// The state needed to look up the authenticated user.
#[derive(Debug, Clone)]
pub struct UserState {
    /// The database connection for reading users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UserState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The response body for the current user.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The authenticated user.
    pub user: User,
}

/// Get the user the bearer token was issued to.
///
/// Responds with 404 if the user no longer exists.
pub async fn get_me(
    State(state): State<UserState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<MeResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_user_by_id(user_id, &connection).map(|user| Json(MeResponse { user }))
}

#[cfg(test)]
mod me_tests {
    use serde_json::Value;

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn get_me_returns_registered_user() {
        let server = get_test_server();
        let token = register_test_user(&server, "foo@bar.baz").await;

        let response = server.get(endpoints::ME).authorization_bearer(&token).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["user"]["email"], "foo@bar.baz");
        assert!(body["user"]["id"].as_i64().unwrap() > 0);
        assert!(body["user"]["created_at"].is_string());
    }

    #[tokio::test]
    async fn get_me_without_token_is_unauthorized() {
        let server = get_test_server();

        server.get(endpoints::ME).await.assert_status_unauthorized();
    }
}
