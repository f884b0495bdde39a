//! The endpoint for registering a new user.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use jsonwebtoken::EncodingKey;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Email, Error, NewUser, PasswordHash, User, ValidatedPassword,
    auth::token::encode_token, create_user, response::parse_payload, user::UserName,
};

/// The state needed to register a user or log one in.
#[derive(Clone)]
pub struct CredentialsState {
    /// The key for signing new tokens.
    pub encoding_key: EncodingKey,
    /// The duration for which newly issued tokens are valid.
    pub token_duration: Duration,
    /// The bcrypt cost used when hashing new passwords.
    pub password_cost: u32,
    /// The database connection for managing users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CredentialsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            encoding_key: state.token_keys.encoding_key.clone(),
            token_duration: state.token_duration,
            password_cost: state.password_cost,
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The JSON body for registering a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterPayload {
    /// The user's display name, at least two characters.
    pub name: String,
    /// The email the user will log in with.
    pub email: String,
    /// The user's password, at least six characters.
    pub password: String,
}

/// The response to a successful registration or log-in.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// A bearer token for the user.
    pub token: String,
    /// The user the token was issued to.
    pub user: User,
}

/// Register a new user and log them in.
///
/// # Errors
///
/// Responds with 400 if the name, email or password is invalid, 409 if the email is
/// already registered and 500 if the password could not be hashed or the token signed.
pub async fn register_endpoint(
    State(state): State<CredentialsState>,
    payload: Result<Json<RegisterPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), Error> {
    let payload = parse_payload(payload)?;

    let name = UserName::new(&payload.name)?;
    let email = Email::new(&payload.email)?;
    let password = ValidatedPassword::new(&payload.password)?;
    let password_hash = PasswordHash::new(password, state.password_cost)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        create_user(
            NewUser {
                name,
                email,
                password_hash,
            },
            &connection,
        )?
    };

    tracing::info!("registered user {}", user.id);
    let token = encode_token(&user, &state.encoding_key, state.token_duration)?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

#[cfg(test)]
mod register_tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::{endpoints, test_utils::get_test_server};

    #[tokio::test]
    async fn register_succeeds() {
        let server = get_test_server();

        let response = server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "hunter22",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["name"], "Ana");
        assert_eq!(body["user"]["email"], "ana@example.com");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn register_fails_with_duplicate_email() {
        let server = get_test_server();
        let payload = json!({
            "name": "Ana",
            "email": "ana@example.com",
            "password": "hunter22",
        });
        server
            .post(endpoints::REGISTER)
            .json(&payload)
            .await
            .assert_status(StatusCode::CREATED);

        server
            .post(endpoints::REGISTER)
            .json(&payload)
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn register_fails_with_short_password() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "ana@example.com",
                "password": "12345",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn register_fails_with_invalid_email() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": "Ana",
                "email": "not an email",
                "password": "hunter22",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn register_fails_with_short_name() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({
                "name": " A ",
                "email": "ana@example.com",
                "password": "hunter22",
            }))
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn register_fails_with_missing_fields() {
        let server = get_test_server();

        server
            .post(endpoints::REGISTER)
            .json(&json!({ "email": "ana@example.com" }))
            .await
            .assert_status_bad_request();
    }
}
