//! The endpoint for exchanging an email and password for a bearer token.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    Email, Error,
    auth::{
        register::{AuthResponse, CredentialsState},
        token::encode_token,
    },
    response::parse_payload,
    user::get_user_by_email,
};

/// The JSON body for logging in.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInPayload {
    /// Email entered during log-in.
    pub email: String,
    /// Password entered during log-in.
    pub password: String,
}

/// Handler for log-in requests.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email is not a valid email address.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password or signing the token.
pub async fn log_in_endpoint(
    State(state): State<CredentialsState>,
    payload: Result<Json<LogInPayload>, JsonRejection>,
) -> Result<Json<AuthResponse>, Error> {
    let payload = parse_payload(payload)?;
    let email = Email::new(&payload.email)?;

    let user = {
        let connection = state
            .db_connection
            .lock()
            .map_err(|_| Error::DatabaseLockError)?;

        match get_user_by_email(&email, &connection) {
            Ok(user) => user,
            Err(Error::NotFound) => return Err(Error::InvalidCredentials),
            Err(error) => return Err(error),
        }
    };

    let password_is_correct = user
        .password_hash
        .verify(&payload.password)
        .map_err(|error| {
            tracing::error!("Error verifying password: {error}");
            Error::HashingError(error.to_string())
        })?;

    if !password_is_correct {
        return Err(Error::InvalidCredentials);
    }

    let token = encode_token(&user, &state.encoding_key, state.token_duration)?;

    Ok(Json(AuthResponse { token, user }))
}

#[cfg(test)]
mod log_in_tests {
    use serde_json::{Value, json};

    use crate::{
        endpoints,
        test_utils::{get_test_server, register_test_user},
    };

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz").await;

        let response = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "hunter22",
            }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert!(body["token"].is_string());
        assert_eq!(body["user"]["email"], "foo@bar.baz");
    }

    #[tokio::test]
    async fn log_in_token_grants_access() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz").await;

        let token = server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "hunter22",
            }))
            .await
            .json::<Value>()["token"]
            .as_str()
            .unwrap()
            .to_owned();

        server
            .get(endpoints::ME)
            .authorization_bearer(token)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn log_in_fails_with_wrong_password() {
        let server = get_test_server();
        register_test_user(&server, "foo@bar.baz").await;

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "foo@bar.baz",
                "password": "definitelyNotTheCorrectPassword",
            }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn log_in_fails_with_unknown_email() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN)
            .json(&json!({
                "email": "wrongemail@gmail.com",
                "password": "hunter22",
            }))
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn log_in_fails_with_missing_credentials() {
        let server = get_test_server();

        server
            .post(endpoints::LOG_IN)
            .content_type("application/json")
            .await
            .assert_status_bad_request();
    }
}
