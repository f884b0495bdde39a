//! Creates and verifies the JSON Web Tokens used for bearer authentication.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, User, UserID};

/// How long a newly issued token is valid for.
pub const DEFAULT_TOKEN_DURATION: Duration = Duration::days(7);

/// The contents of a JSON Web Token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// The ID of the user the token was issued to.
    pub sub: UserID,
    /// The email of the user the token was issued to.
    pub email: String,
    /// The time the token was issued, in seconds since the Unix epoch.
    pub iat: i64,
    /// The expiry time of the token, in seconds since the Unix epoch.
    pub exp: i64,
}

/// Create a signed token for `user` that expires after `duration`.
///
/// # Errors
///
/// This function will return an [Error::TokenCreationError] if the token could not be signed.
pub fn encode_token(
    user: &User,
    encoding_key: &EncodingKey,
    duration: Duration,
) -> Result<String, Error> {
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user.id,
        email: user.email.to_string(),
        iat: now.unix_timestamp(),
        exp: (now + duration).unix_timestamp(),
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("could not sign token for user {}: {error}", user.id);
        Error::TokenCreationError(error.to_string())
    })
}

/// Verify the signature and expiry of `token` and return its claims.
///
/// # Errors
///
/// This function will return an [Error::InvalidToken] if the token is malformed,
/// was not signed with `decoding_key`, or has expired.
pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, Error> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|error| {
            tracing::debug!("rejected bearer token: {error}");
            Error::InvalidToken
        })
}
