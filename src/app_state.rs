//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use jsonwebtoken::{DecodingKey, EncodingKey};
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, PasswordHash, auth::DEFAULT_TOKEN_DURATION, db::initialize};

/// The keys used to sign and verify bearer tokens.
#[derive(Clone)]
pub struct TokenKeys {
    /// Signs new tokens.
    pub encoding_key: EncodingKey,
    /// Verifies tokens sent by clients.
    pub decoding_key: DecodingKey,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenKeys { .. }")
    }
}

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The keys for signing and verifying bearer tokens.
    pub token_keys: TokenKeys,

    /// The duration for which newly issued tokens are valid.
    pub token_duration: Duration,

    /// The bcrypt cost used when hashing passwords for new users.
    pub password_cost: u32,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `token_secret` is hashed to derive the key used for signing bearer tokens.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, token_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            token_keys: create_token_keys(token_secret),
            token_duration: DEFAULT_TOKEN_DURATION,
            password_cost: PasswordHash::DEFAULT_COST,
            db_connection: connection,
        })
    }
}

/// Create the signing and verification keys for tokens from a `secret` string.
pub fn create_token_keys(secret: &str) -> TokenKeys {
    let hash = Sha512::digest(secret);

    TokenKeys {
        encoding_key: EncodingKey::from_secret(&hash),
        decoding_key: DecodingKey::from_secret(&hash),
    }
}
