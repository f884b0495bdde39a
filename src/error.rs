//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A month token did not have the shape `YYYY-MM`.
    #[error("invalid month \"{0}\", expected the format YYYY-MM")]
    InvalidMonthFormat(String),

    /// A month token had the shape `YYYY-MM` but the month was not between 01 and 12.
    #[error("invalid month \"{0}\", the month must be between 01 and 12")]
    InvalidMonthRange(String),

    /// The start of a month range came after its end.
    #[error("invalid range, \"{from}\" is after \"{to}\"")]
    ReversedMonthRange {
        /// The first month of the requested range.
        from: String,
        /// The last month of the requested range.
        to: String,
    },

    /// The request body could not be parsed.
    ///
    /// The string is the rejection message from the JSON extractor.
    #[error("invalid request body: {0}")]
    InvalidPayload(String),

    /// The string is not a valid email address.
    #[error("invalid email address \"{0}\"")]
    InvalidEmail(String),

    /// A user name that was too short after trimming whitespace.
    #[error("names must be at least {0} characters long")]
    InvalidName(usize),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email and password combination did not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not include a bearer token.
    #[error("missing bearer token")]
    MissingToken,

    /// The bearer token could not be decoded, or it has expired.
    #[error("invalid or expired token")]
    InvalidToken,

    /// An unexpected error occurred while creating a token.
    ///
    /// The error string should only be logged on the server.
    #[error("could not create token: {0}")]
    TokenCreationError(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The email is already registered to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An empty string was used to create a category name.
    #[error("category name cannot be empty")]
    EmptyCategoryName,

    /// The user already has a category with this name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A transaction was submitted without a category.
    #[error("transaction category cannot be empty")]
    EmptyCategory,

    /// A transaction amount that is negative or not a finite number.
    ///
    /// Whether money was earned or spent is carried by the transaction kind,
    /// never by the sign of the amount.
    #[error("{0} is not a valid amount, amounts must be zero or greater")]
    InvalidAmount(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A blocking database task panicked or was cancelled.
    #[error("a background task failed: {0}")]
    TaskFailed(String),

    /// A response body could not be read back for logging.
    #[error("could not read response body: {0}")]
    ResponseBodyError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidMonthFormat(_)
            | Error::InvalidMonthRange(_)
            | Error::ReversedMonthRange { .. }
            | Error::InvalidPayload(_)
            | Error::InvalidEmail(_)
            | Error::InvalidName(_)
            | Error::TooWeak(_)
            | Error::EmptyCategoryName
            | Error::EmptyCategory
            | Error::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::MissingToken | Error::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            Error::NotFound
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction => StatusCode::NOT_FOUND,
            Error::DuplicateEmail | Error::DuplicateCategoryName(_) => StatusCode::CONFLICT,
            Error::TokenCreationError(_)
            | Error::HashingError(_)
            | Error::SqlError(_)
            | Error::DatabaseLockError
            | Error::TaskFailed(_)
            | Error::ResponseBodyError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            // Internal details are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "error": message }))).into_response()
    }
}
