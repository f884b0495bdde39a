#![allow(missing_docs)]

use axum::http::StatusCode;
use axum_test::TestServer;
use rusqlite::Connection;
use serde_json::{Value, json};
use time::Date;

use crate::{
    AppState, Email, NewTransaction, NewUser, PasswordHash, Transaction, TransactionKind, UserID,
    UserName, build_router, create_transaction, create_user, endpoints, initialize_db,
};

pub(crate) const TEST_PASSWORD: &str = "hunter22";

/// An initialized in-memory database.
pub(crate) fn test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");
    initialize_db(&connection).expect("could not initialize database");
    connection
}

pub(crate) fn insert_test_user(connection: &Connection, email: &str) -> UserID {
    create_user(
        NewUser {
            name: UserName::new_unchecked("Test User"),
            email: Email::new_unchecked(email),
            password_hash: PasswordHash::new_unchecked("hunter2"),
        },
        connection,
    )
    .expect("could not create test user")
    .id
}

pub(crate) fn insert_test_transaction(
    connection: &Connection,
    user_id: UserID,
    kind: TransactionKind,
    amount: f64,
    occurred_on: Date,
) -> Transaction {
    create_transaction(
        user_id,
        NewTransaction::build(kind, amount, occurred_on, "General"),
        connection,
    )
    .expect("could not create test transaction")
}

pub(crate) fn get_test_server() -> TestServer {
    let connection = Connection::open_in_memory().expect("could not open in-memory database");
    let mut state = AppState::new(connection, "secret").expect("could not create app state");
    // The minimum bcrypt cost keeps the auth tests fast.
    state.password_cost = 4;

    TestServer::try_new(build_router(state)).expect("could not create test server")
}

/// Register a user through the API and return their bearer token.
pub(crate) async fn register_test_user(server: &TestServer, email: &str) -> String {
    let response = server
        .post(endpoints::REGISTER)
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    response.json::<Value>()["token"]
        .as_str()
        .expect("register response should contain a token")
        .to_owned()
}
