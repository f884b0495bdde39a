//! HTTP handlers for listing, creating, renaming and deactivating categories.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID,
    category::{
        Category, CategoryName, CategoryPayload, create_category, deactivate_category,
        get_categories, rename_category,
    },
    database_id::CategoryId,
    response::{ItemResponse, ItemsResponse, OkResponse, parse_payload},
};

/// The state needed for the category endpoints.
#[derive(Debug, Clone)]
pub struct CategoryState {
    /// The database connection for managing categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for listing categories.
///
/// `?all=1` includes deactivated categories.
#[derive(Debug, Default, Deserialize)]
pub struct ListCategoriesQuery {
    all: Option<String>,
}

/// List the authenticated user's categories, sorted by name.
pub async fn list_categories_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ItemsResponse<Category>>, Error> {
    let include_inactive = query.all.as_deref() == Some("1");

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    get_categories(user_id, include_inactive, &connection)
        .map(|items| Json(ItemsResponse { items }))
}

/// Create a category for the authenticated user.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<ItemResponse<Category>>), Error> {
    let payload = parse_payload(payload)?;
    let name = CategoryName::new(&payload.name)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    let item = create_category(user_id, name, &connection)?;

    Ok((StatusCode::CREATED, Json(ItemResponse { item })))
}

/// Rename one of the authenticated user's categories.
pub async fn rename_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Json<ItemResponse<Category>>, Error> {
    let payload = parse_payload(payload)?;
    let name = CategoryName::new(&payload.name)?;

    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    rename_category(category_id, user_id, name, &connection).map(|item| Json(ItemResponse { item }))
}

/// Deactivate one of the authenticated user's categories.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Extension(user_id): Extension<UserID>,
    Path(category_id): Path<CategoryId>,
) -> Result<Json<OkResponse>, Error> {
    let connection = state
        .db_connection
        .lock()
        .map_err(|_| Error::DatabaseLockError)?;

    deactivate_category(category_id, user_id, &connection)?;

    Ok(Json(OkResponse::new()))
}
