//! Database operations for categories.
//!
//! Every query is scoped to the category's owner. A category that belongs to
//! another user is treated the same as a category that does not exist.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    category::{Category, CategoryName},
    database_id::CategoryId,
};

/// Create a category for `user_id` and return it with its generated ID.
///
/// # Errors
///
/// Returns:
/// - [Error::DuplicateCategoryName] if the user already has a category called `name`,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn create_category(
    user_id: UserID,
    name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let created_at = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO category (user_id, name, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
            (user_id.as_i64(), name.as_ref(), created_at),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name,
        is_active: true,
        created_at,
    })
}

/// Retrieve a single category owned by `user_id`.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no such category for `user_id`.
pub fn get_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, name, is_active, created_at FROM category
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            rusqlite::named_params! {":id": category_id, ":user_id": user_id.as_i64()},
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the categories of `user_id` ordered alphabetically by name.
///
/// Deactivated categories are only included when `include_inactive` is true.
pub fn get_categories(
    user_id: UserID,
    include_inactive: bool,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, name, is_active, created_at FROM category
            WHERE user_id = :user_id AND (is_active = 1 OR :include_inactive)
            ORDER BY name ASC",
        )?
        .query_map(
            rusqlite::named_params! {
                ":user_id": user_id.as_i64(),
                ":include_inactive": include_inactive,
            },
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Rename a category owned by `user_id` and return the updated category.
///
/// # Errors
///
/// Returns:
/// - [Error::UpdateMissingCategory] if there is no such category for `user_id`,
/// - [Error::DuplicateCategoryName] if another of the user's categories is called `new_name`,
/// - or [Error::SqlError] if an SQL related error occurred.
pub fn rename_category(
    category_id: CategoryId,
    user_id: UserID,
    new_name: CategoryName,
    connection: &Connection,
) -> Result<Category, Error> {
    let rows_affected = connection
        .execute(
            "UPDATE category SET name = ?1 WHERE id = ?2 AND user_id = ?3",
            (new_name.as_ref(), category_id, user_id.as_i64()),
        )
        .map_err(|error| map_duplicate_name(error, &new_name))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingCategory);
    }

    get_category(category_id, user_id, connection)
}

/// Deactivate a category owned by `user_id`.
///
/// The row is kept so that it can still be listed with the inactive categories.
///
/// # Errors
///
/// Returns [Error::DeleteMissingCategory] if there is no such category for `user_id`.
pub fn deactivate_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET is_active = 0 WHERE id = ?1 AND user_id = ?2",
        (category_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_name ON category(user_id, name);",
    )?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateCategoryName(name.to_string()),
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let raw_name: String = row.get(1)?;

    Ok(Category {
        id: row.get(0)?,
        name: CategoryName::new_unchecked(&raw_name),
        is_active: row.get(2)?,
        created_at: row.get(3)?,
    })
}
