//! Per-user categories for labelling transactions.

mod db;
mod domain;
mod endpoints;

pub use db::{
    create_category, create_category_table, deactivate_category, get_categories, rename_category,
};
pub use domain::{Category, CategoryName, CategoryPayload};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
    rename_category_endpoint,
};
