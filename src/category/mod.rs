//! Categories that group suppliers.

mod db;
mod domain;
mod endpoints;

pub use db::{count_categories, create_category, create_category_table, get_all_categories};
pub use domain::{Category, CategoryFormData, CategoryId, CategoryName};
pub use endpoints::{create_category_endpoint, get_categories_endpoint};
