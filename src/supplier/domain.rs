//! Core supplier domain types.

use serde::{Deserialize, Serialize};

use crate::category::{CategoryId, CategoryName};

/// Database identifier for a supplier.
pub type SupplierId = i64;

/// The fields needed to store a supplier.
///
/// The store persists these as given. Checking that required fields are
/// present is done by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSupplier {
    pub name: String,
    pub email: String,
    pub registration_code: Option<String>,
    /// Comma separated goods and services, e.g. "Servidores, Laptops, Redes".
    pub items: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// A stored supplier joined with the name of its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub email: String,
    pub registration_code: Option<String>,
    pub items: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub category_id: Option<CategoryId>,
    /// `None` when `category_id` is null or does not match a category.
    pub category_name: Option<CategoryName>,
}

/// A category ID as sent by a client, which may be a JSON number or a string
/// taken straight from a form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategoryId {
    Number(i64),
    Text(String),
}

/// Request body for supplier creation.
///
/// Every field is optional here so that missing fields are reported as
/// validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierFormData {
    pub name: Option<String>,
    pub email: Option<String>,
    pub registration_code: Option<String>,
    pub items: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub category_id: Option<RawCategoryId>,
}
