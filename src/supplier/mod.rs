//! Suppliers listed in the directory and the filtered listing query.

mod db;
mod domain;
mod endpoints;
mod filter;

pub use db::{create_supplier, create_supplier_table, get_suppliers};
pub use domain::{NewSupplier, RawCategoryId, Supplier, SupplierFormData, SupplierId};
pub use endpoints::{create_supplier_endpoint, get_suppliers_endpoint};
pub use filter::SupplierFilter;
