//! Directory operations used by the HTTP handlers.
//!
//! These functions turn loosely typed client input into store calls. Reads are
//! open to every session. Writes check the session first and then validate the
//! input, so a rejected request never reaches the database.

use rusqlite::Connection;

use crate::{
    Error, Session,
    category::{Category, CategoryId, CategoryName, create_category, get_all_categories},
    supplier::{
        NewSupplier, RawCategoryId, Supplier, SupplierFilter, SupplierFormData, SupplierId,
        create_supplier, get_suppliers as select_suppliers,
    },
};

/// Get every category.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    get_all_categories(connection)
}

/// Get the suppliers matching an optional text `query` and an optional
/// `category_id`, both as received from the client.
///
/// Absent or blank values do not filter.
///
/// # Errors
///
/// Returns [Error::InvalidCategoryId] if `category_id` is not blank and not an
/// integer.
pub fn get_suppliers(
    query: Option<&str>,
    category_id: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Supplier>, Error> {
    let query = non_blank(query);
    let category_id = match non_blank(category_id) {
        Some(raw_id) => Some(parse_category_id(&raw_id)?),
        None => None,
    };

    select_suppliers(&SupplierFilter { query, category_id }, connection)
}

/// Add a category named `name` and return its ID.
///
/// # Errors
///
/// Returns:
/// - [Error::AuthRequired] if `session` is not an admin session,
/// - [Error::EmptyCategoryName] if `name` is blank,
/// - [Error::DuplicateCategoryName] if the name is taken,
/// - or [Error::SqlError] for any other database failure.
pub fn add_category(
    session: Session,
    name: &str,
    connection: &Connection,
) -> Result<CategoryId, Error> {
    require_admin(session)?;

    let name = CategoryName::new(name)?;
    let id = create_category(&name, connection)?;
    tracing::info!("Created category {id} \"{name}\"");

    Ok(id)
}

/// Add a supplier from the fields in `form` and return its ID.
///
/// `name`, `email`, `items` and `category_id` are required. The other fields
/// are stored as `NULL` when absent or blank.
///
/// # Errors
///
/// Returns:
/// - [Error::AuthRequired] if `session` is not an admin session,
/// - [Error::MissingField] if a required field is absent or blank,
/// - [Error::InvalidCategoryId] if `category_id` is not an integer,
/// - or [Error::SqlError] if the database rejects the supplier.
pub fn add_supplier(
    session: Session,
    form: SupplierFormData,
    connection: &Connection,
) -> Result<SupplierId, Error> {
    require_admin(session)?;

    let new_supplier = validate_supplier_form(form)?;
    let id = create_supplier(&new_supplier, connection)?;
    tracing::info!("Created supplier {id} \"{}\"", new_supplier.name);

    Ok(id)
}

fn require_admin(session: Session) -> Result<(), Error> {
    match session {
        Session::Admin => Ok(()),
        Session::Reader => Err(Error::AuthRequired),
    }
}

fn validate_supplier_form(form: SupplierFormData) -> Result<NewSupplier, Error> {
    let name = required(form.name, "name")?;
    let email = required(form.email, "email")?;
    let items = required(form.items, "items")?;
    let category_id = match form.category_id {
        Some(RawCategoryId::Number(id)) => id,
        Some(RawCategoryId::Text(raw_id)) => {
            let raw_id = non_blank(Some(&raw_id)).ok_or(Error::MissingField("category_id"))?;
            parse_category_id(&raw_id)?
        }
        None => return Err(Error::MissingField("category_id")),
    };

    Ok(NewSupplier {
        name,
        email,
        registration_code: non_blank(form.registration_code.as_deref()),
        items: Some(items),
        address: non_blank(form.address.as_deref()),
        phone: non_blank(form.phone.as_deref()),
        category_id: Some(category_id),
    })
}

fn required(value: Option<String>, field: &'static str) -> Result<String, Error> {
    non_blank(value.as_deref()).ok_or(Error::MissingField(field))
}

/// Trim `value`, mapping absent and blank values to `None`.
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn parse_category_id(raw_id: &str) -> Result<CategoryId, Error> {
    raw_id
        .parse()
        .map_err(|_| Error::InvalidCategoryId(raw_id.to_owned()))
}
