//! Database schema creation and first-run seed data.

use rusqlite::{
    Connection, Transaction as SqlTransaction, TransactionBehavior,
    functions::FunctionFlags,
    types::{Value, ValueRef},
};

use crate::{
    Error,
    category::{CategoryName, count_categories, create_category, create_category_table},
    supplier::{NewSupplier, create_supplier, create_supplier_table},
};

/// Prepare a newly opened connection for the directory queries.
///
/// Foreign key enforcement is switched off, since the bundled SQLite turns it
/// on and a supplier's category is only a soft reference. The `casefold` SQL
/// function is registered for case-insensitive search; it lower-cases text
/// with Unicode rules and passes any other value through unchanged.
///
/// Both settings belong to the connection, so this must run on every
/// connection before it is used.
pub fn configure_connection(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = OFF;")?;

    connection.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |context| {
            Ok(match context.get_raw(0) {
                ValueRef::Text(text) => Value::Text(String::from_utf8_lossy(text).to_lowercase()),
                other => Value::from(other),
            })
        },
    )?;

    Ok(())
}

/// Configure the connection, create the tables for the domain models and, if
/// there are no categories yet, insert the starter categories and suppliers.
///
/// Calling this on an already initialized database does not change it.
///
/// # Errors
/// Returns an error if the tables cannot be created or the seed data cannot
/// be inserted. Nothing is written in that case.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    configure_connection(connection)?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_supplier_table(&transaction)?;

    if count_categories(&transaction)? == 0 {
        tracing::info!("Empty database, inserting seed data.");
        seed(&transaction)?;
    }

    transaction.commit()?;

    Ok(())
}

struct SeedSupplier {
    name: &'static str,
    email: &'static str,
    registration_code: &'static str,
    items: &'static str,
    address: &'static str,
    phone: &'static str,
    /// Index into [SEED_CATEGORIES].
    category: usize,
}

const SEED_CATEGORIES: [&str; 4] = ["Eletrônicos", "Mobiliário", "Serviços de TI", "Logística"];

const SEED_SUPPLIERS: [SeedSupplier; 3] = [
    SeedSupplier {
        name: "TechFlow Solutions",
        email: "contato@techflow.com",
        registration_code: "TF-001",
        items: "Servidores, Laptops, Redes",
        address: "Av. Paulista, 1000, SP",
        phone: "(11) 99999-9999",
        category: 2,
    },
    SeedSupplier {
        name: "OfficeMax Pro",
        email: "vendas@officemax.com",
        registration_code: "OM-99",
        items: "Cadeiras, Mesas, Armários",
        address: "Rua das Flores, 123, RJ",
        phone: "(21) 88888-8888",
        category: 1,
    },
    SeedSupplier {
        name: "Global Logistics",
        email: "info@globallog.com",
        registration_code: "GL-42",
        items: "Transporte, Armazenagem",
        address: "Porto de Santos, S/N",
        phone: "(13) 77777-7777",
        category: 3,
    },
];

fn seed(connection: &Connection) -> Result<(), Error> {
    let category_ids = SEED_CATEGORIES
        .iter()
        .map(|name| create_category(&CategoryName::new_unchecked(name), connection))
        .collect::<Result<Vec<_>, _>>()?;

    for supplier in &SEED_SUPPLIERS {
        let new_supplier = NewSupplier {
            name: supplier.name.to_owned(),
            email: supplier.email.to_owned(),
            registration_code: Some(supplier.registration_code.to_owned()),
            items: Some(supplier.items.to_owned()),
            address: Some(supplier.address.to_owned()),
            phone: Some(supplier.phone.to_owned()),
            category_id: Some(category_ids[supplier.category]),
        };

        create_supplier(&new_supplier, connection)?;
    }

    Ok(())
}
