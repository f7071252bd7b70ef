//! Database operations for suppliers.

use rusqlite::{Connection, Row, ToSql};

use crate::{
    Error,
    category::CategoryName,
    supplier::{NewSupplier, Supplier, SupplierFilter, SupplierId},
};

/// Create a supplier and return its generated ID.
///
/// The fields are stored as given, the store does not check for blank values.
/// `category_id` is not checked against the categories table.
///
/// # Errors
///
/// Returns [Error::SqlError] if the insert fails.
pub fn create_supplier(supplier: &NewSupplier, connection: &Connection) -> Result<SupplierId, Error> {
    connection.execute(
        "INSERT INTO suppliers (name, email, registration_code, items, address, phone, category_id) \
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
        (
            &supplier.name,
            &supplier.email,
            &supplier.registration_code,
            &supplier.items,
            &supplier.address,
            &supplier.phone,
            supplier.category_id,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Retrieve the suppliers matching `filter`, each with the name of its category.
///
/// Suppliers are returned in the order they were created. An empty list is
/// returned when nothing matches.
pub fn get_suppliers(
    filter: &SupplierFilter,
    connection: &Connection,
) -> Result<Vec<Supplier>, Error> {
    let where_clause = filter.where_clause();
    let query = format!(
        "SELECT s.id, s.name, s.email, s.registration_code, s.items, s.address, s.phone, \
        s.category_id, c.name \
        FROM suppliers s LEFT JOIN categories c ON s.category_id = c.id \
        {} \
        ORDER BY s.id ASC;",
        where_clause.sql
    );
    let params: Vec<(&str, &dyn ToSql)> = where_clause
        .params
        .iter()
        .map(|(name, value)| (*name, value as &dyn ToSql))
        .collect();

    tracing::debug!("Listing suppliers with {filter:?}");

    connection
        .prepare(&query)?
        .query_map(params.as_slice(), map_row)?
        .map(|maybe_supplier| maybe_supplier.map_err(Error::from))
        .collect()
}

/// Initialize the supplier table.
pub fn create_supplier_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS suppliers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            registration_code TEXT,
            items TEXT,
            address TEXT,
            phone TEXT,
            category_id INTEGER,
            FOREIGN KEY(category_id) REFERENCES categories(id)
        );

        CREATE INDEX IF NOT EXISTS idx_suppliers_category_id ON suppliers(category_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Supplier, rusqlite::Error> {
    let category_name = row
        .get::<usize, Option<String>>(8)?
        .map(|some_category_name| CategoryName::new_unchecked(&some_category_name));

    Ok(Supplier {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        registration_code: row.get(3)?,
        items: row.get(4)?,
        address: row.get(5)?,
        phone: row.get(6)?,
        category_id: row.get(7)?,
        category_name,
    })
}

#[cfg(test)]
mod supplier_query_tests {
    use rusqlite::Connection;

    use crate::{
        category::{CategoryName, create_category, create_category_table},
        db::{configure_connection, initialize},
        supplier::{NewSupplier, Supplier, SupplierFilter, create_supplier, get_suppliers},
    };

    use super::create_supplier_table;

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        configure_connection(&connection).expect("Could not configure connection");
        create_category_table(&connection).expect("Could not create category table");
        create_supplier_table(&connection).expect("Could not create supplier table");
        connection
    }

    fn get_seeded_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        connection
    }

    fn names(suppliers: &[Supplier]) -> Vec<&str> {
        suppliers
            .iter()
            .map(|supplier| supplier.name.as_str())
            .collect()
    }

    fn query(text: &str) -> SupplierFilter {
        SupplierFilter {
            query: Some(text.to_owned()),
            category_id: None,
        }
    }

    fn new_supplier(name: &str) -> NewSupplier {
        NewSupplier {
            name: name.to_owned(),
            email: format!("{}@example.com", name.to_lowercase()),
            ..Default::default()
        }
    }

    #[test]
    fn create_supplier_succeeds() {
        let connection = get_test_db_connection();
        let category_id =
            create_category(&CategoryName::new_unchecked("Logística"), &connection).unwrap();
        let supplier = NewSupplier {
            name: "Global Logistics".to_owned(),
            email: "info@globallog.com".to_owned(),
            registration_code: Some("GL-42".to_owned()),
            items: Some("Transporte, Armazenagem".to_owned()),
            address: Some("Porto de Santos, S/N".to_owned()),
            phone: Some("(13) 77777-7777".to_owned()),
            category_id: Some(category_id),
        };

        let id = create_supplier(&supplier, &connection).expect("Could not create supplier");

        let got = get_suppliers(&SupplierFilter::all(), &connection).unwrap();
        assert_eq!(
            got,
            vec![Supplier {
                id,
                name: supplier.name,
                email: supplier.email,
                registration_code: supplier.registration_code,
                items: supplier.items,
                address: supplier.address,
                phone: supplier.phone,
                category_id: Some(category_id),
                category_name: Some(CategoryName::new_unchecked("Logística")),
            }]
        );
    }

    #[test]
    fn create_supplier_accepts_missing_optional_fields() {
        let connection = get_test_db_connection();

        let result = create_supplier(&new_supplier("Bare"), &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn unknown_category_id_is_stored_without_category_name() {
        let connection = get_test_db_connection();
        let supplier = NewSupplier {
            category_id: Some(999),
            ..new_supplier("Orphan")
        };

        create_supplier(&supplier, &connection).expect("Orphaned category should be accepted");

        let got = get_suppliers(&SupplierFilter::all(), &connection).unwrap();
        assert_eq!(got[0].category_id, Some(999));
        assert_eq!(got[0].category_name, None);
    }

    #[test]
    fn unfiltered_listing_contains_each_supplier_once() {
        let connection = get_test_db_connection();
        let ids: Vec<_> = ["Foo", "Bar", "Baz"]
            .into_iter()
            .map(|name| create_supplier(&new_supplier(name), &connection).unwrap())
            .collect();

        let got = get_suppliers(&SupplierFilter::all(), &connection).unwrap();

        let got_ids: Vec<_> = got.iter().map(|supplier| supplier.id).collect();
        assert_eq!(got_ids, ids);
    }

    #[test]
    fn query_matches_any_text_field() {
        let connection = get_test_db_connection();
        let suppliers = [
            NewSupplier {
                name: "Needle Name".to_owned(),
                ..new_supplier("a")
            },
            NewSupplier {
                items: Some("hay, needles".to_owned()),
                ..new_supplier("b")
            },
            NewSupplier {
                email: "needle@example.com".to_owned(),
                ..new_supplier("c")
            },
            NewSupplier {
                address: Some("1 Needle St".to_owned()),
                ..new_supplier("d")
            },
            NewSupplier {
                phone: Some("0800-NEEDLE".to_owned()),
                ..new_supplier("e")
            },
            NewSupplier {
                registration_code: Some("NEEDLE-1".to_owned()),
                ..new_supplier("f")
            },
            new_supplier("g"),
        ];
        for supplier in &suppliers {
            create_supplier(supplier, &connection).unwrap();
        }

        let got = get_suppliers(&query("needle"), &connection).unwrap();

        assert_eq!(names(&got), ["Needle Name", "b", "c", "d", "e"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        let connection = get_test_db_connection();
        create_supplier(&new_supplier("TechFlow Solutions"), &connection).unwrap();

        let got = get_suppliers(&query("TECHFLOW"), &connection).unwrap();

        assert_eq!(names(&got), ["TechFlow Solutions"]);
    }

    #[test]
    fn query_folds_non_ascii_case() {
        let connection = get_seeded_db_connection();

        let upper = get_suppliers(&query("ARMÁRIOS"), &connection).unwrap();
        let lower = get_suppliers(&query("armários"), &connection).unwrap();

        assert_eq!(names(&upper), ["OfficeMax Pro"]);
        assert_eq!(upper, lower);
    }

    #[test]
    fn query_never_matches_null_fields() {
        let connection = get_test_db_connection();
        create_supplier(&new_supplier("Bare"), &connection).unwrap();

        let got = get_suppliers(&query("null"), &connection).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn query_wildcards_match_literally() {
        let connection = get_test_db_connection();
        create_supplier(&new_supplier("100% Natural"), &connection).unwrap();
        create_supplier(&new_supplier("100 Natural"), &connection).unwrap();

        let got = get_suppliers(&query("0%"), &connection).unwrap();

        assert_eq!(names(&got), ["100% Natural"]);
    }

    #[test]
    fn query_with_sql_is_treated_as_text() {
        let connection = get_test_db_connection();
        create_supplier(&new_supplier("Foo"), &connection).unwrap();

        let got = get_suppliers(&query("' OR 1=1; --"), &connection).unwrap();

        assert!(got.is_empty());
        assert_eq!(
            get_suppliers(&SupplierFilter::all(), &connection)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn seeded_query_matches_items() {
        let connection = get_seeded_db_connection();

        let got = get_suppliers(&query("laptop"), &connection).unwrap();

        assert_eq!(names(&got), ["TechFlow Solutions"]);
    }

    #[test]
    fn seeded_category_filter() {
        let connection = get_seeded_db_connection();
        let filter = SupplierFilter {
            query: None,
            category_id: Some(2),
        };

        let got = get_suppliers(&filter, &connection).unwrap();

        assert_eq!(names(&got), ["OfficeMax Pro"]);
        assert_eq!(
            got[0].category_name,
            Some(CategoryName::new_unchecked("Mobiliário"))
        );
    }

    #[test]
    fn seeded_query_and_category_filter() {
        let connection = get_seeded_db_connection();
        let filter = SupplierFilter {
            query: Some("global".to_owned()),
            category_id: Some(4),
        };

        let got = get_suppliers(&filter, &connection).unwrap();

        assert_eq!(names(&got), ["Global Logistics"]);
    }

    #[test]
    fn seeded_query_and_category_filter_is_an_intersection() {
        let connection = get_seeded_db_connection();
        let filter = SupplierFilter {
            query: Some("global".to_owned()),
            category_id: Some(3),
        };

        let got = get_suppliers(&filter, &connection).unwrap();

        assert!(got.is_empty());
    }

    #[test]
    fn seeded_query_without_matches_returns_empty_list() {
        let connection = get_seeded_db_connection();

        let got = get_suppliers(&query("zzz"), &connection).unwrap();

        assert!(got.is_empty());
    }
}
