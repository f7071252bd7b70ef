//! Composition of the filtered supplier listing query.
//!
//! User input only ever reaches SQLite as bound parameters. The SQL text is
//! assembled from fixed fragments chosen by which filter options are set.
//! Text matching relies on the `casefold` function that
//! [crate::db::configure_connection] registers on the connection.

use rusqlite::types::Value;

use crate::category::CategoryId;

/// The columns searched by a text query.
const SEARCHABLE_COLUMNS: [&str; 5] = ["s.name", "s.items", "s.email", "s.address", "s.phone"];

/// Restricts a supplier listing.
///
/// Both options are independent and, when both are set, a supplier must
/// satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierFilter {
    /// Case-insensitive substring that must appear in at least one of the
    /// name, items, email, address or phone fields.
    pub query: Option<String>,
    /// The category the supplier must belong to.
    pub category_id: Option<CategoryId>,
}

/// A WHERE clause and the named parameters it refers to.
#[derive(Debug, PartialEq)]
pub(crate) struct WhereClause {
    pub sql: String,
    pub params: Vec<(&'static str, Value)>,
}

impl SupplierFilter {
    /// A filter that matches every supplier.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build the WHERE clause for this filter.
    ///
    /// The clause is empty when no option is set.
    pub(crate) fn where_clause(&self) -> WhereClause {
        let mut predicates = Vec::new();
        let mut params = Vec::new();

        if let Some(query) = &self.query {
            let text_predicate = SEARCHABLE_COLUMNS
                .iter()
                .map(|column| format!("casefold({column}) LIKE :pattern ESCAPE '\\'"))
                .collect::<Vec<_>>()
                .join(" OR ");

            predicates.push(format!("({text_predicate})"));
            params.push((
                ":pattern",
                Value::Text(contains_pattern(&query.to_lowercase())),
            ));
        }

        if let Some(category_id) = self.category_id {
            predicates.push("s.category_id = :category_id".to_owned());
            params.push((":category_id", Value::Integer(category_id)));
        }

        let sql = if predicates.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", predicates.join(" AND "))
        };

        WhereClause { sql, params }
    }
}

/// Build a LIKE pattern that matches any string containing `query`.
///
/// LIKE wildcards and the escape character in `query` are escaped so they only
/// match themselves.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');

    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }

    pattern.push('%');
    pattern
}
