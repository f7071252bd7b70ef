//! Supplier search and creation endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, Session,
    directory::{add_supplier, get_suppliers},
    routing::{CreatedResponse, write_request_body},
    supplier::{Supplier, SupplierFormData},
};

/// The state needed for the supplier endpoints.
#[derive(Debug, Clone)]
pub struct SupplierState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SupplierState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for the supplier listing, e.g. `?q=laptop&categoryId=3`.
///
/// The category ID is kept as a string so that a malformed value is reported
/// as a validation error with the offending text.
#[derive(Debug, Default, Deserialize)]
pub struct SupplierQuery {
    pub q: Option<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
}

/// List the suppliers matching the optional text query and category.
pub async fn get_suppliers_endpoint(
    State(state): State<SupplierState>,
    Query(query): Query<SupplierQuery>,
) -> Result<Json<Vec<Supplier>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_suppliers(
        query.q.as_deref(),
        query.category_id.as_deref(),
        &connection,
    )
    .map(Json)
}

/// Create a supplier. Only admin sessions may do this.
///
/// Responds with `201 Created` and the new supplier's ID.
pub async fn create_supplier_endpoint(
    State(state): State<SupplierState>,
    session: Session,
    body: Result<Json<SupplierFormData>, JsonRejection>,
) -> Result<Response, Error> {
    let form = write_request_body(session, body)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let id = add_supplier(session, form, &connection)?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })).into_response())
}
