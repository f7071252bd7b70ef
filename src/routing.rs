//! Application router configuration.

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, Session,
    category::{create_category_endpoint, get_categories_endpoint},
    endpoints,
    log_in::{get_session, post_log_in},
    log_out::post_log_out,
    not_found::get_404_not_found,
    supplier::{create_supplier_endpoint, get_suppliers_endpoint},
};

/// The body returned when a record is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct CreatedResponse {
    pub id: i64,
}

/// Unwrap the JSON body of a request that modifies the directory.
///
/// A reader session gets [Error::AuthRequired] even when its body is also
/// malformed. Otherwise a body that could not be parsed becomes a validation
/// error.
pub(crate) fn write_request_body<T>(
    session: Session,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, Error> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(_) if !session.is_admin() => Err(Error::AuthRequired),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Return a router with all the app's routes.
///
/// Reads are open to everyone. The POST handlers for categories and suppliers
/// check the session themselves so that a reader gets an `AuthRequired` error
/// instead of a redirect.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(
            endpoints::CATEGORIES,
            get(get_categories_endpoint).post(create_category_endpoint),
        )
        .route(
            endpoints::SUPPLIERS,
            get(get_suppliers_endpoint).post(create_supplier_endpoint),
        )
        .route(endpoints::LOG_IN, post(post_log_in))
        .route(endpoints::LOG_OUT, post(post_log_out))
        .route(endpoints::SESSION, get(get_session))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, "I'm a teapot").into_response()
}
