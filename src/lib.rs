//! Supplier Directory is a small business directory web service.
//!
//! Anyone can browse the directory and search suppliers by free text and
//! category, while an operator holding the shared admin password can add
//! categories and suppliers.
//!
//! This library provides a JSON REST API backed by a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod category;
mod db;
mod directory;
mod endpoints;
mod log_in;
mod log_out;
mod logging;
mod not_found;
mod routing;
mod session;
mod supplier;

pub use app_state::AppState;
pub use category::{Category, CategoryId, CategoryName};
pub use db::initialize as initialize_db;
pub use directory::{add_category, add_supplier, get_categories, get_suppliers};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use session::Session;
pub use supplier::{Supplier, SupplierFilter, SupplierFormData, SupplierId};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string, or one containing only whitespace, was used as a
    /// category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The category name is already used by another category.
    ///
    /// The client should try again with a different name.
    #[error("the category \"{0}\" already exists")]
    DuplicateCategoryName(String),

    /// A required field was absent or blank.
    #[error("the field \"{0}\" is required")]
    MissingField(&'static str),

    /// A category ID could not be parsed as an integer.
    #[error("\"{0}\" is not a valid category ID")]
    InvalidCategoryId(String),

    /// The request body was not JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// A write was attempted by a session that is not in the admin state.
    ///
    /// The client should log in with the admin password and try again.
    #[error("admin access is required to make changes to the directory")]
    AuthRequired,

    /// The password presented at log-in did not match the admin password.
    #[error("incorrect admin password")]
    InvalidCredentials,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

/// The coarse classification of an [Error] that clients use to decide how to
/// present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// A required field is missing or a field is malformed.
    Validation,
    /// A category with the same name already exists.
    DuplicateName,
    /// The caller must log in as admin before retrying.
    AuthRequired,
    /// The admin password was wrong.
    InvalidCredentials,
    /// The route or resource does not exist.
    NotFound,
    /// The database failed. Details are only written to the server logs.
    Storage,
}

impl ErrorKind {
    fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::DuplicateName => StatusCode::CONFLICT,
            ErrorKind::AuthRequired | ErrorKind::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Error {
    /// Get the [ErrorKind] for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyCategoryName
            | Error::MissingField(_)
            | Error::InvalidCategoryId(_)
            | Error::InvalidBody(_) => ErrorKind::Validation,
            Error::DuplicateCategoryName(_) => ErrorKind::DuplicateName,
            Error::AuthRequired => ErrorKind::AuthRequired,
            Error::InvalidCredentials => ErrorKind::InvalidCredentials,
            Error::NotFound => ErrorKind::NotFound,
            Error::SqlError(_) | Error::DatabaseLockError => ErrorKind::Storage,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {rejection}");
        Error::InvalidBody(rejection.body_text())
    }
}

/// The JSON body sent to clients when a request fails.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    kind: ErrorKind,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();

        let error = match kind {
            // Storage errors are not intended to be shown to the client.
            ErrorKind::Storage => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (kind.status_code(), Json(ErrorResponse { error, kind })).into_response()
    }
}
