use axum::response::{IntoResponse, Response};

use crate::Error;

/// Fallback handler for routes that do not exist.
pub async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}
