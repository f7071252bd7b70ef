//! Log-out route handler that moves the session back into the reader state.

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{Session, log_in::SessionResponse, session::invalidate_admin_cookie};

/// Invalidate the admin cookie.
pub async fn post_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_admin_cookie(jar);
    tracing::info!("Session moved into the reader state.");

    (jar, Json(SessionResponse::from(Session::Reader))).into_response()
}
