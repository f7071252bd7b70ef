//! This file defines the route for moving a session into the admin state.
//! The session module handles the lower level cookie logic.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error, Session,
    app_state::create_cookie_key,
    session::{DEFAULT_COOKIE_DURATION, invalidate_admin_cookie, set_admin_cookie},
};

/// The state needed to perform a log-in.
#[derive(Clone)]
pub struct LogInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the admin cookie is valid.
    pub cookie_duration: Duration,
    /// The shared admin secret.
    pub admin_password: Arc<str>,
}

impl LogInState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, admin_password: &str) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            admin_password: Arc::from(admin_password),
        }
    }
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            admin_password: state.admin_password.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The request body for logging in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogInData {
    #[serde(default)]
    pub password: String,
}

/// Reports whether the client's session is in the admin state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResponse {
    pub admin: bool,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            admin: session.is_admin(),
        }
    }
}

/// Handler for log-in requests via the POST method.
///
/// If the password exactly matches the admin password, the admin cookie is
/// set. Otherwise [Error::InvalidCredentials] is returned and the cookie jar
/// is left unchanged. A body that is not a JSON object with a string
/// `password` gives [Error::InvalidBody].
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    body: Result<Json<LogInData>, JsonRejection>,
) -> Response {
    let log_in_data = match body {
        Ok(Json(log_in_data)) => log_in_data,
        Err(rejection) => return Error::from(rejection).into_response(),
    };

    if log_in_data.password != *state.admin_password {
        tracing::warn!("Rejected log-in attempt with an incorrect admin password.");
        return Error::InvalidCredentials.into_response();
    }

    match set_admin_cookie(jar.clone(), state.cookie_duration) {
        Ok(updated_jar) => {
            tracing::info!("Session moved into the admin state.");
            (
                StatusCode::OK,
                updated_jar,
                Json(SessionResponse::from(Session::Admin)),
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Error setting admin cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                invalidate_admin_cookie(jar),
                Json(SessionResponse::from(Session::Reader)),
            )
                .into_response()
        }
    }
}

/// Report the admin flag for the client's session.
pub async fn get_session(session: Session) -> Json<SessionResponse> {
    Json(SessionResponse::from(session))
}

#[cfg(test)]
mod log_in_tests {
    use axum::{
        Json, Router,
        body::Body,
        extract::State,
        http::{Response, StatusCode, header::SET_COOKIE},
        routing::post,
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_test::TestServer;
    use time::{Duration, OffsetDateTime};

    use crate::session::{COOKIE_ADMIN, DEFAULT_COOKIE_DURATION};

    use super::{LogInData, LogInState, post_log_in};

    const PASSWORD: &str = "hunter2";

    fn get_state() -> LogInState {
        LogInState::new("42", PASSWORD)
    }

    async fn new_log_in_request(state: LogInState, password: &str) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(
            State(state),
            jar,
            Ok(Json(LogInData {
                password: password.to_owned(),
            })),
        )
        .await
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr$(,)?) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(2),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[tokio::test]
    async fn log_in_succeeds_with_admin_password() {
        let response = new_log_in_request(get_state(), PASSWORD).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_some());
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let response = new_log_in_request(get_state(), "hunter3").await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn log_in_requires_exact_match() {
        for password in ["", "Hunter2", " hunter2", "hunter2 "] {
            let response = new_log_in_request(get_state(), password).await;

            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "password {password:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn admin_cookie_expires_after_cookie_duration() {
        let app = Router::new()
            .route("/log_in", post(post_log_in))
            .with_state(get_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post("/log_in")
            .json(&serde_json::json!({"password": PASSWORD}))
            .await;

        response.assert_status_ok();
        response.assert_json(&serde_json::json!({"admin": true}));
        let admin_cookie = response.cookie(COOKIE_ADMIN);
        assert_date_time_close!(
            admin_cookie.expires_datetime().unwrap(),
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION
        );
    }

    #[tokio::test]
    async fn log_in_with_missing_password_is_rejected() {
        let app = Router::new()
            .route("/log_in", post(post_log_in))
            .with_state(get_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        server
            .post("/log_in")
            .json(&serde_json::json!({}))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn log_in_with_malformed_body_is_a_validation_error() {
        let app = Router::new()
            .route("/log_in", post(post_log_in))
            .with_state(get_state());
        let server = TestServer::try_new(app).expect("Could not create test server.");

        let response = server
            .post("/log_in")
            .json(&serde_json::json!({"password": 42}))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["kind"], "Validation");
        assert!(response.headers().get(SET_COOKIE).is_none());
    }
}
