//! Admin session state carried in an encrypted cookie.
//!
//! A session starts as [Session::Reader] and becomes [Session::Admin] once the
//! client presents the admin password at log-in. The admin cookie stores its
//! own expiry so that an expired cookie is ignored even if the client keeps
//! sending it.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem,
    macros::format_description,
};

pub(crate) const COOKIE_ADMIN: &str = "admin";
/// The default duration for which the admin cookie is valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::hours(8);

/// Whether the client may modify the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    /// May only browse and search.
    Reader,
    /// May also add categories and suppliers.
    Admin,
}

impl Session {
    /// Returns `true` if the session is in the admin state.
    pub fn is_admin(self) -> bool {
        self == Session::Admin
    }
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = PrivateCookieJar::<Key>::from_request_parts(parts, state).await?;

        Ok(get_session_from_cookies(&jar))
    }
}

/// Add the admin cookie to the cookie jar, moving the session into the admin
/// state until `duration` from now.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns a [time::error::Format] if the expiry time cannot be formatted.
pub(crate) fn set_admin_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, time::error::Format> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // Use format instead of to_string to avoid errors at midnight when the hour is printed as
    // a single digit when [DATE_TIME_FORMAT] expects two digits.
    let expiry_string = expiry.format(DATE_TIME_FORMAT)?;

    Ok(jar.add(
        Cookie::build((COOKIE_ADMIN, expiry_string))
            .expires(expiry)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the admin cookie to an invalid value and set its max age to zero, which should delete the cookie on the client side.
pub(crate) fn invalidate_admin_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_ADMIN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session state from the admin cookie in `jar`.
///
/// A missing, tampered with, malformed or expired cookie gives [Session::Reader].
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Session {
    let Some(cookie) = jar.get(COOKIE_ADMIN) else {
        return Session::Reader;
    };

    match extract_date_time(&cookie) {
        Ok(expiry) if expiry > OffsetDateTime::now_utc() => Session::Admin,
        Ok(_) => {
            tracing::debug!("Admin cookie has expired.");
            Session::Reader
        }
        Err(error) => {
            tracing::debug!("Could not parse admin cookie expiry: {error}");
            Session::Reader
        }
    }
}

/// Date time format for the cookie expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

pub(crate) fn extract_date_time(cookie: &Cookie) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT)
}
