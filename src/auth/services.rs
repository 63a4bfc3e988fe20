use axum::{http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use lazy_static::lazy_static;
use regex::Regex;
use time::Duration;

use super::{
    dto::{AuthResponse, PublicUser},
    repo_types::User,
};
use crate::{config::clamp_days, error::AppError, state::AppState, store::DuplicateEmail};

pub const TOKEN_COOKIE: &str = "token";

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Trimmed name and normalized email, or the first validation fault.
pub(crate) fn validate_identity(name: &str, email: &str) -> Result<(String, String), AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Please add a name".into()));
    }
    let email = normalize_email(email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Please add a valid email".into()));
    }
    Ok((name.to_string(), email))
}

/// Store faults from a user write: an email collision becomes a 400 with
/// `message`, everything else stays internal.
pub(crate) fn duplicate_email_as(message: &'static str) -> impl FnOnce(anyhow::Error) -> AppError {
    move |e| {
        if e.is::<DuplicateEmail>() {
            AppError::Validation(message.into())
        } else {
            AppError::Internal(e)
        }
    }
}

pub(crate) fn token_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .secure(state.config.env.is_production())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(clamp_days(state.config.jwt.cookie_expire_days)))
        .build()
}

/// Overwrites the session cookie with a short-lived placeholder.
pub(crate) fn logout_cookie() -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, "none"))
        .http_only(true)
        .path("/")
        .max_age(Duration::seconds(10))
        .build()
}

/// Signs a token for `user`, sets it as the session cookie and returns it in
/// the body as well.
pub(crate) fn token_response(
    state: &AppState,
    user: &User,
    status: StatusCode,
    jar: CookieJar,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    let token = state
        .keys
        .sign(user.id)
        .map_err(|e| AppError::Internal(e.into()))?;
    let jar = jar.add(token_cookie(state, token.clone()));
    Ok((
        status,
        jar,
        Json(AuthResponse {
            success: true,
            token,
            user: PublicUser::from(user),
        }),
    ))
}
