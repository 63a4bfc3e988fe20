use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        extractors::CurrentUser,
        password::{hash_password, verify_password},
        repo_types::{NewUser, Role, User},
        services::{
            duplicate_email_as, logout_cookie, normalize_email, token_response,
            validate_identity,
        },
    },
    error::{AppError, AppJson},
    response::{self, Envelope},
    state::AppState,
};

type TokenReply = (StatusCode, CookieJar, Json<AuthResponse>);

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<TokenReply, AppError> {
    let (name, email) = validate_identity(&payload.name, &payload.email)?;
    if payload.password.is_empty() {
        return Err(AppError::Validation("Please add a password".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(AppError::Validation("User already exists".into()));
    }

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash,
            role: Role::User,
        })
        .await
        .map_err(duplicate_email_as("User already exists"))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    token_response(&state, &user, StatusCode::CREATED, jar)
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<TokenReply, AppError> {
    let email = normalize_email(&payload.email);
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::MissingInput(
            "Please provide an email and password".into(),
        ));
    }

    let invalid = || AppError::Unauthenticated("Invalid credentials".into());

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(invalid());
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    token_response(&state, &user, StatusCode::OK, jar)
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn logout(
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> (CookieJar, Json<Envelope<serde_json::Value>>) {
    info!("user logged out");
    (jar.add(logout_cookie()), response::empty())
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<Envelope<User>> {
    response::data(user)
}
