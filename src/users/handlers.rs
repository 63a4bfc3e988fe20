use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{
    AdminUpdateUserRequest, CreateUserRequest, UpdatePasswordRequest, UpdateProfileRequest,
};
use crate::{
    auth::{
        dto::AuthResponse,
        extractors::CurrentUser,
        ownership::parse_id,
        password::{hash_password, verify_password},
        repo_types::{NewUser, User},
        services::{
            duplicate_email_as, is_valid_email, normalize_email, token_response,
            validate_identity,
        },
    },
    error::{AppError, AppJson, AppPath, AppQuery},
    response::{self, Envelope, Pagination},
    state::AppState,
};

/// Applies optional name/email/avatar changes, keeping email unique.
async fn apply_changes(
    state: &AppState,
    user: &mut User,
    name: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
) -> Result<(), AppError> {
    if let Some(name) = name {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Please add a name".into()));
        }
        user.name = name.to_string();
    }
    if let Some(email) = email {
        let email = normalize_email(&email);
        if !is_valid_email(&email) {
            return Err(AppError::Validation("Please add a valid email".into()));
        }
        if email != user.email {
            if let Some(other) = state.users.find_by_email(&email).await? {
                if other.id != user.id {
                    warn!(%email, "email already in use");
                    return Err(AppError::Validation("Email already in use".into()));
                }
            }
            user.email = email;
        }
    }
    if let Some(avatar) = avatar {
        user.avatar = Some(avatar).filter(|a| !a.trim().is_empty());
    }
    Ok(())
}

async fn load_user(state: &AppState, raw_id: &str) -> Result<User, AppError> {
    let id = parse_id(raw_id)?;
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User not found with id of {id}")))
}

// ---- self-service ----

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(mut user): CurrentUser,
    AppJson(body): AppJson<UpdateProfileRequest>,
) -> Result<Json<Envelope<User>>, AppError> {
    apply_changes(&state, &mut user, body.name, body.email, body.avatar).await?;
    let user = state
        .users
        .update(&user)
        .await
        .map_err(duplicate_email_as("Email already in use"))?;
    info!("profile updated");
    Ok(response::data(user))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    AppJson(body): AppJson<UpdatePasswordRequest>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), AppError> {
    if body.current_password.is_empty() || body.new_password.is_empty() {
        return Err(AppError::MissingInput(
            "Please provide current and new password".into(),
        ));
    }
    if !verify_password(&body.current_password, &user.password_hash)? {
        warn!("password change with wrong current password");
        return Err(AppError::Unauthenticated("Password is incorrect".into()));
    }

    let hash = hash_password(&body.new_password)?;
    state.users.set_password(user.id, &hash).await?;
    info!("password changed");
    token_response(&state, &user, StatusCode::OK, jar)
}

// ---- admin ----

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(p): AppQuery<Pagination>,
) -> Result<Json<Envelope<Vec<User>>>, AppError> {
    let (limit, offset) = p.clamped();
    let users = state.users.list(limit, offset).await?;
    Ok(response::list(users))
}

#[instrument(skip(state, body))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<Envelope<User>>), AppError> {
    let (name, email) = validate_identity(&body.name, &body.email)?;
    if body.password.is_empty() {
        return Err(AppError::Validation("Please add a password".into()));
    }
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(AppError::Validation("User already exists".into()));
    }

    let user = state
        .users
        .create(NewUser {
            name,
            email,
            password_hash: hash_password(&body.password)?,
            role: body.role.unwrap_or_default(),
        })
        .await
        .map_err(duplicate_email_as("User already exists"))?;
    info!(user_id = %user.id, role = %user.role, "user created by admin");
    Ok((StatusCode::CREATED, response::data(user)))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Envelope<User>>, AppError> {
    Ok(response::data(load_user(&state, &id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(body): AppJson<AdminUpdateUserRequest>,
) -> Result<Json<Envelope<User>>, AppError> {
    let mut user = load_user(&state, &id).await?;
    apply_changes(&state, &mut user, body.name, body.email, body.avatar).await?;
    if let Some(role) = body.role {
        user.role = role;
    }
    let user = state
        .users
        .update(&user)
        .await
        .map_err(duplicate_email_as("Email already in use"))?;
    info!(user_id = %user.id, role = %user.role, "user updated by admin");
    Ok(response::data(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Json<Envelope<serde_json::Value>>, AppError> {
    let id: Uuid = parse_id(&id)?;
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound(format!("User not found with id of {id}")));
    }
    info!(user_id = %id, "user deleted by admin");
    Ok(response::empty())
}
