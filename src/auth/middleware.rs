use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use super::{
    extractors::CurrentUser,
    repo_types::{Role, User},
    services::TOKEN_COOKIE,
};
use crate::{error::AppError, state::AppState};

/// Bearer header first, then the `token` cookie. A header that names the
/// Bearer scheme wins even when it carries no usable token.
pub(crate) fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok()) {
        if value.starts_with("Bearer") {
            return value
                .split_whitespace()
                .nth(1)
                .map(str::to_string);
        }
    }
    CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Result<User, AppError> {
    let token = token_from_headers(headers).ok_or_else(|| {
        debug!("no token on request");
        AppError::unauthenticated()
    })?;

    let user_id = state.keys.verify(&token).map_err(|e| {
        warn!(error = %e, "token rejected");
        AppError::unauthenticated()
    })?;

    match state.users.find_by_id(user_id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(%user_id, "token subject no longer exists");
            Err(AppError::Unauthenticated("User not found".into()))
        }
    }
}

/// Resolves the caller and stores it as [`CurrentUser`]; nothing downstream
/// runs without one.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = resolve_identity(&state, req.headers()).await?;
    tracing::Span::current().record("user_id", tracing::field::display(user.id));
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

#[derive(Debug, Clone, Copy)]
pub struct AllowedRoles(pub &'static [Role]);

impl AllowedRoles {
    pub const ADMIN: AllowedRoles = AllowedRoles(&[Role::Admin]);
}

pub fn check_role(user: &User, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        )))
    }
}

/// Role gate. Must be layered inside [`authenticate`].
pub async fn authorize(
    State(AllowedRoles(allowed)): State<AllowedRoles>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let CurrentUser(user) = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthenticated)?;
    check_role(user, allowed)?;
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user(role: Role) -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            name: "n".into(),
            email: "n@x.com".into(),
            password_hash: String::new(),
            role,
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn bearer_header_takes_precedence_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert("cookie", HeaderValue::from_static("token=fromcookie"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn falls_back_to_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert("cookie", HeaderValue::from_static("theme=dark; token=xyz"));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(token_from_headers(&headers).as_deref(), Some("xyz"));
    }

    #[test]
    fn no_token_anywhere() {
        assert!(token_from_headers(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));
        headers.insert("cookie", HeaderValue::from_static("token=xyz"));
        assert!(token_from_headers(&headers).is_none());
    }

    #[test]
    fn role_gate() {
        assert!(check_role(&user(Role::Admin), AllowedRoles::ADMIN.0).is_ok());
        let err = check_role(&user(Role::User), AllowedRoles::ADMIN.0).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(ref m) if m.contains("User role user")));
        assert!(check_role(&user(Role::User), &[Role::User, Role::Admin]).is_ok());
    }

    #[tokio::test]
    async fn resolve_identity_rejects_unknown_subject() {
        let state = AppState::fake();
        let token = state.keys.sign(Uuid::new_v4()).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        let err = resolve_identity(&state, &headers).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(ref m) if m == "User not found"));
    }
}
