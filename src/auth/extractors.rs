use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use super::repo_types::User;
use crate::error::AppError;

/// Identity resolved by [`super::middleware::authenticate`] for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(AppError::unauthenticated)
    }
}
