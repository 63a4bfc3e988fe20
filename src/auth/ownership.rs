use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::{extractors::CurrentUser, repo_types::User};
use crate::{error::AppError, state::AppState};

/// A stored document with exactly one owning user.
#[async_trait]
pub trait OwnedResource: Sized + Send {
    /// Label used in fault messages.
    const KIND: &'static str;

    fn owner_id(&self) -> Uuid;

    async fn load(state: &AppState, id: Uuid) -> anyhow::Result<Option<Self>>;
}

pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidIdentifier)
}

pub fn ensure_owner_or_admin(user: &User, owner: Uuid) -> Result<(), AppError> {
    if owner == user.id || user.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Not authorized to access this resource".into(),
        ))
    }
}

/// Ownership gate: the `:id` resource, loaded once, handed to the handler
/// only if the caller owns it or is an admin.
pub struct Owned<T> {
    pub resource: T,
    pub user: User,
}

#[async_trait]
impl<T> FromRequestParts<AppState> for Owned<T>
where
    T: OwnedResource,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::InvalidIdentifier)?;
        let id = parse_id(&raw)?;

        let resource = T::load(state, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} not found with id of {id}", T::KIND)))?;

        if let Err(e) = ensure_owner_or_admin(&user, resource.owner_id()) {
            warn!(kind = T::KIND, %id, user_id = %user.id, "ownership check failed");
            return Err(e);
        }
        Ok(Owned { resource, user })
    }
}
