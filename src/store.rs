//! Persistence seams. Handlers only ever talk to these traits; `db::PgStore`
//! backs them in production and `memory::MemoryStore` in tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    auth::repo_types::{NewUser, User},
    resumes::repo_types::Resume,
};

#[cfg(test)]
pub mod memory;

/// Raised by `UserStore::create`/`update` when the email is already held by
/// another account. Callers downcast for it with `anyhow::Error::is`.
#[derive(Debug, Error)]
#[error("email already registered")]
pub struct DuplicateEmail;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
    /// Persists name, email, role and avatar; bumps `updated_at`.
    async fn update(&self, user: &User) -> anyhow::Result<User>;
    async fn set_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resume>>;
    async fn list_by_owner(&self, owner: Uuid, limit: i64, offset: i64)
        -> anyhow::Result<Vec<Resume>>;
    async fn insert(&self, resume: &Resume) -> anyhow::Result<Resume>;
    /// Replaces every mutable column of the stored document.
    async fn update(&self, resume: &Resume) -> anyhow::Result<Resume>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}
