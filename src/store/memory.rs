use std::{collections::HashMap, sync::RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{DuplicateEmail, ResumeStore, UserStore};
use crate::{
    auth::repo_types::{NewUser, User},
    resumes::repo_types::Resume,
};

/// In-process store for tests.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    resumes: RwLock<HashMap<Uuid, Resume>>,
}

fn page<T>(mut items: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
    let offset = offset.max(0) as usize;
    if offset >= items.len() {
        return Vec::new();
    }
    items.drain(..offset);
    items.truncate(limit.max(0) as usize);
    items
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<User>> {
        let mut all: Vec<User> = self.users.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(all, limit, offset))
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(DuplicateEmail.into());
        }
        let now = OffsetDateTime::now_utc();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            avatar: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, user: &User) -> anyhow::Result<User> {
        let mut users = self.users.write().unwrap();
        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(DuplicateEmail.into());
        }
        let stored = users
            .get_mut(&user.id)
            .ok_or_else(|| anyhow::anyhow!("no user {}", user.id))?;
        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.role = user.role;
        stored.avatar = user.avatar.clone();
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        let mut users = self.users.write().unwrap();
        let stored = users
            .get_mut(&id)
            .ok_or_else(|| anyhow::anyhow!("no user {id}"))?;
        stored.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let removed = self.users.write().unwrap().remove(&id).is_some();
        if removed {
            self.resumes.write().unwrap().retain(|_, r| r.owner != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ResumeStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resume>> {
        Ok(self.resumes.read().unwrap().get(&id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Resume>> {
        let mut mine: Vec<Resume> = self
            .resumes
            .read()
            .unwrap()
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(page(mine, limit, offset))
    }

    async fn insert(&self, resume: &Resume) -> anyhow::Result<Resume> {
        let mut resumes = self.resumes.write().unwrap();
        anyhow::ensure!(!resumes.contains_key(&resume.id), "resume {} exists", resume.id);
        resumes.insert(resume.id, resume.clone());
        Ok(resume.clone())
    }

    async fn update(&self, resume: &Resume) -> anyhow::Result<Resume> {
        let mut resumes = self.resumes.write().unwrap();
        anyhow::ensure!(resumes.contains_key(&resume.id), "no resume {}", resume.id);
        resumes.insert(resume.id, resume.clone());
        Ok(resume.clone())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.resumes.write().unwrap().remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_skips_and_truncates() {
        assert_eq!(page(vec![1, 2, 3, 4], 2, 1), vec![2, 3]);
        assert!(page(vec![1, 2], 5, 7).is_empty());
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "n".into(),
            email: email.into(),
            password_hash: "h".into(),
            role: Default::default(),
        }
    }

    #[tokio::test]
    async fn email_collisions_surface_as_duplicate_email() {
        let store = MemoryStore::default();
        store.create(new_user("a@x.com")).await.unwrap();
        let mut b = store.create(new_user("b@x.com")).await.unwrap();

        let err = store.create(new_user("a@x.com")).await.unwrap_err();
        assert!(err.is::<DuplicateEmail>());

        b.email = "a@x.com".into();
        let err = UserStore::update(&store, &b).await.unwrap_err();
        assert!(err.is::<DuplicateEmail>());

        b.name = "kept".into();
        b.email = "b@x.com".into();
        assert_eq!(UserStore::update(&store, &b).await.unwrap().name, "kept");
    }
}
