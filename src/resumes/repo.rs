use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::db::PgStore;
use crate::resumes::repo_types::{Resume, ResumeRow};
use crate::store::ResumeStore;

const RESUME_COLUMNS: &str =
    "id, user_id, title, template, content, layout, style, ats_data, created_at, updated_at";

#[async_trait]
impl ResumeStore for PgStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Resume>> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            "SELECT {RESUME_COLUMNS} FROM resumes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find resume by id")?;
        Ok(row.map(Resume::from))
    }

    async fn list_by_owner(
        &self,
        owner: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Resume>> {
        let rows = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            SELECT {RESUME_COLUMNS}
              FROM resumes
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list resumes by owner")?;
        Ok(rows.into_iter().map(Resume::from).collect())
    }

    async fn insert(&self, resume: &Resume) -> anyhow::Result<Resume> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            INSERT INTO resumes
                (id, user_id, title, template, content, layout, style, ats_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {RESUME_COLUMNS}
            "#
        ))
        .bind(resume.id)
        .bind(resume.owner)
        .bind(&resume.title)
        .bind(&resume.template)
        .bind(Json(&resume.content))
        .bind(Json(&resume.layout))
        .bind(Json(&resume.style))
        .bind(resume.ats_data.as_ref().map(Json))
        .bind(resume.created_at)
        .bind(resume.updated_at)
        .fetch_one(&self.db)
        .await
        .context("insert resume")?;
        Ok(row.into())
    }

    async fn update(&self, resume: &Resume) -> anyhow::Result<Resume> {
        let row = sqlx::query_as::<_, ResumeRow>(&format!(
            r#"
            UPDATE resumes
               SET title = $2, template = $3, content = $4, layout = $5, style = $6,
                   ats_data = $7, updated_at = $8
             WHERE id = $1
            RETURNING {RESUME_COLUMNS}
            "#
        ))
        .bind(resume.id)
        .bind(&resume.title)
        .bind(&resume.template)
        .bind(Json(&resume.content))
        .bind(Json(&resume.layout))
        .bind(Json(&resume.style))
        .bind(resume.ats_data.as_ref().map(Json))
        .bind(resume.updated_at)
        .fetch_one(&self.db)
        .await
        .context("update resume")?;
        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete resume")?;
        Ok(res.rows_affected() > 0)
    }
}
