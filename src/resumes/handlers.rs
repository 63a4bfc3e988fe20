use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use super::{
    dto::{AnalyzeRequest, CreateResumeRequest, ResumePatch},
    repo_types::{AtsData, Resume},
    services,
};
use crate::{
    auth::{extractors::CurrentUser, ownership::Owned},
    error::{AppError, AppJson, AppQuery},
    response::{self, Envelope, Pagination},
    state::AppState,
};

type Reply<T> = Result<Json<Envelope<T>>, AppError>;

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_resumes(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppQuery(p): AppQuery<Pagination>,
) -> Reply<Vec<Resume>> {
    let (limit, offset) = p.clamped();
    let resumes = state.resumes.list_by_owner(user.id, limit, offset).await?;
    Ok(response::list(resumes))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_resume(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(body): AppJson<CreateResumeRequest>,
) -> Result<(StatusCode, Json<Envelope<Resume>>), AppError> {
    let resume = services::new_resume(user.id, body)?;
    let resume = state.resumes.insert(&resume).await?;
    info!(resume_id = %resume.id, "resume created");
    Ok((StatusCode::CREATED, response::data(resume)))
}

#[instrument(skip_all, fields(resume_id = %owned.resource.id))]
pub async fn get_resume(owned: Owned<Resume>) -> Reply<Resume> {
    Ok(response::data(owned.resource))
}

#[instrument(skip_all, fields(resume_id = %owned.resource.id, user_id = %owned.user.id))]
pub async fn update_resume(
    State(state): State<AppState>,
    owned: Owned<Resume>,
    AppJson(patch): AppJson<ResumePatch>,
) -> Reply<Resume> {
    let mut resume = owned.resource;
    services::apply_patch(&mut resume, patch)?;
    let resume = state.resumes.update(&resume).await?;
    info!("resume updated");
    Ok(response::data(resume))
}

#[instrument(skip_all, fields(resume_id = %owned.resource.id, user_id = %owned.user.id))]
pub async fn delete_resume(
    State(state): State<AppState>,
    owned: Owned<Resume>,
) -> Reply<serde_json::Value> {
    let id = owned.resource.id;
    if !state.resumes.delete(id).await? {
        return Err(AppError::NotFound(format!("Resume not found with id of {id}")));
    }
    info!("resume deleted");
    Ok(response::empty())
}

#[instrument(skip_all, fields(resume_id = %owned.resource.id, user_id = %owned.user.id))]
pub async fn analyze_ats(
    State(state): State<AppState>,
    owned: Owned<Resume>,
    body: Bytes,
) -> Reply<AtsData> {
    let body = AnalyzeRequest::from_body(&body)?;
    let analysis = services::mock_analysis(
        body.job_description.as_deref(),
        body.target_job_title.as_deref(),
    )?;

    let mut resume = owned.resource;
    resume.ats_data = Some(analysis.clone());
    resume.updated_at = time::OffsetDateTime::now_utc();
    state.resumes.update(&resume).await?;
    info!(score = ?analysis.last_score, "ats analysis stored");
    Ok(response::data(analysis))
}

#[instrument(skip_all, fields(resume_id = %owned.resource.id, user_id = %owned.user.id))]
pub async fn duplicate_resume(
    State(state): State<AppState>,
    owned: Owned<Resume>,
) -> Result<(StatusCode, Json<Envelope<Resume>>), AppError> {
    let copy = services::duplicate(&owned.resource);
    let copy = state.resumes.insert(&copy).await?;
    info!(copy_id = %copy.id, "resume duplicated");
    Ok((StatusCode::CREATED, response::data(copy)))
}
