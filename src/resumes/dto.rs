use serde::Deserialize;

use crate::error::AppError;

use super::repo_types::{Layout, ResumeContent, Style};

/// Body of `POST /resumes`. Any owner field the client sends is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateResumeRequest {
    pub title: String,
    pub template: Option<String>,
    pub content: Option<ResumeContent>,
    pub layout: Option<Layout>,
    pub style: Option<Style>,
}

/// Top-level merge: every present field replaces the stored one.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResumePatch {
    pub title: Option<String>,
    pub template: Option<String>,
    pub content: Option<ResumeContent>,
    pub layout: Option<Layout>,
    pub style: Option<Style>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: Option<String>,
    pub target_job_title: Option<String>,
}

impl AnalyzeRequest {
    /// An absent or blank body is an empty request, so the missing job
    /// description is reported rather than a content-type fault.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Failed to parse the request body as JSON: {e}")))
    }
}
