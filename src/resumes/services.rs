use rand::Rng;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    dto::{CreateResumeRequest, ResumePatch},
    repo_types::{AtsData, Resume, DEFAULT_TEMPLATE, SKILL_LEVELS},
};
use crate::error::AppError;

pub const COPY_MARKER: &str = " (Copy)";
pub const DEFAULT_TARGET_TITLE: &str = "Job Position";

const MATCHED_KEYWORDS: [&str; 3] = ["skill", "experience", "qualification"];
const MISSED_KEYWORDS: [&str; 2] = ["leadership", "teamwork"];
const SUGGESTIONS: [&str; 3] = [
    "Add more specific skills mentioned in the job description",
    "Quantify your achievements with numbers",
    "Include more industry-specific keywords",
];

pub fn validate(resume: &Resume) -> Result<(), AppError> {
    if resume.title.trim().is_empty() {
        return Err(AppError::Validation("Please add a title".into()));
    }
    if resume.template.trim().is_empty() {
        return Err(AppError::Validation("Template cannot be empty".into()));
    }
    if let Some(skills) = &resume.content.skills {
        let out_of_range = skills
            .categories
            .iter()
            .flat_map(|c| c.skills.iter())
            .any(|s| !SKILL_LEVELS.contains(&s.level));
        if out_of_range {
            return Err(AppError::Validation(format!(
                "Skill level must be between {} and {}",
                SKILL_LEVELS.start(),
                SKILL_LEVELS.end()
            )));
        }
    }
    Ok(())
}

/// Builds a new résumé owned by `owner`.
pub fn new_resume(owner: Uuid, req: CreateResumeRequest) -> Result<Resume, AppError> {
    let now = OffsetDateTime::now_utc();
    let resume = Resume {
        id: Uuid::new_v4(),
        owner,
        title: req.title.trim().to_string(),
        template: req.template.unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        content: req.content.unwrap_or_default(),
        layout: req.layout.unwrap_or_default(),
        style: req.style.unwrap_or_default(),
        ats_data: None,
        created_at: now,
        updated_at: now,
    };
    validate(&resume)?;
    Ok(resume)
}

pub fn apply_patch(resume: &mut Resume, patch: ResumePatch) -> Result<(), AppError> {
    if let Some(title) = patch.title {
        resume.title = title.trim().to_string();
    }
    if let Some(template) = patch.template {
        resume.template = template;
    }
    if let Some(content) = patch.content {
        resume.content = content;
    }
    if let Some(layout) = patch.layout {
        resume.layout = layout;
    }
    if let Some(style) = patch.style {
        resume.style = style;
    }
    validate(resume)?;
    resume.updated_at = OffsetDateTime::now_utc();
    Ok(())
}

/// Copy of `src` under a fresh id; the owner stays the source's owner.
pub fn duplicate(src: &Resume) -> Resume {
    let now = OffsetDateTime::now_utc();
    Resume {
        id: Uuid::new_v4(),
        title: format!("{}{}", src.title, COPY_MARKER),
        created_at: now,
        updated_at: now,
        ..src.clone()
    }
}

/// Placeholder ATS analysis: fixed keyword lists and a random score in
/// 70..=99. Nothing here reads the résumé.
pub fn mock_analysis(
    job_description: Option<&str>,
    target_job_title: Option<&str>,
) -> Result<AtsData, AppError> {
    let job_description = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .ok_or_else(|| {
            AppError::MissingInput("Please provide a job description for analysis".into())
        })?;

    let target = target_job_title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TARGET_TITLE);

    Ok(AtsData {
        last_score: Some(rand::thread_rng().gen_range(70..100)),
        target_job_title: Some(target.to_string()),
        job_description: Some(job_description.to_string()),
        keyword_matches: MATCHED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        missed_keywords: MISSED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
        last_analysis: Some(OffsetDateTime::now_utc()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resumes::repo_types::{ResumeContent, Skill, SkillCategory, Skills};

    fn sample(owner: Uuid) -> Resume {
        new_resume(
            owner,
            CreateResumeRequest {
                title: "  Backend Engineer ".into(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn new_resume_applies_defaults() {
        let owner = Uuid::new_v4();
        let r = sample(owner);
        assert_eq!(r.owner, owner);
        assert_eq!(r.title, "Backend Engineer");
        assert_eq!(r.template, DEFAULT_TEMPLATE);
        assert_eq!(r.style.font_family, "Inter");
        assert!(r.ats_data.is_none());
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = new_resume(Uuid::new_v4(), CreateResumeRequest::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn patch_replaces_only_present_fields() {
        let mut r = sample(Uuid::new_v4());
        r.content.personal.name = Some("Ada".into());
        let before = r.clone();

        apply_patch(
            &mut r,
            ResumePatch {
                title: Some("Staff Engineer".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(r.title, "Staff Engineer");
        assert_eq!(r.content, before.content);
        assert_eq!(r.style, before.style);
        assert_eq!(r.owner, before.owner);
        assert!(r.updated_at >= before.updated_at);
    }

    #[test]
    fn patch_validates_skill_levels() {
        let mut r = sample(Uuid::new_v4());
        let before = r.clone();
        let content = ResumeContent {
            skills: Some(Skills {
                categories: vec![SkillCategory {
                    name: Some("Lang".into()),
                    skills: vec![Skill { name: Some("Rust".into()), level: 9 }],
                }],
                keywords: vec![],
            }),
            ..Default::default()
        };
        let err = apply_patch(
            &mut r,
            ResumePatch {
                content: Some(content),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m.contains("between 1 and 5")));
        assert_eq!(r.updated_at, before.updated_at);
    }

    #[test]
    fn duplicate_keeps_content_and_owner() {
        let mut src = sample(Uuid::new_v4());
        src.content.personal.email = Some("a@x.com".into());
        src.ats_data = Some(mock_analysis(Some("rust"), None).unwrap());

        let copy = duplicate(&src);
        assert_ne!(copy.id, src.id);
        assert_eq!(copy.owner, src.owner);
        assert_eq!(copy.title, "Backend Engineer (Copy)");
        assert_eq!(copy.content, src.content);
        assert_eq!(copy.layout, src.layout);
        assert_eq!(copy.style, src.style);
        assert_eq!(copy.ats_data, src.ats_data);
    }

    #[test]
    fn analysis_requires_job_description() {
        for jd in [None, Some(""), Some("   ")] {
            assert!(matches!(mock_analysis(jd, None), Err(AppError::MissingInput(_))));
        }
    }

    #[test]
    fn analysis_has_fixed_shape() {
        for _ in 0..50 {
            let ats = mock_analysis(Some("Build APIs in Rust"), Some("Rustacean")).unwrap();
            let score = ats.last_score.unwrap();
            assert!((70..100).contains(&score));
            assert_eq!(ats.target_job_title.as_deref(), Some("Rustacean"));
            assert_eq!(ats.job_description.as_deref(), Some("Build APIs in Rust"));
            assert_eq!(ats.keyword_matches, MATCHED_KEYWORDS);
            assert_eq!(ats.missed_keywords, MISSED_KEYWORDS);
            assert_eq!(ats.suggestions.len(), 3);
            assert!(ats.last_analysis.is_some());
        }
        let ats = mock_analysis(Some("x"), None).unwrap();
        assert_eq!(ats.target_job_title.as_deref(), Some(DEFAULT_TARGET_TITLE));
    }
}
