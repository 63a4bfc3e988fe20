use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_TEMPLATE: &str = "professional";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub owner: Uuid,
    pub title: String,
    pub template: String,
    pub content: ResumeContent,
    pub layout: Layout,
    pub style: Style,
    pub ats_data: Option<AtsData>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template: String,
    pub content: Json<ResumeContent>,
    pub layout: Json<Layout>,
    pub style: Json<Style>,
    pub ats_data: Option<Json<AtsData>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<ResumeRow> for Resume {
    fn from(r: ResumeRow) -> Self {
        Self {
            id: r.id,
            owner: r.user_id,
            title: r.title,
            template: r.template,
            content: r.content.0,
            layout: r.layout.0,
            style: r.style.0,
            ats_data: r.ats_data.map(|j| j.0),
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

// ---- content sections ----

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeContent {
    pub personal: Personal,
    pub summary: Option<Summary>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Option<Skills>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<LanguageEntry>,
    pub custom_sections: Vec<CustomSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Personal {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Summary {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub company: Option<String>,
    pub position: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Skills {
    pub categories: Vec<SkillCategory>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillCategory {
    pub name: Option<String>,
    pub skills: Vec<Skill>,
}

pub const SKILL_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Skill {
    pub name: Option<String>,
    pub level: u8,
}

impl Default for Skill {
    fn default() -> Self {
        Self {
            name: None,
            level: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub current: bool,
    pub url: Option<String>,
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub date: Option<String>,
    pub expiry_date: Option<String>,
    #[serde(rename = "credentialID")]
    pub credential_id: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Proficiency {
    Native,
    Fluent,
    Advanced,
    #[default]
    Intermediate,
    Basic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LanguageEntry {
    pub language: Option<String>,
    pub proficiency: Proficiency,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CustomSection {
    pub title: Option<String>,
    pub content: Option<String>,
}

// ---- presentation ----

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Layout {
    pub section_order: Vec<String>,
    pub visible_sections: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub colors: Colors,
    pub font_size: FontSize,
    pub font_family: String,
    pub spacing: Spacing,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            colors: Colors::default(),
            font_size: FontSize::default(),
            font_family: "Inter".into(),
            spacing: Spacing::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Colors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            primary: "#3182CE".into(),
            secondary: "#4A5568".into(),
            accent: "#ED64A6".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Spacing {
    Compact,
    #[default]
    Normal,
    Spacious,
}

// ---- analysis snapshot ----

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AtsData {
    pub last_score: Option<u32>,
    pub target_job_title: Option<String>,
    pub job_description: Option<String>,
    pub keyword_matches: Vec<String>,
    pub missed_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_analysis: Option<OffsetDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_content_fills_schema_defaults() {
        let content: ResumeContent = serde_json::from_value(serde_json::json!({
            "skills": { "categories": [{ "name": "Rust", "skills": [{ "name": "axum" }] }] },
            "languages": [{ "language": "German" }],
            "certifications": [{ "name": "CKA", "credentialID": "X-1" }]
        }))
        .unwrap();
        let skills = content.skills.unwrap();
        assert_eq!(skills.categories[0].skills[0].level, 3);
        assert_eq!(content.languages[0].proficiency, Proficiency::Intermediate);
        assert_eq!(content.certifications[0].credential_id.as_deref(), Some("X-1"));
        assert!(content.experience.is_empty());
    }

    #[test]
    fn style_defaults_and_enum_validation() {
        let style: Style = serde_json::from_value(serde_json::json!({ "fontSize": "large" })).unwrap();
        assert_eq!(style.font_size, FontSize::Large);
        assert_eq!(style.colors.primary, "#3182CE");
        assert_eq!(style.font_family, "Inter");
        assert_eq!(style.spacing, Spacing::Normal);

        let bad = serde_json::from_value::<Style>(serde_json::json!({ "spacing": "roomy" }));
        assert!(bad.is_err());
    }

    #[test]
    fn owner_is_exposed_as_user() {
        let now = OffsetDateTime::now_utc();
        let owner = Uuid::new_v4();
        let resume = Resume {
            id: Uuid::new_v4(),
            owner,
            title: "CV".into(),
            template: DEFAULT_TEMPLATE.into(),
            content: ResumeContent::default(),
            layout: Layout::default(),
            style: Style::default(),
            ats_data: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&resume).unwrap();
        assert_eq!(json["user"], owner.to_string());
        assert!(json.get("owner").is_none());
        assert!(json["atsData"].is_null());
    }
}
