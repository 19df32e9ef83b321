use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{domain::validation::validate_not_blank, entities::skill::Skill};

const MAX_TITLE_LENGTH: u64 = 200;
const MAX_LOCATION_LENGTH: u64 = 200;
const MAX_FREE_TEXT_LENGTH: u64 = 100;

// ───── Database Models ───────────────────────────────────────────────

/// A `jobs` row without its skill links.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employer_id: i64,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JobRow {
    pub fn into_job(self, required_skills: Vec<Skill>, preferred_skills: Vec<Skill>) -> Job {
        Job {
            id: self.id,
            title: self.title,
            description: self.description,
            location: self.location,
            employer_id: self.employer_id,
            required_skills,
            preferred_skills,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            employment_type: self.employment_type,
            experience_level: self.experience_level,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Everything a caller controls about a job. Used for both create and the
/// full-replace update; skill ids are already deduplicated.
#[derive(Debug, Clone, PartialEq)]
pub struct JobInsert {
    pub title: String,
    pub description: String,
    pub location: String,
    pub employer_id: i64,
    pub required_skill_ids: BTreeSet<i64>,
    pub preferred_skill_ids: BTreeSet<i64>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub active: bool,
}

impl JobInsert {
    /// Every skill id referenced by either set.
    pub fn referenced_skill_ids(&self) -> BTreeSet<i64> {
        self.required_skill_ids
            .union(&self.preferred_skill_ids)
            .copied()
            .collect()
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    pub employer_id: i64,
    pub required_skills: Vec<Skill>,
    pub preferred_skills: Vec<Skill>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl Job {
    pub fn required_skill_ids(&self) -> BTreeSet<i64> {
        self.required_skills.iter().map(|s| s.id).collect()
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

/// A reference to a catalog skill. Clients may send whole skill objects;
/// only the id is read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "Title is required"),
        custom(function = "validate_not_blank", message = "Title is required")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    #[validate(
        length(min = 1, max = MAX_LOCATION_LENGTH, message = "Location is required"),
        custom(function = "validate_not_blank", message = "Location is required")
    )]
    pub location: String,

    #[serde(default)]
    #[validate(required(message = "Employer is required"))]
    pub employer_id: Option<i64>,

    #[serde(default)]
    pub required_skills: Vec<SkillRef>,

    #[serde(default)]
    pub preferred_skills: Vec<SkillRef>,

    #[serde(default)]
    pub salary_min: Option<f64>,

    #[serde(default)]
    pub salary_max: Option<f64>,

    #[serde(default)]
    #[validate(length(max = MAX_FREE_TEXT_LENGTH, message = "Employment type is too long"))]
    pub employment_type: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_FREE_TEXT_LENGTH, message = "Experience level is too long"))]
    pub experience_level: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl JobRequest {
    /// Call only after `validate()` succeeded.
    pub fn prepare_for_insert(&self) -> Option<JobInsert> {
        Some(JobInsert {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            employer_id: self.employer_id?,
            required_skill_ids: self.required_skills.iter().map(|s| s.id).collect(),
            preferred_skill_ids: self.preferred_skills.iter().map(|s| s.id).collect(),
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            employment_type: self.employment_type.clone(),
            experience_level: self.experience_level.clone(),
            active: self.active,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    /// Missing and `null` both mean no skills.
    #[serde(default)]
    pub skill_ids: Option<Vec<i64>>,
}

impl MatchRequest {
    pub fn new(skill_ids: Vec<i64>) -> Self {
        MatchRequest { skill_ids: Some(skill_ids) }
    }
}
