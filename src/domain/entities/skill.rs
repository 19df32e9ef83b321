use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::validation::validate_not_blank;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSkill {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 100, message = "Skill name is required (max 100 characters)"),
        custom(function = "validate_not_blank", message = "Skill name is required")
    )]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 100, message = "Category must be at most 100 characters"))]
    pub category: Option<String>,
}

/// What actually gets stored: the trimmed name and a blank category folded to `None`.
#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub name: String,
    pub category: Option<String>,
}

impl NewSkill {
    pub fn prepare_for_insert(&self) -> SkillInsert {
        SkillInsert {
            name: self.name.trim().to_string(),
            category: self.category
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillNameQuery {
    #[serde(default)]
    pub name: String,
}
