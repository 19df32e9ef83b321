use validator::Validate;

use crate::{
    entities::skill::{NewSkill, Skill},
    errors::AppError,
    repositories::skill::SkillRepository,
};

pub struct SkillHandler<R>
where
    R: SkillRepository,
{
    pub skill_repo: R,
}

impl<R> SkillHandler<R>
where
    R: SkillRepository,
{
    pub fn new(skill_repo: R) -> Self {
        SkillHandler { skill_repo }
    }

    /// Adds a skill to the catalog. Names are not required to be unique.
    pub async fn create_skill(&self, request: NewSkill) -> Result<Skill, AppError> {
        request.validate()?;

        let skill = self.skill_repo.create_skill(&request.prepare_for_insert()).await?;
        tracing::info!(skill_id = skill.id, name = %skill.name, "Skill created");

        Ok(skill)
    }

    pub async fn get_skill_by_id(&self, id: i64) -> Result<Skill, AppError> {
        self.skill_repo.get_skill_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Skill {} not found", id)))
    }

    pub async fn get_all_skills(&self) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.get_all_skills().await
    }

    /// Case-insensitive exact lookup
    pub async fn find_by_name(&self, name: &str) -> Result<Skill, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("Skill name is required".into()));
        }

        self.skill_repo.find_skill_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Skill '{}' not found", name)))
    }
}
