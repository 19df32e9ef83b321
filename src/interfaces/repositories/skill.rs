use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    entities::skill::{Skill, SkillInsert},
    errors::AppError,
    repositories::{memory_repo::MemoryStore, sqlx_repo::SqlxSkillRepo},
};

#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError>;
    async fn get_all_skills(&self) -> Result<Vec<Skill>, AppError>;
    /// Case-insensitive exact match on the name; the lowest id wins.
    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError>;
}

#[async_trait]
impl<T: SkillRepository + ?Sized> SkillRepository for Arc<T> {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        (**self).create_skill(skill).await
    }

    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError> {
        (**self).get_skill_by_id(id).await
    }

    async fn get_all_skills(&self) -> Result<Vec<Skill>, AppError> {
        (**self).get_all_skills().await
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError> {
        (**self).find_skill_by_name(name).await
    }
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let created = sqlx::query_as::<_, Skill>(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING id, name, category"
        )
        .bind(&skill.name)
        .bind(&skill.category)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>("SELECT id, name, category FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_all_skills(&self) -> Result<Vec<Skill>, AppError> {
        sqlx::query_as::<_, Skill>("SELECT id, name, category FROM skills ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>(
            r#"
            SELECT id, name, category FROM skills
            WHERE LOWER(name) = LOWER($1)
            ORDER BY id
            LIMIT 1
            "#
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}

#[async_trait]
impl SkillRepository for MemoryStore {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let mut tables = self.tables.write();
        let id = tables.next_skill_id();
        let created = Skill {
            id,
            name: skill.name.clone(),
            category: skill.category.clone(),
        };
        tables.skills.insert(id, created.clone());
        Ok(created)
    }

    async fn get_skill_by_id(&self, id: i64) -> Result<Option<Skill>, AppError> {
        Ok(self.tables.read().skills.get(&id).cloned())
    }

    async fn get_all_skills(&self) -> Result<Vec<Skill>, AppError> {
        Ok(self.tables.read().skills.values().cloned().collect())
    }

    async fn find_skill_by_name(&self, name: &str) -> Result<Option<Skill>, AppError> {
        let wanted = name.to_lowercase();
        Ok(self.tables
            .read()
            .skills
            .values()
            .find(|skill| skill.name.to_lowercase() == wanted)
            .cloned())
    }
}
