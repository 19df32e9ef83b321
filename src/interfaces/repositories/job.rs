use std::{collections::{BTreeSet, HashMap}, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::{
    domain::matching::{job_matches, CandidateSkills},
    entities::{job::{Job, JobInsert, JobRow}, skill::Skill},
    errors::AppError,
    repositories::{memory_repo::{MemoryStore, StoredJob, Tables}, sqlx_repo::SqlxJobRepo},
};

const REQUIRED_SKILLS_TABLE: &str = "job_required_skills";
const PREFERRED_SKILLS_TABLE: &str = "job_preferred_skills";

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError>;
    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError>;
    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError>;
    /// Replaces every caller-controlled field. `Ok(None)` when no job has this id.
    async fn update_job(&self, id: i64, job: &JobInsert) -> Result<Option<Job>, AppError>;
    /// Returns whether a job was removed.
    async fn delete_job(&self, id: i64) -> Result<bool, AppError>;
    async fn get_active_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, AppError>;
    async fn find_matching_jobs(&self, candidate: &CandidateSkills) -> Result<Vec<Job>, AppError>;
}

#[async_trait]
impl<T: JobRepository + ?Sized> JobRepository for Arc<T> {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        (**self).create_job(job).await
    }

    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError> {
        (**self).get_job_by_id(id).await
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        (**self).get_all_jobs().await
    }

    async fn update_job(&self, id: i64, job: &JobInsert) -> Result<Option<Job>, AppError> {
        (**self).update_job(id, job).await
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        (**self).delete_job(id).await
    }

    async fn get_active_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, AppError> {
        (**self).get_active_jobs_by_employer(employer_id).await
    }

    async fn find_matching_jobs(&self, candidate: &CandidateSkills) -> Result<Vec<Job>, AppError> {
        (**self).find_matching_jobs(candidate).await
    }
}

fn unknown_employer(employer_id: i64) -> AppError {
    AppError::BadRequest(format!("Employer {} does not exist", employer_id))
}

fn unknown_skills(missing: &[i64]) -> AppError {
    let ids = missing.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    AppError::BadRequest(format!("Unknown skill id(s): {}", ids))
}

fn missing_ids(wanted: &BTreeSet<i64>, found: &[i64]) -> Vec<i64> {
    wanted.iter().copied().filter(|id| !found.contains(id)).collect()
}

// ───── PostgreSQL ───────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct SkillLinkRow {
    job_id: i64,
    id: i64,
    name: String,
    category: Option<String>,
}

impl SqlxJobRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxJobRepo { pool }
    }
}

async fn ensure_references(conn: &mut PgConnection, job: &JobInsert) -> Result<(), AppError> {
    let employer_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
        .bind(job.employer_id)
        .fetch_one(&mut *conn)
        .await?;

    if !employer_exists {
        return Err(unknown_employer(job.employer_id));
    }

    let wanted = job.referenced_skill_ids();
    if wanted.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = wanted.iter().copied().collect();
    let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM skills WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    let missing = missing_ids(&wanted, &found);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(unknown_skills(&missing))
    }
}

async fn link_skills(
    conn: &mut PgConnection,
    table: &str,
    job_id: i64,
    skill_ids: &BTreeSet<i64>,
) -> Result<(), AppError> {
    if skill_ids.is_empty() {
        return Ok(());
    }

    let sql = format!("INSERT INTO {table} (job_id, skill_id) SELECT $1, UNNEST($2::BIGINT[])");
    sqlx::query(&sql)
        .bind(job_id)
        .bind(skill_ids.iter().copied().collect::<Vec<i64>>())
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn unlink_skills(conn: &mut PgConnection, job_id: i64) -> Result<(), AppError> {
    for table in [REQUIRED_SKILLS_TABLE, PREFERRED_SKILLS_TABLE] {
        let sql = format!("DELETE FROM {table} WHERE job_id = $1");
        sqlx::query(&sql)
            .bind(job_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn load_skill_links(
    conn: &mut PgConnection,
    table: &str,
    job_ids: &[i64],
) -> Result<HashMap<i64, Vec<Skill>>, AppError> {
    let sql = format!(
        r#"
        SELECT l.job_id, s.id, s.name, s.category
        FROM {table} l
        JOIN skills s ON s.id = l.skill_id
        WHERE l.job_id = ANY($1)
        ORDER BY l.job_id, s.id
        "#
    );

    let rows = sqlx::query_as::<_, SkillLinkRow>(&sql)
        .bind(job_ids.to_vec())
        .fetch_all(&mut *conn)
        .await?;

    let mut links: HashMap<i64, Vec<Skill>> = HashMap::new();
    for row in rows {
        links.entry(row.job_id).or_default().push(Skill {
            id: row.id,
            name: row.name,
            category: row.category,
        });
    }
    Ok(links)
}

async fn hydrate(conn: &mut PgConnection, rows: Vec<JobRow>) -> Result<Vec<Job>, AppError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
    let mut required = load_skill_links(conn, REQUIRED_SKILLS_TABLE, &ids).await?;
    let mut preferred = load_skill_links(conn, PREFERRED_SKILLS_TABLE, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            row.into_job(
                required.remove(&id).unwrap_or_default(),
                preferred.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

async fn hydrate_one(conn: &mut PgConnection, row: JobRow) -> Result<Job, AppError> {
    hydrate(conn, vec![row])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError("Job vanished while loading skills".into()))
}

#[async_trait]
impl JobRepository for SqlxJobRepo {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let mut tx = self.pool.begin().await?;

        ensure_references(&mut tx, job).await?;

        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs (
                title, description, location, employer_id,
                salary_min, salary_max, employment_type, experience_level,
                active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.employer_id)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.employment_type)
        .bind(&job.experience_level)
        .bind(job.active)
        .fetch_one(&mut *tx)
        .await?;

        link_skills(&mut tx, REQUIRED_SKILLS_TABLE, row.id, &job.required_skill_ids).await?;
        link_skills(&mut tx, PREFERRED_SKILLS_TABLE, row.id, &job.preferred_skill_ids).await?;

        let created = hydrate_one(&mut tx, row).await?;
        tx.commit().await?;

        Ok(created)
    }

    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match row {
            Some(row) => Ok(Some(hydrate_one(&mut conn, row).await?)),
            None => Ok(None),
        }
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;

        hydrate(&mut conn, rows).await
    }

    async fn update_job(&self, id: i64, job: &JobInsert) -> Result<Option<Job>, AppError> {
        let mut tx = self.pool.begin().await?;

        // GREATEST keeps updated_at monotonic even if the clock steps back.
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            UPDATE jobs SET
                title = $1,
                description = $2,
                location = $3,
                employer_id = $4,
                salary_min = $5,
                salary_max = $6,
                employment_type = $7,
                experience_level = $8,
                active = $9,
                updated_at = GREATEST(NOW(), updated_at)
            WHERE id = $10
            RETURNING *
            "#
        )
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.employer_id)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.employment_type)
        .bind(&job.experience_level)
        .bind(job.active)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23503") => {
                unknown_employer(job.employer_id)
            }
            _ => AppError::from(e),
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        ensure_references(&mut tx, job).await?;
        unlink_skills(&mut tx, id).await?;
        link_skills(&mut tx, REQUIRED_SKILLS_TABLE, id, &job.required_skill_ids).await?;
        link_skills(&mut tx, PREFERRED_SKILLS_TABLE, id, &job.preferred_skill_ids).await?;

        let updated = hydrate_one(&mut tx, row).await?;
        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        // Skill links go with the row (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_active_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, AppError> {
        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE employer_id = $1 AND active = TRUE ORDER BY id"
        )
        .bind(employer_id)
        .fetch_all(&mut *conn)
        .await?;

        hydrate(&mut conn, rows).await
    }

    async fn find_matching_jobs(&self, candidate: &CandidateSkills) -> Result<Vec<Job>, AppError> {
        if candidate.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.pool.acquire().await?;

        let rows = sqlx::query_as::<_, JobRow>(
            r#"
            SELECT j.* FROM jobs j
            WHERE j.active = TRUE
              AND EXISTS (
                SELECT 1 FROM job_required_skills r
                WHERE r.job_id = j.id AND r.skill_id = ANY($1)
              )
            ORDER BY j.id
            "#
        )
        .bind(candidate.to_sorted_vec())
        .fetch_all(&mut *conn)
        .await?;

        hydrate(&mut conn, rows).await
    }
}

// ───── In-memory ────────────────────────────────────────────────────

fn check_references(tables: &Tables, job: &JobInsert) -> Result<(), AppError> {
    if !tables.accounts.contains_key(&job.employer_id) {
        return Err(unknown_employer(job.employer_id));
    }

    let wanted = job.referenced_skill_ids();
    let found: Vec<i64> = wanted
        .iter()
        .copied()
        .filter(|id| tables.skills.contains_key(id))
        .collect();

    let missing = missing_ids(&wanted, &found);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(unknown_skills(&missing))
    }
}

#[async_trait]
impl JobRepository for MemoryStore {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let mut tables = self.tables.write();
        check_references(&tables, job)?;

        let now = Utc::now();
        let id = tables.next_job_id();
        let stored = StoredJob {
            id,
            fields: job.clone(),
            created_at: now,
            updated_at: now,
        };
        let created = tables.hydrate(&stored);
        tables.jobs.insert(id, stored);

        Ok(created)
    }

    async fn get_job_by_id(&self, id: i64) -> Result<Option<Job>, AppError> {
        let tables = self.tables.read();
        Ok(tables.jobs.get(&id).map(|stored| tables.hydrate(stored)))
    }

    async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.read();
        Ok(tables.jobs.values().map(|stored| tables.hydrate(stored)).collect())
    }

    async fn update_job(&self, id: i64, job: &JobInsert) -> Result<Option<Job>, AppError> {
        let mut tables = self.tables.write();

        let Some(previous_updated_at) = tables.jobs.get(&id).map(|stored| stored.updated_at) else {
            return Ok(None);
        };
        check_references(&tables, job)?;

        let updated_at = Utc::now().max(previous_updated_at);
        let updated = match tables.jobs.get_mut(&id) {
            Some(stored) => {
                stored.fields = job.clone();
                stored.updated_at = updated_at;
                stored.clone()
            }
            None => return Ok(None),
        };

        Ok(Some(tables.hydrate(&updated)))
    }

    async fn delete_job(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.write().jobs.remove(&id).is_some())
    }

    async fn get_active_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .jobs
            .values()
            .filter(|stored| stored.fields.active && stored.fields.employer_id == employer_id)
            .map(|stored| tables.hydrate(stored))
            .collect())
    }

    async fn find_matching_jobs(&self, candidate: &CandidateSkills) -> Result<Vec<Job>, AppError> {
        let tables = self.tables.read();
        Ok(tables
            .jobs
            .values()
            .filter(|stored| job_matches(stored.fields.active, &stored.fields.required_skill_ids, candidate))
            .map(|stored| tables.hydrate(stored))
            .collect())
    }
}
