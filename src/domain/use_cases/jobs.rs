use validator::Validate;

use crate::{
    domain::matching::CandidateSkills,
    entities::job::{Job, JobInsert, JobRequest, MatchRequest},
    errors::AppError,
    repositories::job::JobRepository,
};

pub struct JobHandler<R>
where
    R: JobRepository,
{
    pub job_repo: R,
}

impl<R> JobHandler<R>
where
    R: JobRepository,
{
    pub fn new(job_repo: R) -> Self {
        JobHandler { job_repo }
    }

    fn prepare(request: &JobRequest) -> Result<JobInsert, AppError> {
        request.validate()?;
        request
            .prepare_for_insert()
            .ok_or_else(|| AppError::BadRequest("Employer is required".into()))
    }

    /// Creates a job posting; timestamps are assigned by the store
    pub async fn create_job(&self, request: JobRequest) -> Result<Job, AppError> {
        let insert = Self::prepare(&request)?;

        let job = self.job_repo.create_job(&insert).await?;
        tracing::info!(job_id = job.id, employer_id = job.employer_id, "Job created");

        Ok(job)
    }

    pub async fn get_job_by_id(&self, id: i64) -> Result<Job, AppError> {
        self.job_repo.get_job_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))
    }

    /// Every job, active or not
    pub async fn get_all_jobs(&self) -> Result<Vec<Job>, AppError> {
        self.job_repo.get_all_jobs().await
    }

    /// Replaces the whole record stored under `id`
    pub async fn update_job(&self, id: i64, request: JobRequest) -> Result<Job, AppError> {
        let insert = Self::prepare(&request)?;

        let job = self.job_repo.update_job(id, &insert)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job {} not found", id)))?;
        tracing::info!(job_id = job.id, "Job updated");

        Ok(job)
    }

    /// Deletes the job if it exists; a missing id is not an error
    pub async fn delete_job(&self, id: i64) -> Result<(), AppError> {
        if self.job_repo.delete_job(id).await? {
            tracing::info!(job_id = id, "Job deleted");
        } else {
            tracing::debug!(job_id = id, "Delete requested for missing job");
        }
        Ok(())
    }

    pub async fn get_active_jobs_by_employer(&self, employer_id: i64) -> Result<Vec<Job>, AppError> {
        self.job_repo.get_active_jobs_by_employer(employer_id).await
    }

    /// Active jobs sharing at least one required skill with the candidate
    pub async fn find_matching_jobs(&self, request: MatchRequest) -> Result<Vec<Job>, AppError> {
        let candidate = CandidateSkills::new(request.skill_ids.unwrap_or_default());
        if candidate.is_empty() {
            return Ok(Vec::new());
        }

        let jobs = self.job_repo.find_matching_jobs(&candidate).await?;
        tracing::debug!(matches = jobs.len(), "Matching jobs resolved");

        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use crate::entities::{account::{AccountInsert, Role}, job::SkillRef, skill::SkillInsert};
    use crate::repositories::{account::AccountRepository, memory_repo::MemoryStore, skill::SkillRepository};

    async fn handler_with_catalog() -> (JobHandler<MemoryStore>, i64) {
        let store = MemoryStore::new();
        let employer = store
            .create_account(&AccountInsert {
                email: "boss@x.com".into(),
                name: "Boss".into(),
                role: Role::Employer,
                password_hash: "hash".into(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        for name in ["Go", "SQL"] {
            store.create_skill(&SkillInsert { name: name.into(), category: None }).await.unwrap();
        }
        (JobHandler::new(store), employer.id)
    }

    fn request(employer_id: i64, required: &[i64]) -> JobRequest {
        JobRequest {
            title: "Backend engineer".into(),
            description: "Services in Go".into(),
            location: "Lagos".into(),
            employer_id: Some(employer_id),
            required_skills: required.iter().map(|&id| SkillRef { id }).collect(),
            active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn go_and_sql_scenario() {
        let (handler, employer) = handler_with_catalog().await;
        let job = handler.create_job(request(employer, &[1])).await.unwrap();

        let sql_only = handler.find_matching_jobs(MatchRequest::new(vec![2])).await.unwrap();
        assert!(sql_only.is_empty());

        let both = handler.find_matching_jobs(MatchRequest::new(vec![1, 2])).await.unwrap();
        assert_eq!(both, vec![job]);
    }

    #[tokio::test]
    async fn empty_candidate_matches_nothing() {
        let (handler, employer) = handler_with_catalog().await;
        handler.create_job(request(employer, &[1, 2])).await.unwrap();

        let result = handler.find_matching_jobs(MatchRequest::default()).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn missing_ids_surface_as_not_found() {
        let (handler, employer) = handler_with_catalog().await;

        assert!(matches!(handler.get_job_by_id(5).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            handler.update_job(5, request(employer, &[1])).await,
            Err(AppError::NotFound(_))
        ));
        assert!(handler.delete_job(5).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_storage() {
        let (handler, _) = handler_with_catalog().await;
        let result = handler.create_job(JobRequest::default()).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
        assert!(handler.get_all_jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deactivated_job_leaves_employer_listing_and_matches() {
        let (handler, employer) = handler_with_catalog().await;
        let job = handler.create_job(request(employer, &[1])).await.unwrap();

        let mut replacement = request(employer, &[1]);
        replacement.active = false;
        let updated = handler.update_job(job.id, replacement).await.unwrap();

        assert!(!updated.active);
        assert!(handler.get_active_jobs_by_employer(employer).await.unwrap().is_empty());
        assert!(handler.find_matching_jobs(MatchRequest::new(vec![1])).await.unwrap().is_empty());
        assert_eq!(handler.get_all_jobs().await.unwrap().len(), 1);
    }
}
