use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod graceful_shutdown;
pub mod shared_repos;

pub use domain::{entities, matching, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, db};

use auth::jwt::JwtService;
use repositories::{account::AccountRepository, job::JobRepository, skill::SkillRepository};
use settings::{AppConfig, StorageBackend};
use shared_repos::SharedRepositories;
use use_cases::{auth::AuthHandler, jobs::JobHandler, skills::SkillHandler};

pub type DynAccountRepo = Arc<dyn AccountRepository>;
pub type DynSkillRepo = Arc<dyn SkillRepository>;
pub type DynJobRepo = Arc<dyn JobRepository>;

pub type AppAuthHandler = AuthHandler<DynAccountRepo, JwtService>;
pub type AppSkillHandler = SkillHandler<DynSkillRepo>;
pub type AppJobHandler = JobHandler<DynJobRepo>;

pub struct AppState {
    pub auth_handler: AppAuthHandler,
    pub skill_handler: AppSkillHandler,
    pub job_handler: AppJobHandler,
    pub storage_backend: StorageBackend,
}

impl AppState {
    pub fn new(config: &AppConfig, repos: SharedRepositories) -> Self {
        let jwt_service = JwtService::new(config);

        AppState {
            auth_handler: AuthHandler::new(repos.account_repo, jwt_service),
            skill_handler: SkillHandler::new(repos.skill_repo),
            job_handler: JobHandler::new(repos.job_repo),
            storage_backend: repos.backend,
        }
    }
}
