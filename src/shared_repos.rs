use std::sync::Arc;

use crate::{
    repositories::{
        memory_repo::MemoryStore,
        sqlx_repo::{SqlxAccountRepo, SqlxJobRepo, SqlxSkillRepo},
    },
    settings::StorageBackend,
    DynAccountRepo, DynJobRepo, DynSkillRepo,
};

/// One repository per entity, all backed by the same store.
#[derive(Clone)]
pub struct SharedRepositories {
    pub account_repo: DynAccountRepo,
    pub skill_repo: DynSkillRepo,
    pub job_repo: DynJobRepo,
    pub backend: StorageBackend,
}

impl SharedRepositories {
    pub fn in_memory() -> Self {
        let store = MemoryStore::new();

        SharedRepositories {
            account_repo: Arc::new(store.clone()),
            skill_repo: Arc::new(store.clone()),
            job_repo: Arc::new(store),
            backend: StorageBackend::Memory,
        }
    }

    pub fn postgres(pool: sqlx::PgPool) -> Self {
        SharedRepositories {
            account_repo: Arc::new(SqlxAccountRepo::new(pool.clone())),
            skill_repo: Arc::new(SqlxSkillRepo::new(pool.clone())),
            job_repo: Arc::new(SqlxJobRepo::new(pool)),
            backend: StorageBackend::Postgres,
        }
    }
}
