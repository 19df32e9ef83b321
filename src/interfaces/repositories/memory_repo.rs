use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::entities::{account::Account, job::{Job, JobInsert}, skill::Skill};

/// Process-local storage for every entity. All tables sit behind one lock so
/// that each repository call is a single atomic unit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub(crate) tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
pub(crate) struct Tables {
    pub accounts: BTreeMap<i64, Account>,
    pub skills: BTreeMap<i64, Skill>,
    pub jobs: BTreeMap<i64, StoredJob>,
    next_account_id: i64,
    next_skill_id: i64,
    next_job_id: i64,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredJob {
    pub id: i64,
    pub fields: JobInsert,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tables {
    pub fn next_account_id(&mut self) -> i64 {
        self.next_account_id += 1;
        self.next_account_id
    }

    pub fn next_skill_id(&mut self) -> i64 {
        self.next_skill_id += 1;
        self.next_skill_id
    }

    pub fn next_job_id(&mut self) -> i64 {
        self.next_job_id += 1;
        self.next_job_id
    }

    /// Resolves skill ids against the catalog, ascending by id.
    fn resolve_skills<'a, I: IntoIterator<Item = &'a i64>>(&self, ids: I) -> Vec<Skill> {
        ids.into_iter()
            .filter_map(|id| self.skills.get(id).cloned())
            .collect()
    }

    pub fn hydrate(&self, stored: &StoredJob) -> Job {
        let fields = &stored.fields;
        Job {
            id: stored.id,
            title: fields.title.clone(),
            description: fields.description.clone(),
            location: fields.location.clone(),
            employer_id: fields.employer_id,
            required_skills: self.resolve_skills(&fields.required_skill_ids),
            preferred_skills: self.resolve_skills(&fields.preferred_skill_ids),
            salary_min: fields.salary_min,
            salary_max: fields.salary_max,
            employment_type: fields.employment_type.clone(),
            experience_level: fields.experience_level.clone(),
            active: fields.active,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }
}
