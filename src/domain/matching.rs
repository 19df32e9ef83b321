//! Candidate-to-job matching.
//!
//! A job matches a candidate when it is active and at least one of its
//! required skills is in the candidate's skill set. Preferred skills never
//! take part in the decision and no score is produced: a job either
//! qualifies or it doesn't.

use std::collections::{BTreeSet, HashSet};

/// The candidate's skills, deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSkills(HashSet<i64>);

impl CandidateSkills {
    pub fn new<I: IntoIterator<Item = i64>>(ids: I) -> Self {
        CandidateSkills(ids.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, skill_id: i64) -> bool {
        self.0.contains(&skill_id)
    }

    /// Sorted ids, for binding as a query parameter.
    pub fn to_sorted_vec(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.0.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

pub fn job_matches(active: bool, required_skill_ids: &BTreeSet<i64>, candidate: &CandidateSkills) -> bool {
    active && required_skill_ids.iter().any(|id| candidate.contains(*id))
}
