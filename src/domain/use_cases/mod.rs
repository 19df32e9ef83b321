pub mod auth;
pub mod extractors;
pub mod jobs;
pub mod skills;
