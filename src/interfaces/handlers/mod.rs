pub mod auth;
pub mod jobs;
pub mod skills;
pub mod system;
