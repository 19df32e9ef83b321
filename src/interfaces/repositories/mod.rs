pub mod account;
pub mod job;
pub mod memory_repo;
pub mod skill;
pub mod sqlx_repo;
pub mod token;
