pub mod account;
pub mod job;
pub mod skill;
pub mod token;
