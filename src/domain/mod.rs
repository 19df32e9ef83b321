pub mod entities;
pub mod matching;
pub mod use_cases;
pub mod validation;
