pub mod dashboard;
pub mod search;
