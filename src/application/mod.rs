pub mod categories;
pub mod error;
pub mod repos;
