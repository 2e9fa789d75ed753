pub mod list;
pub mod repository;
