pub mod sqlite_repo;
