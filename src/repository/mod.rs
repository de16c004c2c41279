pub mod repository_error;
pub mod mongo_store;
pub mod user_repo;
pub mod appointment_repo;
