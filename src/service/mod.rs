pub mod user_service;
pub mod appointment_service;
