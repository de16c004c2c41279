pub mod user_handler;
pub mod appointment_handler;
pub mod health_handler;
