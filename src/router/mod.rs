pub mod user_router;
pub mod appointment_router;
pub mod health_router;
