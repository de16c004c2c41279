use axum::{Router, routing::{get, post, put}, middleware};
use crate::handler::appointment_handler::{
    create_appointment_handler,
    list_user_appointments_handler,
    update_appointment_status_handler,
    list_all_appointments_handler,
};
use std::sync::Arc;
use crate::service::appointment_service::AppointmentServiceImpl;
use crate::middlewares::admin_middleware::{admin_auth, AdminAuthState};

pub fn appointment_router(service: Arc<AppointmentServiceImpl>, admin_auth_state: Arc<AdminAuthState>) -> Router {
    // Public routes; `{id}` is the owning user's id here
    let public = Router::new()
        .route("/appointments", post(create_appointment_handler))
        .route("/appointments/{id}", get(list_user_appointments_handler));

    // Admin-protected routes; `{id}` is the appointment id here
    let admin = Router::new()
        .route("/appointments/{id}/status", put(update_appointment_status_handler))
        .route("/all-appointments", get(list_all_appointments_handler))
        .route_layer(middleware::from_fn_with_state(admin_auth_state, admin_auth));

    public
        .merge(admin)
        .with_state(service)
}
