use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;

use crate::dto::appointment_dto::{
    AppointmentListResponse, AppointmentView, CreateAppointmentRequest, CreateAppointmentResponse, NewAppointment,
    StatusUpdateResponse, UpdateAppointmentStatusRequest,
};
use crate::dto::{require_fields, require_iso_date, validate_payload};
use crate::model::appointment::AppointmentStatus;
use crate::service::appointment_service::{AppointmentService, AppointmentServiceImpl};
use crate::util::error::{HandlerError, HandlerErrorKind};
use crate::util::jwt::Claims;

fn parse_status(raw: &str) -> Result<AppointmentStatus, HandlerError> {
    raw.parse::<AppointmentStatus>().map_err(|e| {
        HandlerError::new(HandlerErrorKind::Validation, "Invalid status").with_details(e.to_string())
    })
}

// Handler: Book Appointment
pub async fn create_appointment_handler(
    State(service): State<Arc<AppointmentServiceImpl>>,
    payload: Result<Json<CreateAppointmentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    require_fields(&[
        ("user_id", &payload.user_id),
        ("date", &payload.date),
        ("preferred_time", &payload.preferred_time),
        ("concern_type", &payload.concern_type),
    ])?;
    validate_payload(&payload)?;

    let status = match payload.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => AppointmentStatus::default(),
    };
    let new_appointment = NewAppointment {
        user_id: payload.user_id.unwrap_or_default(),
        date: payload.date.unwrap_or_default(),
        preferred_time: payload.preferred_time.unwrap_or_default(),
        concern_type: payload.concern_type.unwrap_or_default(),
        status,
    };
    require_iso_date("date", &new_appointment.date)?;

    let created = service.create_appointment(new_appointment).await?;
    let appointment = AppointmentView::from(created);
    Ok((
        StatusCode::CREATED,
        Json(CreateAppointmentResponse {
            message: "Appointment booked successfully".to_string(),
            appointment_id: appointment.id.clone(),
            appointment,
        }),
    ))
}

// Handler: List a user's appointments
pub async fn list_user_appointments_handler(
    State(service): State<Arc<AppointmentServiceImpl>>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let appointments = service.list_user_appointments(&user_id).await?;
    Ok(Json(AppointmentListResponse::from(appointments)))
}

// Handler: Update Appointment Status (admin only)
pub async fn update_appointment_status_handler(
    State(service): State<Arc<AppointmentServiceImpl>>,
    Extension(principal): Extension<Claims>,
    Path(appointment_id): Path<String>,
    payload: Result<Json<UpdateAppointmentStatusRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HandlerError> {
    let Json(payload) = payload?;
    require_fields(&[("status", &payload.status)])?;
    let status = parse_status(payload.status.as_deref().unwrap_or_default())?;

    let updated = service.update_status(&appointment_id, status).await?;
    info!(
        appointment_id = %appointment_id,
        admin = %principal.username,
        status = %updated.status,
        "Appointment status changed"
    );
    Ok(Json(StatusUpdateResponse {
        message: format!("Appointment {} successfully", updated.status.as_str().to_lowercase()),
        appointment_id,
        status: updated.status,
    }))
}

// Handler: List All Appointments (admin only)
pub async fn list_all_appointments_handler(
    State(service): State<Arc<AppointmentServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let appointments = service.list_all_appointments().await?;
    Ok(Json(AppointmentListResponse::from(appointments)))
}
