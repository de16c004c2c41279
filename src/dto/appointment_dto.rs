use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::appointment::{Appointment, AppointmentStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAppointmentRequest {
    #[validate(length(max = 24))] // ObjectId hex string
    pub user_id: Option<String>,
    pub date: Option<String>,
    #[validate(length(max = 50))]
    pub preferred_time: Option<String>,
    #[validate(length(max = 100))]
    pub concern_type: Option<String>,
    /// Omitted means `Pending`.
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub user_id: String,
    pub date: String,
    pub preferred_time: String,
    pub concern_type: String,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppointmentView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub date: String,
    pub preferred_time: String,
    pub concern_type: String,
    pub status: AppointmentStatus,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Appointment> for AppointmentView {
    fn from(appointment: Appointment) -> Self {
        AppointmentView {
            id: appointment.id_hex(),
            user_id: appointment.user_id,
            date: appointment.date,
            preferred_time: appointment.preferred_time,
            concern_type: appointment.concern_type,
            status: appointment.status,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreateAppointmentResponse {
    pub message: String,
    pub appointment_id: String,
    pub appointment: AppointmentView,
}

#[derive(Debug, Serialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<AppointmentView>,
}

impl From<Vec<Appointment>> for AppointmentListResponse {
    fn from(appointments: Vec<Appointment>) -> Self {
        AppointmentListResponse {
            appointments: appointments.into_iter().map(AppointmentView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub appointment_id: String,
    pub status: AppointmentStatus,
}
