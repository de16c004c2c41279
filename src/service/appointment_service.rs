use tracing::{info, error, warn, instrument};
use std::sync::Arc;
use async_trait::async_trait;

use crate::dto::appointment_dto::NewAppointment;
use crate::model::appointment::{Appointment, AppointmentStatus};
use crate::repository::appointment_repo::AppointmentRepository;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait AppointmentService: Send + Sync {
    async fn create_appointment(&self, new_appointment: NewAppointment) -> Result<Appointment, ServiceError>;
    async fn list_user_appointments(&self, user_id: &str) -> Result<Vec<Appointment>, ServiceError>;
    async fn update_status(&self, appointment_id: &str, status: AppointmentStatus) -> Result<Appointment, ServiceError>;
    async fn list_all_appointments(&self) -> Result<Vec<Appointment>, ServiceError>;
}

pub struct AppointmentServiceImpl {
    pub appointment_repo: Arc<dyn AppointmentRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl AppointmentServiceImpl {
    pub fn new(appointment_repo: Arc<dyn AppointmentRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { appointment_repo, user_repo }
    }
}

#[async_trait]
impl AppointmentService for AppointmentServiceImpl {
    #[instrument(skip(self, new_appointment), fields(user_id = %new_appointment.user_id, date = %new_appointment.date))]
    async fn create_appointment(&self, new_appointment: NewAppointment) -> Result<Appointment, ServiceError> {
        if self.user_repo.find_by_id(&new_appointment.user_id).await?.is_none() {
            warn!("Appointment requested for unknown user");
            return Err(ServiceError::NotFound("User not found".to_string()));
        }

        let appointment = Appointment {
            id: None,
            user_id: new_appointment.user_id,
            date: new_appointment.date,
            preferred_time: new_appointment.preferred_time,
            concern_type: new_appointment.concern_type,
            status: new_appointment.status,
            created_at: None,
            updated_at: None,
        };

        let res = self.appointment_repo.insert(appointment).await;
        match &res {
            Ok(a) => info!(appointment_id = %a.id_hex(), "Appointment booked"),
            Err(e) => error!("Failed to book appointment: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn list_user_appointments(&self, user_id: &str) -> Result<Vec<Appointment>, ServiceError> {
        let res = self.appointment_repo.find_by_user(user_id).await;
        if let Err(e) = &res {
            error!("Failed to list appointments: {e}");
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn update_status(&self, appointment_id: &str, status: AppointmentStatus) -> Result<Appointment, ServiceError> {
        let mut appointment = self.appointment_repo.find_by_id(appointment_id).await?
            .ok_or_else(|| ServiceError::NotFound("Appointment not found".to_string()))?;

        let current = appointment.status;
        if current.is_terminal() {
            warn!(%current, "Status change requested on a closed appointment");
            return Err(ServiceError::Conflict(format!(
                "Appointment is already {} and can no longer change",
                current
            )));
        }
        if !current.can_transition_to(status) {
            warn!(%current, "Rejected status transition");
            return Err(ServiceError::Conflict(format!(
                "Cannot change appointment status from {} to {}",
                current, status
            )));
        }

        // Applied only if the stored status is still the one checked above.
        if !self.appointment_repo.update_status(appointment_id, current, status).await? {
            warn!(%current, "Appointment status changed concurrently");
            return Err(ServiceError::Conflict(format!(
                "Appointment is no longer {}; it was updated by another request",
                current
            )));
        }

        info!(%current, "Appointment status updated");
        appointment.status = status;
        Ok(appointment)
    }

    #[instrument(skip(self))]
    async fn list_all_appointments(&self) -> Result<Vec<Appointment>, ServiceError> {
        let res = self.appointment_repo.list_all().await;
        match &res {
            Ok(appointments) => info!("Fetched {} appointments", appointments.len()),
            Err(e) => error!("Failed to list appointments: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}
