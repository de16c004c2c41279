use crate::model::{appointment::{Appointment, AppointmentStatus}, now_timestamp};
use crate::repository::mongo_store::MongoStore;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures::stream::TryStreamExt;
use mongodb::options::FindOptions;
use tracing::{error, info, warn};

#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn insert(&self, appointment: Appointment) -> RepositoryResult<Appointment>;
    /// A malformed identifier resolves to `None`.
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Appointment>>;
    /// Newest `date` first; empty when the user has none.
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Appointment>>;
    /// Compare-and-set: moves the appointment from `from` to `to`. `false` when
    /// the id does not resolve, the stored status is no longer `from`, or
    /// `from == to`.
    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> RepositoryResult<bool>;
    /// Newest `created_at` first.
    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>>;
}

pub struct MongoAppointmentRepository {
    collection: mongodb::Collection<Appointment>,
}

impl MongoAppointmentRepository {
    pub fn new(store: &MongoStore) -> Self {
        MongoAppointmentRepository { collection: store.appointments() }
    }

    async fn find_sorted(&self, filter: Option<Document>, sort: Document) -> RepositoryResult<Vec<Appointment>> {
        let options = FindOptions::builder().sort(sort).build();
        let cursor = self.collection.find(filter, options).await.map_err(|e| {
            error!("Failed to query appointments: {}", e);
            RepositoryError::from(e)
        })?;
        cursor.try_collect().await.map_err(|e| {
            error!("Failed to read appointment cursor: {}", e);
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl AppointmentRepository for MongoAppointmentRepository {

    #[tracing::instrument(skip(self, appointment), fields(user_id = %appointment.user_id))]
    async fn insert(&self, mut appointment: Appointment) -> RepositoryResult<Appointment> {
        let now = now_timestamp();
        appointment.id = Some(ObjectId::new());
        appointment.created_at = Some(now.clone());
        appointment.updated_at = Some(now);

        match self.collection.insert_one(appointment.clone(), None).await {
            Ok(_) => {
                info!(appointment_id = %appointment.id_hex(), "Appointment created");
                Ok(appointment)
            }
            Err(e) => {
                error!("Failed to create appointment: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Appointment>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            warn!("Malformed appointment id: {}", id);
            return Ok(None);
        };
        self.collection.find_one(doc! { "_id": oid }, None).await.map_err(|e| {
            error!("Failed to fetch appointment by id: {}", e);
            RepositoryError::from(e)
        })
    }

    #[tracing::instrument(skip(self))]
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Appointment>> {
        let appointments = self
            .find_sorted(Some(doc! { "user_id": user_id }), doc! { "date": -1, "created_at": -1 })
            .await?;
        info!("Fetched {} appointments for user", appointments.len());
        Ok(appointments)
    }

    #[tracing::instrument(skip(self), fields(from = %from, to = %to))]
    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> RepositoryResult<bool> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            warn!("Malformed appointment id: {}", id);
            return Ok(false);
        };
        let filter = doc! {
            "_id": oid,
            "status": { "$eq": from.as_str(), "$ne": to.as_str() },
        };
        let update = doc! {
            "$set": { "status": to.as_str(), "updated_at": now_timestamp() }
        };
        match self.collection.update_one(filter, update, None).await {
            Ok(result) => {
                let updated = result.modified_count > 0;
                info!(updated, "Appointment status update applied");
                Ok(updated)
            }
            Err(e) => {
                error!("Failed to update appointment status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>> {
        let appointments = self.find_sorted(None, doc! { "created_at": -1 }).await?;
        info!("Fetched {} appointments", appointments.len());
        Ok(appointments)
    }
}
