use async_trait::async_trait;
use bson::doc;
use mongodb::{
    options::{ClientOptions, Credential, IndexOptions, ResolverConfig},
    Client, Collection, Database, IndexModel,
};
use tracing::{error, info};

use crate::config::mongo_conf::MongoConfig;
use crate::model::{appointment::Appointment, user::User};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use crate::repository::user_repo::{ID_NUMBER_INDEX, USERNAME_INDEX};

/// Connectivity check for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> RepositoryResult<()>;
}

/// The single driver client for the process. Cloning shares the pooled connection.
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
    user_collection: String,
    appointment_collection: String,
}

impl MongoStore {
    pub async fn connect(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let mut client_options = ClientOptions::parse_with_resolver_config(&config.uri, ResolverConfig::cloudflare()).await?;
        client_options.app_name = Some("CounselingScheduler".to_string());
        client_options.max_pool_size = Some(config.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(config.connection_timeout_secs));
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }
        let client = Client::with_options(client_options)?;
        info!(database = %config.database, "MongoDB client created");
        Ok(MongoStore {
            database: client.database(&config.database),
            user_collection: config.user_collection.clone(),
            appointment_collection: config.appointment_collection.clone(),
        })
    }

    pub fn users(&self) -> Collection<User> {
        self.database.collection::<User>(&self.user_collection)
    }

    pub fn appointments(&self) -> Collection<Appointment> {
        self.database.collection::<Appointment>(&self.appointment_collection)
    }

    /// Creates the unique indexes that back username / id_number uniqueness,
    /// plus the lookup indexes for appointment listings.
    pub async fn ensure_indexes(&self) -> RepositoryResult<()> {
        let unique = |name: &str| IndexOptions::builder().unique(true).name(name.to_string()).build();
        let user_indexes = vec![
            IndexModel::builder().keys(doc! { "username": 1 }).options(unique(USERNAME_INDEX)).build(),
            IndexModel::builder().keys(doc! { "id_number": 1 }).options(unique(ID_NUMBER_INDEX)).build(),
        ];
        self.users().create_indexes(user_indexes, None).await.map_err(|e| {
            error!("Failed to create user indexes: {}", e);
            RepositoryError::from(e)
        })?;

        let appointment_indexes = vec![
            IndexModel::builder().keys(doc! { "user_id": 1, "date": -1 }).build(),
            IndexModel::builder().keys(doc! { "created_at": -1 }).build(),
        ];
        self.appointments().create_indexes(appointment_indexes, None).await.map_err(|e| {
            error!("Failed to create appointment indexes: {}", e);
            RepositoryError::from(e)
        })?;

        info!("MongoDB indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl StoreHealth for MongoStore {
    async fn ping(&self) -> RepositoryResult<()> {
        self.database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map(|_| ())
            .map_err(|e| {
                error!("MongoDB ping failed: {}", e);
                RepositoryError::connection(format!("Ping failed: {}", e))
            })
    }
}
