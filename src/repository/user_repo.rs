use crate::model::{now_timestamp, user::User};
use crate::repository::mongo_store::MongoStore;
use crate::repository::repository_error::{duplicate_key_index, RepositoryError, RepositoryResult};
use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use tracing::{error, info};

pub const DUPLICATE_USERNAME: &str = "Username already exists";
pub const DUPLICATE_ID_NUMBER: &str = "ID number already registered";

/// Unique index names created by `MongoStore::ensure_indexes`.
pub const USERNAME_INDEX: &str = "username_1";
pub const ID_NUMBER_INDEX: &str = "id_number_1";

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the username or id_number is taken.
    async fn insert(&self, user: User) -> RepositoryResult<User>;
    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>>;
    async fn find_by_id_number(&self, id_number: &str) -> RepositoryResult<Option<User>>;
    /// A malformed identifier resolves to `None`.
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>>;
}

pub struct UserRepositoryImpl {
    collection: mongodb::Collection<User>,
}

impl UserRepositoryImpl {
    pub fn new(store: &MongoStore) -> Self {
        UserRepositoryImpl { collection: store.users() }
    }

    async fn find_one(&self, filter: bson::Document, what: &str) -> RepositoryResult<Option<User>> {
        self.collection.find_one(filter, None).await.map_err(|e| {
            error!("Failed to find user by {}: {}", what, e);
            RepositoryError::from(e)
        })
    }
}

#[async_trait]
impl UserRepository for UserRepositoryImpl {
    #[tracing::instrument(skip(self, user), fields(username = %user.username))]
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        user.id = Some(ObjectId::new());
        user.created_at = Some(now_timestamp());
        match self.collection.insert_one(user.clone(), None).await {
            Ok(_) => {
                info!("User inserted");
                Ok(user)
            }
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists(msg) if duplicate_key_index(&msg) == Some(ID_NUMBER_INDEX) => {
                    Err(RepositoryError::already_exists(DUPLICATE_ID_NUMBER))
                }
                RepositoryError::AlreadyExists(_) => Err(RepositoryError::already_exists(DUPLICATE_USERNAME)),
                other => {
                    error!("Failed to insert user: {}", other);
                    Err(other)
                }
            },
        }
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.find_one(doc! { "username": username }, "username").await
    }

    async fn find_by_id_number(&self, id_number: &str) -> RepositoryResult<Option<User>> {
        self.find_one(doc! { "id_number": id_number }, "id_number").await
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            info!("Malformed user id: {}", id);
            return Ok(None);
        };
        self.find_one(doc! { "_id": oid }, "id").await
    }
}
