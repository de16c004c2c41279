use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn, error};

use crate::config::{AdminUserConfig, AppConfig, JwtConfig, MongoConfig};
use crate::dto::user_dto::NewUser;
use crate::middlewares::admin_middleware::AdminAuthState;
use crate::model::user::Role;
use crate::repository::appointment_repo::MongoAppointmentRepository;
use crate::repository::mongo_store::{MongoStore, StoreHealth};
use crate::repository::user_repo::UserRepositoryImpl;
use crate::router::appointment_router::appointment_router;
use crate::router::health_router::health_router;
use crate::router::user_router::user_router;
use crate::service::appointment_service::AppointmentServiceImpl;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::JwtTokenUtilsImpl;

/// Everything the routers need, built once per process.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserServiceImpl>,
    pub appointment_service: Arc<AppointmentServiceImpl>,
    pub admin_auth_state: Arc<AdminAuthState>,
    pub store_health: Arc<dyn StoreHealth>,
}

pub fn create_router(state: &AppState) -> Router {
    Router::new()
        .merge(user_router(state.user_service.clone()))
        .merge(appointment_router(state.appointment_service.clone(), state.admin_auth_state.clone()))
        .merge(health_router(state.store_health.clone()))
}

/// Creates the configured admin account unless its username or ID number is
/// already taken. Returns whether a new account was created.
pub async fn ensure_admin_user(user_service: &UserServiceImpl, admin_conf: &AdminUserConfig) -> Result<bool, ServiceError> {
    let repo = &user_service.user_repo;
    if repo.find_by_username(&admin_conf.username).await?.is_some() {
        info!("Admin user already exists, skipping creation.");
        return Ok(false);
    }
    if repo.find_by_id_number(&admin_conf.id_number).await?.is_some() {
        warn!(id_number = %admin_conf.id_number, "Admin ID number belongs to another account, skipping creation.");
        return Ok(false);
    }

    let admin = NewUser {
        username: admin_conf.username.clone(),
        password: admin_conf.password.clone(),
        id_number: admin_conf.id_number.clone(),
        birthdate: admin_conf.birthdate.clone(),
        role: Role::Admin,
    };
    match user_service.register(admin).await {
        Ok(_) => {
            info!("First admin user created.");
            Ok(true)
        }
        // Lost a race with another instance creating the same account
        Err(ServiceError::Conflict(msg)) => {
            warn!("Admin user not created: {msg}");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;

        let store = MongoStore::connect(&mongo_config).await?;
        store.ensure_indexes().await?;

        let user_repo = Arc::new(UserRepositoryImpl::new(&store));
        let appointment_repo = Arc::new(MongoAppointmentRepository::new(&store));
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));

        let state = AppState {
            user_service: Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone())),
            appointment_service: Arc::new(AppointmentServiceImpl::new(appointment_repo, user_repo)),
            admin_auth_state: Arc::new(AdminAuthState { jwt_utils }),
            store_health: Arc::new(store),
        };

        match AdminUserConfig::from_env() {
            Ok(admin_conf) => {
                if let Err(e) = ensure_admin_user(&state.user_service, &admin_conf).await {
                    error!("Failed to create admin user: {e}");
                }
            }
            Err(e) => warn!("Admin user config not loaded: {e}"),
        }

        Ok(App { config, router: create_router(&state) })
    }

    pub async fn start(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}
