#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use http_body_util::BodyExt;
use counseling_scheduler::app::app::{create_router, ensure_admin_user, AppState};
use counseling_scheduler::config::{AdminUserConfig, JwtConfig};
use counseling_scheduler::middlewares::admin_middleware::AdminAuthState;
use counseling_scheduler::model::appointment::{Appointment, AppointmentStatus};
use counseling_scheduler::model::now_timestamp;
use counseling_scheduler::model::user::User;
use counseling_scheduler::repository::appointment_repo::AppointmentRepository;
use counseling_scheduler::repository::mongo_store::StoreHealth;
use counseling_scheduler::repository::repository_error::{RepositoryError, RepositoryResult};
use counseling_scheduler::repository::user_repo::{UserRepository, DUPLICATE_ID_NUMBER, DUPLICATE_USERNAME};
use counseling_scheduler::service::appointment_service::AppointmentServiceImpl;
use counseling_scheduler::service::user_service::UserServiceImpl;
use counseling_scheduler::util::jwt::JwtTokenUtilsImpl;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt; // for .oneshot()

pub const ADMIN_USERNAME: &str = "counselor";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";

/// Users collection with the same unique constraints as the MongoDB indexes.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.username == user.username) {
            return Err(RepositoryError::already_exists(DUPLICATE_USERNAME));
        }
        if users.iter().any(|u| u.id_number == user.id_number) {
            return Err(RepositoryError::already_exists(DUPLICATE_ID_NUMBER));
        }
        user.id = Some(ObjectId::new());
        user.created_at = Some(now_timestamp());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().await.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id_number(&self, id_number: &str) -> RepositoryResult<Option<User>> {
        Ok(self.users.lock().await.iter().find(|u| u.id_number == id_number).cloned())
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.users.lock().await.iter().find(|u| u.id == Some(oid)).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryAppointmentRepository {
    appointments: Mutex<Vec<Appointment>>,
}

impl InMemoryAppointmentRepository {
    pub async fn count(&self) -> usize {
        self.appointments.lock().await.len()
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert(&self, mut appointment: Appointment) -> RepositoryResult<Appointment> {
        let now = now_timestamp();
        appointment.id = Some(ObjectId::new());
        appointment.created_at = Some(now.clone());
        appointment.updated_at = Some(now);
        self.appointments.lock().await.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Appointment>> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(None);
        };
        Ok(self.appointments.lock().await.iter().find(|a| a.id == Some(oid)).cloned())
    }

    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<Appointment>> {
        // Reverse first so equal keys keep newest-inserted first after the stable sort.
        let mut found: Vec<Appointment> = self
            .appointments
            .lock()
            .await
            .iter()
            .rev()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(found)
    }

    async fn update_status(&self, id: &str, from: AppointmentStatus, to: AppointmentStatus) -> RepositoryResult<bool> {
        let Ok(oid) = ObjectId::parse_str(id) else {
            return Ok(false);
        };
        let mut appointments = self.appointments.lock().await;
        match appointments.iter_mut().find(|a| a.id == Some(oid)) {
            Some(a) if a.status == from && from != to => {
                a.status = to;
                a.updated_at = Some(now_timestamp());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>> {
        let mut all: Vec<Appointment> = self.appointments.lock().await.iter().rev().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// Appointment store whose every call fails as if the database were down.
pub struct UnavailableAppointmentRepository;

#[async_trait]
impl AppointmentRepository for UnavailableAppointmentRepository {
    async fn insert(&self, _appointment: Appointment) -> RepositoryResult<Appointment> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn find_by_id(&self, _id: &str) -> RepositoryResult<Option<Appointment>> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn find_by_user(&self, _user_id: &str) -> RepositoryResult<Vec<Appointment>> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn update_status(&self, _id: &str, _from: AppointmentStatus, _to: AppointmentStatus) -> RepositoryResult<bool> {
        Err(RepositoryError::connection("connection refused"))
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Appointment>> {
        Err(RepositoryError::connection("connection refused"))
    }
}

pub struct FakeStoreHealth {
    pub healthy: bool,
}

#[async_trait]
impl StoreHealth for FakeStoreHealth {
    async fn ping(&self) -> RepositoryResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection("ping timed out"))
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub user_repo: Arc<InMemoryUserRepository>,
    pub appointment_repo: Arc<InMemoryAppointmentRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

fn build(
    appointment_repo: Arc<dyn AppointmentRepository>,
    healthy: bool,
) -> (AppState, Arc<InMemoryUserRepository>, Arc<JwtTokenUtilsImpl>) {
    let user_repo = Arc::new(InMemoryUserRepository::default());
    let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()));
    let state = AppState {
        user_service: Arc::new(UserServiceImpl::new(user_repo.clone(), jwt_utils.clone())),
        appointment_service: Arc::new(AppointmentServiceImpl::new(appointment_repo, user_repo.clone())),
        admin_auth_state: Arc::new(AdminAuthState { jwt_utils: jwt_utils.clone() }),
        store_health: Arc::new(FakeStoreHealth { healthy }),
    };
    (state, user_repo, jwt_utils)
}

pub fn test_app() -> TestApp {
    let appointment_repo = Arc::new(InMemoryAppointmentRepository::default());
    let (state, user_repo, jwt_utils) = build(appointment_repo.clone(), true);
    TestApp {
        router: create_router(&state),
        state,
        user_repo,
        appointment_repo,
        jwt_utils,
    }
}

/// Router whose appointment store and health check report an outage.
pub fn unavailable_store_app() -> (Router, AppState) {
    let (state, _, _) = build(Arc::new(UnavailableAppointmentRepository), false);
    (create_router(&state), state)
}

pub async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>, token: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = router.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

/// Registers a regular user and returns its id.
pub async fn register_user(router: &Router, username: &str, id_number: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/register",
        Some(json!({
            "username": username,
            "password": "123456",
            "id_number": id_number,
            "birthdate": "2000-01-01"
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["user_id"].as_str().unwrap().to_string()
}

pub async fn login(router: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        router,
        "POST",
        "/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["tokens"]["access_token"].as_str().unwrap().to_string()
}

/// Bootstraps the admin account the same way startup does and logs in.
pub async fn admin_token(app: &TestApp) -> String {
    let admin_conf = AdminUserConfig {
        username: ADMIN_USERNAME.to_string(),
        password: ADMIN_PASSWORD.to_string(),
        id_number: "ADMIN-0001".to_string(),
        birthdate: "1980-05-20".to_string(),
    };
    ensure_admin_user(&app.state.user_service, &admin_conf).await.unwrap();
    login(&app.router, ADMIN_USERNAME, ADMIN_PASSWORD).await
}

pub async fn book(router: &Router, user_id: &str, date: &str) -> Value {
    let (status, body) = send(
        router,
        "POST",
        "/appointments",
        Some(json!({
            "user_id": user_id,
            "date": date,
            "preferred_time": "10:00 AM",
            "concern_type": "Academic"
        })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "booking failed: {body}");
    body
}
