use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use fake::Fake;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use learnhub::config::certificate::CertificateConfig;
use learnhub::config::cors::CorsConfig;
use learnhub::config::email::EmailConfig;
use learnhub::config::jwt::JwtConfig;
use learnhub::config::rate_limit::RateLimitConfig;
use learnhub::config::registration::RegistrationConfig;
use learnhub::config::scoring::ScoringConfig;
use learnhub::modules::auth::pending::PendingRegistrationStore;
use learnhub::router::init_router;
use learnhub::state::AppState;
use learnhub::utils::password::hash_password;
use learnhub_auth::{UserRole, create_token};

#[allow(dead_code)]
pub const TEST_PASSWORD: &str = "password123";

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret".to_string(),
        token_expiry: 3600,
    }
}

/// State with mail delivery and rate limiting switched off.
pub fn test_state(pool: PgPool) -> AppState {
    test_state_with_rate_limit(pool, RateLimitConfig::disabled())
}

pub fn test_state_with_rate_limit(pool: PgPool, rate_limit_config: RateLimitConfig) -> AppState {
    dotenvy::dotenv().ok();
    let registration_config = RegistrationConfig::default();
    let retention = chrono::Duration::seconds(registration_config.pending_retention_seconds);

    AppState {
        db: pool,
        jwt_config: jwt_config(),
        email_config: EmailConfig::disabled(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config,
        registration_config,
        scoring_config: ScoringConfig::default(),
        certificate_config: CertificateConfig::default(),
        pending_registrations: PendingRegistrationStore::in_memory(retention),
    }
}

#[allow(dead_code)]
pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Inserts a verified user with [`TEST_PASSWORD`] and signs a token for it.
#[allow(dead_code)]
pub async fn create_test_user(pool: &PgPool, role: UserRole) -> TestUser {
    let email = generate_unique_email();
    let name: String = Name().fake();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: i64 = sqlx::query_scalar(
        r#"INSERT INTO users (name, email, password, role, is_verified)
           VALUES ($1, $2, $3, $4, true)
           RETURNING id"#,
    )
    .bind(name)
    .bind(&email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_token(id, role, &jwt_config()).unwrap();
    TestUser { id, email, token }
}

#[allow(dead_code)]
pub async fn create_test_department(pool: &PgPool) -> i64 {
    sqlx::query_scalar("INSERT INTO departments (name) VALUES ($1) RETURNING id")
        .bind(format!("Department {}", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[allow(dead_code)]
pub async fn assign_teacher(pool: &PgPool, teacher_id: i64, department_id: i64) {
    sqlx::query("INSERT INTO teacher_profiles (user_id, department_id) VALUES ($1, $2)")
        .bind(teacher_id)
        .bind(department_id)
        .execute(pool)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[allow(dead_code)]
pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Sends a request and returns the status with the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_json(response).await)
}

#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
