use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::role::require_admin;
use crate::modules::assignments::router::{init_assignments_router, init_questions_router};
use crate::modules::auth::router::init_auth_router;
use crate::modules::certificates::router::init_certificates_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::departments::router::init_departments_router;
use crate::modules::enrollments::router::init_enrollments_router;
use crate::modules::payments::router::init_payments_router;
use crate::modules::profiles::router::{
    init_admin_profiles_router, init_profiles_router, init_teacher_profiles_router,
};
use crate::modules::progress::router::init_progress_router;
use crate::modules::submissions::router::init_submissions_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route("/health", get(health))
                .nest(
                    "/users",
                    init_auth_router(&state.rate_limit_config).merge(init_users_router()),
                )
                .nest("/profiles", init_profiles_router())
                .nest("/teacher-profiles", init_teacher_profiles_router())
                .nest(
                    "/admin",
                    init_admin_profiles_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest("/departments", init_departments_router())
                .nest("/courses", init_courses_router())
                .nest("/assignments", init_assignments_router())
                .nest("/questions", init_questions_router())
                .nest("/enrollments", init_enrollments_router())
                .nest("/submissions", init_submissions_router())
                .nest("/progress", init_progress_router())
                .nest("/certificates", init_certificates_router())
                .nest("/payments", init_payments_router()),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
