use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

use super::controller::{
    create_profile, get_my_profile, get_teacher_profile, upsert_teacher_profile, verify_profile,
};

pub fn init_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_profile))
        .route("/me", get(get_my_profile))
}

pub fn init_teacher_profiles_router() -> Router<AppState> {
    Router::new().route("/{user_id}", get(get_teacher_profile))
}

/// Mounted under `/admin`, behind the admin layer.
pub fn init_admin_profiles_router() -> Router<AppState> {
    Router::new()
        .route("/profiles/{user_id}/verify", put(verify_profile))
        .route("/teacher-profiles/{user_id}", put(upsert_teacher_profile))
}
