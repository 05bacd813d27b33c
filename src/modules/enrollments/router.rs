use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

use super::controller::{delete_enrollment, enroll, update_enrollment};

/// `/users/{id}/enrollments` and `/courses/{id}/enrollments` hang off the
/// users and courses routers.
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(enroll))
        .route("/{id}", put(update_enrollment).delete(delete_enrollment))
}
