use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_assignment_submissions, get_user_submissions, submit};

pub fn init_submissions_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit))
        .route("/user/{id}", get(get_user_submissions))
        .route("/assignment/{id}", get(get_assignment_submissions))
}
