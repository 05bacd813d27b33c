use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{get_progress, update_progress};

pub fn init_progress_router() -> Router<AppState> {
    Router::new()
        .route("/update", post(update_progress))
        .route("/{user_id}/{course_id}", get(get_progress))
}
