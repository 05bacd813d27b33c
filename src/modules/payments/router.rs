use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{create_payment, get_user_payments};

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment))
        .route("/user/{user_id}", get(get_user_payments))
}
