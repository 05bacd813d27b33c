use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    download_certificate, get_certificate, get_user_certificates, issue_certificate,
};

pub fn init_certificates_router() -> Router<AppState> {
    Router::new()
        .route("/issue", post(issue_certificate))
        .route("/user/{user_id}", get(get_user_certificates))
        .route("/download/{id}", get(download_certificate))
        .route("/{id}", get(get_certificate))
}
