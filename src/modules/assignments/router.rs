use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

use super::controller::{
    create_assignment, create_option, create_question, delete_assignment, delete_option,
    delete_question, get_assignment, list_assignments, list_options, list_questions,
    update_assignment, update_option, update_question,
};

pub fn init_assignments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route(
            "/{id}",
            get(get_assignment)
                .put(update_assignment)
                .delete(delete_assignment),
        )
        .route("/{id}/questions", get(list_questions).post(create_question))
}

pub fn init_questions_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{question_id}",
            put(update_question).delete(delete_question),
        )
        .route(
            "/{question_id}/options",
            get(list_options).post(create_option),
        )
        .route(
            "/{question_id}/options/{option_id}",
            put(update_option).delete(delete_option),
        )
}
