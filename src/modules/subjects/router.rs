use crate::modules::subjects::controller::{
    add_course, create_subject, delete_subject, get_subject, get_subjects, get_teacher_subjects,
    remove_course, update_subject,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn init_subjects_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_subject).get(get_subjects))
        .route("/teacher/{teacher_id}", get(get_teacher_subjects))
        .route(
            "/{id}",
            get(get_subject).put(update_subject).delete(delete_subject),
        )
        .route(
            "/{id}/courses/{course_id}",
            put(add_course).delete(remove_course),
        )
}
