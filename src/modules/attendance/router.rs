use crate::modules::attendance::controller::{
    create_attendance, get_attendance, get_attendance_rate, get_lesson_attendance,
    get_student_attendance,
};
use crate::state::AppState;
use axum::{Router, routing::get, routing::post};

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_attendance))
        .route("/{id}", get(get_attendance))
        .route("/lesson/{lesson_id}", get(get_lesson_attendance))
        .route("/student/{student_id}", get(get_student_attendance))
        .route("/student/{student_id}/rate", get(get_attendance_rate))
}
