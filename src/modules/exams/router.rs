use crate::modules::exams::controller::{
    add_course, create_exam, delete_exam, get_exam, get_exam_results, get_exam_statistics,
    get_exams, get_result, get_student_results, record_result, remove_course,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn init_exams_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_exam).get(get_exams))
        .route("/{id}", get(get_exam).delete(delete_exam))
        .route(
            "/{id}/courses/{course_id}",
            put(add_course).delete(remove_course),
        )
        .route("/{id}/results", post(record_result).get(get_exam_results))
        .route("/{id}/statistics", get(get_exam_statistics))
        .route("/results/{result_id}", get(get_result))
        .route("/results/student/{student_id}", get(get_student_results))
}
