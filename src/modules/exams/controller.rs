use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::exams::model::{
    CreateExamDto, CreateExamResultDto, Exam, ExamFilterParams, ExamResult,
    ExamResultWithRelations, ExamStatistics, ExamWithRelations,
};
use crate::modules::exams::service::ExamService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/exams",
    request_body = CreateExamDto,
    responses(
        (status = 200, description = "Exam created", body = Exam),
        (status = 400, description = "Invalid scores or date not in the future", body = ErrorResponse),
        (status = 404, description = "Referenced classroom, class, subject or teacher not found", body = ErrorResponse),
        (status = 422, description = "Classroom too small for the class", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn create_exam(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateExamDto>,
) -> Result<Json<Exam>, AppError> {
    let exam = ExamService::create_exam(&state.db, dto).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    get,
    path = "/api/exams",
    params(
        ("subject_id" = Option<Uuid>, Query, description = "Filter by subject"),
        ("school_class_id" = Option<Uuid>, Query, description = "Filter by school class"),
        ("teacher_id" = Option<Uuid>, Query, description = "Filter by teacher")
    ),
    responses(
        (status = 200, description = "List of exams", body = Vec<Exam>)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exams(
    State(state): State<AppState>,
    Query(filter): Query<ExamFilterParams>,
) -> Result<Json<Vec<Exam>>, AppError> {
    let exams = ExamService::list_exams(&state.db, filter).await?;
    Ok(Json(exams))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam with classroom, subject, class, teacher and courses", body = ExamWithRelations),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExamWithRelations>, AppError> {
    let exam = ExamService::get_exam_with_relations(&state.db, id).await?;
    Ok(Json(exam))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Exam deleted"),
        (status = 404, description = "Exam not found", body = ErrorResponse),
        (status = 409, description = "Exam has recorded results", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn delete_exam(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::delete_exam(&state.db, id).await?;
    Ok(Json(json!({"message": "Exam deleted successfully"})))
}

#[utoipa::path(
    put,
    path = "/api/exams/{id}/courses/{course_id}",
    params(
        ("id" = Uuid, Path, description = "Exam ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course linked to exam"),
        (status = 404, description = "Exam or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn add_course(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::add_course(&state.db, id, course_id).await?;
    Ok(Json(json!({"message": "Course linked to exam"})))
}

#[utoipa::path(
    delete,
    path = "/api/exams/{id}/courses/{course_id}",
    params(
        ("id" = Uuid, Path, description = "Exam ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course unlinked from exam")
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn remove_course(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    ExamService::remove_course(&state.db, id, course_id).await?;
    Ok(Json(json!({"message": "Course unlinked from exam"})))
}

#[utoipa::path(
    post,
    path = "/api/exams/{id}/results",
    params(("id" = Uuid, Path, description = "Exam ID")),
    request_body = CreateExamResultDto,
    responses(
        (status = 200, description = "Result recorded", body = ExamResult),
        (status = 400, description = "Score out of bounds or date not in the past", body = ErrorResponse),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn record_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<CreateExamResultDto>,
) -> Result<Json<ExamResult>, AppError> {
    let result = ExamService::record_result(&state.db, id, dto).await?;
    Ok(Json(result))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}/results",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Results for the exam with derived pass verdicts", body = Vec<ExamResultWithRelations>),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exam_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ExamResultWithRelations>>, AppError> {
    let results = ExamService::list_results_for_exam(&state.db, id).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/exams/results/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "All exam results recorded for the student", body = Vec<ExamResult>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_student_results(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<ExamResult>>, AppError> {
    let results = ExamService::list_results_for_student(&state.db, student_id).await?;
    Ok(Json(results))
}

#[utoipa::path(
    get,
    path = "/api/exams/{id}/statistics",
    params(("id" = Uuid, Path, description = "Exam ID")),
    responses(
        (status = 200, description = "Pass/fail counts and average score", body = ExamStatistics),
        (status = 404, description = "Exam not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_exam_statistics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ExamStatistics>, AppError> {
    let stats = ExamService::exam_statistics(&state.db, id).await?;
    Ok(Json(stats))
}

#[utoipa::path(
    get,
    path = "/api/exams/results/{result_id}",
    params(("result_id" = Uuid, Path, description = "Exam result ID")),
    responses(
        (status = 200, description = "Result with exam and student", body = ExamResultWithRelations),
        (status = 404, description = "Result not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Exams"
)]
#[instrument(skip(state))]
pub async fn get_result(
    State(state): State<AppState>,
    Path(result_id): Path<Uuid>,
) -> Result<Json<ExamResultWithRelations>, AppError> {
    let result = ExamService::get_result(&state.db, result_id).await?;
    Ok(Json(result))
}
