use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    Attendance, AttendanceRate, AttendanceWithRelations, CreateAttendanceDto,
};
use crate::modules::attendance::service::AttendanceService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 200, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Window invalid or outside lesson bounds", body = ErrorResponse),
        (status = 404, description = "Lesson or student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn create_attendance(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    let attendance = AttendanceService::record_attendance(&state.db, dto).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance ID")),
    responses(
        (status = 200, description = "Attendance with student and lesson", body = AttendanceWithRelations),
        (status = 404, description = "Attendance not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceWithRelations>, AppError> {
    let attendance = AttendanceService::get_attendance(&state.db, id).await?;
    Ok(Json(attendance))
}

#[utoipa::path(
    get,
    path = "/api/attendance/lesson/{lesson_id}",
    params(("lesson_id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Attendance records for the lesson", body = Vec<Attendance>),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_lesson_attendance(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records = AttendanceService::list_by_lesson(&state.db, lesson_id).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance records for the student", body = Vec<Attendance>)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_student_attendance(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Attendance>>, AppError> {
    let records = AttendanceService::list_by_student(&state.db, student_id).await?;
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}/rate",
    params(("student_id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Attendance rate for the student", body = AttendanceRate),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state))]
pub async fn get_attendance_rate(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<AttendanceRate>, AppError> {
    let rate = AttendanceService::attendance_rate(&state.db, student_id).await?;
    Ok(Json(rate))
}
