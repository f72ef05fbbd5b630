use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonFilterParams, LessonWithRelations, UpdateLessonDto,
};
use crate::modules::lessons::service::LessonService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/lessons",
    request_body = CreateLessonDto,
    responses(
        (status = 200, description = "Lesson scheduled", body = Lesson),
        (status = 400, description = "Invalid time range or lesson not in the future", body = ErrorResponse),
        (status = 404, description = "Referenced classroom, class, teacher or subject not found", body = ErrorResponse),
        (status = 409, description = "Classroom already booked for an overlapping interval", body = ErrorResponse),
        (status = 422, description = "Classroom too small for the class", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn create_lesson(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::schedule_lesson(&state.db, dto).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    get,
    path = "/api/lessons",
    params(
        ("teacher_id" = Option<Uuid>, Query, description = "Filter by teacher"),
        ("school_class_id" = Option<Uuid>, Query, description = "Filter by school class"),
        ("classroom_id" = Option<Uuid>, Query, description = "Filter by classroom")
    ),
    responses(
        (status = 200, description = "List of lessons", body = Vec<Lesson>)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lessons(
    State(state): State<AppState>,
    Query(filter): Query<LessonFilterParams>,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let lessons = LessonService::list_lessons(&state.db, filter).await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson with class, teacher, classroom and subject", body = LessonWithRelations),
        (status = 404, description = "Lesson not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonWithRelations>, AppError> {
    let lesson = LessonService::get_lesson_with_relations(&state.db, id).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    put,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    responses(
        (status = 200, description = "Lesson updated", body = Lesson),
        (status = 400, description = "Invalid time range", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 409, description = "Classroom already booked for an overlapping interval", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn update_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateLessonDto>,
) -> Result<Json<Lesson>, AppError> {
    let lesson = LessonService::update_lesson(&state.db, id, dto).await?;
    Ok(Json(lesson))
}

#[utoipa::path(
    delete,
    path = "/api/lessons/{id}",
    params(("id" = Uuid, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson deleted"),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 409, description = "Lesson has attendance records", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Lessons"
)]
#[instrument(skip(state))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    LessonService::delete_lesson(&state.db, id).await?;
    Ok(Json(json!({"message": "Lesson deleted successfully"})))
}
