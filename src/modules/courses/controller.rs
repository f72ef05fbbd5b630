use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::courses::model::{
    Course, CourseWithRelations, CreateCourseDto, UpdateCourseDto,
};
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/courses",
    request_body = CreateCourseDto,
    responses(
        (status = 200, description = "Course created", body = Course),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn create_course(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::create_course(&state.db, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    get,
    path = "/api/courses",
    responses(
        (status = 200, description = "List of courses", body = Vec<Course>)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_courses(State(state): State<AppState>) -> Result<Json<Vec<Course>>, AppError> {
    let courses = CourseService::list_courses(&state.db).await?;
    Ok(Json(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course with its subjects", body = CourseWithRelations),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseWithRelations>, AppError> {
    let course = CourseService::get_course_with_relations(&state.db, id).await?;
    Ok(Json(course))
}

#[utoipa::path(
    put,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourseDto,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateCourseDto>,
) -> Result<Json<Course>, AppError> {
    let course = CourseService::update_course(&state.db, id, dto).await?;
    Ok(Json(course))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Course still referenced", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Courses"
)]
#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    CourseService::delete_course(&state.db, id).await?;
    Ok(Json(json!({"message": "Course deleted successfully"})))
}
