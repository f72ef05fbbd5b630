use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::school_classes::model::{
    CreateSchoolClassDto, SchoolClass, SchoolClassWithRelations, UpdateSchoolClassDto,
};
use crate::modules::school_classes::service::SchoolClassService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/school-classes",
    request_body = CreateSchoolClassDto,
    responses(
        (status = 200, description = "School class created", body = SchoolClass),
        (status = 400, description = "A referenced user is not a teacher", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn create_school_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSchoolClassDto>,
) -> Result<Json<SchoolClass>, AppError> {
    let class = SchoolClassService::create_school_class(&state.db, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    get,
    path = "/api/school-classes",
    responses(
        (status = 200, description = "List of school classes", body = Vec<SchoolClass>)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn get_school_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<SchoolClass>>, AppError> {
    let classes = SchoolClassService::list_school_classes(&state.db).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/school-classes/{id}",
    params(("id" = Uuid, Path, description = "School class ID")),
    responses(
        (status = 200, description = "School class with course, teachers and active registration count", body = SchoolClassWithRelations),
        (status = 404, description = "School class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn get_school_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SchoolClassWithRelations>, AppError> {
    let class = SchoolClassService::get_school_class_with_relations(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/school-classes/{id}",
    params(("id" = Uuid, Path, description = "School class ID")),
    request_body = UpdateSchoolClassDto,
    responses(
        (status = 200, description = "School class updated", body = SchoolClass),
        (status = 404, description = "School class not found", body = ErrorResponse),
        (status = 422, description = "Capacity below active registrations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn update_school_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSchoolClassDto>,
) -> Result<Json<SchoolClass>, AppError> {
    let class = SchoolClassService::update_school_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/school-classes/{id}",
    params(("id" = Uuid, Path, description = "School class ID")),
    responses(
        (status = 200, description = "School class deleted"),
        (status = 404, description = "School class not found", body = ErrorResponse),
        (status = 400, description = "Active registrations exist", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn delete_school_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    SchoolClassService::delete_school_class(&state.db, id).await?;
    Ok(Json(json!({"message": "School class deleted successfully"})))
}

#[utoipa::path(
    put,
    path = "/api/school-classes/{id}/teachers/{teacher_id}",
    params(
        ("id" = Uuid, Path, description = "School class ID"),
        ("teacher_id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher assigned to class"),
        (status = 400, description = "Referenced user is not a teacher", body = ErrorResponse),
        (status = 404, description = "School class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn add_teacher(
    State(state): State<AppState>,
    Path((id, teacher_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    SchoolClassService::add_teacher(&state.db, id, teacher_id).await?;
    Ok(Json(json!({"message": "Teacher assigned to class"})))
}

#[utoipa::path(
    delete,
    path = "/api/school-classes/{id}/teachers/{teacher_id}",
    params(
        ("id" = Uuid, Path, description = "School class ID"),
        ("teacher_id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher removed from class"),
        (status = 400, description = "Class must keep at least one teacher", body = ErrorResponse),
        (status = 404, description = "School class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "School classes"
)]
#[instrument(skip(state))]
pub async fn remove_teacher(
    State(state): State<AppState>,
    Path((id, teacher_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    SchoolClassService::remove_teacher(&state.db, id, teacher_id).await?;
    Ok(Json(json!({"message": "Teacher removed from class"})))
}
