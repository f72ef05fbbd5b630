use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::subjects::model::{
    CreateSubjectDto, Subject, SubjectWithRelations, UpdateSubjectDto,
};
use crate::modules::subjects::service::SubjectService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectDto,
    responses(
        (status = 200, description = "Subject created", body = Subject),
        (status = 400, description = "Referenced user is not a teacher", body = ErrorResponse),
        (status = 409, description = "Subject name already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn create_subject(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateSubjectDto>,
) -> Result<Json<Subject>, AppError> {
    let subject = SubjectService::create_subject(&state.db, dto).await?;
    Ok(Json(subject))
}

#[utoipa::path(
    get,
    path = "/api/subjects",
    responses(
        (status = 200, description = "List of subjects", body = Vec<Subject>)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn get_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = SubjectService::list_subjects(&state.db).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    get,
    path = "/api/subjects/teacher/{teacher_id}",
    params(("teacher_id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Subjects taught by the teacher", body = Vec<Subject>)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn get_teacher_subjects(
    State(state): State<AppState>,
    Path(teacher_id): Path<Uuid>,
) -> Result<Json<Vec<Subject>>, AppError> {
    let subjects = SubjectService::list_subjects_by_teacher(&state.db, teacher_id).await?;
    Ok(Json(subjects))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject with teacher and courses", body = SubjectWithRelations),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubjectWithRelations>, AppError> {
    let subject = SubjectService::get_subject_with_relations(&state.db, id).await?;
    Ok(Json(subject))
}

#[utoipa::path(
    put,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    request_body = UpdateSubjectDto,
    responses(
        (status = 200, description = "Subject updated", body = Subject),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateSubjectDto>,
) -> Result<Json<Subject>, AppError> {
    let subject = SubjectService::update_subject(&state.db, id, dto).await?;
    Ok(Json(subject))
}

#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    params(("id" = Uuid, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted"),
        (status = 404, description = "Subject not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    SubjectService::delete_subject(&state.db, id).await?;
    Ok(Json(json!({"message": "Subject deleted successfully"})))
}

#[utoipa::path(
    put,
    path = "/api/subjects/{id}/courses/{course_id}",
    params(
        ("id" = Uuid, Path, description = "Subject ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course linked to subject"),
        (status = 404, description = "Subject or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn add_course(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    SubjectService::add_course(&state.db, id, course_id).await?;
    Ok(Json(json!({"message": "Course linked to subject"})))
}

#[utoipa::path(
    delete,
    path = "/api/subjects/{id}/courses/{course_id}",
    params(
        ("id" = Uuid, Path, description = "Subject ID"),
        ("course_id" = Uuid, Path, description = "Course ID")
    ),
    responses(
        (status = 200, description = "Course unlinked from subject")
    ),
    security(("bearer_auth" = [])),
    tag = "Subjects"
)]
#[instrument(skip(state))]
pub async fn remove_course(
    State(state): State<AppState>,
    Path((id, course_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    SubjectService::remove_course(&state.db, id, course_id).await?;
    Ok(Json(json!({"message": "Course unlinked from subject"})))
}
