use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::classrooms::model::{
    AvailabilityParams, AvailabilityResponse, Classroom, CreateClassroomDto, UpdateClassroomDto,
};
use crate::modules::classrooms::service::ClassroomService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classrooms",
    request_body = CreateClassroomDto,
    responses(
        (status = 200, description = "Classroom created", body = Classroom),
        (status = 409, description = "Classroom name already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn create_classroom(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassroomDto>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::create_classroom(&state.db, dto).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    get,
    path = "/api/classrooms",
    responses(
        (status = 200, description = "List of classrooms", body = Vec<Classroom>)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classrooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<Classroom>>, AppError> {
    let classrooms = ClassroomService::list_classrooms(&state.db).await?;
    Ok(Json(classrooms))
}

#[utoipa::path(
    get,
    path = "/api/classrooms/{id}",
    params(("id" = Uuid, Path, description = "Classroom ID")),
    responses(
        (status = 200, description = "Classroom details", body = Classroom),
        (status = 404, description = "Classroom not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_classroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::get_classroom(&state.db, id).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    put,
    path = "/api/classrooms/{id}",
    params(("id" = Uuid, Path, description = "Classroom ID")),
    request_body = UpdateClassroomDto,
    responses(
        (status = 200, description = "Classroom updated", body = Classroom),
        (status = 404, description = "Classroom not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn update_classroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassroomDto>,
) -> Result<Json<Classroom>, AppError> {
    let classroom = ClassroomService::update_classroom(&state.db, id, dto).await?;
    Ok(Json(classroom))
}

#[utoipa::path(
    delete,
    path = "/api/classrooms/{id}",
    params(("id" = Uuid, Path, description = "Classroom ID")),
    responses(
        (status = 200, description = "Classroom deleted"),
        (status = 404, description = "Classroom not found", body = ErrorResponse),
        (status = 409, description = "Classroom still referenced", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn delete_classroom(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    ClassroomService::delete_classroom(&state.db, id).await?;
    Ok(Json(json!({"message": "Classroom deleted successfully"})))
}

#[utoipa::path(
    get,
    path = "/api/classrooms/{id}/availability",
    params(
        ("id" = Uuid, Path, description = "Classroom ID"),
        AvailabilityParams
    ),
    responses(
        (status = 200, description = "Availability in the window", body = AvailabilityResponse),
        (status = 400, description = "Invalid time range", body = ErrorResponse),
        (status = 404, description = "Classroom not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classrooms"
)]
#[instrument(skip(state))]
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let available =
        ClassroomService::is_available(&state.db, id, params.start, params.end).await?;

    Ok(Json(AvailabilityResponse {
        classroom_id: id,
        start: params.start,
        end: params.end,
        available,
    }))
}
