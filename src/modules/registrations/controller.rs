use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::registrations::model::{
    CreateRegistrationDto, Registration, RegistrationFilterParams, RegistrationStatus,
    RegistrationWithRelations,
};
use crate::modules::registrations::service::RegistrationService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 200, description = "Registration created", body = Registration),
        (status = 400, description = "Referenced user is not a student", body = ErrorResponse),
        (status = 404, description = "School class not found", body = ErrorResponse),
        (status = 409, description = "Student already has an active registration", body = ErrorResponse),
        (status = 422, description = "School class is full", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn create_registration(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<Json<Registration>, AppError> {
    let registration = RegistrationService::register(&state.db, dto).await?;
    Ok(Json(registration))
}

#[utoipa::path(
    get,
    path = "/api/registrations",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("school_class_id" = Option<Uuid>, Query, description = "Filter by school class"),
        ("status" = Option<String>, Query, description = "Filter by status")
    ),
    responses(
        (status = 200, description = "List of registrations", body = Vec<Registration>)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn get_registrations(
    State(state): State<AppState>,
    Query(filter): Query<RegistrationFilterParams>,
) -> Result<Json<Vec<Registration>>, AppError> {
    let registrations = RegistrationService::list_registrations(&state.db, filter).await?;
    Ok(Json(registrations))
}

#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration with student, course and class", body = RegistrationWithRelations),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn get_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RegistrationWithRelations>, AppError> {
    let registration =
        RegistrationService::get_registration_with_relations(&state.db, id).await?;
    Ok(Json(registration))
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}/complete",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration completed", body = Registration),
        (status = 400, description = "Registration is not active", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn complete_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Registration>, AppError> {
    let registration =
        RegistrationService::transition(&state.db, id, RegistrationStatus::Completed).await?;
    Ok(Json(registration))
}

#[utoipa::path(
    put,
    path = "/api/registrations/{id}/cancel",
    params(("id" = Uuid, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration cancelled", body = Registration),
        (status = 400, description = "Registration is not active", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Registrations"
)]
#[instrument(skip(state))]
pub async fn cancel_registration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Registration>, AppError> {
    let registration =
        RegistrationService::transition(&state.db, id, RegistrationStatus::Cancelled).await?;
    Ok(Json(registration))
}
