use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::auth::controller::ErrorResponse;
use crate::modules::roles::model::{CreateRoleDto, Role, RoleName};
use crate::modules::roles::service::RoleService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/roles",
    responses(
        (status = 200, description = "List of roles", body = Vec<Role>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    let roles = RoleService::list_roles(&state.db).await?;
    Ok(Json(roles))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = Uuid, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role details", body = Role),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Role>, AppError> {
    let role = RoleService::get_role(&state.db, id).await?;
    Ok(Json(role))
}

#[utoipa::path(
    get,
    path = "/api/roles/name/{name}",
    params(("name" = String, Path, description = "Role name (admin, teacher or student)")),
    responses(
        (status = 200, description = "Role details", body = Role),
        (status = 400, description = "Unknown role name", body = ErrorResponse),
        (status = 404, description = "Role not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn get_role_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Role>, AppError> {
    let name: RoleName = name
        .parse()
        .map_err(|e: String| AppError::bad_request(anyhow::anyhow!(e)))?;
    let role = RoleService::get_role_by_name(&state.db, name).await?;
    Ok(Json(role))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses(
        (status = 200, description = "Role created", body = Role),
        (status = 409, description = "Role name already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Roles"
)]
#[instrument(skip(state))]
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRoleDto>,
) -> Result<Json<Role>, AppError> {
    let role = RoleService::create_role(&state.db, dto).await?;
    Ok(Json(role))
}
