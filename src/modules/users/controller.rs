use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::users::model::{
    AssignRoleDto, PaginatedUsersResponse, UpdateProfileDto, User, UserFilterParams, UserWithRole,
};
use crate::modules::users::service::UserService;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Authenticated user's profile", body = UserWithRole),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserWithRole>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = UserService::get_user_with_role(&state.db, user_id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<User>, AppError> {
    let user_id = auth_user.user_id()?;
    let user = UserService::update_profile(&state.db, user_id, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = PaginatedUsersResponse),
        (status = 403, description = "Forbidden - Admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    Query(params): Query<UserFilterParams>,
) -> Result<Json<PaginatedUsersResponse>, AppError> {
    let (users, total) = UserService::list_users(&state.db, &params).await?;

    Ok(Json(PaginatedUsersResponse {
        meta: PaginationMeta::new(&params.pagination, total),
        data: users,
    }))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = UserWithRole),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserWithRole>, AppError> {
    let user = UserService::get_user_with_role(&state.db, id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AssignRoleDto,
    responses(
        (status = 200, description = "Role assigned", body = UserWithRole),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn assign_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<AssignRoleDto>,
) -> Result<Json<UserWithRole>, AppError> {
    let user = UserService::assign_role(&state.db, id, dto.role).await?;
    Ok(Json(user))
}
