use axum::{Json, extract::State};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::{ChangePasswordDto, LoginRequest, LoginResponse, SignupDto};
use crate::modules::auth::service::AuthService;
use crate::modules::users::model::UserWithRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::validator::ValidatedJson;

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupDto,
    responses(
        (status = 200, description = "Account created", body = UserWithRole),
        (status = 409, description = "Email already registered", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SignupDto>,
) -> Result<Json<UserWithRole>, AppError> {
    let user = AuthService::signup(&state.db, dto).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = AuthService::login(&state.db, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/auth/change-password",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Current password does not match", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<ChangePasswordDto>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = auth_user.user_id()?;
    AuthService::change_password(&state.db, user_id, dto).await?;
    Ok(Json(json!({"message": "Password changed successfully"})))
}
