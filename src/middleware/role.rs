//! Role-based authorization middleware.
//!
//! Role guards are applied as router layers via
//! `axum::middleware::from_fn_with_state`; handlers that need finer checks
//! use [`check_any_role`] directly.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::roles::model::RoleName;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Checks that the authenticated user holds one of the allowed roles before
/// letting the request through.
pub async fn require_roles(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
    allowed_roles: Vec<RoleName>,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    let user_role = parse_role_from_string(auth_user.role())?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Guard for admin-only management routes.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, vec![RoleName::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Guard for routes teachers may use (admins always pass).
pub async fn require_teacher(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(
        State(state),
        req,
        next,
        vec![RoleName::Admin, RoleName::Teacher],
    )
    .await
    {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

/// Helper for in-handler checks against a set of allowed roles.
pub fn check_any_role(auth_user: &AuthUser, allowed_roles: &[RoleName]) -> Result<(), AppError> {
    let user_role = parse_role_from_string(auth_user.role())?;

    if !allowed_roles.contains(&user_role) {
        return Err(AppError::forbidden(format!(
            "Access denied. Required roles: {:?}, but user has role: {:?}",
            allowed_roles, user_role
        )));
    }

    Ok(())
}

fn parse_role_from_string(role_str: &str) -> Result<RoleName, AppError> {
    role_str
        .parse::<RoleName>()
        .map_err(|_| AppError::internal(anyhow::anyhow!("Invalid role: {}", role_str)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::auth::model::Claims;
    use uuid::Uuid;

    fn auth_user_with_role(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_parse_role_from_string() {
        assert!(matches!(parse_role_from_string("admin"), Ok(RoleName::Admin)));
        assert!(matches!(
            parse_role_from_string("teacher"),
            Ok(RoleName::Teacher)
        ));
        assert!(matches!(
            parse_role_from_string("student"),
            Ok(RoleName::Student)
        ));
        assert!(parse_role_from_string("headmaster").is_err());
    }

    #[test]
    fn test_check_any_role_allows_listed_roles() {
        let user = auth_user_with_role("teacher");
        assert!(check_any_role(&user, &[RoleName::Admin, RoleName::Teacher]).is_ok());
    }

    #[test]
    fn test_check_any_role_rejects_unlisted_roles() {
        let user = auth_user_with_role("student");
        assert!(check_any_role(&user, &[RoleName::Admin]).is_err());
    }
}
