use markbook::middleware::auth::AuthUser;
use markbook::middleware::role::check_any_role;
use markbook::modules::auth::model::Claims;
use markbook::modules::roles::model::RoleName;
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
fn test_admin_passes_admin_check() {
    let user = auth_user_with_role("admin");
    assert!(check_any_role(&user, &[RoleName::Admin]).is_ok());
}

#[test]
fn test_teacher_passes_teacher_or_admin_check() {
    let user = auth_user_with_role("teacher");
    assert!(check_any_role(&user, &[RoleName::Admin, RoleName::Teacher]).is_ok());
}

#[test]
fn test_student_rejected_from_admin_routes() {
    let user = auth_user_with_role("student");
    assert!(check_any_role(&user, &[RoleName::Admin]).is_err());
}

#[test]
fn test_unknown_role_in_token_is_rejected() {
    let user = auth_user_with_role("superuser");
    assert!(check_any_role(&user, &[RoleName::Admin, RoleName::Teacher]).is_err());
}
