use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::users::model::UserWithRole;

/// JWT claims carried by access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

/// Signup request. New accounts always get the student role; staff accounts
/// come from the CLI or an admin's role assignment.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: UserWithRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_dto_rejects_bad_email() {
        let dto = SignupDto {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            birth_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_signup_dto_rejects_short_password() {
        let dto = SignupDto {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "short".to_string(),
            birth_date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_change_password_dto_validation() {
        let dto = ChangePasswordDto {
            current_password: "oldpass".to_string(),
            new_password: "newpassword123".to_string(),
        };
        assert!(dto.validate().is_ok());

        let short = ChangePasswordDto {
            current_password: "oldpass".to_string(),
            new_password: "short".to_string(),
        };
        assert!(short.validate().is_err());
    }
}
