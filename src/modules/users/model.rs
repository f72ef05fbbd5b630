//! User domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::roles::model::{RoleInfo, RoleName};
use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A user row. The password hash is never selected into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub role_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat user+role row produced by the joined queries.
#[derive(Debug, Clone, FromRow)]
pub struct UserRoleRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub role_id: Uuid,
    pub role_name: RoleName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Simple user projection used wherever a user appears as a nested
/// reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserInfo {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Full user projection: scalars plus the simple-projected role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserWithRole {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Option<NaiveDate>,
    pub role: RoleInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRoleRow> for UserWithRole {
    fn from(row: UserRoleRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            birth_date: row.birth_date,
            role: RoleInfo {
                id: row.role_id,
                name: row.role_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for updating profile names.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
}

/// DTO for assigning a role to a user.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AssignRoleDto {
    pub role: RoleName,
}

/// Query parameters for filtering users.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UserFilterParams {
    pub role: Option<RoleName>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Paginated response containing users with their role.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<UserWithRole>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> UserRoleRow {
        UserRoleRow {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1815, 12, 10),
            role_id: Uuid::new_v4(),
            role_name: RoleName::Teacher,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_with_role_projection_keeps_scalars() {
        let row = sample_row();
        let id = row.id;
        let role_id = row.role_id;
        let projected = UserWithRole::from(row);
        assert_eq!(projected.id, id);
        assert_eq!(projected.email, "ada@example.com");
        assert_eq!(projected.role.id, role_id);
        assert_eq!(projected.role.name, RoleName::Teacher);
    }

    #[test]
    fn test_user_info_projection_is_idempotent() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
            birth_date: None,
            role_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(UserInfo::from(&user), UserInfo::from(&user));
    }

    #[test]
    fn test_update_profile_dto_rejects_empty_name() {
        let dto = UpdateProfileDto {
            first_name: Some("".to_string()),
            last_name: None,
        };
        assert!(dto.validate().is_err());
    }
}
