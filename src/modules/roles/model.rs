//! Role models and the system role enumeration.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// The three system roles. Stored in the database as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoleName {
    Admin,
    Teacher,
    Student,
}

impl RoleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleName::Admin => "admin",
            RoleName::Teacher => "teacher",
            RoleName::Student => "student",
        }
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(RoleName::Admin),
            "teacher" => Ok(RoleName::Teacher),
            "student" => Ok(RoleName::Student),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// A role row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Role {
    pub id: Uuid,
    pub name: RoleName,
}

/// Simple role projection used inside user responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RoleInfo {
    pub id: Uuid,
    pub name: RoleName,
}

impl From<&Role> for RoleInfo {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
        }
    }
}

/// DTO for creating a role.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    pub name: RoleName,
}

/// Fixed system role ids matching the seed migration.
pub mod system_roles {
    use uuid::Uuid;

    pub const ADMIN: Uuid = Uuid::from_u128(0x00000000_0000_0000_0000_000000000001);
    pub const TEACHER: Uuid = Uuid::from_u128(0x00000000_0000_0000_0000_000000000002);
    pub const STUDENT: Uuid = Uuid::from_u128(0x00000000_0000_0000_0000_000000000003);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_round_trip() {
        for role in [RoleName::Admin, RoleName::Teacher, RoleName::Student] {
            assert_eq!(role.as_str().parse::<RoleName>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_name_rejects_unknown() {
        assert!("principal".parse::<RoleName>().is_err());
    }

    #[test]
    fn test_role_info_projection() {
        let role = Role {
            id: Uuid::new_v4(),
            name: RoleName::Teacher,
        };
        let info = RoleInfo::from(&role);
        assert_eq!(info.id, role.id);
        assert_eq!(info.name, RoleName::Teacher);
        // projection is idempotent
        assert_eq!(info, RoleInfo::from(&role));
    }
}
