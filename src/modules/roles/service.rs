use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::roles::model::{CreateRoleDto, Role, RoleName};
use crate::utils::errors::{AppError, DomainError};

pub struct RoleService;

impl RoleService {
    #[instrument(skip(db))]
    pub async fn list_roles(db: &PgPool) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(db)
            .await?;

        Ok(roles)
    }

    #[instrument(skip(db))]
    pub async fn get_role(db: &PgPool, id: Uuid) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::RoleNotFound(id.to_string()))?;

        Ok(role)
    }

    #[instrument(skip(db))]
    pub async fn get_role_by_name(db: &PgPool, name: RoleName) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| DomainError::RoleNotFound(name.to_string()))?;

        Ok(role)
    }

    #[instrument(skip(db))]
    pub async fn create_role(db: &PgPool, dto: CreateRoleDto) -> Result<Role, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "INSERT INTO roles (name) VALUES ($1) RETURNING id, name",
        )
        .bind(dto.name)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::DuplicateRole(dto.name.to_string()).into();
                }
            }
            AppError::database(e)
        })?;

        Ok(role)
    }
}
