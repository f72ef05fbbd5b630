use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::roles::model::RoleName;
use crate::modules::users::model::{
    UpdateProfileDto, User, UserFilterParams, UserRoleRow, UserWithRole,
};
use crate::utils::errors::{AppError, DomainError};

const USER_ROLE_SELECT: &str = "SELECT u.id, u.first_name, u.last_name, u.email, u.birth_date, \
     u.role_id, r.name AS role_name, u.created_at, u.updated_at \
     FROM users u JOIN roles r ON r.id = u.role_id";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, first_name, last_name, email, birth_date, role_id, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(id))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_user_with_role(db: &PgPool, id: Uuid) -> Result<UserWithRole, AppError> {
        let row = sqlx::query_as::<_, UserRoleRow>(&format!("{} WHERE u.id = $1", USER_ROLE_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::UserNotFound(id))?;

        Ok(UserWithRole::from(row))
    }

    #[instrument(skip(db, params))]
    pub async fn list_users(
        db: &PgPool,
        params: &UserFilterParams,
    ) -> Result<(Vec<UserWithRole>, i64), AppError> {
        let limit = params.pagination.limit();
        let offset = params.pagination.offset();

        let (users, total) = match params.role {
            Some(role) => {
                let rows = sqlx::query_as::<_, UserRoleRow>(&format!(
                    "{} WHERE r.name = $1 ORDER BY u.last_name, u.first_name LIMIT $2 OFFSET $3",
                    USER_ROLE_SELECT
                ))
                .bind(role)
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM users u JOIN roles r ON r.id = u.role_id WHERE r.name = $1",
                )
                .bind(role)
                .fetch_one(db)
                .await?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, UserRoleRow>(&format!(
                    "{} ORDER BY u.last_name, u.first_name LIMIT $1 OFFSET $2",
                    USER_ROLE_SELECT
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(db)
                .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                    .fetch_one(db)
                    .await?;

                (rows, total)
            }
        };

        Ok((users.into_iter().map(UserWithRole::from).collect(), total))
    }

    #[instrument(skip(db, dto))]
    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let existing = Self::get_user(db, id).await?;

        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET first_name = $1, last_name = $2, updated_at = NOW() \
             WHERE id = $3 \
             RETURNING id, first_name, last_name, email, birth_date, role_id, created_at, updated_at",
        )
        .bind(&first_name)
        .bind(&last_name)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn assign_role(db: &PgPool, id: Uuid, role: RoleName) -> Result<UserWithRole, AppError> {
        let updated = sqlx::query(
            "UPDATE users SET role_id = (SELECT id FROM roles WHERE name = $1), updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(role)
        .bind(id)
        .execute(db)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id).into());
        }

        Self::get_user_with_role(db, id).await
    }
}

/// Verifies that a user exists and holds the expected role. Runs on any
/// executor so callers can keep the check inside their transaction.
pub async fn ensure_role<'e, E>(
    executor: E,
    user_id: Uuid,
    expected: RoleName,
) -> Result<(), AppError>
where
    E: PgExecutor<'e>,
{
    let role: Option<RoleName> = sqlx::query_scalar(
        "SELECT r.name FROM users u JOIN roles r ON r.id = u.role_id WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    match role {
        None => Err(DomainError::UserNotFound(user_id).into()),
        Some(actual) if actual == expected => Ok(()),
        Some(_) => match expected {
            RoleName::Student => Err(DomainError::InvalidStudentRole(user_id).into()),
            RoleName::Teacher => Err(DomainError::InvalidTeacherRole(user_id).into()),
            RoleName::Admin => Err(AppError::forbidden(format!(
                "User {} does not have the admin role",
                user_id
            ))),
        },
    }
}
