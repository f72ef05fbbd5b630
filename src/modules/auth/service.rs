use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::roles::model::RoleName;
use crate::modules::users::model::UserWithRole;
use crate::modules::users::service::UserService;
use crate::utils::errors::{AppError, DomainError};
use crate::utils::jwt::create_access_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{ChangePasswordDto, LoginRequest, LoginResponse, SignupDto};

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto))]
    pub async fn signup(db: &PgPool, dto: SignupDto) -> Result<UserWithRole, AppError> {
        if let Some(birth_date) = dto.birth_date {
            if birth_date >= Utc::now().date_naive() {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Birth date {} must be in the past",
                    birth_date
                )));
            }
        }

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;

        if exists.is_some() {
            return Err(DomainError::EmailAlreadyExists(dto.email).into());
        }

        let hashed_password = hash_password(&dto.password)?;

        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO users (first_name, last_name, email, password, birth_date, role_id) \
             VALUES ($1, $2, $3, $4, $5, (SELECT id FROM roles WHERE name = $6)) \
             RETURNING id",
        )
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(dto.birth_date)
        .bind(RoleName::Student)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::EmailAlreadyExists(dto.email.clone()).into();
                }
            }
            AppError::database(e)
        })?;

        UserService::get_user_with_role(db, id).await
    }

    #[instrument(skip(db, dto, jwt_config))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct Credentials {
            id: Uuid,
            password: String,
            role_name: RoleName,
        }

        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT u.id, u.password, r.name AS role_name \
             FROM users u JOIN roles r ON r.id = u.role_id WHERE u.email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password".to_string()))?;

        let is_valid = verify_password(&dto.password, &credentials.password)?;

        if !is_valid {
            return Err(AppError::unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let access_token = create_access_token(
            credentials.id,
            &dto.email,
            credentials.role_name.as_str(),
            jwt_config,
        )?;

        let user = UserService::get_user_with_role(db, credentials.id).await?;

        Ok(LoginResponse { access_token, user })
    }

    #[instrument(skip(db, dto))]
    pub async fn change_password(
        db: &PgPool,
        user_id: Uuid,
        dto: ChangePasswordDto,
    ) -> Result<(), AppError> {
        let stored_hash: Option<String> =
            sqlx::query_scalar("SELECT password FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(db)
                .await?;

        let stored_hash = stored_hash.ok_or(DomainError::UserNotFound(user_id))?;

        if !verify_password(&dto.current_password, &stored_hash)? {
            return Err(DomainError::InvalidPassword.into());
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(())
    }
}
