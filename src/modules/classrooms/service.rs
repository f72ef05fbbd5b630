use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classrooms::model::{Classroom, CreateClassroomDto, UpdateClassroomDto};
use crate::utils::errors::{AppError, DomainError};

const CLASSROOM_SELECT: &str =
    "SELECT id, name, capacity, created_at, updated_at FROM classrooms";

pub struct ClassroomService;

impl ClassroomService {
    #[instrument(skip(db, dto))]
    pub async fn create_classroom(
        db: &PgPool,
        dto: CreateClassroomDto,
    ) -> Result<Classroom, AppError> {
        let classroom = sqlx::query_as::<_, Classroom>(
            "INSERT INTO classrooms (name, capacity) VALUES ($1, $2) \
             RETURNING id, name, capacity, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(dto.capacity)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::new(
                        axum::http::StatusCode::CONFLICT,
                        anyhow::anyhow!("Classroom '{}' already exists", dto.name),
                    );
                }
            }
            AppError::database(e)
        })?;

        Ok(classroom)
    }

    #[instrument(skip(db))]
    pub async fn get_classroom(db: &PgPool, id: Uuid) -> Result<Classroom, AppError> {
        let classroom =
            sqlx::query_as::<_, Classroom>(&format!("{} WHERE id = $1", CLASSROOM_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::ClassroomNotFound(id))?;

        Ok(classroom)
    }

    #[instrument(skip(db))]
    pub async fn list_classrooms(db: &PgPool) -> Result<Vec<Classroom>, AppError> {
        let classrooms =
            sqlx::query_as::<_, Classroom>(&format!("{} ORDER BY name", CLASSROOM_SELECT))
                .fetch_all(db)
                .await?;

        Ok(classrooms)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_classroom(
        db: &PgPool,
        id: Uuid,
        dto: UpdateClassroomDto,
    ) -> Result<Classroom, AppError> {
        let existing = Self::get_classroom(db, id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let capacity = dto.capacity.unwrap_or(existing.capacity);

        let classroom = sqlx::query_as::<_, Classroom>(
            "UPDATE classrooms SET name = $1, capacity = $2, updated_at = NOW() WHERE id = $3 \
             RETURNING id, name, capacity, created_at, updated_at",
        )
        .bind(&name)
        .bind(capacity)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(classroom)
    }

    #[instrument(skip(db))]
    pub async fn delete_classroom(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classrooms WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::new(
                            axum::http::StatusCode::CONFLICT,
                            anyhow::anyhow!(
                                "Classroom {} is still referenced by lessons or exams",
                                id
                            ),
                        );
                    }
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ClassroomNotFound(id).into());
        }

        Ok(())
    }

    /// Checks whether a classroom is free of lesson bookings in a half-open
    /// window. Always computed against the latest committed state.
    #[instrument(skip(db))]
    pub async fn is_available(
        db: &PgPool,
        id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange { start, end }.into());
        }

        // Ensure the classroom exists before reporting on it
        Self::get_classroom(db, id).await?;

        // WHERE clause is the SQL form of lessons::model::intervals_overlap;
        // keep the two (and LessonService::check_classroom_free) in sync
        let overlapping: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons \
             WHERE classroom_id = $1 AND start_time < $3 AND $2 < end_time",
        )
        .bind(id)
        .bind(start)
        .bind(end)
        .fetch_one(db)
        .await?;

        Ok(overlapping == 0)
    }
}
