use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::{
    Course, CourseWithRelations, CreateCourseDto, UpdateCourseDto,
};
use crate::modules::subjects::model::SubjectInfo;
use crate::utils::errors::{AppError, DomainError};

const COURSE_SELECT: &str = "SELECT id, title, description, duration_hours, price_cents, \
     created_at, updated_at FROM courses";

pub struct CourseService;

impl CourseService {
    #[instrument(skip(db, dto))]
    pub async fn create_course(db: &PgPool, dto: CreateCourseDto) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(
            "INSERT INTO courses (title, description, duration_hours, price_cents) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, duration_hours, price_cents, created_at, updated_at",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.duration_hours)
        .bind(dto.price_cents)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_course(db: &PgPool, id: Uuid) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!("{} WHERE id = $1", COURSE_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::CourseNotFound(id))?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn get_course_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<CourseWithRelations, AppError> {
        let course = Self::get_course(db, id).await?;

        let subjects = sqlx::query_as::<_, SubjectInfo>(
            "SELECT s.id, s.name FROM subjects s \
             JOIN course_subjects cs ON cs.subject_id = s.id \
             WHERE cs.course_id = $1 ORDER BY s.name",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(CourseWithRelations::project(course, subjects))
    }

    #[instrument(skip(db))]
    pub async fn list_courses(db: &PgPool) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(&format!("{} ORDER BY title", COURSE_SELECT))
            .fetch_all(db)
            .await?;

        Ok(courses)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_course(
        db: &PgPool,
        id: Uuid,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let existing = Self::get_course(db, id).await?;

        let title = dto.title.unwrap_or(existing.title);
        let description = dto.description.or(existing.description);
        let duration_hours = dto.duration_hours.unwrap_or(existing.duration_hours);
        let price_cents = dto.price_cents.unwrap_or(existing.price_cents);

        let course = sqlx::query_as::<_, Course>(
            "UPDATE courses SET title = $1, description = $2, duration_hours = $3, \
             price_cents = $4, updated_at = NOW() WHERE id = $5 \
             RETURNING id, title, description, duration_hours, price_cents, created_at, updated_at",
        )
        .bind(&title)
        .bind(&description)
        .bind(duration_hours)
        .bind(price_cents)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn delete_course(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::new(
                            axum::http::StatusCode::CONFLICT,
                            anyhow::anyhow!(
                                "Course {} is still referenced by classes or registrations",
                                id
                            ),
                        );
                    }
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CourseNotFound(id).into());
        }

        Ok(())
    }
}
