use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::CourseInfo;
use crate::modules::roles::model::RoleName;
use crate::modules::subjects::model::{
    CreateSubjectDto, Subject, SubjectWithRelations, UpdateSubjectDto,
};
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const SUBJECT_SELECT: &str =
    "SELECT id, name, description, teacher_id, created_at, updated_at FROM subjects";

pub struct SubjectService;

impl SubjectService {
    #[instrument(skip(db, dto))]
    pub async fn create_subject(db: &PgPool, dto: CreateSubjectDto) -> Result<Subject, AppError> {
        ensure_role(db, dto.teacher_id, RoleName::Teacher).await?;

        let subject = sqlx::query_as::<_, Subject>(
            "INSERT INTO subjects (name, description, teacher_id) VALUES ($1, $2, $3) \
             RETURNING id, name, description, teacher_id, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.teacher_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::new(
                        axum::http::StatusCode::CONFLICT,
                        anyhow::anyhow!("Subject '{}' already exists", dto.name),
                    );
                }
            }
            AppError::database(e)
        })?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subject(db: &PgPool, id: Uuid) -> Result<Subject, AppError> {
        let subject = sqlx::query_as::<_, Subject>(&format!("{} WHERE id = $1", SUBJECT_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::SubjectNotFound(id))?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn get_subject_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<SubjectWithRelations, AppError> {
        let subject = Self::get_subject(db, id).await?;

        let teacher = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(subject.teacher_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(subject.teacher_id))?;

        let courses = sqlx::query_as::<_, CourseInfo>(
            "SELECT c.id, c.title FROM courses c \
             JOIN course_subjects cs ON cs.course_id = c.id \
             WHERE cs.subject_id = $1 ORDER BY c.title",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(SubjectWithRelations::project(subject, teacher, courses))
    }

    #[instrument(skip(db))]
    pub async fn list_subjects(db: &PgPool) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(&format!("{} ORDER BY name", SUBJECT_SELECT))
            .fetch_all(db)
            .await?;

        Ok(subjects)
    }

    #[instrument(skip(db))]
    pub async fn list_subjects_by_teacher(
        db: &PgPool,
        teacher_id: Uuid,
    ) -> Result<Vec<Subject>, AppError> {
        let subjects = sqlx::query_as::<_, Subject>(&format!(
            "{} WHERE teacher_id = $1 ORDER BY name",
            SUBJECT_SELECT
        ))
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        Ok(subjects)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_subject(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSubjectDto,
    ) -> Result<Subject, AppError> {
        let existing = Self::get_subject(db, id).await?;

        if let Some(teacher_id) = dto.teacher_id {
            ensure_role(db, teacher_id, RoleName::Teacher).await?;
        }

        let name = dto.name.unwrap_or(existing.name);
        let description = dto.description.or(existing.description);
        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher_id);

        let subject = sqlx::query_as::<_, Subject>(
            "UPDATE subjects SET name = $1, description = $2, teacher_id = $3, updated_at = NOW() \
             WHERE id = $4 \
             RETURNING id, name, description, teacher_id, created_at, updated_at",
        )
        .bind(&name)
        .bind(&description)
        .bind(teacher_id)
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(subject)
    }

    #[instrument(skip(db))]
    pub async fn delete_subject(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::new(
                            axum::http::StatusCode::CONFLICT,
                            anyhow::anyhow!("Subject {} is still referenced", id),
                        );
                    }
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::SubjectNotFound(id).into());
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn add_course(db: &PgPool, subject_id: Uuid, course_id: Uuid) -> Result<(), AppError> {
        Self::get_subject(db, subject_id).await?;

        let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(db)
            .await?;

        if exists.is_none() {
            return Err(DomainError::CourseNotFound(course_id).into());
        }

        sqlx::query(
            "INSERT INTO course_subjects (course_id, subject_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(course_id)
        .bind(subject_id)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn remove_course(
        db: &PgPool,
        subject_id: Uuid,
        course_id: Uuid,
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM course_subjects WHERE course_id = $1 AND subject_id = $2")
            .bind(course_id)
            .bind(subject_id)
            .execute(db)
            .await?;

        Ok(())
    }
}
