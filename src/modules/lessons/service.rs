use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classrooms::model::ClassroomInfo;
use crate::modules::lessons::model::{
    CreateLessonDto, Lesson, LessonFilterParams, LessonWithRelations, UpdateLessonDto,
    starts_in_future,
};
use crate::modules::roles::model::RoleName;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::subjects::model::SubjectInfo;
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const LESSON_SELECT: &str = "SELECT id, title, description, start_time, end_time, \
     school_class_id, teacher_id, classroom_id, subject_id, created_at, updated_at FROM lessons";

pub struct LessonService;

impl LessonService {
    /// Schedules a lesson. The classroom row is locked so two concurrent
    /// bookings for the same room serialize on the availability check.
    #[instrument(skip(db, dto))]
    pub async fn schedule_lesson(db: &PgPool, dto: CreateLessonDto) -> Result<Lesson, AppError> {
        if dto.start_time >= dto.end_time {
            return Err(DomainError::InvalidTimeRange {
                start: dto.start_time,
                end: dto.end_time,
            }
            .into());
        }
        if !starts_in_future(dto.start_time, Utc::now()) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Lesson start time must be in the future"
            )));
        }

        let mut tx = db.begin().await?;

        let classroom_capacity: i32 =
            sqlx::query_scalar("SELECT capacity FROM classrooms WHERE id = $1 FOR UPDATE")
                .bind(dto.classroom_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(DomainError::ClassroomNotFound(dto.classroom_id))?;

        let max_students: i32 =
            sqlx::query_scalar("SELECT max_students FROM school_classes WHERE id = $1")
                .bind(dto.school_class_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(DomainError::SchoolClassNotFound(dto.school_class_id))?;

        if classroom_capacity < max_students {
            return Err(DomainError::ClassroomCapacityExceeded {
                capacity: classroom_capacity,
                required: max_students,
            }
            .into());
        }

        ensure_role(&mut *tx, dto.teacher_id, RoleName::Teacher).await?;

        let subject: Option<Uuid> = sqlx::query_scalar("SELECT id FROM subjects WHERE id = $1")
            .bind(dto.subject_id)
            .fetch_optional(&mut *tx)
            .await?;
        if subject.is_none() {
            return Err(DomainError::SubjectNotFound(dto.subject_id).into());
        }

        Self::check_classroom_free(
            &mut tx,
            dto.classroom_id,
            dto.start_time,
            dto.end_time,
            None,
        )
        .await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            "INSERT INTO lessons (title, description, start_time, end_time, school_class_id, \
             teacher_id, classroom_id, subject_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id, title, description, start_time, end_time, school_class_id, \
             teacher_id, classroom_id, subject_id, created_at, updated_at",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(dto.school_class_id)
        .bind(dto.teacher_id)
        .bind(dto.classroom_id)
        .bind(dto.subject_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(lesson)
    }

    /// Overlap uses half-open intervals, so a lesson ending exactly when
    /// another starts does not conflict.
    async fn check_classroom_free(
        tx: &mut Transaction<'_, Postgres>,
        classroom_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_lesson: Option<Uuid>,
    ) -> Result<(), AppError> {
        // WHERE clause is the SQL form of model::intervals_overlap; keep the
        // two (and ClassroomService::is_available) in sync
        let conflicts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lessons \
             WHERE classroom_id = $1 AND start_time < $3 AND $2 < end_time \
             AND ($4::uuid IS NULL OR id != $4)",
        )
        .bind(classroom_id)
        .bind(start)
        .bind(end)
        .bind(exclude_lesson)
        .fetch_one(&mut **tx)
        .await?;

        if conflicts > 0 {
            return Err(DomainError::ClassroomNotAvailable {
                classroom_id,
                start,
                end,
            }
            .into());
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn get_lesson(db: &PgPool, id: Uuid) -> Result<Lesson, AppError> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!("{} WHERE id = $1", LESSON_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::LessonNotFound(id))?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn get_lesson_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<LessonWithRelations, AppError> {
        let lesson = Self::get_lesson(db, id).await?;

        let school_class = sqlx::query_as::<_, SchoolClassInfo>(
            "SELECT id, name, max_students FROM school_classes WHERE id = $1",
        )
        .bind(lesson.school_class_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::SchoolClassNotFound(lesson.school_class_id))?;

        let teacher = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(lesson.teacher_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(lesson.teacher_id))?;

        let classroom = sqlx::query_as::<_, ClassroomInfo>(
            "SELECT id, name, capacity FROM classrooms WHERE id = $1",
        )
        .bind(lesson.classroom_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::ClassroomNotFound(lesson.classroom_id))?;

        let subject =
            sqlx::query_as::<_, SubjectInfo>("SELECT id, name FROM subjects WHERE id = $1")
                .bind(lesson.subject_id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::SubjectNotFound(lesson.subject_id))?;

        Ok(LessonWithRelations::project(
            lesson,
            school_class,
            teacher,
            classroom,
            subject,
        ))
    }

    #[instrument(skip(db))]
    pub async fn list_lessons(
        db: &PgPool,
        filter: LessonFilterParams,
    ) -> Result<Vec<Lesson>, AppError> {
        let mut query = String::from(LESSON_SELECT);
        let mut clauses = Vec::new();

        if filter.teacher_id.is_some() {
            clauses.push(format!("teacher_id = ${}", clauses.len() + 1));
        }
        if filter.school_class_id.is_some() {
            clauses.push(format!("school_class_id = ${}", clauses.len() + 1));
        }
        if filter.classroom_id.is_some() {
            clauses.push(format!("classroom_id = ${}", clauses.len() + 1));
        }

        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY start_time");

        let mut q = sqlx::query_as::<_, Lesson>(&query);
        if let Some(teacher_id) = filter.teacher_id {
            q = q.bind(teacher_id);
        }
        if let Some(school_class_id) = filter.school_class_id {
            q = q.bind(school_class_id);
        }
        if let Some(classroom_id) = filter.classroom_id {
            q = q.bind(classroom_id);
        }

        let lessons = q.fetch_all(db).await?;

        Ok(lessons)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_lesson(
        db: &PgPool,
        id: Uuid,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Lesson>(&format!(
            "{} WHERE id = $1 FOR UPDATE",
            LESSON_SELECT
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::LessonNotFound(id))?;

        let title = dto.title.unwrap_or(existing.title);
        let description = dto.description.or(existing.description);
        let start_time = dto.start_time.unwrap_or(existing.start_time);
        let end_time = dto.end_time.unwrap_or(existing.end_time);

        if start_time >= end_time {
            return Err(DomainError::InvalidTimeRange {
                start: start_time,
                end: end_time,
            }
            .into());
        }

        if start_time != existing.start_time || end_time != existing.end_time {
            if !starts_in_future(start_time, Utc::now()) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Lesson start time must be in the future"
                )));
            }

            // Same lock as schedule_lesson, so a concurrent booking for this
            // room cannot slip past the overlap check below.
            sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM classrooms WHERE id = $1 FOR UPDATE",
            )
            .bind(existing.classroom_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DomainError::ClassroomNotFound(existing.classroom_id))?;

            Self::check_classroom_free(
                &mut tx,
                existing.classroom_id,
                start_time,
                end_time,
                Some(id),
            )
            .await?;
        }

        let lesson = sqlx::query_as::<_, Lesson>(
            "UPDATE lessons SET title = $1, description = $2, start_time = $3, end_time = $4, \
             updated_at = NOW() WHERE id = $5 \
             RETURNING id, title, description, start_time, end_time, school_class_id, \
             teacher_id, classroom_id, subject_id, created_at, updated_at",
        )
        .bind(&title)
        .bind(&description)
        .bind(start_time)
        .bind(end_time)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn delete_lesson(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::new(
                            axum::http::StatusCode::CONFLICT,
                            anyhow::anyhow!("Lesson {} has attendance records", id),
                        );
                    }
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::LessonNotFound(id).into());
        }

        Ok(())
    }
}
