use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::attendance::model::{
    Attendance, AttendanceRate, AttendanceWithRelations, CreateAttendanceDto,
    within_lesson_bounds,
};
use crate::modules::lessons::model::LessonInfo;
use crate::modules::roles::model::RoleName;
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const ATTENDANCE_SELECT: &str = "SELECT id, present, entry_time, exit_time, student_id, \
     lesson_id, created_at, updated_at FROM attendance";

pub struct AttendanceService;

impl AttendanceService {
    /// Records attendance for one student at one lesson. The `present`
    /// flag is stored exactly as supplied.
    #[instrument(skip(db, dto))]
    pub async fn record_attendance(
        db: &PgPool,
        dto: CreateAttendanceDto,
    ) -> Result<Attendance, AppError> {
        if dto.entry_time > dto.exit_time {
            return Err(DomainError::InvalidTimeRange {
                start: dto.entry_time,
                end: dto.exit_time,
            }
            .into());
        }

        let mut tx = db.begin().await?;

        let lesson = sqlx::query_as::<_, LessonInfo>(
            "SELECT id, title, start_time, end_time FROM lessons WHERE id = $1",
        )
        .bind(dto.lesson_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::LessonNotFound(dto.lesson_id))?;

        if !within_lesson_bounds(
            dto.entry_time,
            dto.exit_time,
            lesson.start_time,
            lesson.end_time,
        ) {
            return Err(DomainError::TimeOutOfBounds {
                entry: dto.entry_time,
                exit: dto.exit_time,
                lesson_start: lesson.start_time,
                lesson_end: lesson.end_time,
            }
            .into());
        }

        ensure_role(&mut *tx, dto.student_id, RoleName::Student).await?;

        let attendance = sqlx::query_as::<_, Attendance>(
            "INSERT INTO attendance (present, entry_time, exit_time, student_id, lesson_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, present, entry_time, exit_time, student_id, lesson_id, \
             created_at, updated_at",
        )
        .bind(dto.present)
        .bind(dto.entry_time)
        .bind(dto.exit_time)
        .bind(dto.student_id)
        .bind(dto.lesson_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(attendance)
    }

    #[instrument(skip(db))]
    pub async fn get_attendance(db: &PgPool, id: Uuid) -> Result<AttendanceWithRelations, AppError> {
        let attendance =
            sqlx::query_as::<_, Attendance>(&format!("{} WHERE id = $1", ATTENDANCE_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::AttendanceNotFound(id))?;

        let student = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(attendance.student_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(attendance.student_id))?;

        let lesson = sqlx::query_as::<_, LessonInfo>(
            "SELECT id, title, start_time, end_time FROM lessons WHERE id = $1",
        )
        .bind(attendance.lesson_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::LessonNotFound(attendance.lesson_id))?;

        Ok(AttendanceWithRelations::project(attendance, student, lesson))
    }

    #[instrument(skip(db))]
    pub async fn list_by_lesson(db: &PgPool, lesson_id: Uuid) -> Result<Vec<Attendance>, AppError> {
        let lesson: Option<Uuid> = sqlx::query_scalar("SELECT id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(db)
            .await?;
        if lesson.is_none() {
            return Err(DomainError::LessonNotFound(lesson_id).into());
        }

        let records = sqlx::query_as::<_, Attendance>(&format!(
            "{} WHERE lesson_id = $1 ORDER BY entry_time",
            ATTENDANCE_SELECT
        ))
        .bind(lesson_id)
        .fetch_all(db)
        .await?;

        Ok(records)
    }

    #[instrument(skip(db))]
    pub async fn list_by_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<Attendance>, AppError> {
        let records = sqlx::query_as::<_, Attendance>(&format!(
            "{} WHERE student_id = $1 ORDER BY entry_time DESC",
            ATTENDANCE_SELECT
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(records)
    }

    /// Fraction of recorded lessons the student was present for. NULL
    /// when no records exist.
    #[instrument(skip(db))]
    pub async fn attendance_rate(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<AttendanceRate, AppError> {
        ensure_role(db, student_id, RoleName::Student).await?;

        let rate = sqlx::query_as::<_, AttendanceRate>(
            "SELECT $1::uuid AS student_id, \
             COUNT(*) AS total_records, \
             COUNT(*) FILTER (WHERE present) AS present_count, \
             AVG(CASE WHEN present THEN 1.0 ELSE 0.0 END)::float8 AS rate \
             FROM attendance WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_one(db)
        .await?;

        Ok(rate)
    }
}
