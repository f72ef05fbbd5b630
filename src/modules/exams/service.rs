use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::classrooms::model::ClassroomInfo;
use crate::modules::courses::model::CourseInfo;
use crate::modules::exams::model::{
    CreateExamDto, CreateExamResultDto, Exam, ExamFilterParams, ExamInfo, ExamResult,
    ExamResultWithRelations, ExamStatistics, ExamWithRelations, is_passing,
};
use crate::modules::roles::model::RoleName;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::subjects::model::SubjectInfo;
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const EXAM_SELECT: &str = "SELECT id, title, description, date, duration_minutes, max_score, \
     passing_score, classroom_id, subject_id, school_class_id, teacher_id, created_at, \
     updated_at FROM exams";

const RESULT_SELECT: &str = "SELECT id, score, notes, date, exam_id, student_id, created_at, \
     updated_at FROM exam_results";

pub struct ExamService;

impl ExamService {
    #[instrument(skip(db, dto))]
    pub async fn create_exam(db: &PgPool, dto: CreateExamDto) -> Result<Exam, AppError> {
        if dto.passing_score > dto.max_score {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Passing score {} exceeds max score {}",
                dto.passing_score,
                dto.max_score
            )));
        }
        if dto.date <= Utc::now() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Exam date must be in the future"
            )));
        }

        let mut tx = db.begin().await?;

        let classroom_capacity: i32 =
            sqlx::query_scalar("SELECT capacity FROM classrooms WHERE id = $1")
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

        let subject: Option<Uuid> = sqlx::query_scalar("SELECT id FROM subjects WHERE id = $1")
            .bind(dto.subject_id)
            .fetch_optional(&mut *tx)
            .await?;
        if subject.is_none() {
            return Err(DomainError::SubjectNotFound(dto.subject_id).into());
        }

        ensure_role(&mut *tx, dto.teacher_id, RoleName::Teacher).await?;

        let exam = sqlx::query_as::<_, Exam>(
            "INSERT INTO exams (title, description, date, duration_minutes, max_score, \
             passing_score, classroom_id, subject_id, school_class_id, teacher_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING id, title, description, date, duration_minutes, max_score, passing_score, \
             classroom_id, subject_id, school_class_id, teacher_id, created_at, updated_at",
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(dto.duration_minutes)
        .bind(dto.max_score)
        .bind(dto.passing_score)
        .bind(dto.classroom_id)
        .bind(dto.subject_id)
        .bind(dto.school_class_id)
        .bind(dto.teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(exam)
    }

    #[instrument(skip(db))]
    pub async fn get_exam(db: &PgPool, id: Uuid) -> Result<Exam, AppError> {
        let exam = sqlx::query_as::<_, Exam>(&format!("{} WHERE id = $1", EXAM_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::ExamNotFound(id))?;

        Ok(exam)
    }

    #[instrument(skip(db))]
    pub async fn get_exam_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<ExamWithRelations, AppError> {
        let exam = Self::get_exam(db, id).await?;

        let classroom = sqlx::query_as::<_, ClassroomInfo>(
            "SELECT id, name, capacity FROM classrooms WHERE id = $1",
        )
        .bind(exam.classroom_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::ClassroomNotFound(exam.classroom_id))?;

        let subject =
            sqlx::query_as::<_, SubjectInfo>("SELECT id, name FROM subjects WHERE id = $1")
                .bind(exam.subject_id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::SubjectNotFound(exam.subject_id))?;

        let school_class = sqlx::query_as::<_, SchoolClassInfo>(
            "SELECT id, name, max_students FROM school_classes WHERE id = $1",
        )
        .bind(exam.school_class_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::SchoolClassNotFound(exam.school_class_id))?;

        let teacher = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(exam.teacher_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(exam.teacher_id))?;

        let courses = sqlx::query_as::<_, CourseInfo>(
            "SELECT c.id, c.title FROM courses c \
             JOIN exam_courses ec ON ec.course_id = c.id \
             WHERE ec.exam_id = $1 ORDER BY c.title",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        Ok(ExamWithRelations::project(
            exam,
            classroom,
            subject,
            school_class,
            teacher,
            courses,
        ))
    }

    #[instrument(skip(db))]
    pub async fn list_exams(db: &PgPool, filter: ExamFilterParams) -> Result<Vec<Exam>, AppError> {
        let mut query = String::from(EXAM_SELECT);
        let mut clauses = Vec::new();

        if filter.subject_id.is_some() {
            clauses.push(format!("subject_id = ${}", clauses.len() + 1));
        }
        if filter.school_class_id.is_some() {
            clauses.push(format!("school_class_id = ${}", clauses.len() + 1));
        }
        if filter.teacher_id.is_some() {
            clauses.push(format!("teacher_id = ${}", clauses.len() + 1));
        }

        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY date");

        let mut q = sqlx::query_as::<_, Exam>(&query);
        if let Some(subject_id) = filter.subject_id {
            q = q.bind(subject_id);
        }
        if let Some(school_class_id) = filter.school_class_id {
            q = q.bind(school_class_id);
        }
        if let Some(teacher_id) = filter.teacher_id {
            q = q.bind(teacher_id);
        }

        let exams = q.fetch_all(db).await?;

        Ok(exams)
    }

    #[instrument(skip(db))]
    pub async fn add_course(db: &PgPool, id: Uuid, course_id: Uuid) -> Result<(), AppError> {
        Self::get_exam(db, id).await?;

        let course: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(db)
            .await?;
        if course.is_none() {
            return Err(DomainError::CourseNotFound(course_id).into());
        }

        sqlx::query(
            "INSERT INTO exam_courses (exam_id, course_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(course_id)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn remove_course(db: &PgPool, id: Uuid, course_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM exam_courses WHERE exam_id = $1 AND course_id = $2")
            .bind(id)
            .bind(course_id)
            .execute(db)
            .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_exam(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM exams WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::new(
                            axum::http::StatusCode::CONFLICT,
                            anyhow::anyhow!("Exam {} has recorded results", id),
                        );
                    }
                }
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ExamNotFound(id).into());
        }

        Ok(())
    }

    /// Records a result for a past exam sitting. Scores are bounded by the
    /// exam's max_score; the pass/fail verdict is derived, never stored.
    #[instrument(skip(db, dto))]
    pub async fn record_result(
        db: &PgPool,
        exam_id: Uuid,
        dto: CreateExamResultDto,
    ) -> Result<ExamResult, AppError> {
        if dto.date > Utc::now() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Result date must be in the past"
            )));
        }

        let mut tx = db.begin().await?;

        let exam = sqlx::query_as::<_, Exam>(&format!("{} WHERE id = $1", EXAM_SELECT))
            .bind(exam_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(DomainError::ExamNotFound(exam_id))?;

        if dto.score > exam.max_score {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Score {} exceeds exam max score {}",
                dto.score,
                exam.max_score
            )));
        }

        ensure_role(&mut *tx, dto.student_id, RoleName::Student).await?;

        let result = sqlx::query_as::<_, ExamResult>(
            "INSERT INTO exam_results (score, notes, date, exam_id, student_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, score, notes, date, exam_id, student_id, created_at, updated_at",
        )
        .bind(dto.score)
        .bind(&dto.notes)
        .bind(dto.date)
        .bind(exam_id)
        .bind(dto.student_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result)
    }

    #[instrument(skip(db))]
    pub async fn get_result(db: &PgPool, id: Uuid) -> Result<ExamResultWithRelations, AppError> {
        let result = sqlx::query_as::<_, ExamResult>(&format!("{} WHERE id = $1", RESULT_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::ExamResultNotFound(id))?;

        let exam = sqlx::query_as::<_, ExamInfo>(
            "SELECT id, title, date, max_score, passing_score FROM exams WHERE id = $1",
        )
        .bind(result.exam_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::ExamNotFound(result.exam_id))?;

        let student = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(result.student_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(result.student_id))?;

        Ok(ExamResultWithRelations::project(result, exam, student))
    }

    #[instrument(skip(db))]
    pub async fn list_results_for_exam(
        db: &PgPool,
        exam_id: Uuid,
    ) -> Result<Vec<ExamResultWithRelations>, AppError> {
        let exam = sqlx::query_as::<_, ExamInfo>(
            "SELECT id, title, date, max_score, passing_score FROM exams WHERE id = $1",
        )
        .bind(exam_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::ExamNotFound(exam_id))?;

        let rows = sqlx::query_as::<_, ExamResult>(&format!(
            "{} WHERE exam_id = $1 ORDER BY date",
            RESULT_SELECT
        ))
        .bind(exam_id)
        .fetch_all(db)
        .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let student = sqlx::query_as::<_, UserInfo>(
                "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
            )
            .bind(row.student_id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::UserNotFound(row.student_id))?;

            results.push(ExamResultWithRelations::project(
                row,
                exam.clone(),
                student,
            ));
        }

        Ok(results)
    }

    #[instrument(skip(db))]
    pub async fn list_results_for_student(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<Vec<ExamResult>, AppError> {
        let results = sqlx::query_as::<_, ExamResult>(&format!(
            "{} WHERE student_id = $1 ORDER BY date DESC",
            RESULT_SELECT
        ))
        .bind(student_id)
        .fetch_all(db)
        .await?;

        Ok(results)
    }

    /// Pass/fail counts and the average score for one exam. Reads a
    /// committed snapshot; no locking.
    #[instrument(skip(db))]
    pub async fn exam_statistics(db: &PgPool, exam_id: Uuid) -> Result<ExamStatistics, AppError> {
        let passing_score: i32 =
            sqlx::query_scalar("SELECT passing_score FROM exams WHERE id = $1")
                .bind(exam_id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::ExamNotFound(exam_id))?;

        let stats = sqlx::query_as::<_, ExamStatistics>(
            "SELECT $1::uuid AS exam_id, \
             COUNT(*) AS result_count, \
             COUNT(*) FILTER (WHERE score >= $2) AS pass_count, \
             COUNT(*) FILTER (WHERE score < $2) AS fail_count, \
             AVG(score)::float8 AS average_score \
             FROM exam_results WHERE exam_id = $1",
        )
        .bind(exam_id)
        .bind(passing_score)
        .fetch_one(db)
        .await?;

        Ok(stats)
    }
}

// is_passing is re-exported through the model; the service keeps the SQL
// aggregate in sync with the same inclusive boundary.
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_filter_matches_is_passing_boundary() {
        // The FILTER clauses above use score >= passing_score.
        assert!(is_passing(60, 60));
        assert!(!is_passing(59, 60));
    }
}
