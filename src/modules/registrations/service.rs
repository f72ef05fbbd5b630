use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::CourseInfo;
use crate::modules::registrations::model::{
    CreateRegistrationDto, Registration, RegistrationFilterParams, RegistrationStatus,
    RegistrationWithRelations, has_capacity, is_duplicate_registration,
};
use crate::modules::roles::model::RoleName;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const REGISTRATION_SELECT: &str = "SELECT id, registration_date, status, student_id, course_id, \
     school_class_id, created_at, updated_at FROM registrations";

pub struct RegistrationService;

impl RegistrationService {
    /// Registers a student into a school class. The class row is locked
    /// for the duration of the transaction so two concurrent registrations
    /// cannot both pass the capacity check.
    #[instrument(skip(db, dto))]
    pub async fn register(
        db: &PgPool,
        dto: CreateRegistrationDto,
    ) -> Result<Registration, AppError> {
        let mut tx = db.begin().await?;

        let class: Option<(Uuid, i32)> = sqlx::query_as(
            "SELECT course_id, max_students FROM school_classes WHERE id = $1 FOR UPDATE",
        )
        .bind(dto.school_class_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (course_id, max_students) =
            class.ok_or(DomainError::SchoolClassNotFound(dto.school_class_id))?;

        ensure_role(&mut *tx, dto.student_id, RoleName::Student).await?;

        let duplicate: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations \
             WHERE student_id = $1 AND school_class_id = $2 AND status = 'active'",
        )
        .bind(dto.student_id)
        .bind(dto.school_class_id)
        .fetch_one(&mut *tx)
        .await?;

        if is_duplicate_registration(duplicate) {
            return Err(DomainError::DuplicateRegistration {
                student_id: dto.student_id,
                school_class_id: dto.school_class_id,
            }
            .into());
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations \
             WHERE school_class_id = $1 AND status = 'active'",
        )
        .bind(dto.school_class_id)
        .fetch_one(&mut *tx)
        .await?;

        if !has_capacity(active, max_students) {
            return Err(DomainError::SchoolClassFull {
                school_class_id: dto.school_class_id,
                max_students,
            }
            .into());
        }

        let registration = sqlx::query_as::<_, Registration>(
            "INSERT INTO registrations (status, student_id, course_id, school_class_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, registration_date, status, student_id, course_id, school_class_id, \
             created_at, updated_at",
        )
        .bind(RegistrationStatus::Active)
        .bind(dto.student_id)
        .bind(course_id)
        .bind(dto.school_class_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // Partial unique index backstop, in case the check above raced
            // an insert outside this lock.
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return DomainError::DuplicateRegistration {
                        student_id: dto.student_id,
                        school_class_id: dto.school_class_id,
                    }
                    .into();
                }
            }
            AppError::database(e)
        })?;

        tx.commit().await?;

        Ok(registration)
    }

    #[instrument(skip(db))]
    pub async fn get_registration(db: &PgPool, id: Uuid) -> Result<Registration, AppError> {
        let registration =
            sqlx::query_as::<_, Registration>(&format!("{} WHERE id = $1", REGISTRATION_SELECT))
                .bind(id)
                .fetch_optional(db)
                .await?
                .ok_or(DomainError::RegistrationNotFound(id))?;

        Ok(registration)
    }

    #[instrument(skip(db))]
    pub async fn get_registration_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<RegistrationWithRelations, AppError> {
        let registration = Self::get_registration(db, id).await?;

        let student = sqlx::query_as::<_, UserInfo>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(registration.student_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::UserNotFound(registration.student_id))?;

        let course = sqlx::query_as::<_, CourseInfo>("SELECT id, title FROM courses WHERE id = $1")
            .bind(registration.course_id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::CourseNotFound(registration.course_id))?;

        let school_class = sqlx::query_as::<_, SchoolClassInfo>(
            "SELECT id, name, max_students FROM school_classes WHERE id = $1",
        )
        .bind(registration.school_class_id)
        .fetch_optional(db)
        .await?
        .ok_or(DomainError::SchoolClassNotFound(registration.school_class_id))?;

        Ok(RegistrationWithRelations::project(
            registration,
            student,
            course,
            school_class,
        ))
    }

    #[instrument(skip(db))]
    pub async fn list_registrations(
        db: &PgPool,
        filter: RegistrationFilterParams,
    ) -> Result<Vec<Registration>, AppError> {
        let mut query = String::from(REGISTRATION_SELECT);
        let mut clauses = Vec::new();

        if filter.student_id.is_some() {
            clauses.push(format!("student_id = ${}", clauses.len() + 1));
        }
        if filter.school_class_id.is_some() {
            clauses.push(format!("school_class_id = ${}", clauses.len() + 1));
        }
        if filter.status.is_some() {
            clauses.push(format!("status = ${}", clauses.len() + 1));
        }

        if !clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&clauses.join(" AND "));
        }
        query.push_str(" ORDER BY registration_date DESC");

        let mut q = sqlx::query_as::<_, Registration>(&query);
        if let Some(student_id) = filter.student_id {
            q = q.bind(student_id);
        }
        if let Some(school_class_id) = filter.school_class_id {
            q = q.bind(school_class_id);
        }
        if let Some(status) = filter.status {
            q = q.bind(status);
        }

        let registrations = q.fetch_all(db).await?;

        Ok(registrations)
    }

    /// Moves a registration to a new status, rejecting anything but the
    /// ACTIVE -> COMPLETED and ACTIVE -> CANCELLED transitions.
    #[instrument(skip(db))]
    pub async fn transition(
        db: &PgPool,
        id: Uuid,
        next: RegistrationStatus,
    ) -> Result<Registration, AppError> {
        let mut tx = db.begin().await?;

        let registration = sqlx::query_as::<_, Registration>(&format!(
            "{} WHERE id = $1 FOR UPDATE",
            REGISTRATION_SELECT
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::RegistrationNotFound(id))?;

        if !registration.status.can_transition_to(next) {
            return Err(DomainError::InvalidStatusTransition {
                from: registration.status.to_string(),
                to: next.to_string(),
            }
            .into());
        }

        let updated = sqlx::query_as::<_, Registration>(
            "UPDATE registrations SET status = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING id, registration_date, status, student_id, course_id, school_class_id, \
             created_at, updated_at",
        )
        .bind(next)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }
}
