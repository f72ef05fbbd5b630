use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::courses::model::CourseInfo;
use crate::modules::roles::model::RoleName;
use crate::modules::school_classes::model::{
    CreateSchoolClassDto, SchoolClass, SchoolClassWithRelations, TeacherRemoval,
    UpdateSchoolClassDto, teacher_removal,
};
use crate::modules::users::model::UserInfo;
use crate::modules::users::service::ensure_role;
use crate::utils::errors::{AppError, DomainError};

const CLASS_SELECT: &str =
    "SELECT id, name, course_id, max_students, created_at, updated_at FROM school_classes";

pub struct SchoolClassService;

impl SchoolClassService {
    #[instrument(skip(db, dto))]
    pub async fn create_school_class(
        db: &PgPool,
        dto: CreateSchoolClassDto,
    ) -> Result<SchoolClass, AppError> {
        let mut tx = db.begin().await?;

        let course: Option<Uuid> = sqlx::query_scalar("SELECT id FROM courses WHERE id = $1")
            .bind(dto.course_id)
            .fetch_optional(&mut *tx)
            .await?;

        if course.is_none() {
            return Err(DomainError::CourseNotFound(dto.course_id).into());
        }

        for teacher_id in &dto.teacher_ids {
            ensure_role(&mut *tx, *teacher_id, RoleName::Teacher).await?;
        }

        let class = sqlx::query_as::<_, SchoolClass>(
            "INSERT INTO school_classes (name, course_id, max_students) VALUES ($1, $2, $3) \
             RETURNING id, name, course_id, max_students, created_at, updated_at",
        )
        .bind(&dto.name)
        .bind(dto.course_id)
        .bind(dto.max_students)
        .fetch_one(&mut *tx)
        .await?;

        for teacher_id in &dto.teacher_ids {
            sqlx::query(
                "INSERT INTO school_class_teachers (school_class_id, teacher_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(class.id)
            .bind(teacher_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn get_school_class(db: &PgPool, id: Uuid) -> Result<SchoolClass, AppError> {
        let class = sqlx::query_as::<_, SchoolClass>(&format!("{} WHERE id = $1", CLASS_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::SchoolClassNotFound(id))?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn get_school_class_with_relations(
        db: &PgPool,
        id: Uuid,
    ) -> Result<SchoolClassWithRelations, AppError> {
        let class = Self::get_school_class(db, id).await?;

        let course = sqlx::query_as::<_, CourseInfo>("SELECT id, title FROM courses WHERE id = $1")
            .bind(class.course_id)
            .fetch_optional(db)
            .await?
            .ok_or(DomainError::CourseNotFound(class.course_id))?;

        let teachers = sqlx::query_as::<_, UserInfo>(
            "SELECT u.id, u.first_name, u.last_name, u.email FROM users u \
             JOIN school_class_teachers sct ON sct.teacher_id = u.id \
             WHERE sct.school_class_id = $1 ORDER BY u.last_name",
        )
        .bind(id)
        .fetch_all(db)
        .await?;

        let active_registrations: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE school_class_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(db)
        .await?;

        Ok(SchoolClassWithRelations::project(
            class,
            course,
            teachers,
            active_registrations,
        ))
    }

    #[instrument(skip(db))]
    pub async fn list_school_classes(db: &PgPool) -> Result<Vec<SchoolClass>, AppError> {
        let classes = sqlx::query_as::<_, SchoolClass>(&format!("{} ORDER BY name", CLASS_SELECT))
            .fetch_all(db)
            .await?;

        Ok(classes)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_school_class(
        db: &PgPool,
        id: Uuid,
        dto: UpdateSchoolClassDto,
    ) -> Result<SchoolClass, AppError> {
        let mut tx = db.begin().await?;

        // Lock the row so a capacity shrink races neither registration
        // writes nor a concurrent update.
        let existing = sqlx::query_as::<_, SchoolClass>(&format!(
            "{} WHERE id = $1 FOR UPDATE",
            CLASS_SELECT
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(DomainError::SchoolClassNotFound(id))?;

        let name = dto.name.unwrap_or(existing.name);
        let max_students = dto.max_students.unwrap_or(existing.max_students);

        if max_students < existing.max_students {
            let active: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM registrations \
                 WHERE school_class_id = $1 AND status = 'active'",
            )
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if active > max_students as i64 {
                return Err(AppError::unprocessable(anyhow::anyhow!(
                    "Cannot reduce max_students to {}: {} active registrations exist",
                    max_students,
                    active
                )));
            }
        }

        let class = sqlx::query_as::<_, SchoolClass>(
            "UPDATE school_classes SET name = $1, max_students = $2, updated_at = NOW() \
             WHERE id = $3 \
             RETURNING id, name, course_id, max_students, created_at, updated_at",
        )
        .bind(&name)
        .bind(max_students)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(class)
    }

    #[instrument(skip(db))]
    pub async fn add_teacher(db: &PgPool, id: Uuid, teacher_id: Uuid) -> Result<(), AppError> {
        Self::get_school_class(db, id).await?;
        ensure_role(db, teacher_id, RoleName::Teacher).await?;

        sqlx::query(
            "INSERT INTO school_class_teachers (school_class_id, teacher_id) \
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(teacher_id)
        .execute(db)
        .await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn remove_teacher(db: &PgPool, id: Uuid, teacher_id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        // Lock the class row so concurrent removals cannot both pass the
        // minimum-teacher check.
        let class: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM school_classes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if class.is_none() {
            return Err(DomainError::SchoolClassNotFound(id).into());
        }

        let (member_count, teacher_count): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*) FILTER (WHERE teacher_id = $2), COUNT(*) \
             FROM school_class_teachers WHERE school_class_id = $1",
        )
        .bind(id)
        .bind(teacher_id)
        .fetch_one(&mut *tx)
        .await?;

        match teacher_removal(member_count > 0, teacher_count) {
            TeacherRemoval::NotAssigned => {
                return Err(AppError::not_found(anyhow::anyhow!(
                    "Teacher {} is not assigned to school class {}",
                    teacher_id,
                    id
                )));
            }
            TeacherRemoval::LastTeacher => {
                return Err(DomainError::MinimumTeachersRequired(id).into());
            }
            TeacherRemoval::Allowed => {}
        }

        sqlx::query(
            "DELETE FROM school_class_teachers WHERE school_class_id = $1 AND teacher_id = $2",
        )
        .bind(id)
        .bind(teacher_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_school_class(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let mut tx = db.begin().await?;

        let class: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM school_classes WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if class.is_none() {
            return Err(DomainError::SchoolClassNotFound(id).into());
        }

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM registrations WHERE school_class_id = $1 AND status = 'active'",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if active > 0 {
            return Err(DomainError::ActiveRegistrationsExist {
                school_class_id: id,
                count: active,
            }
            .into());
        }

        sqlx::query("DELETE FROM school_class_teachers WHERE school_class_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM registrations WHERE school_class_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM school_classes WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
