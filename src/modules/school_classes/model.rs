use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::courses::model::CourseInfo;
use crate::modules::users::model::UserInfo;

/// A school class: a scheduled instance of a course with a teacher set and
/// a student capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolClass {
    pub id: Uuid,
    pub name: String,
    pub course_id: Uuid,
    pub max_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Simple school class projection for nested references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SchoolClassInfo {
    pub id: Uuid,
    pub name: String,
    pub max_students: i32,
}

impl From<&SchoolClass> for SchoolClassInfo {
    fn from(class: &SchoolClass) -> Self {
        Self {
            id: class.id,
            name: class.name.clone(),
            max_students: class.max_students,
        }
    }
}

/// Full school class projection: scalars plus simple-projected course and
/// teachers, and the current active-registration count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SchoolClassWithRelations {
    pub id: Uuid,
    pub name: String,
    pub max_students: i32,
    pub course: CourseInfo,
    pub teachers: Vec<UserInfo>,
    pub active_registrations: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SchoolClassWithRelations {
    pub fn project(
        class: SchoolClass,
        course: CourseInfo,
        teachers: Vec<UserInfo>,
        active_registrations: i64,
    ) -> Self {
        Self {
            id: class.id,
            name: class.name,
            max_students: class.max_students,
            course,
            teachers,
            active_registrations,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSchoolClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub course_id: Uuid,
    #[validate(range(min = 1))]
    pub max_students: i32,
    /// Initial teacher set; a class can never exist without teachers.
    #[validate(length(min = 1))]
    pub teacher_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSchoolClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub max_students: Option<i32>,
}

/// Outcome of a teacher-removal request against the class's current
/// teacher set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherRemoval {
    NotAssigned,
    LastTeacher,
    Allowed,
}

/// A teacher leaves only if they are assigned and at least one other
/// teacher stays behind.
pub fn teacher_removal(is_member: bool, teacher_count: i64) -> TeacherRemoval {
    if !is_member {
        TeacherRemoval::NotAssigned
    } else if teacher_count <= 1 {
        TeacherRemoval::LastTeacher
    } else {
        TeacherRemoval::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_requires_at_least_one_teacher() {
        let dto = CreateSchoolClassDto {
            name: "CS-1A".to_string(),
            course_id: Uuid::new_v4(),
            max_students: 25,
            teacher_ids: vec![],
        };
        assert!(dto.validate().is_err());

        let dto = CreateSchoolClassDto {
            teacher_ids: vec![Uuid::new_v4()],
            ..dto
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_projection_carries_active_count() {
        let class = SchoolClass {
            id: Uuid::new_v4(),
            name: "CS-1A".to_string(),
            course_id: Uuid::new_v4(),
            max_students: 25,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let course = CourseInfo {
            id: class.course_id,
            title: "Intro".to_string(),
        };
        let full = SchoolClassWithRelations::project(class.clone(), course, vec![], 7);
        assert_eq!(full.active_registrations, 7);
        assert_eq!(full.max_students, class.max_students);
    }

    #[test]
    fn test_teacher_removal_rejects_non_members() {
        // a non-member is reported as such even when the class is down to
        // its last teacher
        assert_eq!(teacher_removal(false, 1), TeacherRemoval::NotAssigned);
        assert_eq!(teacher_removal(false, 2), TeacherRemoval::NotAssigned);
    }

    #[test]
    fn test_teacher_removal_keeps_last_teacher() {
        assert_eq!(teacher_removal(true, 1), TeacherRemoval::LastTeacher);
        assert_eq!(teacher_removal(true, 2), TeacherRemoval::Allowed);
    }
}
