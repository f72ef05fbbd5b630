use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::courses::model::CourseInfo;
use crate::modules::users::model::UserInfo;

/// A subject row. The teacher reference must point at a user with the
/// teacher role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Simple subject projection for nested references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SubjectInfo {
    pub id: Uuid,
    pub name: String,
}

impl From<&Subject> for SubjectInfo {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id,
            name: subject.name.clone(),
        }
    }
}

/// Full subject projection: scalars plus simple-projected teacher and
/// linked courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubjectWithRelations {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub teacher: UserInfo,
    pub courses: Vec<CourseInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubjectWithRelations {
    /// Pure projection over already-loaded rows; performs no data access.
    pub fn project(subject: Subject, teacher: UserInfo, courses: Vec<CourseInfo>) -> Self {
        Self {
            id: subject.id,
            name: subject.name,
            description: subject.description,
            teacher,
            courses,
            created_at: subject.created_at,
            updated_at: subject.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub teacher_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSubjectDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub teacher_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            name: "Mathematics".to_string(),
            description: Some("Algebra and analysis".to_string()),
            teacher_id: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_subject_info_elides_relationships() {
        let subject = sample_subject();
        let info = SubjectInfo::from(&subject);
        assert_eq!(info.id, subject.id);
        assert_eq!(info.name, "Mathematics");
    }

    #[test]
    fn test_full_projection_preserves_course_cardinality() {
        let subject = sample_subject();
        let teacher = UserInfo {
            id: subject.teacher_id,
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            email: "alan@example.com".to_string(),
        };
        let courses = vec![
            CourseInfo {
                id: Uuid::new_v4(),
                title: "CS Foundations".to_string(),
            },
            CourseInfo {
                id: Uuid::new_v4(),
                title: "Numerical Methods".to_string(),
            },
        ];

        let full = SubjectWithRelations::project(subject.clone(), teacher, courses.clone());
        assert_eq!(full.courses.len(), courses.len());
        assert_eq!(full.id, subject.id);
    }
}
