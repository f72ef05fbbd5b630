use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::subjects::model::SubjectInfo;

/// A course row. Price is stored as integer cents so values round-trip
/// exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Simple course projection for nested references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseInfo {
    pub id: Uuid,
    pub title: String,
}

impl From<&Course> for CourseInfo {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
        }
    }
}

/// Full course projection: scalars plus simple-projected subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CourseWithRelations {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration_hours: i32,
    pub price_cents: i64,
    pub subjects: Vec<SubjectInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseWithRelations {
    pub fn project(course: Course, subjects: Vec<SubjectInfo>) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            duration_hours: course.duration_hours,
            price_cents: course.price_cents,
            subjects,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_hours: i32,
    #[validate(range(min = 1))]
    pub price_cents: i64,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_hours: Option<i32>,
    #[validate(range(min = 1))]
    pub price_cents: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Applied Cryptography".to_string(),
            description: None,
            duration_hours: 40,
            price_cents: 129_99,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_course_dto_rejects_non_positive_price() {
        let dto = CreateCourseDto {
            title: "Course".to_string(),
            description: None,
            duration_hours: 10,
            price_cents: 0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_course_projection_round_trips_price_exactly() {
        let course = sample_course();
        let full = CourseWithRelations::project(course.clone(), vec![]);
        assert_eq!(full.price_cents, 129_99);
        assert_eq!(full.id, course.id);
        assert_eq!(full.duration_hours, course.duration_hours);
    }

    #[test]
    fn test_course_projection_is_idempotent() {
        let course = sample_course();
        let a = CourseWithRelations::project(course.clone(), vec![]);
        let b = CourseWithRelations::project(course, vec![]);
        assert_eq!(a, b);
    }
}
