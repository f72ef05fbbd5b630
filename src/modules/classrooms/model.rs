use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A classroom: a located resource booked by lessons and exams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Classroom {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Simple classroom projection for nested references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassroomInfo {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
}

impl From<&Classroom> for ClassroomInfo {
    fn from(classroom: &Classroom) -> Self {
        Self {
            id: classroom.id,
            name: classroom.name.clone(),
            capacity: classroom.capacity,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClassroomDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateClassroomDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

/// Time window for the availability query.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct AvailabilityParams {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub classroom_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_classroom_dto_rejects_zero_capacity() {
        let dto = CreateClassroomDto {
            name: "B-101".to_string(),
            capacity: 0,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_classroom_info_projection() {
        let classroom = Classroom {
            id: Uuid::new_v4(),
            name: "B-101".to_string(),
            capacity: 30,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let info = ClassroomInfo::from(&classroom);
        assert_eq!(info.id, classroom.id);
        assert_eq!(info.capacity, 30);
        assert_eq!(info, ClassroomInfo::from(&classroom));
    }
}
