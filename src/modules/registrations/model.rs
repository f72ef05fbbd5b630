use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::courses::model::CourseInfo;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::users::model::UserInfo;

/// Lifecycle of a registration. Only ACTIVE registrations count against
/// a class's capacity; COMPLETED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Active,
    Completed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Active => "active",
            RegistrationStatus::Completed => "completed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: RegistrationStatus) -> bool {
        matches!(
            (self, next),
            (
                RegistrationStatus::Active,
                RegistrationStatus::Completed | RegistrationStatus::Cancelled
            )
        )
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Registration {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub school_class_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct RegistrationInfo {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl From<&Registration> for RegistrationInfo {
    fn from(registration: &Registration) -> Self {
        Self {
            id: registration.id,
            registration_date: registration.registration_date,
            status: registration.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RegistrationWithRelations {
    pub id: Uuid,
    pub registration_date: DateTime<Utc>,
    pub status: RegistrationStatus,
    pub student: UserInfo,
    pub course: CourseInfo,
    pub school_class: SchoolClassInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RegistrationWithRelations {
    pub fn project(
        registration: Registration,
        student: UserInfo,
        course: CourseInfo,
        school_class: SchoolClassInfo,
    ) -> Self {
        Self {
            id: registration.id,
            registration_date: registration.registration_date,
            status: registration.status,
            student,
            course,
            school_class,
            created_at: registration.created_at,
            updated_at: registration.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    pub student_id: Uuid,
    pub school_class_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegistrationFilterParams {
    pub student_id: Option<Uuid>,
    pub school_class_id: Option<Uuid>,
    pub status: Option<RegistrationStatus>,
}

/// A class has room for another registration when its ACTIVE count is
/// strictly below max_students.
pub fn has_capacity(active_registrations: i64, max_students: i32) -> bool {
    active_registrations < max_students as i64
}

/// One ACTIVE registration per (student, class) pair; any ACTIVE row already
/// present for the pair makes a new one a duplicate. The partial unique
/// index on registrations enforces the same rule at the database level.
pub fn is_duplicate_registration(active_for_pair: i64) -> bool {
    active_for_pair > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_can_complete_or_cancel() {
        assert!(RegistrationStatus::Active.can_transition_to(RegistrationStatus::Completed));
        assert!(RegistrationStatus::Active.can_transition_to(RegistrationStatus::Cancelled));
    }

    #[test]
    fn test_terminal_statuses_cannot_transition() {
        assert!(!RegistrationStatus::Completed.can_transition_to(RegistrationStatus::Active));
        assert!(!RegistrationStatus::Completed.can_transition_to(RegistrationStatus::Cancelled));
        assert!(!RegistrationStatus::Cancelled.can_transition_to(RegistrationStatus::Active));
        assert!(!RegistrationStatus::Cancelled.can_transition_to(RegistrationStatus::Completed));
    }

    #[test]
    fn test_status_does_not_transition_to_itself() {
        assert!(!RegistrationStatus::Active.can_transition_to(RegistrationStatus::Active));
    }

    #[test]
    fn test_capacity_boundary() {
        assert!(has_capacity(0, 30));
        assert!(has_capacity(29, 30));
        assert!(!has_capacity(30, 30));
        assert!(!has_capacity(31, 30));
    }

    #[test]
    fn test_one_active_registration_per_pair() {
        assert!(!is_duplicate_registration(0));
        assert!(is_duplicate_registration(1));
        // a corrupted pair with several ACTIVE rows is still a duplicate
        assert!(is_duplicate_registration(2));
    }
}
