use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

/// Business-rule and lookup failures. Every variant carries the values that
/// made the rule fire so the response message identifies the offending state.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("User {0} not found")]
    UserNotFound(Uuid),
    #[error("Role '{0}' not found")]
    RoleNotFound(String),
    #[error("Classroom {0} not found")]
    ClassroomNotFound(Uuid),
    #[error("Subject {0} not found")]
    SubjectNotFound(Uuid),
    #[error("Course {0} not found")]
    CourseNotFound(Uuid),
    #[error("School class {0} not found")]
    SchoolClassNotFound(Uuid),
    #[error("Registration {0} not found")]
    RegistrationNotFound(Uuid),
    #[error("Lesson {0} not found")]
    LessonNotFound(Uuid),
    #[error("Exam {0} not found")]
    ExamNotFound(Uuid),
    #[error("Exam result {0} not found")]
    ExamResultNotFound(Uuid),
    #[error("Attendance record {0} not found")]
    AttendanceNotFound(Uuid),

    #[error("Email {0} is already registered")]
    EmailAlreadyExists(String),
    #[error("Current password does not match")]
    InvalidPassword,
    #[error("User {0} does not have the student role")]
    InvalidStudentRole(Uuid),
    #[error("User {0} does not have the teacher role")]
    InvalidTeacherRole(Uuid),
    #[error("Invalid time range: end {end} must be after start {start}")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error(
        "Attendance window [{entry}, {exit}] falls outside lesson bounds [{lesson_start}, {lesson_end}]"
    )]
    TimeOutOfBounds {
        entry: DateTime<Utc>,
        exit: DateTime<Utc>,
        lesson_start: DateTime<Utc>,
        lesson_end: DateTime<Utc>,
    },
    #[error("Classroom {classroom_id} is already booked between {start} and {end}")]
    ClassroomNotAvailable {
        classroom_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    #[error("Classroom capacity {capacity} is below the {required} seats required")]
    ClassroomCapacityExceeded { capacity: i32, required: i32 },
    #[error("School class {school_class_id} is full ({max_students} students)")]
    SchoolClassFull {
        school_class_id: Uuid,
        max_students: i32,
    },
    #[error(
        "Student {student_id} already has an active registration for school class {school_class_id}"
    )]
    DuplicateRegistration {
        student_id: Uuid,
        school_class_id: Uuid,
    },
    #[error("School class {0} must keep at least one teacher")]
    MinimumTeachersRequired(Uuid),
    #[error("School class {school_class_id} still has {count} active registrations")]
    ActiveRegistrationsExist { school_class_id: Uuid, count: i64 },
    #[error("Role '{0}' already exists")]
    DuplicateRole(String),
    #[error("Registration status cannot change from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },
}

impl DomainError {
    /// HTTP status class per error kind: not-found 404, duplicate/conflict
    /// 409, capacity 422, rule violations 400.
    pub fn status(&self) -> StatusCode {
        use DomainError::*;
        match self {
            UserNotFound(_) | RoleNotFound(_) | ClassroomNotFound(_) | SubjectNotFound(_)
            | CourseNotFound(_) | SchoolClassNotFound(_) | RegistrationNotFound(_)
            | LessonNotFound(_) | ExamNotFound(_) | ExamResultNotFound(_)
            | AttendanceNotFound(_) => StatusCode::NOT_FOUND,
            EmailAlreadyExists(_)
            | DuplicateRegistration { .. }
            | DuplicateRole(_)
            | ClassroomNotAvailable { .. } => StatusCode::CONFLICT,
            SchoolClassFull { .. } | ClassroomCapacityExceeded { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            InvalidPassword
            | InvalidStudentRole(_)
            | InvalidTeacherRole(_)
            | InvalidTimeRange { .. }
            | TimeOutOfBounds { .. }
            | MinimumTeachersRequired(_)
            | ActiveRegistrationsExist { .. }
            | InvalidStatusTransition { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(msg: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(msg))
    }

    pub fn forbidden(msg: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(msg))
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::new(err.status(), err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::database(err)
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let id = Uuid::new_v4();
        assert_eq!(DomainError::UserNotFound(id).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            DomainError::RoleNotFound("admin".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_conflicts_map_to_409() {
        assert_eq!(
            DomainError::EmailAlreadyExists("a@b.com".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::DuplicateRegistration {
                student_id: Uuid::new_v4(),
                school_class_id: Uuid::new_v4(),
            }
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DomainError::DuplicateRole("teacher".into()).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_capacity_maps_to_422() {
        assert_eq!(
            DomainError::SchoolClassFull {
                school_class_id: Uuid::new_v4(),
                max_students: 30,
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DomainError::ClassroomCapacityExceeded {
                capacity: 20,
                required: 30,
            }
            .status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_rule_violations_map_to_400() {
        assert_eq!(DomainError::InvalidPassword.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            DomainError::InvalidStatusTransition {
                from: "cancelled".into(),
                to: "active".into(),
            }
            .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_message_embeds_identifiers() {
        let id = Uuid::new_v4();
        let msg = DomainError::SchoolClassFull {
            school_class_id: id,
            max_students: 25,
        }
        .to_string();
        assert!(msg.contains(&id.to_string()));
        assert!(msg.contains("25"));
    }
}
