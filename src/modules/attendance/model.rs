use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::lessons::model::LessonInfo;
use crate::modules::users::model::UserInfo;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Attendance {
    pub id: Uuid,
    pub present: bool,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub student_id: Uuid,
    pub lesson_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceWithRelations {
    pub id: Uuid,
    pub present: bool,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub student: UserInfo,
    pub lesson: LessonInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AttendanceWithRelations {
    pub fn project(attendance: Attendance, student: UserInfo, lesson: LessonInfo) -> Self {
        Self {
            id: attendance.id,
            present: attendance.present,
            entry_time: attendance.entry_time,
            exit_time: attendance.exit_time,
            student,
            lesson,
            created_at: attendance.created_at,
            updated_at: attendance.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAttendanceDto {
    pub present: bool,
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub student_id: Uuid,
    pub lesson_id: Uuid,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AttendanceRate {
    pub student_id: Uuid,
    pub total_records: i64,
    pub present_count: i64,
    pub rate: Option<f64>,
}

/// The attendance window must fall inside the lesson's scheduled bounds.
pub fn within_lesson_bounds(
    entry: DateTime<Utc>,
    exit: DateTime<Utc>,
    lesson_start: DateTime<Utc>,
    lesson_end: DateTime<Utc>,
) -> bool {
    entry >= lesson_start && exit <= lesson_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_window_inside_lesson() {
        assert!(within_lesson_bounds(at(10, 5), at(11, 55), at(10, 0), at(12, 0)));
    }

    #[test]
    fn test_window_matching_bounds_exactly() {
        assert!(within_lesson_bounds(at(10, 0), at(12, 0), at(10, 0), at(12, 0)));
    }

    #[test]
    fn test_entry_before_lesson_start() {
        assert!(!within_lesson_bounds(at(9, 55), at(11, 0), at(10, 0), at(12, 0)));
    }

    #[test]
    fn test_exit_after_lesson_end() {
        assert!(!within_lesson_bounds(at(10, 30), at(12, 5), at(10, 0), at(12, 0)));
    }
}
