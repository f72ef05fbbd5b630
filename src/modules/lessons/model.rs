use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::classrooms::model::ClassroomInfo;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::subjects::model::SubjectInfo;
use crate::modules::users::model::UserInfo;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub school_class_id: Uuid,
    pub teacher_id: Uuid,
    pub classroom_id: Uuid,
    pub subject_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct LessonInfo {
    pub id: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl From<&Lesson> for LessonInfo {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            start_time: lesson.start_time,
            end_time: lesson.end_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LessonWithRelations {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub school_class: SchoolClassInfo,
    pub teacher: UserInfo,
    pub classroom: ClassroomInfo,
    pub subject: SubjectInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LessonWithRelations {
    pub fn project(
        lesson: Lesson,
        school_class: SchoolClassInfo,
        teacher: UserInfo,
        classroom: ClassroomInfo,
        subject: SubjectInfo,
    ) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title,
            description: lesson.description,
            start_time: lesson.start_time,
            end_time: lesson.end_time,
            school_class,
            teacher,
            classroom,
            subject,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLessonDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub school_class_id: Uuid,
    pub teacher_id: Uuid,
    pub classroom_id: Uuid,
    pub subject_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLessonDto {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LessonFilterParams {
    pub teacher_id: Option<Uuid>,
    pub school_class_id: Option<Uuid>,
    pub classroom_id: Option<Uuid>,
}

/// Half-open interval overlap: [s1,e1) and [s2,e2) overlap iff
/// s1 < e2 and s2 < e1. Boundary-touching intervals do not overlap.
pub fn intervals_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && s2 < e1
}

/// Lessons are booked ahead of time; both scheduling and rescheduling
/// reject start times at or before `now`.
pub fn starts_in_future(start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start > now
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_overlapping_intervals() {
        // 10:00-12:00 vs 11:00-13:00
        assert!(intervals_overlap(at(10), at(12), at(11), at(13)));
        // containment
        assert!(intervals_overlap(at(10), at(14), at(11), at(12)));
        // identical
        assert!(intervals_overlap(at(10), at(12), at(10), at(12)));
    }

    #[test]
    fn test_boundary_touching_does_not_overlap() {
        // 10:00-12:00 vs 12:00-13:00
        assert!(!intervals_overlap(at(10), at(12), at(12), at(13)));
        assert!(!intervals_overlap(at(12), at(13), at(10), at(12)));
    }

    #[test]
    fn test_disjoint_intervals() {
        assert!(!intervals_overlap(at(8), at(9), at(10), at(11)));
    }

    #[test]
    fn test_start_must_be_strictly_after_now() {
        assert!(starts_in_future(at(11), at(10)));
        assert!(!starts_in_future(at(10), at(10)));
        assert!(!starts_in_future(at(9), at(10)));
    }

    #[test]
    fn test_lesson_info_projection_is_idempotent() {
        let lesson = Lesson {
            id: Uuid::new_v4(),
            title: "Linear algebra".into(),
            description: None,
            start_time: at(10),
            end_time: at(12),
            school_class_id: Uuid::new_v4(),
            teacher_id: Uuid::new_v4(),
            classroom_id: Uuid::new_v4(),
            subject_id: Uuid::new_v4(),
            created_at: at(9),
            updated_at: at(9),
        };

        assert_eq!(LessonInfo::from(&lesson), LessonInfo::from(&lesson));
    }
}
