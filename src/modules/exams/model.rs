use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::classrooms::model::ClassroomInfo;
use crate::modules::courses::model::CourseInfo;
use crate::modules::school_classes::model::SchoolClassInfo;
use crate::modules::subjects::model::SubjectInfo;
use crate::modules::users::model::UserInfo;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Exam {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_score: i32,
    pub passing_score: i32,
    pub classroom_id: Uuid,
    pub subject_id: Uuid,
    pub school_class_id: Uuid,
    pub teacher_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow, ToSchema)]
pub struct ExamInfo {
    pub id: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub max_score: i32,
    pub passing_score: i32,
}

impl From<&Exam> for ExamInfo {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id,
            title: exam.title.clone(),
            date: exam.date,
            max_score: exam.max_score,
            passing_score: exam.passing_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExamWithRelations {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub duration_minutes: i32,
    pub max_score: i32,
    pub passing_score: i32,
    pub classroom: ClassroomInfo,
    pub subject: SubjectInfo,
    pub school_class: SchoolClassInfo,
    pub teacher: UserInfo,
    pub courses: Vec<CourseInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamWithRelations {
    pub fn project(
        exam: Exam,
        classroom: ClassroomInfo,
        subject: SubjectInfo,
        school_class: SchoolClassInfo,
        teacher: UserInfo,
        courses: Vec<CourseInfo>,
    ) -> Self {
        Self {
            id: exam.id,
            title: exam.title,
            description: exam.description,
            date: exam.date,
            duration_minutes: exam.duration_minutes,
            max_score: exam.max_score,
            passing_score: exam.passing_score,
            classroom,
            subject,
            school_class,
            teacher,
            courses,
            created_at: exam.created_at,
            updated_at: exam.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamDto {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub duration_minutes: i32,
    #[validate(range(min = 1))]
    pub max_score: i32,
    #[validate(range(min = 0))]
    pub passing_score: i32,
    pub classroom_id: Uuid,
    pub subject_id: Uuid,
    pub school_class_id: Uuid,
    pub teacher_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExamFilterParams {
    pub subject_id: Option<Uuid>,
    pub school_class_id: Option<Uuid>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ExamResult {
    pub id: Uuid,
    pub score: i32,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub exam_id: Uuid,
    pub student_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ExamResultWithRelations {
    pub id: Uuid,
    pub score: i32,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub passed: bool,
    pub exam: ExamInfo,
    pub student: UserInfo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExamResultWithRelations {
    pub fn project(result: ExamResult, exam: ExamInfo, student: UserInfo) -> Self {
        let passed = is_passing(result.score, exam.passing_score);
        Self {
            id: result.id,
            score: result.score,
            notes: result.notes,
            date: result.date,
            passed,
            exam,
            student,
            created_at: result.created_at,
            updated_at: result.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExamResultDto {
    #[validate(range(min = 0))]
    pub score: i32,
    pub notes: Option<String>,
    pub date: DateTime<Utc>,
    pub student_id: Uuid,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct ExamStatistics {
    pub exam_id: Uuid,
    pub result_count: i64,
    pub pass_count: i64,
    pub fail_count: i64,
    pub average_score: Option<f64>,
}

/// Passing is inclusive: a score equal to the passing score passes.
pub fn is_passing(score: i32, passing_score: i32) -> bool {
    score >= passing_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_passing_boundary_is_inclusive() {
        assert!(!is_passing(59, 60));
        assert!(is_passing(60, 60));
        assert!(is_passing(61, 60));
    }

    #[test]
    fn test_result_projection_derives_passed() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap();
        let exam = ExamInfo {
            id: Uuid::new_v4(),
            title: "Midterm".into(),
            date: now,
            max_score: 100,
            passing_score: 60,
        };
        let student = UserInfo {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        };
        let result = ExamResult {
            id: Uuid::new_v4(),
            score: 59,
            notes: None,
            date: now,
            exam_id: exam.id,
            student_id: student.id,
            created_at: now,
            updated_at: now,
        };

        let projected = ExamResultWithRelations::project(result, exam, student);
        assert!(!projected.passed);
        assert_eq!(projected.score, 59);
    }
}
