use axum::http::StatusCode;
use chrono::{DateTime, TimeZone, Utc};
use markbook::modules::attendance::model::within_lesson_bounds;
use markbook::modules::courses::model::{Course, CourseInfo, CourseWithRelations};
use markbook::modules::exams::model::is_passing;
use markbook::modules::lessons::model::{intervals_overlap, starts_in_future};
use markbook::modules::registrations::model::{
    RegistrationStatus, has_capacity, is_duplicate_registration,
};
use markbook::modules::subjects::model::SubjectInfo;
use markbook::utils::errors::DomainError;
use uuid::Uuid;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 9, 1, hour, 0, 0).unwrap()
}

#[test]
fn test_registration_lifecycle_for_full_class() {
    // Class capacity 1: first registration fits, the second does not.
    assert!(has_capacity(0, 1));
    assert!(!has_capacity(1, 1));

    // Cancelling frees the seat.
    assert!(RegistrationStatus::Active.can_transition_to(RegistrationStatus::Cancelled));
    assert!(has_capacity(0, 1));
}

#[test]
fn test_second_active_registration_for_same_pair_is_rejected() {
    // First registration for a (student, class) pair: no ACTIVE row yet.
    assert!(!is_duplicate_registration(0));

    // While the first stays ACTIVE, a second attempt for the same pair
    // conflicts with a 409 that names both ids.
    assert!(is_duplicate_registration(1));
    let student_id = Uuid::new_v4();
    let school_class_id = Uuid::new_v4();
    let err = DomainError::DuplicateRegistration {
        student_id,
        school_class_id,
    };
    assert_eq!(err.status(), StatusCode::CONFLICT);
    let msg = err.to_string();
    assert!(msg.contains(&student_id.to_string()));
    assert!(msg.contains(&school_class_id.to_string()));

    // Cancelling removes the pair's ACTIVE row, so the student can register
    // again; the rule only counts ACTIVE registrations.
    assert!(RegistrationStatus::Active.can_transition_to(RegistrationStatus::Cancelled));
    assert!(!is_duplicate_registration(0));
}

#[test]
fn test_cancelled_registration_cannot_reactivate() {
    assert!(!RegistrationStatus::Cancelled.can_transition_to(RegistrationStatus::Active));
    assert!(!RegistrationStatus::Completed.can_transition_to(RegistrationStatus::Active));
}

#[test]
fn test_classroom_booking_overlap_scenario() {
    // L1 occupies 10:00-12:00. L2 at 11:00-13:00 conflicts, at 12:00-13:00
    // it does not.
    assert!(intervals_overlap(at(10), at(12), at(11), at(13)));
    assert!(!intervals_overlap(at(10), at(12), at(12), at(13)));
}

#[test]
fn test_rescheduling_follows_the_same_rules_as_scheduling() {
    // A lesson rescheduled to 11:00-13:00 conflicts with another booking of
    // the same room at 12:00-14:00, exactly as a fresh booking would.
    assert!(intervals_overlap(at(11), at(13), at(12), at(14)));

    // And the new start must still lie in the future.
    assert!(starts_in_future(at(11), at(10)));
    assert!(!starts_in_future(at(9), at(10)));
}

#[test]
fn test_attendance_window_must_fit_lesson() {
    assert!(within_lesson_bounds(at(10), at(12), at(10), at(12)));
    assert!(!within_lesson_bounds(at(9), at(11), at(10), at(12)));
    assert!(!within_lesson_bounds(at(11), at(13), at(10), at(12)));
}

#[test]
fn test_exam_passing_boundary_is_inclusive() {
    assert!(!is_passing(59, 60));
    assert!(is_passing(60, 60));
}

#[test]
fn test_course_projection_preserves_price_exactly() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let course = Course {
        id: Uuid::new_v4(),
        title: "Foundations Year".into(),
        description: None,
        duration_hours: 120,
        price_cents: 129_99,
        created_at: now,
        updated_at: now,
    };
    let subjects = vec![SubjectInfo {
        id: Uuid::new_v4(),
        name: "Mathematics".into(),
    }];

    let projected = CourseWithRelations::project(course.clone(), subjects.clone());
    assert_eq!(projected.price_cents, 129_99);
    assert_eq!(projected.subjects.len(), 1);

    // Projection is a pure function: repeating it yields a structurally
    // equal DTO.
    let again = CourseWithRelations::project(course, subjects);
    assert_eq!(projected, again);
}

#[test]
fn test_simple_projection_preserves_identity() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let course = Course {
        id: Uuid::new_v4(),
        title: "Science Track".into(),
        description: Some("Lab-heavy".into()),
        duration_hours: 80,
        price_cents: 50_000,
        created_at: now,
        updated_at: now,
    };

    let info = CourseInfo::from(&course);
    assert_eq!(info.id, course.id);
    assert_eq!(info.title, course.title);
}

#[test]
fn test_projection_preserves_cardinality() {
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
    let courses: Vec<Course> = (0..5)
        .map(|i| Course {
            id: Uuid::new_v4(),
            title: format!("Course {}", i),
            description: None,
            duration_hours: 40 + i,
            price_cents: 10_000,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let infos: Vec<CourseInfo> = courses.iter().map(CourseInfo::from).collect();
    assert_eq!(infos.len(), courses.len());
}

#[test]
fn test_error_kinds_map_to_status_classes() {
    let id = Uuid::new_v4();

    assert_eq!(
        DomainError::CourseNotFound(id).status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        DomainError::DuplicateRegistration {
            student_id: id,
            school_class_id: id,
        }
        .status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        DomainError::SchoolClassFull {
            school_class_id: id,
            max_students: 30,
        }
        .status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        DomainError::MinimumTeachersRequired(id).status(),
        StatusCode::BAD_REQUEST
    );
}

#[test]
fn test_error_messages_embed_identifiers() {
    let id = Uuid::new_v4();
    let msg = DomainError::ActiveRegistrationsExist {
        school_class_id: id,
        count: 4,
    }
    .to_string();

    assert!(msg.contains(&id.to_string()));
    assert!(msg.contains('4'));
}
