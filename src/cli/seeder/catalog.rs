//! Seeds the classroom, course, and subject catalog.

use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::models::{ClassroomSeed, CourseSeed, SubjectSeed};

const SUBJECT_NAMES: [&str; 12] = [
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "History",
    "Geography",
    "Literature",
    "Computer Science",
    "Music",
    "Art",
    "Economics",
    "Philosophy",
];

const COURSE_TITLES: [&str; 8] = [
    "Foundations Year",
    "Intermediate Programme",
    "Advanced Studies",
    "Science Track",
    "Humanities Track",
    "Preparatory Course",
    "Evening Programme",
    "Summer Intensive",
];

pub fn generate_classrooms(count: usize) -> Vec<ClassroomSeed> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| ClassroomSeed {
            name: format!("Room {}", 100 + i),
            capacity: rng.gen_range(15..=40),
        })
        .collect()
}

pub fn generate_courses(count: usize) -> Vec<CourseSeed> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let base = COURSE_TITLES[i % COURSE_TITLES.len()];
            let title = if i < COURSE_TITLES.len() {
                base.to_string()
            } else {
                format!("{} {}", base, i / COURSE_TITLES.len() + 1)
            };
            CourseSeed {
                title,
                description: None,
                duration_hours: rng.gen_range(40..=200),
                price_cents: rng.gen_range(100..=2000) * 100,
            }
        })
        .collect()
}

pub fn generate_subjects(teacher_ids: &[Uuid]) -> Vec<SubjectSeed> {
    let mut rng = rand::thread_rng();
    SUBJECT_NAMES
        .iter()
        .filter_map(|name| {
            teacher_ids.choose(&mut rng).map(|&teacher_id| SubjectSeed {
                name: name.to_string(),
                description: None,
                teacher_id,
            })
        })
        .collect()
}

pub async fn seed_classrooms(
    db: &PgPool,
    count: usize,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} classrooms...", count);

    let classrooms = generate_classrooms(count);
    let mut ids = Vec::with_capacity(classrooms.len());
    for classroom in &classrooms {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO classrooms (name, capacity) VALUES ($1, $2) \
             ON CONFLICT (name) DO UPDATE SET capacity = EXCLUDED.capacity \
             RETURNING id",
        )
        .bind(&classroom.name)
        .bind(classroom.capacity)
        .fetch_one(db)
        .await?;
        ids.push(id);
    }

    println!(
        "   ✓ Inserted {} classrooms in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

pub async fn seed_courses(
    db: &PgPool,
    count: usize,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("📚 Seeding {} courses...", count);

    let courses = generate_courses(count);
    let mut ids = Vec::with_capacity(courses.len());
    for course in &courses {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO courses (title, description, duration_hours, price_cents) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.duration_hours)
        .bind(course.price_cents)
        .fetch_one(db)
        .await?;
        ids.push(id);
    }

    println!(
        "   ✓ Inserted {} courses in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

/// Seeds one subject per catalog name, each taught by a random teacher,
/// and links every subject to a random course.
pub async fn seed_subjects(
    db: &PgPool,
    teacher_ids: &[Uuid],
    course_ids: &[Uuid],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let subjects = generate_subjects(teacher_ids);
    println!("📖 Seeding {} subjects...", subjects.len());

    let mut rng = rand::thread_rng();
    let mut ids = Vec::with_capacity(subjects.len());
    for subject in &subjects {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO subjects (name, description, teacher_id) VALUES ($1, $2, $3) \
             ON CONFLICT (name) DO UPDATE SET teacher_id = EXCLUDED.teacher_id \
             RETURNING id",
        )
        .bind(&subject.name)
        .bind(&subject.description)
        .bind(subject.teacher_id)
        .fetch_one(db)
        .await?;

        if let Some(&course_id) = course_ids.choose(&mut rng) {
            sqlx::query(
                "INSERT INTO course_subjects (course_id, subject_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(course_id)
            .bind(id)
            .execute(db)
            .await?;
        }

        ids.push(id);
    }

    println!(
        "   ✓ Inserted {} subjects in {:?}",
        ids.len(),
        start_time.elapsed()
    );

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_classroom_capacities_are_positive() {
        for classroom in generate_classrooms(20) {
            assert!(classroom.capacity > 0);
        }
    }

    #[test]
    fn test_generated_course_prices_are_positive_cents() {
        for course in generate_courses(10) {
            assert!(course.price_cents > 0);
            assert_eq!(course.price_cents % 100, 0);
        }
    }

    #[test]
    fn test_generate_subjects_assigns_known_teachers() {
        let teachers = vec![Uuid::new_v4(), Uuid::new_v4()];
        let subjects = generate_subjects(&teachers);
        assert_eq!(subjects.len(), SUBJECT_NAMES.len());
        for subject in subjects {
            assert!(teachers.contains(&subject.teacher_id));
        }
    }
}
