//! Seeds school classes, teacher assignments, and student registrations.

use rand::Rng;
use rand::seq::SliceRandom;
use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::models::SchoolClassSeed;

const CLASS_SECTIONS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

pub fn generate_classes(
    course_ids: &[Uuid],
    classes_per_course: usize,
    students_per_class: usize,
) -> Vec<SchoolClassSeed> {
    course_ids
        .iter()
        .flat_map(|&course_id| {
            (0..classes_per_course).map(move |i| {
                let section = if i < CLASS_SECTIONS.len() {
                    CLASS_SECTIONS[i].to_string()
                } else {
                    format!("{}", i + 1)
                };
                SchoolClassSeed {
                    name: format!("Class {}", section),
                    course_id,
                    max_students: students_per_class as i32,
                }
            })
        })
        .collect()
}

/// Seeds classes, assigns each between one and three teachers, and fills
/// roughly half of each class with active registrations.
pub async fn seed_classes(
    db: &PgPool,
    course_ids: &[Uuid],
    teacher_ids: &[Uuid],
    student_ids: &[Uuid],
    classes_per_course: usize,
    students_per_class: usize,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let classes = generate_classes(course_ids, classes_per_course, students_per_class);
    println!("🎓 Seeding {} school classes...", classes.len());

    let mut rng = rand::thread_rng();
    let mut class_ids = Vec::with_capacity(classes.len());
    let mut registrations = 0usize;

    for class in &classes {
        let class_id: Uuid = sqlx::query_scalar(
            "INSERT INTO school_classes (name, course_id, max_students) \
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&class.name)
        .bind(class.course_id)
        .bind(class.max_students)
        .fetch_one(db)
        .await?;

        let teacher_count = rng.gen_range(1..=3.min(teacher_ids.len().max(1)));
        for &teacher_id in teacher_ids.choose_multiple(&mut rng, teacher_count) {
            sqlx::query(
                "INSERT INTO school_class_teachers (school_class_id, teacher_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(class_id)
            .bind(teacher_id)
            .execute(db)
            .await?;
        }

        let enrolled = (students_per_class / 2).min(student_ids.len());
        for &student_id in student_ids.choose_multiple(&mut rng, enrolled) {
            sqlx::query(
                "INSERT INTO registrations (status, student_id, course_id, school_class_id) \
                 VALUES ('active', $1, $2, $3) ON CONFLICT DO NOTHING",
            )
            .bind(student_id)
            .bind(class.course_id)
            .bind(class_id)
            .execute(db)
            .await?;
            registrations += 1;
        }

        class_ids.push(class_id);
    }

    println!(
        "   ✓ Inserted {} classes and {} registrations in {:?}",
        class_ids.len(),
        registrations,
        start_time.elapsed()
    );

    Ok(class_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_classes_covers_every_course() {
        let courses = vec![Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let classes = generate_classes(&courses, 2, 25);
        assert_eq!(classes.len(), 6);
        for course_id in &courses {
            assert_eq!(
                classes.iter().filter(|c| c.course_id == *course_id).count(),
                2
            );
        }
    }

    #[test]
    fn test_generated_classes_have_positive_capacity() {
        let courses = vec![Uuid::new_v4()];
        for class in generate_classes(&courses, 4, 30) {
            assert!(class.max_students > 0);
        }
    }
}
