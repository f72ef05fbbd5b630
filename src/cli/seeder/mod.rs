//! Database seeding for development and demo environments.
//!
//! Seeds users (teachers and students), the classroom/course/subject
//! catalog, and school classes with teacher assignments and active
//! registrations. A single low-cost bcrypt hash is shared by every
//! generated user so large seeds stay fast.

pub mod catalog;
pub mod classes;
pub mod models;
pub mod users;

pub use models::SeedConfig;

use bcrypt::hash;
use sqlx::PgPool;
use std::time::Instant;

/// Password assigned to every seeded account.
pub const SEED_PASSWORD: &str = "password123";

// Cost 4 is the bcrypt minimum; seeded accounts are not real credentials.
const SEED_HASH_COST: u32 = 4;

pub async fn seed_database(
    db: &PgPool,
    config: SeedConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - Users: {} teachers, {} students",
        config.teachers, config.students
    );
    println!(
        "   - Catalog: {} classrooms, {} courses",
        config.classrooms, config.courses
    );
    println!(
        "   - Classes: {} ({} per course, capacity {})",
        config.total_classes(),
        config.classes_per_course,
        config.students_per_class
    );

    let password_hash = hash(SEED_PASSWORD, SEED_HASH_COST)?;

    let user_seeds = users::generate_users(config.teachers, config.students, &password_hash);
    let user_ids = users::insert_users_batch(db, &user_seeds).await?;
    let (teacher_ids, student_ids) = user_ids.split_at(config.teachers);

    catalog::seed_classrooms(db, config.classrooms).await?;
    let course_ids = catalog::seed_courses(db, config.courses).await?;
    catalog::seed_subjects(db, teacher_ids, &course_ids).await?;

    classes::seed_classes(
        db,
        &course_ids,
        teacher_ids,
        student_ids,
        config.classes_per_course,
        config.students_per_class,
    )
    .await?;

    println!(
        "✅ Seeding complete: {} users in {:?}",
        config.total_users(),
        start_time.elapsed()
    );
    println!("   All seeded accounts use the password \"{}\"", SEED_PASSWORD);

    Ok(())
}

/// Deletes seeded data in dependency order. Seeded users are recognized
/// by their generated email domain; manually created accounts survive.
pub async fn clear_seeded_data(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    sqlx::query("DELETE FROM attendance").execute(db).await?;
    sqlx::query("DELETE FROM exam_results").execute(db).await?;
    sqlx::query("DELETE FROM exam_courses").execute(db).await?;
    sqlx::query("DELETE FROM exams").execute(db).await?;
    sqlx::query("DELETE FROM lessons").execute(db).await?;
    sqlx::query("DELETE FROM registrations").execute(db).await?;
    sqlx::query("DELETE FROM school_class_teachers")
        .execute(db)
        .await?;
    sqlx::query("DELETE FROM school_classes").execute(db).await?;
    sqlx::query("DELETE FROM course_subjects").execute(db).await?;
    sqlx::query("DELETE FROM subjects").execute(db).await?;
    sqlx::query("DELETE FROM courses").execute(db).await?;
    sqlx::query("DELETE FROM classrooms").execute(db).await?;
    sqlx::query("DELETE FROM users WHERE email LIKE '%@seed.example.com'")
        .execute(db)
        .await?;

    println!("   ✓ Cleared in {:?}", start_time.elapsed());

    Ok(())
}
