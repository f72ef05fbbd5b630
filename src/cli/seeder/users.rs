use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rand::Rng;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::UserSeed;
use crate::modules::roles::model::system_roles;

/// Generates teacher and student seeds sharing one pre-computed password
/// hash.
pub fn generate_users(teachers: usize, students: usize, password_hash: &str) -> Vec<UserSeed> {
    let mut rng = rand::thread_rng();
    let mut users = Vec::with_capacity(teachers + students);

    for i in 0..teachers {
        users.push(make_user(
            &mut rng,
            system_roles::TEACHER,
            format!("teacher{}", i),
            password_hash,
        ));
    }
    for i in 0..students {
        users.push(make_user(
            &mut rng,
            system_roles::STUDENT,
            format!("student{}", i),
            password_hash,
        ));
    }

    users
}

fn make_user<R: Rng>(rng: &mut R, role_id: Uuid, tag: String, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let email = format!(
        "{}.{}.{}@seed.example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        tag
    );
    let year = rng.gen_range(1980..2010);
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);

    UserSeed {
        first_name,
        last_name,
        email,
        password_hash: password_hash.to_string(),
        birth_date: NaiveDate::from_ymd_opt(year, month, day)
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
        role_id,
    }
}

/// Inserts users in chunks inside one transaction, returning their ids in
/// insertion order (teachers first, then students).
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧑 Seeding {} users...", users.len());

    let mut tx = db.begin().await?;

    const BATCH_SIZE: usize = 500;
    let mut all_ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let ids = insert_users_chunk(&mut tx, chunk).await?;
        all_ids.extend(ids);
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} users in {:?}",
        all_ids.len(),
        start_time.elapsed()
    );

    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = String::from(
        "INSERT INTO users (first_name, last_name, email, password, birth_date, role_id) VALUES ",
    );

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let p = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            p + 1,
            p + 2,
            p + 3,
            p + 4,
            p + 5,
            p + 6
        ));
    }

    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.birth_date)
            .bind(user.role_id);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_users_splits_roles() {
        let users = generate_users(3, 7, "$2b$04$hash");
        assert_eq!(users.len(), 10);
        assert_eq!(
            users
                .iter()
                .filter(|u| u.role_id == system_roles::TEACHER)
                .count(),
            3
        );
        assert_eq!(
            users
                .iter()
                .filter(|u| u.role_id == system_roles::STUDENT)
                .count(),
            7
        );
    }

    #[test]
    fn test_generated_emails_are_unique() {
        let users = generate_users(5, 20, "$2b$04$hash");
        let mut emails: Vec<_> = users.iter().map(|u| u.email.clone()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), users.len());
    }

    #[test]
    fn test_birth_dates_are_in_the_past() {
        let today = chrono::Utc::now().date_naive();
        for user in generate_users(2, 2, "$2b$04$hash") {
            assert!(user.birth_date < today);
        }
    }
}
