pub mod seeder;

use sqlx::PgPool;

use crate::modules::roles::model::system_roles;
use crate::utils::password::hash_password;

/// Creates an admin account, skipping the insert when the email is taken.
pub async fn create_admin(
    db: &PgPool,
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let hashed_password = hash_password(password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (first_name, last_name, email, password, birth_date, role_id)
         VALUES ($1, $2, $3, $4, NULL, $5)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(hashed_password)
    .bind(system_roles::ADMIN)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err("User with this email already exists".into());
    }

    Ok(())
}
