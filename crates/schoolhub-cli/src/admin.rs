//! Admin account creation. Admins cannot self-register over HTTP.

use schoolhub_core::hash_password;
use sqlx::PgPool;
use uuid::Uuid;

pub async fn create_admin(
    db: &PgPool,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".into());
    }

    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (name, email, password, role)
         VALUES ($1, $2, $3, 'admin')
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(name)
    .bind(email)
    .bind(&hashed_password)
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| "User with this email already exists".into())
}
