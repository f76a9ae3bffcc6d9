//! User account rows shared by teacher and student seeding.

use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use sqlx::{Postgres, Transaction};
use std::collections::HashSet;
use uuid::Uuid;

use super::models::UserSeed;

pub(crate) fn generate_user(role_prefix: &str, index: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let id = Uuid::new_v4();

    let email = format!(
        "{}.{}+{}{}-{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role_prefix,
        index,
        &id.simple().to_string()[..6]
    );

    UserSeed {
        id,
        name: format!("{} {}", first_name, last_name),
        email,
        password_hash: password_hash.to_string(),
        phone: Some(PhoneNumber().fake()),
    }
}

/// Inserts one chunk of users with the given role, skipping any whose email
/// is taken. Returns the ids actually inserted.
pub(crate) async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[&UserSeed],
    role: &str,
) -> Result<HashSet<Uuid>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(HashSet::new());
    }

    let mut query = String::from("INSERT INTO users (id, name, email, password, phone, role) VALUES ");

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}::user_role)",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for user in users {
        q = q
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.phone)
            .bind(role);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().collect())
}

/// Deletes users whose dependent record was skipped on conflict.
pub(crate) async fn delete_orphans(
    tx: &mut Transaction<'_, Postgres>,
    inserted: &HashSet<Uuid>,
    kept: &HashSet<Uuid>,
) -> Result<u64, Box<dyn std::error::Error>> {
    let orphans: Vec<Uuid> = inserted.difference(kept).copied().collect();
    if orphans.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query("DELETE FROM users WHERE id = ANY($1)")
        .bind(&orphans)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    Ok(result)
}

/// Clears every seeded account (admins are kept). Teacher, student and fee
/// rows go with them.
pub async fn clear_users(db: &sqlx::PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = std::time::Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query(
        "DELETE FROM users WHERE email LIKE '%@example.com' AND role <> 'admin'",
    )
    .execute(db)
    .await?
    .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}
