//! Demo class seeding.

use sqlx::PgPool;
use std::time::Instant;
use uuid::Uuid;

use super::models::DEMO_CLASSES;

/// Inserts the demo classes, skipping codes that already exist.
/// Returns the number of classes created.
pub async fn seed_demo_classes(db: &PgPool) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🏫 Seeding {} demo classes...", DEMO_CLASSES.len());

    let mut created = 0;
    for (name, code, grade, subject) in DEMO_CLASSES {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO classes (name, code, grade, subject)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (code) DO NOTHING
             RETURNING id",
        )
        .bind(name)
        .bind(code)
        .bind(grade)
        .bind(subject)
        .fetch_optional(db)
        .await?;

        match id {
            Some(_) => {
                created += 1;
                println!("   ✓ {} ({})", name, code);
            }
            None => println!("   - {} already exists", code),
        }
    }

    println!(
        "   ✓ Created {} classes in {:?}",
        created,
        start_time.elapsed()
    );

    Ok(created)
}

/// Active classes students can be assigned to, as `(id, name)`.
pub async fn active_classes(
    db: &PgPool,
) -> Result<Vec<(Uuid, String)>, Box<dyn std::error::Error>> {
    let classes = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, name FROM classes WHERE status = 'active' ORDER BY grade, name",
    )
    .fetch_all(db)
    .await?;

    Ok(classes)
}

pub async fn clear_demo_classes(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let codes: Vec<String> = DEMO_CLASSES
        .iter()
        .map(|(_, code, _, _)| code.to_string())
        .collect();

    let result = sqlx::query("DELETE FROM classes WHERE code = ANY($1)")
        .bind(&codes)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result)
}
