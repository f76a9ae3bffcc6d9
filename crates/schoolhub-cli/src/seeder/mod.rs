//! Database seeding: demo classes plus fake teachers and students.
//!
//! Generated codes come from the same generator the server uses, without an
//! existence check; rows that collide with an existing code are skipped.

pub mod classes;
pub mod models;
pub mod students;
pub mod teachers;
pub mod users;

pub use classes::{clear_demo_classes, seed_demo_classes};
pub use models::SeedConfig;

use schoolhub_core::hash_password;
use sqlx::PgPool;
use std::time::Instant;

/// Seeds teachers, then students assigned to the active classes.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Starting database seeding...\n");

    let password_hash = hash_password(&config.password)
        .map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let teachers = teachers::seed_teachers(db, config.teachers, &password_hash).await?;

    let classes = classes::active_classes(db).await?;
    if classes.is_empty() {
        println!("   ⚠ No active classes found; run `seed-classes` to assign students to classes");
    }
    let students = students::seed_students(db, config.students, &classes, &password_hash).await?;

    println!(
        "\n✅ Seeded {} teachers and {} students in {:?}",
        teachers,
        students,
        start_time.elapsed()
    );
    println!("   Seeded accounts use the password: {}", config.password);

    Ok(())
}

/// Removes seeded accounts and, when asked, the demo classes.
pub async fn clear_all(db: &PgPool, include_classes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...\n");

    users::clear_users(db).await?;

    if include_classes {
        let removed = clear_demo_classes(db).await?;
        println!("   ✓ Deleted {} demo classes", removed);
    }

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
