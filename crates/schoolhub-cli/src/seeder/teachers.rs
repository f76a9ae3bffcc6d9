//! Fake teacher generation and batched insertion.

use fake::Fake;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use schoolhub_core::CodeKind;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

use super::models::TeacherSeed;
use super::users::{delete_orphans, generate_user, insert_users_chunk};

const SUBJECTS: [&str; 8] = [
    "Mathematics",
    "English",
    "Science",
    "Social Studies",
    "Computing",
    "French",
    "Art",
    "Physical Education",
];

const QUALIFICATIONS: [&str; 4] = ["B.Ed", "B.Sc", "M.Ed", "PGDE"];

const DEPARTMENTS: [&str; 4] = ["Sciences", "Languages", "Humanities", "Early Years"];

pub fn generate_teachers(count: usize, password_hash: &str) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|index| {
            let mut rng = rand::thread_rng();
            let subjects = SUBJECTS
                .choose_multiple(&mut rng, 2)
                .map(|s| s.to_string())
                .collect();
            let gender = if index % 2 == 0 { "female" } else { "male" };

            TeacherSeed {
                user: generate_user("teacher", index, password_hash),
                staff_id: CodeKind::Teacher.generate(&mut rng),
                subjects,
                qualification: QUALIFICATIONS
                    .choose(&mut rng)
                    .map_or("B.Ed", |q| *q)
                    .to_string(),
                experience: (1..30).fake::<i32>(),
                department: DEPARTMENTS
                    .choose(&mut rng)
                    .map_or("Sciences", |d| *d)
                    .to_string(),
                gender: gender.to_string(),
            }
        })
        .collect()
}

/// Seeds teachers. Rows whose generated staff ID collides with an existing
/// one are skipped along with their user account.
pub async fn seed_teachers(
    db: &PgPool,
    count: usize,
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("👩‍🏫 Seeding {} teachers...", count);

    let teachers = generate_teachers(count, password_hash);

    // 7 params per teacher
    const BATCH_SIZE: usize = 1000;

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in teachers.chunks(BATCH_SIZE) {
        let users: Vec<_> = chunk.iter().map(|t| &t.user).collect();
        let user_ids = insert_users_chunk(&mut tx, &users, "teacher").await?;

        let pending: Vec<&TeacherSeed> = chunk
            .iter()
            .filter(|t| user_ids.contains(&t.user.id))
            .collect();
        let kept = insert_teachers_chunk(&mut tx, &pending).await?;
        delete_orphans(&mut tx, &user_ids, &kept).await?;

        inserted += kept.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} teachers ({} skipped) in {:?}",
        inserted,
        count - inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_teachers_chunk(
    tx: &mut Transaction<'_, Postgres>,
    teachers: &[&TeacherSeed],
) -> Result<HashSet<Uuid>, Box<dyn std::error::Error>> {
    if teachers.is_empty() {
        return Ok(HashSet::new());
    }

    let mut query = String::from(
        "INSERT INTO teachers (user_id, staff_id, subjects, qualification, experience, department, gender) VALUES ",
    );

    for (i, _) in teachers.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 7;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6,
            param_idx + 7
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING user_id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for teacher in teachers {
        q = q
            .bind(teacher.user.id)
            .bind(&teacher.staff_id)
            .bind(&teacher.subjects)
            .bind(&teacher.qualification)
            .bind(teacher.experience)
            .bind(&teacher.department)
            .bind(&teacher.gender);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().collect())
}
