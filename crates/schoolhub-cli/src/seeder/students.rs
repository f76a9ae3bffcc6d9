//! Fake student generation and batched insertion.

use chrono::{Datelike, NaiveDate, Utc};
use fake::Fake;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rayon::prelude::*;
use schoolhub_core::CodeKind;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashSet;
use std::time::Instant;
use uuid::Uuid;

use super::models::StudentSeed;
use super::users::{delete_orphans, generate_user, insert_users_chunk};

const UNASSIGNED_CLASS_NAME: &str = "Not Assigned";

/// Generates students spread round-robin across `classes`.
pub fn generate_students(
    count: usize,
    classes: &[(Uuid, String)],
    password_hash: &str,
) -> Vec<StudentSeed> {
    let today = Utc::now().date_naive();
    let term_start = NaiveDate::from_ymd_opt(today.year(), 9, 1)
        .filter(|start| *start <= today)
        .or_else(|| NaiveDate::from_ymd_opt(today.year() - 1, 9, 1))
        .unwrap_or(today);

    (0..count)
        .into_par_iter()
        .map(|index| {
            let mut rng = rand::thread_rng();
            let user = generate_user("student", index, password_hash);
            let (class_id, class_name) = match classes.get(index % classes.len().max(1)) {
                Some((id, name)) => (Some(*id), name.clone()),
                None => (None, UNASSIGNED_CLASS_NAME.to_string()),
            };

            StudentSeed {
                student_code: CodeKind::Student.generate(&mut rng),
                admission_number: format!("SEED-{}", user.id.simple().to_string()[..10].to_uppercase()),
                class_id,
                class_name,
                guardian_name: Name().fake(),
                guardian_phone: PhoneNumber().fake(),
                enrollment_date: term_start,
                user,
            }
        })
        .collect()
}

/// Seeds students. Rows whose generated code collides with an existing one
/// are skipped along with their user account.
pub async fn seed_students(
    db: &PgPool,
    count: usize,
    classes: &[(Uuid, String)],
    password_hash: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!(
        "🎓 Seeding {} students across {} classes...",
        count,
        classes.len()
    );

    let students = generate_students(count, classes, password_hash);

    // 8 params per student
    const BATCH_SIZE: usize = 800;

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in students.chunks(BATCH_SIZE) {
        let users: Vec<_> = chunk.iter().map(|s| &s.user).collect();
        let user_ids = insert_users_chunk(&mut tx, &users, "student").await?;

        let pending: Vec<&StudentSeed> = chunk
            .iter()
            .filter(|s| user_ids.contains(&s.user.id))
            .collect();
        let kept = insert_students_chunk(&mut tx, &pending).await?;
        delete_orphans(&mut tx, &user_ids, &kept).await?;

        inserted += kept.len();
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {} students ({} skipped) in {:?}",
        inserted,
        count - inserted,
        start_time.elapsed()
    );

    Ok(inserted)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    students: &[&StudentSeed],
) -> Result<HashSet<Uuid>, Box<dyn std::error::Error>> {
    if students.is_empty() {
        return Ok(HashSet::new());
    }

    let mut query = String::from(
        "INSERT INTO students (user_id, student_code, admission_number, class_id, class_name, guardian_name, guardian_phone, enrollment_date) VALUES ",
    );

    for (i, _) in students.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 8;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4,
            param_idx + 5,
            param_idx + 6,
            param_idx + 7,
            param_idx + 8
        ));
    }

    query.push_str(" ON CONFLICT DO NOTHING RETURNING user_id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for student in students {
        q = q
            .bind(student.user.id)
            .bind(&student.student_code)
            .bind(&student.admission_number)
            .bind(student.class_id)
            .bind(&student.class_name)
            .bind(&student.guardian_name)
            .bind(&student.guardian_phone)
            .bind(student.enrollment_date);
    }

    let ids = q.fetch_all(&mut **tx).await?;
    Ok(ids.into_iter().collect())
}
