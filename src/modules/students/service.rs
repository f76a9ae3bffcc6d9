use anyhow::{Context, anyhow};
use schoolhub_config::ProvisioningConfig;
use schoolhub_core::file_storage::FileStorage;
use schoolhub_core::{AppError, CodeKind, hash_password};
use schoolhub_db::unique_violation;
use schoolhub_models::User;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::metrics::track_user_created;
use crate::modules::auth::service::{AuthService, USER_COLUMNS, email_conflict};
use crate::utils::avatar::{AvatarInput, DecodedAvatar, prepare_avatar, store_avatar};
use crate::utils::codes::next_unique_code;

use super::model::{
    CreateStudentDto, CreateStudentResponse, Student, StudentView, UNASSIGNED_CLASS_NAME,
    UpdateStudentDto,
};

const STUDENT_COLUMNS: &str = "id, user_id, student_code, admission_number, date_of_birth, \
     parent_contact, class_id, class_name, section, guardian_name, guardian_phone, address, \
     roll_number, enrollment_date, status, created_at, updated_at";

const STUDENT_VIEW_SELECT: &str = r#"
    SELECT s.id, s.student_code, s.user_id, u.name, u.email, u.avatar, u.phone,
           s.admission_number, s.class_id, COALESCE(c.name, s.class_name) AS class_name,
           s.section, s.status, s.date_of_birth, s.parent_contact, s.guardian_name,
           s.guardian_phone, s.address, s.roll_number, s.enrollment_date
    FROM students s
    JOIN users u ON u.id = s.user_id
    LEFT JOIN classes c ON c.id = s.class_id"#;

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn list_students(db: &PgPool) -> Result<Vec<StudentView>, AppError> {
        let students = sqlx::query_as::<_, StudentView>(&format!(
            "{STUDENT_VIEW_SELECT} ORDER BY s.created_at DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch students")
        .map_err(AppError::database)?;

        Ok(students)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: Uuid) -> Result<StudentView, AppError> {
        sqlx::query_as::<_, StudentView>(&format!("{STUDENT_VIEW_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch student")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Codes are matched case-insensitively and ignoring surrounding
    /// whitespace; stored codes are always uppercase.
    #[instrument(skip(db))]
    pub async fn get_student_by_code(db: &PgPool, code: &str) -> Result<StudentView, AppError> {
        sqlx::query_as::<_, StudentView>(&format!(
            "{STUDENT_VIEW_SELECT} WHERE s.student_code = $1"
        ))
        .bind(code.trim().to_ascii_uppercase())
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by code")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    /// Creates the student's user account and student record together.
    ///
    /// The avatar is checked and the code resolved before anything is
    /// written. A code taken by a concurrent request in between surfaces as
    /// a 409 from the unique index.
    #[instrument(skip(db, storage, provisioning, dto), fields(email = %dto.email))]
    pub async fn create_student(
        db: &PgPool,
        storage: &dyn FileStorage,
        provisioning: &ProvisioningConfig,
        dto: CreateStudentDto,
    ) -> Result<CreateStudentResponse, AppError> {
        AuthService::ensure_email_available(db, &dto.email).await?;

        // Links are not accepted for students; only inline images are stored.
        let avatar = prepare_avatar(dto.avatar.as_deref(), storage)?
            .and_then(AvatarInput::inline_only);

        let hashed_password = hash_password(&dto.password)?;

        // Resolved before the transaction opens so provisioning holds at most
        // one pooled connection at a time.
        let student_code = match dto.student_code.as_deref() {
            Some(code) => code.to_string(),
            None => next_unique_code(db, CodeKind::Student, provisioning.code_max_retries).await?,
        };

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role, address)
             VALUES ($1, $2, $3, 'student', $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&dto.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(email_conflict)?;

        let (class_id, class_name) =
            resolve_class(&mut tx, dto.class_id, dto.class_name.as_deref()).await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (
                   user_id, student_code, admission_number, date_of_birth, parent_contact,
                   class_id, class_name, section, guardian_name, guardian_phone, address,
                   roll_number, enrollment_date
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(user.id)
        .bind(&student_code)
        .bind(&dto.admission_number)
        .bind(dto.date_of_birth)
        .bind(&dto.parent_contact)
        .bind(class_id)
        .bind(&class_name)
        .bind(&dto.section)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.address)
        .bind(&dto.roll_number)
        .bind(dto.enrollment_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(student_conflict)?;

        let user = finish_with_avatar(tx, storage, user, avatar.as_ref()).await?;

        track_user_created("student");

        Ok(CreateStudentResponse {
            student_id: student.id,
            student_code: student.student_code.clone(),
            user_id: user.id,
            user,
            student,
        })
    }

    /// Partial update. An unknown `class_id` is ignored; a known one also
    /// replaces `class_name` with the class's name.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        id: Uuid,
        dto: UpdateStudentDto,
    ) -> Result<StudentView, AppError> {
        let mut class_id = None;
        let mut class_name = dto.class_name.clone();

        if let Some(requested) = dto.class_id {
            let name = sqlx::query_scalar::<_, String>("SELECT name FROM classes WHERE id = $1")
                .bind(requested)
                .fetch_optional(db)
                .await
                .context("Failed to fetch class")
                .map_err(AppError::database)?;

            if let Some(name) = name {
                class_id = Some(requested);
                class_name = Some(name);
            }
        }

        let result = sqlx::query(
            r#"UPDATE students
               SET class_id = COALESCE($1, class_id),
                   class_name = COALESCE($2, class_name),
                   section = COALESCE($3, section),
                   guardian_name = COALESCE($4, guardian_name),
                   guardian_phone = COALESCE($5, guardian_phone),
                   parent_contact = COALESCE($6, parent_contact),
                   address = COALESCE($7, address),
                   roll_number = COALESCE($8, roll_number),
                   status = COALESCE($9, status),
                   updated_at = NOW()
               WHERE id = $10"#,
        )
        .bind(class_id)
        .bind(&class_name)
        .bind(&dto.section)
        .bind(&dto.guardian_name)
        .bind(&dto.guardian_phone)
        .bind(&dto.parent_contact)
        .bind(&dto.address)
        .bind(&dto.roll_number)
        .bind(dto.status)
        .bind(id)
        .execute(db)
        .await
        .context("Failed to update student")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        Self::get_student(db, id).await
    }

    /// Deletes the student's user account; the student row and its fees
    /// go with it.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM students WHERE id = $1)",
        )
        .bind(id)
        .execute(db)
        .await
        .context("Failed to delete student")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }

        Ok(())
    }
}

/// A known class wins over the free-text name; an unknown class id is dropped.
async fn resolve_class(
    tx: &mut Transaction<'_, Postgres>,
    class_id: Option<Uuid>,
    class_name: Option<&str>,
) -> Result<(Option<Uuid>, String), AppError> {
    let fallback = class_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNASSIGNED_CLASS_NAME)
        .to_string();

    let Some(class_id) = class_id else {
        return Ok((None, fallback));
    };

    let name = sqlx::query_scalar::<_, String>("SELECT name FROM classes WHERE id = $1")
        .bind(class_id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to fetch class")
        .map_err(AppError::database)?;

    Ok(match name {
        Some(name) => (Some(class_id), name),
        None => (None, fallback),
    })
}

/// Stores the avatar, points the user at it and commits. A stored file is
/// removed again if the transaction does not commit.
pub(crate) async fn finish_with_avatar(
    mut tx: Transaction<'_, Postgres>,
    storage: &dyn FileStorage,
    user: User,
    avatar: Option<&DecodedAvatar>,
) -> Result<User, AppError> {
    let Some(decoded) = avatar else {
        tx.commit().await?;
        return Ok(user);
    };

    let (key, url) = store_avatar(storage, user.id, decoded).await?;

    let outcome = async {
        let user = set_avatar(&mut tx, user.id, &url).await?;
        tx.commit().await?;
        Ok::<_, AppError>(user)
    }
    .await;

    if outcome.is_err() {
        if let Err(e) = storage.delete(&key).await {
            warn!(key = %key, error = %e, "Failed to remove avatar after rollback");
        }
    }

    outcome
}

async fn set_avatar(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    url: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET avatar = $1, updated_at = NOW() WHERE id = $2 RETURNING {USER_COLUMNS}"
    ))
    .bind(url)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .context("Failed to set avatar")
    .map_err(AppError::database)
}

fn student_conflict(err: sqlx::Error) -> AppError {
    match unique_violation(&err) {
        Some("students_student_code_key") => {
            AppError::conflict("Student code already in use".to_string())
        }
        Some("students_admission_number_key") => {
            AppError::conflict("Admission number already in use".to_string())
        }
        _ => AppError::database(err),
    }
}
