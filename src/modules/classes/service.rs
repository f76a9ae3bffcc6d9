use anyhow::{Context, anyhow};
use schoolhub_core::AppError;
use schoolhub_db::{is_foreign_key_violation, unique_violation};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    Class, ClassFilterParams, ClassResponse, ClassRow, CreateClassDto, UpdateClassDto,
};

const DEFAULT_CAPACITY: i32 = 30;

const CLASS_SELECT: &str = r#"
    SELECT c.id, c.name, c.code, c.grade, c.subject, c.teacher_id, c.capacity,
           c.schedule, c.location, c.status, c.created_at, c.updated_at,
           u.name AS teacher_name, u.email AS teacher_email,
           (SELECT COUNT(*) FROM students s WHERE s.class_id = c.id) AS student_count
    FROM classes c
    LEFT JOIN teachers t ON t.id = c.teacher_id
    LEFT JOIN users u ON u.id = t.user_id"#;

/// The teacher check runs before the write, so a teacher deleted in between
/// shows up here as a foreign key violation.
fn write_error(err: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&err) {
        return AppError::not_found(anyhow!("Teacher not found"));
    }
    match unique_violation(&err) {
        Some("classes_code_key") => AppError::conflict("Class code already exists".to_string()),
        _ => AppError::database(err),
    }
}

pub struct ClassService;

impl ClassService {
    /// Lists classes matching the filters, active classes only by default.
    #[instrument(skip(db))]
    pub async fn list_classes(
        db: &PgPool,
        filters: ClassFilterParams,
    ) -> Result<Vec<ClassResponse>, AppError> {
        let status = filters
            .status_filter()
            .map_err(|message| AppError::bad_request(anyhow!(message)))?;

        let rows = sqlx::query_as::<_, ClassRow>(&format!(
            r#"{CLASS_SELECT}
               WHERE ($1::class_status IS NULL OR c.status = $1)
                 AND ($2::text IS NULL OR c.grade = $2)
                 AND ($3::text IS NULL OR c.subject = $3)
                 AND ($4::uuid IS NULL OR c.teacher_id = $4)
               ORDER BY c.grade, c.name"#
        ))
        .bind(status)
        .bind(&filters.grade)
        .bind(&filters.subject)
        .bind(filters.teacher_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch classes")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(ClassResponse::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: Uuid) -> Result<ClassResponse, AppError> {
        sqlx::query_as::<_, ClassRow>(&format!("{CLASS_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch class")
            .map_err(AppError::database)?
            .map(ClassResponse::from)
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    #[instrument(skip(db, dto), fields(code = %dto.code))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<ClassResponse, AppError> {
        if let Some(teacher_id) = dto.teacher_id {
            Self::ensure_teacher_exists(db, teacher_id).await?;
        }

        let class = sqlx::query_as::<_, Class>(
            r#"INSERT INTO classes (name, code, grade, subject, teacher_id, capacity, schedule, location)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id, name, code, grade, subject, teacher_id, capacity, schedule,
                         location, status, created_at, updated_at"#,
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.grade)
        .bind(&dto.subject)
        .bind(dto.teacher_id)
        .bind(dto.capacity.unwrap_or(DEFAULT_CAPACITY))
        .bind(Json(dto.schedule.unwrap_or_default()))
        .bind(&dto.location)
        .fetch_one(db)
        .await
        .map_err(write_error)?;

        Self::get_class(db, class.id).await
    }

    /// Applies a partial update. An explicit `teacher_id: null` unassigns
    /// the teacher.
    #[instrument(skip(db, dto))]
    pub async fn update_class(
        db: &PgPool,
        id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<ClassResponse, AppError> {
        if let Some(Some(teacher_id)) = dto.teacher_id {
            Self::ensure_teacher_exists(db, teacher_id).await?;
        }

        let result = sqlx::query(
            r#"UPDATE classes
               SET name = COALESCE($1, name),
                   code = COALESCE($2, code),
                   grade = COALESCE($3, grade),
                   subject = COALESCE($4, subject),
                   teacher_id = CASE WHEN $5 THEN $6 ELSE teacher_id END,
                   capacity = COALESCE($7, capacity),
                   schedule = COALESCE($8, schedule),
                   location = COALESCE($9, location),
                   status = COALESCE($10, status),
                   updated_at = NOW()
               WHERE id = $11"#,
        )
        .bind(&dto.name)
        .bind(&dto.code)
        .bind(&dto.grade)
        .bind(&dto.subject)
        .bind(dto.teacher_id.is_some())
        .bind(dto.teacher_id.flatten())
        .bind(dto.capacity)
        .bind(dto.schedule.map(Json))
        .bind(&dto.location)
        .bind(dto.status)
        .bind(id)
        .execute(db)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }

        Self::get_class(db, id).await
    }

    /// Deletes a class; its students fall back to their stored class name.
    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete class")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Class not found")));
        }

        Ok(())
    }

    async fn ensure_teacher_exists(db: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
                .bind(teacher_id)
                .fetch_one(db)
                .await
                .context("Failed to check teacher")
                .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }
        Ok(())
    }
}
