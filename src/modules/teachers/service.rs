use anyhow::{Context, anyhow};
use rand::SeedableRng;
use rand::rngs::StdRng;
use schoolhub_config::ProvisioningConfig;
use schoolhub_core::file_storage::FileStorage;
use schoolhub_core::{AppError, CodeKind, generate_temporary_password, hash_password};
use schoolhub_db::unique_violation;
use schoolhub_models::User;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::track_user_created;
use crate::modules::auth::service::{AuthService, USER_COLUMNS, email_conflict};
use crate::modules::students::service::finish_with_avatar;
use crate::utils::avatar::{AvatarInput, prepare_avatar};
use crate::utils::codes::next_unique_code;

use super::model::{
    CreateTeacherDto, CreateTeacherResponse, Teacher, TeacherView, UpdateTeacherDto,
};

const TEACHER_COLUMNS: &str = "id, user_id, staff_id, subjects, qualification, experience, \
     department, gender, date_of_birth, address, salary, classes, featured, created_at, updated_at";

pub(crate) const TEACHER_VIEW_SELECT: &str = r#"
    SELECT t.id, t.user_id, u.name, u.email, u.avatar, u.phone,
           COALESCE(t.address, u.address) AS address, t.staff_id, t.subjects,
           t.qualification, t.experience, t.department, t.salary, t.classes, t.featured
    FROM teachers t
    JOIN users u ON u.id = t.user_id"#;

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn list_teachers(db: &PgPool) -> Result<Vec<TeacherView>, AppError> {
        let teachers = sqlx::query_as::<_, TeacherView>(&format!(
            "{TEACHER_VIEW_SELECT} ORDER BY u.name"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch teachers")
        .map_err(AppError::database)?;

        Ok(teachers)
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: Uuid) -> Result<TeacherView, AppError> {
        sqlx::query_as::<_, TeacherView>(&format!("{TEACHER_VIEW_SELECT} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch teacher")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    /// Creates the teacher's user account and teacher record together.
    #[instrument(skip(db, storage, provisioning, dto), fields(email = %dto.email))]
    pub async fn create_teacher(
        db: &PgPool,
        storage: &dyn FileStorage,
        provisioning: &ProvisioningConfig,
        dto: CreateTeacherDto,
    ) -> Result<CreateTeacherResponse, AppError> {
        AuthService::ensure_email_available(db, &dto.email).await?;

        let (inline_avatar, avatar_link) = match prepare_avatar(dto.avatar.as_deref(), storage)? {
            Some(AvatarInput::Inline(decoded)) => (Some(decoded), None),
            Some(AvatarInput::Link(url)) => (None, Some(url)),
            None => (None, None),
        };

        let (password, temporary_password) = match dto.password.clone() {
            Some(password) => (password, None),
            None => {
                let generated = generate_temporary_password(&mut StdRng::from_entropy());
                (generated.clone(), Some(generated))
            }
        };
        let hashed_password = hash_password(&password)?;

        // Resolved outside the transaction, see `StudentService::create_student`.
        let staff_id = match dto.staff_id.as_deref().map(str::trim) {
            Some(staff_id) if !staff_id.is_empty() => staff_id.to_string(),
            _ => next_unique_code(db, CodeKind::Teacher, provisioning.code_max_retries).await?,
        };

        let mut tx = db.begin().await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role, avatar, phone, address)
             VALUES ($1, $2, $3, 'teacher', $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(&avatar_link)
        .bind(&dto.phone)
        .bind(&dto.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(email_conflict)?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers (
                   user_id, staff_id, subjects, qualification, experience, department,
                   gender, date_of_birth, address, salary, classes
               )
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(user.id)
        .bind(&staff_id)
        .bind(dto.subjects.clone().unwrap_or_default())
        .bind(&dto.qualification)
        .bind(dto.experience)
        .bind(&dto.department)
        .bind(&dto.gender)
        .bind(dto.date_of_birth)
        .bind(&dto.address)
        .bind(dto.salary)
        .bind(dto.classes.clone().unwrap_or_default())
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match unique_violation(&err) {
            Some("teachers_staff_id_key") => {
                AppError::conflict("Staff ID already in use".to_string())
            }
            _ => AppError::database(err),
        })?;

        let user = finish_with_avatar(tx, storage, user, inline_avatar.as_ref()).await?;

        track_user_created("teacher");

        Ok(CreateTeacherResponse {
            teacher_id: teacher.id,
            user_id: user.id,
            user,
            teacher,
            temporary_password,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_teacher(
        db: &PgPool,
        id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<TeacherView, AppError> {
        let result = sqlx::query(
            r#"UPDATE teachers
               SET subjects = COALESCE($1, subjects),
                   qualification = COALESCE($2, qualification),
                   experience = COALESCE($3, experience),
                   department = COALESCE($4, department),
                   salary = COALESCE($5, salary),
                   classes = COALESCE($6, classes),
                   updated_at = NOW()
               WHERE id = $7"#,
        )
        .bind(&dto.subjects)
        .bind(&dto.qualification)
        .bind(dto.experience)
        .bind(&dto.department)
        .bind(dto.salary)
        .bind(&dto.classes)
        .bind(id)
        .execute(db)
        .await
        .context("Failed to update teacher")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }

        Self::get_teacher(db, id).await
    }

    /// Deletes the teacher's user account; classes taught by the teacher
    /// become unassigned.
    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "DELETE FROM users WHERE id = (SELECT user_id FROM teachers WHERE id = $1)",
        )
        .bind(id)
        .execute(db)
        .await
        .context("Failed to delete teacher")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }

        Ok(())
    }
}
