use anyhow::{Context, anyhow};
use axum::http::StatusCode;
use schoolhub_core::AppError;
use sqlx::PgPool;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::modules::teachers::service::{TEACHER_VIEW_SELECT, TeacherService};

use super::model::{HealthResponse, TeacherView};

pub struct AdminService;

impl AdminService {
    /// Pings the database; an unreachable database is reported as 503.
    #[instrument(skip(db))]
    pub async fn health(db: &PgPool) -> Result<HealthResponse, AppError> {
        match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(db).await {
            Ok(_) => Ok(HealthResponse {
                ok: true,
                database: "connected".to_string(),
            }),
            Err(err) => {
                warn!(error = %err, "Database health check failed");
                Err(AppError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    anyhow!("Database unavailable"),
                ))
            }
        }
    }

    /// Marks one teacher as featured and clears the flag on every other.
    #[instrument(skip(db))]
    pub async fn feature_teacher(db: &PgPool, teacher_id: Uuid) -> Result<TeacherView, AppError> {
        let mut tx = db.begin().await?;

        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)")
            .bind(teacher_id)
            .fetch_one(&mut *tx)
            .await
            .context("Failed to check teacher")
            .map_err(AppError::database)?;

        if !found {
            return Err(AppError::not_found(anyhow!("Teacher not found")));
        }

        sqlx::query(
            "UPDATE teachers SET featured = (id = $1), updated_at = NOW() \
             WHERE featured OR id = $1",
        )
        .bind(teacher_id)
        .execute(&mut *tx)
        .await
        .context("Failed to feature teacher")
        .map_err(AppError::database)?;

        tx.commit().await?;

        TeacherService::get_teacher(db, teacher_id).await
    }

    /// The featured teacher, or else the most experienced one.
    #[instrument(skip(db))]
    pub async fn top_teacher(db: &PgPool) -> Result<TeacherView, AppError> {
        sqlx::query_as::<_, TeacherView>(&format!(
            "{TEACHER_VIEW_SELECT} \
             ORDER BY t.featured DESC, t.experience DESC NULLS LAST, t.created_at \
             LIMIT 1"
        ))
        .fetch_optional(db)
        .await
        .context("Failed to fetch top teacher")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("No teachers found")))
    }
}
