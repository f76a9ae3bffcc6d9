use anyhow::{Context, anyhow};
use chrono::Utc;
use schoolhub_core::AppError;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use super::model::{
    CreateFeeDto, Fee, FeeFilterParams, FeeSettlement, FeeSummary, FeeView, UpdateFeeDto,
};

const FEE_COLUMNS: &str = "id, student_id, fee_type, amount, due_date, status, paid_amount, \
     paid_date, notes, created_at, updated_at";

const FEE_VIEW_SELECT: &str = r#"
    SELECT f.id, f.student_id, f.fee_type, f.amount, f.due_date, f.status, f.paid_amount,
           f.paid_date, f.notes, f.created_at, f.updated_at,
           s.student_code, u.name AS student_name
    FROM fees f
    JOIN students s ON s.id = f.student_id
    JOIN users u ON u.id = s.user_id"#;

pub struct FeeService;

impl FeeService {
    #[instrument(skip(db))]
    pub async fn list_fees(db: &PgPool, filters: FeeFilterParams) -> Result<Vec<FeeView>, AppError> {
        let fees = sqlx::query_as::<_, FeeView>(&format!(
            r#"{FEE_VIEW_SELECT}
               WHERE ($1::uuid IS NULL OR f.student_id = $1)
                 AND ($2::fee_status IS NULL OR f.status = $2)
                 AND ($3::fee_type IS NULL OR f.fee_type = $3)
               ORDER BY f.due_date DESC, f.created_at DESC"#
        ))
        .bind(filters.student_id)
        .bind(filters.status)
        .bind(filters.fee_type)
        .fetch_all(db)
        .await
        .context("Failed to fetch fees")
        .map_err(AppError::database)?;

        Ok(fees)
    }

    #[instrument(skip(db))]
    pub async fn get_fee(db: &PgPool, id: Uuid) -> Result<FeeView, AppError> {
        sqlx::query_as::<_, FeeView>(&format!("{FEE_VIEW_SELECT} WHERE f.id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch fee")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("Fee not found")))
    }

    #[instrument(skip(db, dto), fields(student_id = %dto.student_id))]
    pub async fn create_fee(db: &PgPool, dto: CreateFeeDto) -> Result<FeeView, AppError> {
        Self::ensure_student_exists(db, dto.student_id).await?;

        let paid_amount = dto.paid_amount.unwrap_or(0.0);
        let settlement =
            FeeSettlement::compute(dto.amount, paid_amount, dto.due_date, None, Utc::now());

        let id: Uuid = sqlx::query_scalar(
            r#"INSERT INTO fees (student_id, fee_type, amount, due_date, status, paid_amount, paid_date, notes)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING id"#,
        )
        .bind(dto.student_id)
        .bind(dto.fee_type)
        .bind(dto.amount)
        .bind(dto.due_date)
        .bind(settlement.status)
        .bind(paid_amount)
        .bind(settlement.paid_date)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .context("Failed to create fee")
        .map_err(AppError::database)?;

        Self::get_fee(db, id).await
    }

    /// Merges the update into the stored fee and recomputes its settlement.
    #[instrument(skip(db, dto))]
    pub async fn update_fee(db: &PgPool, id: Uuid, dto: UpdateFeeDto) -> Result<FeeView, AppError> {
        let mut tx = db.begin().await?;

        let current = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to fetch fee")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("Fee not found")))?;

        let amount = dto.amount.unwrap_or(current.amount);
        let paid_amount = dto.paid_amount.unwrap_or(current.paid_amount);
        let due_date = dto.due_date.unwrap_or(current.due_date);
        let settlement =
            FeeSettlement::compute(amount, paid_amount, due_date, current.paid_date, Utc::now());

        sqlx::query(
            r#"UPDATE fees
               SET fee_type = $1, amount = $2, due_date = $3, status = $4,
                   paid_amount = $5, paid_date = $6, notes = $7, updated_at = NOW()
               WHERE id = $8"#,
        )
        .bind(dto.fee_type.unwrap_or(current.fee_type))
        .bind(amount)
        .bind(due_date)
        .bind(settlement.status)
        .bind(paid_amount)
        .bind(settlement.paid_date)
        .bind(dto.notes.or(current.notes))
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update fee")
        .map_err(AppError::database)?;

        tx.commit().await?;

        Self::get_fee(db, id).await
    }

    #[instrument(skip(db))]
    pub async fn delete_fee(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM fees WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete fee")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Fee not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn student_summary(db: &PgPool, student_id: Uuid) -> Result<FeeSummary, AppError> {
        Self::ensure_student_exists(db, student_id).await?;

        let fees = sqlx::query_as::<_, Fee>(&format!(
            "SELECT {FEE_COLUMNS} FROM fees WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student fees")
        .map_err(AppError::database)?;

        Ok(FeeSummary::from_fees(student_id, &fees))
    }

    async fn ensure_student_exists(db: &PgPool, student_id: Uuid) -> Result<(), AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
                .bind(student_id)
                .fetch_one(db)
                .await
                .context("Failed to check student")
                .map_err(AppError::database)?;

        if !exists {
            return Err(AppError::not_found(anyhow!("Student not found")));
        }
        Ok(())
    }
}
