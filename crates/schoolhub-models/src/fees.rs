//! Fee records, status derivation and per-student summaries.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhub_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fee_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Tuition,
    Transport,
    Uniform,
    Books,
    Activities,
    Hostel,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "fee_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    Pending,
    Paid,
    Overdue,
    Partial,
}

impl FeeStatus {
    /// Status implied by the amounts and due date as of `today`.
    pub fn derive(amount: f64, paid_amount: f64, due_date: NaiveDate, today: NaiveDate) -> Self {
        if paid_amount >= amount {
            FeeStatus::Paid
        } else if paid_amount > 0.0 {
            FeeStatus::Partial
        } else if today > due_date {
            FeeStatus::Overdue
        } else {
            FeeStatus::Pending
        }
    }
}

/// Amount-dependent columns of a fee, recomputed on every save.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSettlement {
    pub status: FeeStatus,
    pub paid_date: Option<DateTime<Utc>>,
}

impl FeeSettlement {
    /// A fee that becomes paid keeps its first `paid_date`; one that stops
    /// being paid loses it.
    pub fn compute(
        amount: f64,
        paid_amount: f64,
        due_date: NaiveDate,
        previous_paid_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        let status = FeeStatus::derive(amount, paid_amount, due_date, now.date_naive());
        let paid_date = match status {
            FeeStatus::Paid => Some(previous_paid_date.unwrap_or(now)),
            _ => None,
        };
        Self { status, paid_date }
    }
}

/// Row of the `fees` table.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Fee {
    pub id: Uuid,
    pub student_id: Uuid,
    pub fee_type: FeeType,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: FeeStatus,
    pub paid_amount: f64,
    pub paid_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fee joined with the owning student's code and name.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct FeeView {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fee: Fee,
    pub student_code: String,
    pub student_name: String,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateFeeDto {
    pub student_id: Uuid,
    pub fee_type: FeeType,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub due_date: NaiveDate,
    #[validate(range(min = 0.0, message = "paid_amount must not be negative"))]
    pub paid_amount: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, Validate, ToSchema)]
pub struct UpdateFeeDto {
    pub fee_type: Option<FeeType>,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "paid_amount must not be negative"))]
    pub paid_amount: Option<f64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct FeeFilterParams {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub student_id: Option<Uuid>,
    pub status: Option<FeeStatus>,
    pub fee_type: Option<FeeType>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct FeeSummary {
    pub student_id: Uuid,
    pub total_amount: f64,
    pub total_paid: f64,
    pub balance: f64,
    pub fee_count: usize,
    pub pending: usize,
    pub paid: usize,
    pub partial: usize,
    pub overdue: usize,
}

impl FeeSummary {
    pub fn from_fees(student_id: Uuid, fees: &[Fee]) -> Self {
        let mut summary = FeeSummary {
            student_id,
            total_amount: 0.0,
            total_paid: 0.0,
            balance: 0.0,
            fee_count: fees.len(),
            pending: 0,
            paid: 0,
            partial: 0,
            overdue: 0,
        };

        for fee in fees {
            summary.total_amount += fee.amount;
            summary.total_paid += fee.paid_amount;
            match fee.status {
                FeeStatus::Pending => summary.pending += 1,
                FeeStatus::Paid => summary.paid += 1,
                FeeStatus::Partial => summary.partial += 1,
                FeeStatus::Overdue => summary.overdue += 1,
            }
        }
        summary.balance = summary.total_amount - summary.total_paid;
        summary
    }
}
