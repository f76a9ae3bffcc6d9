use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::fees::model::{
    CreateFeeDto, FeeFilterParams, FeeSummary, FeeView, MessageResponse, UpdateFeeDto,
};
use crate::modules::fees::service::FeeService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/fees",
    request_body = CreateFeeDto,
    responses(
        (status = 201, description = "Fee created", body = FeeView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn create_fee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateFeeDto>,
) -> Result<(StatusCode, Json<FeeView>), AppError> {
    let fee = FeeService::create_fee(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

#[utoipa::path(
    get,
    path = "/api/fees",
    params(FeeFilterParams),
    responses(
        (status = 200, description = "List of fees", body = Vec<FeeView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_fees(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Query(filters): Query<FeeFilterParams>,
) -> Result<Json<Vec<FeeView>>, AppError> {
    let fees = FeeService::list_fees(&state.db, filters).await?;
    Ok(Json(fees))
}

#[utoipa::path(
    get,
    path = "/api/fees/{id}",
    params(
        ("id" = Uuid, Path, description = "Fee ID")
    ),
    responses(
        (status = 200, description = "Fee details", body = FeeView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_fee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<FeeView>, AppError> {
    let fee = FeeService::get_fee(&state.db, id).await?;
    Ok(Json(fee))
}

/// Update a fee
///
/// Status and paid date are recomputed from the merged amounts and due date.
#[utoipa::path(
    put,
    path = "/api/fees/{id}",
    params(
        ("id" = Uuid, Path, description = "Fee ID")
    ),
    request_body = UpdateFeeDto,
    responses(
        (status = 200, description = "Fee updated", body = FeeView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state, dto))]
pub async fn update_fee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateFeeDto>,
) -> Result<Json<FeeView>, AppError> {
    let fee = FeeService::update_fee(&state.db, id, dto).await?;
    Ok(Json(fee))
}

#[utoipa::path(
    delete,
    path = "/api/fees/{id}",
    params(
        ("id" = Uuid, Path, description = "Fee ID")
    ),
    responses(
        (status = 200, description = "Fee deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Fee not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn delete_fee(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    FeeService::delete_fee(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Fee deleted successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/fees/student/{student_id}/summary",
    params(
        ("student_id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Fee totals for the student", body = FeeSummary),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Fees"
)]
#[instrument(skip(state))]
pub async fn get_student_fee_summary(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(student_id): Path<Uuid>,
) -> Result<Json<FeeSummary>, AppError> {
    let summary = FeeService::student_summary(&state.db, student_id).await?;
    Ok(Json(summary))
}
