use axum::{
    Json,
    extract::{Path, State},
};
use schoolhub_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::RequireAdmin;
use crate::modules::admin::model::{HealthResponse, TeacherView};
use crate::modules::admin::service::AdminService;
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn health(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
) -> Result<Json<HealthResponse>, AppError> {
    let health = AdminService::health(&state.db).await?;
    Ok(Json(health))
}

#[utoipa::path(
    post,
    path = "/api/admin/teachers/{id}/feature",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher is now featured", body = TeacherView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn feature_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherView>, AppError> {
    let teacher = AdminService::feature_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    get,
    path = "/api/admin/top-teacher",
    responses(
        (status = 200, description = "Featured or most experienced teacher", body = TeacherView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "No teachers found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn top_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
) -> Result<Json<TeacherView>, AppError> {
    let teacher = AdminService::top_teacher(&state.db).await?;
    Ok(Json(teacher))
}
