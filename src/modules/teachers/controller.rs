use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::teachers::model::{
    CreateTeacherDto, CreateTeacherResponse, MessageResponse, TeacherView, UpdateTeacherDto,
};
use crate::modules::teachers::service::TeacherService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a teacher and its user account
///
/// When no password is supplied a temporary one is generated and returned
/// once as `temporary_password`.
#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = CreateTeacherResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 409, description = "Email or staff ID in use", body = ErrorResponse),
        (status = 413, description = "Avatar too large", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "No unique staff ID could be generated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<CreateTeacherResponse>), AppError> {
    let response = TeacherService::create_teacher(
        &state.db,
        state.storage.as_ref(),
        &state.provisioning,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/teachers",
    responses(
        (status = 200, description = "List of teachers", body = Vec<TeacherView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teachers(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
) -> Result<Json<Vec<TeacherView>>, AppError> {
    let teachers = TeacherService::list_teachers(&state.db).await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher details", body = TeacherView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<TeacherView>, AppError> {
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = TeacherView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<TeacherView>, AppError> {
    let teacher = TeacherService::update_teacher(&state.db, id, dto).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(
        ("id" = Uuid, Path, description = "Teacher ID")
    ),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth_user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Teacher deleted successfully".to_string(),
    }))
}
