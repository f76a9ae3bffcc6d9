use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::classes::model::{
    ClassFilterParams, ClassResponse, CreateClassDto, MessageResponse, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ClassResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse),
        (status = 409, description = "Class code already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ClassResponse>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

/// List classes
///
/// Only active classes are returned unless `status` is `archived` or `all`.
#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "List of classes", body = Vec<ClassResponse>),
        (status = 400, description = "Invalid status filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Query(filters): Query<ClassFilterParams>,
) -> Result<Json<Vec<ClassResponse>>, AppError> {
    let classes = ClassService::list_classes(&state.db, filters).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class details", body = ClassResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassResponse>, AppError> {
    let class = ClassService::get_class(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ClassResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse),
        (status = 409, description = "Class code already exists", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ClassResponse>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(
        ("id" = Uuid, Path, description = "Class ID")
    ),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassService::delete_class(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Class deleted successfully".to_string(),
    }))
}
