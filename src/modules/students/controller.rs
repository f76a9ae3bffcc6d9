use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use schoolhub_core::AppError;
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::role::{RequireStaff, RequireStudentViewer};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::model::{
    CreateStudentDto, CreateStudentResponse, MessageResponse, StudentView, UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create a student and its user account
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = CreateStudentResponse),
        (status = 400, description = "Malformed body or avatar", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 409, description = "Email, student code or admission number in use", body = ErrorResponse),
        (status = 413, description = "Avatar too large", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse),
        (status = 500, description = "No unique student code could be generated", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<CreateStudentResponse>), AppError> {
    let response = StudentService::create_student(
        &state.db,
        state.storage.as_ref(),
        &state.provisioning,
        dto,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List all students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "List of students", body = Vec<StudentView>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
) -> Result<Json<Vec<StudentView>>, AppError> {
    let students = StudentService::list_students(&state.db).await?;
    Ok(Json(students))
}

/// Look up a student by student code
#[utoipa::path(
    get,
    path = "/api/students/by-code/{code}",
    params(
        ("code" = String, Path, description = "Student code, e.g. AB123")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student_by_code(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(code): Path<String>,
) -> Result<Json<StudentView>, AppError> {
    let student = StudentService::get_student_by_code(&state.db, &code).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student details", body = StudentView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    RequireStudentViewer(_auth_user): RequireStudentViewer,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentView>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = StudentView),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<StudentView>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin or teacher only", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireStaff(_auth_user): RequireStaff,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(MessageResponse {
        message: "Student deleted successfully".to_string(),
    }))
}
