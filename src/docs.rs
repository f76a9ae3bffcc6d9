use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::admin::model::HealthResponse;
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto, UpdateProfileDto, User,
    UserRole,
};
use crate::modules::classes::model::{
    ClassResponse, ClassStatus, ClassTeacher, CreateClassDto, ScheduleSlot, UpdateClassDto,
};
use crate::modules::fees::model::{
    CreateFeeDto, Fee, FeeStatus, FeeSummary, FeeType, FeeView, UpdateFeeDto,
};
use crate::modules::students::model::{
    CreateStudentDto, CreateStudentResponse, Student, StudentStatus, StudentView,
    UpdateStudentDto,
};
use crate::modules::teachers::model::{
    CreateTeacherDto, CreateTeacherResponse, Teacher, TeacherView, UpdateTeacherDto,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::get_current_user,
        crate::modules::auth::controller::update_profile,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::get_students,
        crate::modules::students::controller::get_student_by_code,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::fees::controller::create_fee,
        crate::modules::fees::controller::get_fees,
        crate::modules::fees::controller::get_fee,
        crate::modules::fees::controller::update_fee,
        crate::modules::fees::controller::delete_fee,
        crate::modules::fees::controller::get_student_fee_summary,
        crate::modules::admin::controller::health,
        crate::modules::admin::controller::feature_teacher,
        crate::modules::admin::controller::top_teacher,
    ),
    components(
        schemas(
            User,
            UserRole,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            UpdateProfileDto,
            MessageResponse,
            ErrorResponse,
            Student,
            StudentStatus,
            StudentView,
            CreateStudentDto,
            CreateStudentResponse,
            UpdateStudentDto,
            Teacher,
            TeacherView,
            CreateTeacherDto,
            CreateTeacherResponse,
            UpdateTeacherDto,
            ClassResponse,
            ClassStatus,
            ClassTeacher,
            ScheduleSlot,
            CreateClassDto,
            UpdateClassDto,
            Fee,
            FeeView,
            FeeType,
            FeeStatus,
            FeeSummary,
            CreateFeeDto,
            UpdateFeeDto,
            HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and profile endpoints"),
        (name = "Students", description = "Student provisioning and lookup"),
        (name = "Teachers", description = "Teacher provisioning and management"),
        (name = "Classes", description = "Class management endpoints"),
        (name = "Fees", description = "Fee records and per-student summaries"),
        (name = "Admin", description = "Administrative endpoints")
    ),
    info(
        title = "School Management API",
        version = "0.1.0",
        description = "REST API for students, teachers, classes and fees built with Rust, Axum, and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
