//! # SchoolHub Models
//!
//! Domain entities, read views and request/response DTOs shared by the
//! server and the CLI.
//!
//! - [`users`]: Accounts and the role enum
//! - [`auth`]: Registration, login and profile payloads
//! - [`students`]: Student records, provisioning and lookup views
//! - [`teachers`]: Teacher records and provisioning
//! - [`classes`]: Classes, schedules and filters
//! - [`fees`]: Fee records, status derivation and summaries

pub mod auth;
pub mod classes;
pub mod fees;
pub mod students;
pub mod teachers;
pub mod users;

pub use auth::{LoginRequest, LoginResponse, MessageResponse, RegisterRequestDto, UpdateProfileDto};
pub use classes::{
    Class, ClassFilterParams, ClassResponse, ClassRow, ClassStatus, ClassTeacher, CreateClassDto,
    ScheduleSlot, UpdateClassDto,
};
pub use fees::{
    CreateFeeDto, Fee, FeeFilterParams, FeeSettlement, FeeStatus, FeeSummary, FeeType, FeeView,
    UpdateFeeDto,
};
pub use students::{
    CreateStudentDto, CreateStudentResponse, Student, StudentStatus, StudentView, UpdateStudentDto,
};
pub use teachers::{
    CreateTeacherDto, CreateTeacherResponse, Teacher, TeacherView, UpdateTeacherDto,
};
pub use users::{User, UserCredentials, UserRole};
