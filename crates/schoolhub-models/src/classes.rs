//! Classes, their weekly schedule and list filters.

use chrono::{DateTime, Utc};
use schoolhub_core::serde::{deserialize_nullable, deserialize_optional_uuid};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "class_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    Active,
    Archived,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Validate, ToSchema)]
pub struct ScheduleSlot {
    #[validate(length(min = 1))]
    pub day: String,
    #[validate(length(min = 1))]
    pub start_time: String,
    #[validate(length(min = 1))]
    pub end_time: String,
}

/// Row of the `classes` table.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub grade: String,
    pub subject: String,
    pub teacher_id: Option<Uuid>,
    pub capacity: i32,
    #[schema(value_type = Vec<ScheduleSlot>)]
    pub schedule: Json<Vec<ScheduleSlot>>,
    pub location: Option<String>,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Class row joined with its teacher's user and the enrolled student count.
#[derive(FromRow, Debug, Clone)]
pub struct ClassRow {
    #[sqlx(flatten)]
    pub class: Class,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub student_count: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ClassTeacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ClassResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub grade: String,
    pub subject: String,
    pub teacher: Option<ClassTeacher>,
    pub capacity: i32,
    pub student_count: i64,
    pub schedule: Vec<ScheduleSlot>,
    pub location: Option<String>,
    pub status: ClassStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ClassRow> for ClassResponse {
    fn from(row: ClassRow) -> Self {
        let ClassRow {
            class,
            teacher_name,
            teacher_email,
            student_count,
        } = row;

        let teacher = match (class.teacher_id, teacher_name, teacher_email) {
            (Some(id), Some(name), Some(email)) => Some(ClassTeacher { id, name, email }),
            _ => None,
        };

        Self {
            id: class.id,
            name: class.name,
            code: class.code,
            grade: class.grade,
            subject: class.subject,
            teacher,
            capacity: class.capacity,
            student_count,
            schedule: class.schedule.0,
            location: class.location,
            status: class.status,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateClassDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 32, message = "code is required"))]
    pub code: String,
    #[validate(length(min = 1, max = 50, message = "grade is required"))]
    pub grade: String,
    #[validate(length(min = 1, max = 100, message = "subject is required"))]
    pub subject: String,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
    /// Defaults to 30.
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(nested)]
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub location: Option<String>,
}

/// Partial update. `teacher_id: null` unassigns the teacher; omitting it
/// leaves the assignment unchanged.
#[derive(Deserialize, Debug, Default, Clone, Validate, ToSchema)]
pub struct UpdateClassDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    #[schema(value_type = Option<Uuid>)]
    pub teacher_id: Option<Option<Uuid>>,
    #[validate(range(min = 1, message = "capacity must be at least 1"))]
    pub capacity: Option<i32>,
    #[validate(nested)]
    pub schedule: Option<Vec<ScheduleSlot>>,
    pub location: Option<String>,
    pub status: Option<ClassStatus>,
}

#[derive(Deserialize, Debug, Default, Clone, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    /// `active` (default), `archived`, or `all`
    pub status: Option<String>,
    pub grade: Option<String>,
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub teacher_id: Option<Uuid>,
}

impl ClassFilterParams {
    /// Status to filter on, `None` meaning every status.
    pub fn status_filter(&self) -> Result<Option<ClassStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("active") => Ok(Some(ClassStatus::Active)),
            Some("archived") => Ok(Some(ClassStatus::Archived)),
            Some("all") => Ok(None),
            Some(other) => Err(format!("Invalid status filter: {}", other)),
        }
    }
}
