//! Student records and the payloads used to provision and look them up.

use chrono::{DateTime, NaiveDate, Utc};
use schoolhub_core::codes::is_student_code;
use schoolhub_core::serde::deserialize_optional_uuid;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::users::User;

pub const UNASSIGNED_CLASS_NAME: &str = "Not Assigned";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "student_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
}

/// Row of the `students` table.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub student_code: String,
    pub admission_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub parent_contact: Option<String>,
    pub class_id: Option<Uuid>,
    pub class_name: String,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub roll_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub status: StudentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Student joined with its user account and assigned class.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct StudentView {
    pub id: Uuid,
    pub student_code: String,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub admission_number: Option<String>,
    pub class_id: Option<Uuid>,
    /// Name of the assigned class, or the free-text class name when none is assigned.
    pub class_name: String,
    pub section: Option<String>,
    pub status: StudentStatus,
    pub date_of_birth: Option<NaiveDate>,
    pub parent_contact: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub roll_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

fn validate_student_code(code: &str) -> Result<(), ValidationError> {
    if is_student_code(code) {
        Ok(())
    } else {
        Err(ValidationError::new("student_code")
            .with_message("student_code must be two uppercase letters followed by three digits".into()))
    }
}

/// Payload for creating a student together with its user account.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 50, message = "admission_number is required"))]
    pub admission_number: String,
    /// Generated when omitted.
    #[validate(custom(function = "validate_student_code"))]
    pub student_code: Option<String>,
    /// Image data URL (`data:image/png;base64,...`).
    pub avatar: Option<String>,
    #[serde(alias = "dob")]
    pub date_of_birth: Option<NaiveDate>,
    pub parent_contact: Option<String>,
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub address: Option<String>,
    pub roll_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CreateStudentResponse {
    pub student_id: Uuid,
    pub student_code: String,
    pub user_id: Uuid,
    pub user: User,
    pub student: Student,
}

/// Partial update of a student's enrollment details.
#[derive(Deserialize, Debug, Default, Clone, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub class_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100))]
    pub class_name: Option<String>,
    pub section: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub parent_contact: Option<String>,
    pub address: Option<String>,
    pub roll_number: Option<String>,
    pub status: Option<StudentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreateStudentDto {
        serde_json::from_value(serde_json::json!({
            "name": "John Doe",
            "email": "john.doe@example.com",
            "password": "secret123",
            "admission_number": "ADM-001"
        }))
        .unwrap()
    }

    #[test]
    fn test_create_student_dto_validation() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_create_student_dto_invalid_email() {
        let dto = CreateStudentDto {
            email: "invalid-email".to_string(),
            ..valid_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_student_dto_short_password() {
        let dto = CreateStudentDto {
            password: "short".to_string(),
            ..valid_dto()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_supplied_code_must_match_format() {
        let dto = CreateStudentDto {
            student_code: Some("AB123".to_string()),
            ..valid_dto()
        };
        assert!(dto.validate().is_ok());

        let dto = CreateStudentDto {
            student_code: Some("ab12".to_string()),
            ..valid_dto()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("student_code"));
    }

    #[test]
    fn test_dob_alias_and_empty_class_id() {
        let dto: CreateStudentDto = serde_json::from_value(serde_json::json!({
            "name": "Jane",
            "email": "jane@example.com",
            "password": "secret123",
            "admission_number": "ADM-002",
            "dob": "2012-04-09",
            "class_id": ""
        }))
        .unwrap();

        assert_eq!(dto.date_of_birth, NaiveDate::from_ymd_opt(2012, 4, 9));
        assert!(dto.class_id.is_none());
    }

    #[test]
    fn test_update_status_values() {
        let dto: UpdateStudentDto =
            serde_json::from_value(serde_json::json!({ "status": "graduated" })).unwrap();
        assert_eq!(dto.status, Some(StudentStatus::Graduated));

        assert!(
            serde_json::from_value::<UpdateStudentDto>(serde_json::json!({ "status": "expelled" }))
                .is_err()
        );
    }
}
