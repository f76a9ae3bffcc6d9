//! Teacher records and provisioning payloads.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::users::User;

/// Row of the `teachers` table.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct Teacher {
    pub id: Uuid,
    pub user_id: Uuid,
    pub staff_id: String,
    pub subjects: Vec<String>,
    pub qualification: Option<String>,
    pub experience: Option<i32>,
    pub department: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub salary: Option<f64>,
    pub classes: Vec<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Teacher joined with its user account.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, ToSchema)]
pub struct TeacherView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub staff_id: String,
    pub subjects: Vec<String>,
    pub qualification: Option<String>,
    pub experience: Option<i32>,
    pub department: Option<String>,
    pub salary: Option<f64>,
    pub classes: Vec<String>,
    pub featured: bool,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateTeacherDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    /// Image data URL or an absolute URL stored as-is.
    pub avatar: Option<String>,
    /// A temporary password is generated and returned when omitted.
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    /// Generated (`T-AB123`) when omitted.
    #[validate(length(min = 1, max = 32))]
    pub staff_id: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub qualification: Option<String>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub department: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub classes: Option<Vec<String>>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CreateTeacherResponse {
    pub teacher_id: Uuid,
    pub user_id: Uuid,
    pub user: User,
    pub teacher: Teacher,
    /// Present only when the password was generated by the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, Validate, ToSchema)]
pub struct UpdateTeacherDto {
    pub subjects: Option<Vec<String>>,
    pub qualification: Option<String>,
    #[validate(range(min = 0))]
    pub experience: Option<i32>,
    pub department: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub classes: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_is_optional() {
        let dto: CreateTeacherDto = serde_json::from_value(serde_json::json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "subjects": ["Maths", "Computing"]
        }))
        .unwrap();

        assert!(dto.validate().is_ok());
        assert!(dto.password.is_none());
        assert_eq!(dto.subjects.as_deref().map(<[String]>::len), Some(2));
    }

    #[test]
    fn test_short_password_rejected() {
        let dto: CreateTeacherDto = serde_json::from_value(serde_json::json!({
            "name": "Grace Hopper",
            "email": "grace@example.com",
            "password": "abc"
        }))
        .unwrap();

        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_negative_salary_rejected() {
        let dto = UpdateTeacherDto {
            salary: Some(-1.0),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }
}
