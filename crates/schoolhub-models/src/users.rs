//! User accounts and roles.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
            UserRole::Parent => "parent",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "student" => Ok(UserRole::Student),
            "parent" => Ok(UserRole::Parent),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

/// A user account as exposed over the API. The password hash is never part
/// of this struct.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Row used only when checking a login.
#[derive(FromRow, Debug)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in [
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Student,
            UserRole::Parent,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert!("system_admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Teacher).unwrap(), r#""teacher""#);
        let role: UserRole = serde_json::from_str(r#""parent""#).unwrap();
        assert_eq!(role, UserRole::Parent);
    }
}
