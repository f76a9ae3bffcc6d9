use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Access token claims.
///
/// The role travels in the token so authorization checks need no database
/// lookup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub email: String,
    /// One of `admin`, `teacher`, `student`, `parent`
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_round_trip_json() {
        let json = r#"{"sub":"user-id-456","email":"user@test.com","role":"teacher","exp":9999999999,"iat":9999999900}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.sub, "user-id-456");
        assert_eq!(claims.role, "teacher");

        let serialized = serde_json::to_string(&claims).unwrap();
        assert!(serialized.contains(r#""role":"teacher""#));
    }
}
