use bcrypt::{DEFAULT_COST, hash, verify};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::errors::AppError;

const TEMPORARY_PASSWORD_LEN: usize = 8;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::internal_error(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    verify(password, hash)
        .map_err(|e| AppError::internal_error(format!("Failed to verify password: {}", e)))
}

/// Random alphanumeric password handed out once when staff are created
/// without one.
pub fn generate_temporary_password<R>(rng: &mut R) -> String
where
    R: Rng + ?Sized,
{
    rng.sample_iter(&Alphanumeric)
        .take(TEMPORARY_PASSWORD_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correctpassword").unwrap();
        assert_ne!(hash, "correctpassword");
        assert!(verify_password("correctpassword", &hash).unwrap());
        assert!(!verify_password("wrongpassword", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }

    #[test]
    fn test_temporary_password_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let password = generate_temporary_password(&mut rng);
        assert_eq!(password.len(), 8);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(password, generate_temporary_password(&mut rng));
    }
}
