use crate::env_or;

/// Settings for assigning codes to new student and teacher records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvisioningConfig {
    /// How many candidate codes to try before giving up.
    pub code_max_retries: u32,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            code_max_retries: 10,
        }
    }
}

impl ProvisioningConfig {
    /// Reads `CODE_MAX_RETRIES`. Negative values clamp to zero, which makes
    /// every code allocation fail immediately.
    #[must_use]
    pub fn from_env() -> Self {
        let raw: i64 = env_or("CODE_MAX_RETRIES", 10);
        Self::from_raw(raw)
    }

    fn from_raw(raw: i64) -> Self {
        Self {
            code_max_retries: u32::try_from(raw.max(0)).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        assert_eq!(ProvisioningConfig::default().code_max_retries, 10);
    }

    #[test]
    fn test_negative_budget_clamps_to_zero() {
        assert_eq!(ProvisioningConfig::from_raw(-3).code_max_retries, 0);
        assert_eq!(ProvisioningConfig::from_raw(25).code_max_retries, 25);
    }
}
