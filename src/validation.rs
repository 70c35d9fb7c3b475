// Validation utilities module
// Provides custom validation functions shared by request DTOs

use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

static NUMERIC_ONLY: OnceLock<Regex> = OnceLock::new();

/// Validates the account password policy: at least 8 characters and not
/// entirely numeric.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        let mut err = ValidationError::new("password_too_short");
        err.message =
            Some("This password is too short. It must contain at least 8 characters.".into());
        return Err(err);
    }

    let numeric = NUMERIC_ONLY.get_or_init(|| Regex::new(r"^\d+$").expect("valid regex"));
    if numeric.is_match(password) {
        let mut err = ValidationError::new("password_entirely_numeric");
        err.message = Some("This password is entirely numeric.".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_password_is_rejected() {
        let err = validate_password_strength("abc1234").unwrap_err();
        assert_eq!(err.code, "password_too_short");
    }

    #[test]
    fn test_entirely_numeric_password_is_rejected() {
        let err = validate_password_strength("12345678901").unwrap_err();
        assert_eq!(err.code, "password_entirely_numeric");
    }

    #[test]
    fn test_mixed_password_is_accepted() {
        assert!(validate_password_strength("Str0ngPass!").is_ok());
    }

    #[test]
    fn test_exactly_eight_characters_pass() {
        assert!(validate_password_strength("abcd123!").is_ok());
    }
}
