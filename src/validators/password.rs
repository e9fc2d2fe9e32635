use super::ValidationError;

const MIN_LENGTH: usize = 8;
const MAX_LENGTH: usize = 128;

/// Registration form rule: 8 to 128 characters.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();

    if len < MIN_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }

    if len > MAX_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_bounds() {
        assert_eq!(
            validate_password("short").unwrap_err(),
            ValidationError::PasswordTooShort
        );
        assert!(validate_password("exactly8").is_ok());
        assert_eq!(
            validate_password(&"p".repeat(129)).unwrap_err(),
            ValidationError::PasswordTooLong
        );
    }
}
