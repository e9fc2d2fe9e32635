use super::ValidationError;

pub fn validate_display_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::DisplayNameEmpty);
    }

    if trimmed.chars().count() > 100 {
        return Err(ValidationError::DisplayNameTooLong);
    }

    Ok(())
}

pub fn validate_team_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();

    if !(3..=100).contains(&len) {
        return Err(ValidationError::TeamNameLength);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert!(validate_display_name("Ada").is_ok());
        assert!(validate_display_name("José García").is_ok());
        assert_eq!(
            validate_display_name("   ").unwrap_err(),
            ValidationError::DisplayNameEmpty
        );
        assert_eq!(
            validate_display_name(&"a".repeat(101)).unwrap_err(),
            ValidationError::DisplayNameTooLong
        );
    }

    #[test]
    fn test_team_names() {
        assert!(validate_team_name("Acme").is_ok());
        assert_eq!(
            validate_team_name("AB").unwrap_err(),
            ValidationError::TeamNameLength
        );
    }
}
