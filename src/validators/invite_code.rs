use super::ValidationError;

/// Codes are short, ASCII alphanumeric and case-sensitive.
pub fn validate_invite_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() || code.len() > 64 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InviteCodeInvalid);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invite_codes() {
        assert!(validate_invite_code("ABC123").is_ok());
        assert!(validate_invite_code("").is_err());
        assert!(validate_invite_code("ABC 123").is_err());
        assert!(validate_invite_code("abc;drop").is_err());
    }
}
