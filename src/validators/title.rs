use super::ValidationError;

/// Length bounds for the titled entities.
#[derive(Debug, Clone, Copy)]
pub struct TitleRule {
    pub field: &'static str,
    pub min: usize,
    pub max: usize,
}

impl TitleRule {
    pub const PROJECT: Self = Self { field: "Project title", min: 3, max: 200 };
    pub const BOARD: Self = Self { field: "Board title", min: 3, max: 150 };
    pub const COLUMN: Self = Self { field: "Column title", min: 1, max: 150 };
    pub const STATUS: Self = Self { field: "Status title", min: 1, max: 150 };
    pub const DOC_SPACE: Self = Self { field: "Space name", min: 1, max: 150 };
    pub const DOC_PAGE: Self = Self { field: "Page title", min: 1, max: 200 };
}

pub fn validate_title(title: &str, rule: TitleRule) -> Result<(), ValidationError> {
    let len = title.trim().chars().count();

    if len < rule.min || len > rule.max {
        return Err(ValidationError::TitleLength {
            field: rule.field,
            min: rule.min,
            max: rule.max,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_title_bounds() {
        assert!(validate_title("Roadmap", TitleRule::PROJECT).is_ok());
        assert!(validate_title("ab", TitleRule::PROJECT).is_err());
        assert!(validate_title(&"x".repeat(201), TitleRule::PROJECT).is_err());
    }

    #[test]
    fn test_error_message_names_field() {
        let err = validate_title("", TitleRule::COLUMN).unwrap_err();
        assert_eq!(err.to_string(), "Column title must be between 1 and 150 characters");
    }
}
