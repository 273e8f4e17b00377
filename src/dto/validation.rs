//! Validation helpers for outbound DTOs.

use validator::ValidationError;

/// Validates that a question prompt is non-empty after trimming.
pub fn validate_question_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        let mut err = ValidationError::new("question_text_empty");
        err.message = Some("question text must not be empty".into());
        return Err(err);
    }
    Ok(())
}

/// Validates that every answer option is non-empty and that no two collide.
pub fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.iter().any(|option| option.trim().is_empty()) {
        let mut err = ValidationError::new("option_empty");
        err.message = Some("answer options must not be empty".into());
        return Err(err);
    }

    for (index, option) in options.iter().enumerate() {
        if options[..index].contains(option) {
            let mut err = ValidationError::new("option_duplicate");
            err.message = Some(format!("duplicate answer option `{option}`").into());
            return Err(err);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_text() {
        assert!(validate_question_text("Who?").is_ok());
        assert!(validate_question_text("").is_err());
        assert!(validate_question_text("   ").is_err());
    }

    #[test]
    fn test_options_reject_empty() {
        let options = ["a".to_string(), "".to_string(), "c".to_string(), "d".to_string()];
        assert!(validate_options(&options).is_err());
    }

    #[test]
    fn test_options_reject_duplicates() {
        let options = ["a".to_string(), "b".to_string(), "a".to_string(), "d".to_string()];
        assert!(validate_options(&options).is_err());
    }

    #[test]
    fn test_options_accept_distinct() {
        let options = ["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        assert!(validate_options(&options).is_ok());
    }
}
