//! Input validation for the wizard steps.

use thiserror::Error;

/// Prompt text of the provider step.
pub const PROVIDER_PROMPT: &str = "Choose your email provider: ";

/// Rejected step input. Every variant is recoverable: the step is redrawn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Nothing was typed for the provider choice.
    #[error("You must choose an email provider!")]
    MissingProvider,
    /// The provider choice is not a non-negative integer.
    #[error("You must type the number of an email provider!")]
    NotANumber,
    /// The provider index is outside the catalog.
    #[error("Provider {index} is not in the list (0-{max})")]
    OutOfRange {
        /// Typed index
        index: usize,
        /// Largest valid index
        max: usize,
    },
    /// The username is empty.
    #[error("You must insert your email account username!")]
    MissingUsername,
    /// The password is empty.
    #[error("You must insert your email account password!")]
    MissingPassword,
}

/// Renders the provider prompt line with `choice` typed after it.
#[must_use]
pub fn provider_prompt_line(choice: &str) -> String {
    format!("{PROVIDER_PROMPT}{choice}")
}

/// Parses a provider choice into a catalog index.
///
/// Accepts the typed value on its own or a whole prompt line; surrounding
/// whitespace is ignored. The index must lie in `[0, catalog_len)`.
pub fn parse_provider_choice(input: &str, catalog_len: usize) -> Result<usize, ValidationError> {
    let typed = input
        .strip_prefix(PROVIDER_PROMPT.trim_end())
        .unwrap_or(input)
        .trim();

    if typed.is_empty() {
        return Err(ValidationError::MissingProvider);
    }
    if !typed.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotANumber);
    }

    // All-digit input only fails to parse on overflow, which is out of range anyway
    let index = typed.parse::<usize>().unwrap_or(usize::MAX);
    if index >= catalog_len {
        return Err(ValidationError::OutOfRange {
            index,
            max: catalog_len.saturating_sub(1),
        });
    }

    Ok(index)
}

/// Requires a non-empty username.
pub fn require_username(value: &str) -> Result<&str, ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingUsername)
    } else {
        Ok(value)
    }
}

/// Requires a non-empty password.
pub fn require_password(char_count: usize) -> Result<(), ValidationError> {
    if char_count == 0 {
        Err(ValidationError::MissingPassword)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_round_trip() {
        let catalog_len = 15;
        for i in 0..catalog_len {
            let line = provider_prompt_line(&i.to_string());
            assert_eq!(parse_provider_choice(&line, catalog_len), Ok(i));
            assert_eq!(parse_provider_choice(&i.to_string(), catalog_len), Ok(i));
        }
    }

    #[test]
    fn test_out_of_range_and_garbage() {
        assert_eq!(
            parse_provider_choice("15", 15),
            Err(ValidationError::OutOfRange { index: 15, max: 14 })
        );
        assert_eq!(
            parse_provider_choice(&provider_prompt_line("15"), 15),
            Err(ValidationError::OutOfRange { index: 15, max: 14 })
        );
        assert_eq!(parse_provider_choice("abc", 15), Err(ValidationError::NotANumber));
        assert_eq!(parse_provider_choice("-1", 15), Err(ValidationError::NotANumber));
        assert_eq!(parse_provider_choice("1 2", 15), Err(ValidationError::NotANumber));
        assert_eq!(parse_provider_choice("", 15), Err(ValidationError::MissingProvider));
        assert_eq!(
            parse_provider_choice(PROVIDER_PROMPT, 15),
            Err(ValidationError::MissingProvider)
        );
        assert!(matches!(
            parse_provider_choice("99999999999999999999999", 15),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_required_fields() {
        assert_eq!(require_username(""), Err(ValidationError::MissingUsername));
        assert_eq!(require_username("me"), Ok("me"));
        assert_eq!(require_password(0), Err(ValidationError::MissingPassword));
        assert!(require_password(3).is_ok());
    }
}
