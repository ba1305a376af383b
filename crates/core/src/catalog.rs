use thiserror::Error;

pub const MAX_MESSAGE_LEN: usize = 2_000;

/// Short forms accepted by the guide and quiz lookups.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("usa", "United States"),
    ("us", "United States"),
    ("america", "United States"),
    ("uk", "United Kingdom"),
    ("uae", "United Arab Emirates"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("message exceeds {max} characters (got {actual})")]
    MessageTooLong { max: usize, actual: usize },
    #[error("country name must not be empty")]
    EmptyCountry,
}

/// Trims the input and expands a whole-name alias. Chat messages never go
/// through this; aliases only apply to direct country lookups.
pub fn canonical_country_name(input: &str) -> String {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    COUNTRY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

pub fn validate_country_name(input: &str) -> Result<String, ValidationError> {
    let canonical = canonical_country_name(input);
    if canonical.is_empty() {
        return Err(ValidationError::EmptyCountry);
    }
    Ok(canonical)
}

pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    let actual = message.chars().count();
    if actual > MAX_MESSAGE_LEN {
        return Err(ValidationError::MessageTooLong {
            max: MAX_MESSAGE_LEN,
            actual,
        });
    }
    Ok(())
}
