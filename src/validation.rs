use serde_json::Value;
use thiserror::Error;

/// Shortest accepted thought, in characters.
pub const MIN_MESSAGE_LENGTH: usize = 5;
/// Longest accepted thought, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 140;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("message is required")]
    MissingMessage,

    #[error("message must be a string")]
    MessageNotString,

    #[error("message is too short: {actual} chars (min: {min})")]
    MessageTooShort { actual: usize, min: usize },

    #[error("message is too long: {actual} chars (max: {max})")]
    MessageTooLong { actual: usize, max: usize },

    #[error("request body must be a JSON object: {reason}")]
    MalformedBody { reason: String },
}

impl ValidationError {
    /// Name of the offending request field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MalformedBody { .. } => "body",
            _ => "message",
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputValidator {
    min_message_length: usize,
    max_message_length: usize,
}

impl InputValidator {
    pub fn new() -> Self {
        Self {
            min_message_length: MIN_MESSAGE_LENGTH,
            max_message_length: MAX_MESSAGE_LENGTH,
        }
    }

    /// Check a raw `message` value from a request body and return it as text.
    ///
    /// Length is counted in characters, not bytes, and the message is stored
    /// exactly as sent.
    pub fn validate_message(&self, message: Option<&Value>) -> Result<String, ValidationError> {
        let text = match message {
            None | Some(Value::Null) => return Err(ValidationError::MissingMessage),
            Some(Value::String(text)) => text,
            Some(_) => return Err(ValidationError::MessageNotString),
        };

        let length = text.chars().count();
        if length < self.min_message_length {
            return Err(ValidationError::MessageTooShort {
                actual: length,
                min: self.min_message_length,
            });
        }
        if length > self.max_message_length {
            return Err(ValidationError::MessageTooLong {
                actual: length,
                max: self.max_message_length,
            });
        }

        Ok(text.clone())
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> Result<String, ValidationError> {
        InputValidator::new().validate_message(Some(&value))
    }

    #[test]
    fn test_length_boundaries() {
        assert!(matches!(
            validate(json!("x".repeat(4))),
            Err(ValidationError::MessageTooShort { actual: 4, min: 5 })
        ));
        assert_eq!(validate(json!("x".repeat(5))).unwrap().len(), 5);
        assert_eq!(validate(json!("x".repeat(140))).unwrap().len(), 140);
        assert!(matches!(
            validate(json!("x".repeat(141))),
            Err(ValidationError::MessageTooLong { actual: 141, max: 140 })
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        // 5 characters, 15 bytes
        assert!(validate(json!("ありがとう")).is_ok());
        // 140 characters, well over 140 bytes
        assert!(validate(json!("é".repeat(140))).is_ok());
    }

    #[test]
    fn test_missing_message() {
        let validator = InputValidator::new();
        assert!(matches!(
            validator.validate_message(None),
            Err(ValidationError::MissingMessage)
        ));
        assert!(matches!(validate(Value::Null), Err(ValidationError::MissingMessage)));
    }

    #[test]
    fn test_non_string_message() {
        assert!(matches!(validate(json!(12345)), Err(ValidationError::MessageNotString)));
        assert!(matches!(
            validate(json!(["hello", "world"])),
            Err(ValidationError::MessageNotString)
        ));
    }

    #[test]
    fn test_message_kept_verbatim() {
        assert_eq!(validate(json!("  padded  ")).unwrap(), "  padded  ");
    }

    #[test]
    fn test_field_names() {
        assert_eq!(ValidationError::MissingMessage.field(), "message");
        assert_eq!(
            ValidationError::MalformedBody { reason: "eof".into() }.field(),
            "body"
        );
    }
}
