//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject empty creator metadata, empty output paths, zero limits
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RecorderConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;

use crate::config::schema::RecorderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("creator.name cannot be empty")]
    EmptyCreatorName,

    #[error("creator.version cannot be empty")]
    EmptyCreatorVersion,

    #[error("output.path cannot be empty")]
    EmptyOutputPath,

    #[error("capture.max_multipart_memory must be greater than zero")]
    ZeroMultipartLimit,
}

pub fn validate_config(config: &RecorderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.creator.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCreatorName);
    }
    if config.creator.version.trim().is_empty() {
        errors.push(ValidationError::EmptyCreatorVersion);
    }
    if config.output.path.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyOutputPath);
    }
    if config.capture.max_multipart_memory == 0 {
        errors.push(ValidationError::ZeroMultipartLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&RecorderConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = RecorderConfig::default();
        config.creator.name = String::new();
        config.creator.version = " ".into();
        config.capture.max_multipart_memory = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyCreatorName,
                ValidationError::EmptyCreatorVersion,
                ValidationError::ZeroMultipartLimit,
            ]
        );
    }
}
