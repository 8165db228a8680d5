//! Error types for the Faraid distribution engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition under which a distribution is rejected.

use thiserror::Error;

/// The main error type for the Faraid distribution engine.
///
/// A calculation either fully succeeds or fails with exactly one of these
/// kinds; no partial result is ever produced.
///
/// # Example
///
/// ```
/// use faraid_engine::error::EngineError;
///
/// let error = EngineError::InvalidInput {
///     field: "estate_value".to_string(),
///     message: "must be greater than zero".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid input 'estate_value': must be greater than zero"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request was rejected before the pipeline ran.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The request field that failed validation.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// Every submitted heir was excluded by the exclusion rules.
    #[error("No eligible heirs remain after exclusion")]
    NoEligibleHeirs,

    /// The computed fractions did not account for exactly the whole estate.
    ///
    /// This always indicates a defect in the rule tables or arithmetic.
    #[error("Arithmetic invariant violated: {message}")]
    ArithmeticInvariantViolation {
        /// A description of the violated invariant.
        message: String,
    },

    /// The requested currency is not configured.
    #[error("Currency not found: {code}")]
    CurrencyNotFound {
        /// The currency code that was not found.
        code: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for an [`EngineError::InvalidInput`].
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for an [`EngineError::ArithmeticInvariantViolation`].
    pub fn invariant(message: impl Into<String>) -> Self {
        EngineError::ArithmeticInvariantViolation {
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_displays_field_and_message() {
        let error = EngineError::invalid_input("heirs", "must not be empty");
        assert_eq!(error.to_string(), "Invalid input 'heirs': must not be empty");
    }

    #[test]
    fn test_no_eligible_heirs_display() {
        assert_eq!(
            EngineError::NoEligibleHeirs.to_string(),
            "No eligible heirs remain after exclusion"
        );
    }

    #[test]
    fn test_invariant_violation_displays_message() {
        let error = EngineError::invariant("fractions sum to 7/8");
        assert_eq!(
            error.to_string(),
            "Arithmetic invariant violated: fractions sum to 7/8"
        );
    }

    #[test]
    fn test_currency_not_found_displays_code() {
        let error = EngineError::CurrencyNotFound {
            code: "XYZ".to_string(),
        };
        assert_eq!(error.to_string(), "Currency not found: XYZ");
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn rejects() -> EngineResult<()> {
            Err(EngineError::NoEligibleHeirs)
        }

        fn propagates_error() -> EngineResult<()> {
            rejects()?;
            Ok(())
        }

        assert!(matches!(propagates_error(), Err(EngineError::NoEligibleHeirs)));
    }
}
