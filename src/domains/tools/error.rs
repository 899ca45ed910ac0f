//! Tool-specific error types.

use serde::Serialize;
use thiserror::Error;

use crate::engine::EngineError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested operation is not registered.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// An operation with the same name is already registered.
    #[error("Duplicate operation: {0}")]
    DuplicateOperation(String),

    /// A parameter or cross-parameter constraint was violated.
    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    /// The engine failed despite validated arguments.
    #[error("Engine failure in {operation}: {source}")]
    Engine {
        operation: String,
        #[source]
        source: EngineError,
    },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "unknown operation" error.
    pub fn unknown_operation(name: impl Into<String>) -> Self {
        Self::UnknownOperation(name.into())
    }

    /// Create a new "duplicate operation" error.
    pub fn duplicate_operation(name: impl Into<String>) -> Self {
        Self::DuplicateOperation(name.into())
    }

    /// Create a new engine failure for `operation`.
    pub fn engine(operation: impl Into<String>, source: EngineError) -> Self {
        Self::Engine {
            operation: operation.into(),
            source,
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<ValidationFailure> for ToolError {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

/// What a validation failure is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FailureTarget {
    /// A single declared parameter.
    Parameter(String),
    /// A named cross-parameter constraint.
    Constraint(String),
}

/// A rejected tool call, naming the offending field or constraint and the rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    pub target: FailureTarget,
    pub reason: String,
}

impl ValidationFailure {
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: FailureTarget::Parameter(name.into()),
            reason: reason.into(),
        }
    }

    pub fn constraint(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            target: FailureTarget::Constraint(name.into()),
            reason: reason.into(),
        }
    }

    /// Name of the parameter, if this failure is about one.
    pub fn parameter_name(&self) -> Option<&str> {
        match &self.target {
            FailureTarget::Parameter(name) => Some(name),
            FailureTarget::Constraint(_) => None,
        }
    }

    /// Name of the constraint, if this failure is about one.
    pub fn constraint_name(&self) -> Option<&str> {
        match &self.target {
            FailureTarget::Constraint(name) => Some(name),
            FailureTarget::Parameter(_) => None,
        }
    }
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.target {
            FailureTarget::Parameter(name) => write!(f, "parameter '{}' {}", name, self.reason),
            FailureTarget::Constraint(name) => {
                write!(f, "constraint '{}' violated: {}", name, self.reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failure_display() {
        let failure = ValidationFailure::parameter("rolls", "must be in [1, 100]");
        assert_eq!(failure.to_string(), "parameter 'rolls' must be in [1, 100]");

        let failure = ValidationFailure::constraint("step_nonzero", "step != 0");
        assert_eq!(
            failure.to_string(),
            "constraint 'step_nonzero' violated: step != 0"
        );
    }

    #[test]
    fn test_validation_failure_serializes_target() {
        let failure = ValidationFailure::parameter("sides", "must be one of {2, 4}");
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["target"]["kind"], "parameter");
        assert_eq!(json["target"]["name"], "sides");
        assert_eq!(json["reason"], "must be one of {2, 4}");
    }

    #[test]
    fn test_engine_error_keeps_source() {
        let err = ToolError::engine("beta_variate", EngineError::NonFinite(f64::INFINITY));
        assert!(err.to_string().contains("beta_variate"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
