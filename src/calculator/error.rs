//! Error type shared by the calculator core.

use thiserror::Error;

/// Literal sentinel substituted for a numeric result when evaluation fails.
pub const ERROR_SENTINEL: &str = "Error";

/// Sentinel returned by the algebra operations on failure.
pub const ALGEBRA_ERROR_SENTINEL: &str = "Error: Invalid expression";

/// Failures raised while evaluating calculator input.
///
/// The reducer never surfaces these directly; every variant collapses into the
/// single user-visible `error` message on the state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The evaluator rejected the expression.
    #[error("failed to evaluate '{expression}': {message}")]
    Evaluation { expression: String, message: String },

    /// The evaluator produced something that is not a finite number.
    #[error("'{expression}' did not produce a finite number (got '{output}')")]
    NotANumber { expression: String, output: String },

    /// An algebra operation could not handle its argument.
    #[error("algebra: {0}")]
    Algebra(String),

    /// A `(value, kind)` pair that no input variant accepts.
    #[error("unknown {kind} input '{value}'")]
    UnknownInput { kind: String, value: String },

    /// The system clipboard could not be used.
    #[error("clipboard: {0}")]
    Clipboard(String),
}

impl CalcError {
    pub(crate) fn evaluation(expression: &str, message: impl Into<String>) -> Self {
        Self::Evaluation {
            expression: expression.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn algebra(message: impl Into<String>) -> Self {
        Self::Algebra(message.into())
    }

    /// The text shown in place of a result for this failure.
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::Algebra(_) => ALGEBRA_ERROR_SENTINEL,
            _ => ERROR_SENTINEL,
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
