//! The memory register behind M+, M-, MR and MC.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{CalcError, Result};
use super::evaluation::{Evaluator, format_number};

/// Memory operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemoryOp {
    MemoryAdd,
    MemorySub,
    MemoryRecall,
    MemoryClear,
}

impl MemoryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MemoryAdd => "memoryAdd",
            Self::MemorySub => "memorySub",
            Self::MemoryRecall => "memoryRecall",
            Self::MemoryClear => "memoryClear",
        }
    }
}

impl fmt::Display for MemoryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryOp {
    type Err = CalcError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "memoryAdd" => Ok(Self::MemoryAdd),
            "memorySub" => Ok(Self::MemorySub),
            "memoryRecall" => Ok(Self::MemoryRecall),
            "memoryClear" => Ok(Self::MemoryClear),
            _ => Err(CalcError::UnknownInput {
                kind: "memory".to_string(),
                value: value.to_string(),
            }),
        }
    }
}

/// A single numeric accumulator.
///
/// Lives outside the calculator state, so it survives `clear` and mode
/// switches. Owned by whoever drives the reducer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MemoryRegister {
    value: f64,
}

impl MemoryRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Apply `op` against the current input text.
    ///
    /// `current` is evaluated first; if that fails the register is left
    /// untouched. Add, subtract and clear hand `current` back unchanged;
    /// recall returns the formatted register value.
    pub fn apply<E: Evaluator>(
        &mut self,
        op: MemoryOp,
        current: &str,
        evaluator: &E,
    ) -> Result<String> {
        let operand = evaluator.evaluate(current)?;

        match op {
            MemoryOp::MemoryAdd => self.value += operand,
            MemoryOp::MemorySub => self.value -= operand,
            MemoryOp::MemoryClear => self.value = 0.0,
            MemoryOp::MemoryRecall => {
                return format_number(self.value).ok_or_else(|| CalcError::NotANumber {
                    expression: op.to_string(),
                    output: self.value.to_string(),
                });
            }
        }

        debug!(%op, operand, register = self.value, "memory updated");
        Ok(current.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::FendEvaluator;

    #[test]
    fn test_add_then_recall() {
        let mut memory = MemoryRegister::new();
        assert_eq!(memory.apply(MemoryOp::MemoryAdd, "5", &FendEvaluator).unwrap(), "5");
        assert_eq!(memory.apply(MemoryOp::MemoryAdd, "3", &FendEvaluator).unwrap(), "3");
        assert_eq!(
            memory.apply(MemoryOp::MemoryRecall, "0", &FendEvaluator).unwrap(),
            "8"
        );
    }

    #[test]
    fn test_clear_then_recall() {
        let mut memory = MemoryRegister::new();
        memory.apply(MemoryOp::MemoryAdd, "5", &FendEvaluator).unwrap();
        memory.apply(MemoryOp::MemoryClear, "5", &FendEvaluator).unwrap();
        assert_eq!(
            memory.apply(MemoryOp::MemoryRecall, "0", &FendEvaluator).unwrap(),
            "0"
        );
    }

    #[test]
    fn test_subtract_expression() {
        let mut memory = MemoryRegister::new();
        memory.apply(MemoryOp::MemorySub, "2*3", &FendEvaluator).unwrap();
        assert_eq!(memory.value(), -6.0);
    }

    #[test]
    fn test_failure_leaves_register() {
        let mut memory = MemoryRegister::new();
        memory.apply(MemoryOp::MemoryAdd, "4", &FendEvaluator).unwrap();
        assert!(memory.apply(MemoryOp::MemoryAdd, "2+", &FendEvaluator).is_err());
        assert_eq!(memory.value(), 4.0);
    }

    #[test]
    fn test_parse_op() {
        assert_eq!("memoryRecall".parse::<MemoryOp>(), Ok(MemoryOp::MemoryRecall));
        assert!("memoryStore".parse::<MemoryOp>().is_err());
    }
}
