//! Calculator core.
//!
//! This module provides:
//! - The state reducer turning input events into new calculator states
//! - Expression evaluation via fend, with degree-mode and algebra handling
//! - The memory register behind M+/M-/MR/MC
//! - Copying results to the clipboard

pub mod algebra;
mod clipboard;
mod error;
mod evaluation;
mod memory;
mod reducer;
mod state;

pub use clipboard::copy_to_clipboard;
pub use error::{ALGEBRA_ERROR_SENTINEL, CalcError, ERROR_SENTINEL, Result};
pub use evaluation::{
    CalcResult, Evaluator, ExpressionEngine, FendEvaluator, format_number, rewrite_degrees,
};
pub use memory::{MemoryOp, MemoryRegister};
pub use reducer::{Calculator, INVALID_EXPRESSION, INVALID_OPERATION};
pub use state::{CalculatorMode, CalculatorState, HISTORY_LIMIT, HistoryEntry, now_millis};
