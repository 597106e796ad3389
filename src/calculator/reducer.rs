//! The calculator state reducer.
//!
//! [`Calculator::apply_input`] maps one input event and the current state to
//! the next state. It never fails: evaluation problems end up in the state's
//! `error` field.

use tracing::debug;

use super::error::ERROR_SENTINEL;
use super::evaluation::{Evaluator, ExpressionEngine, FendEvaluator};
use super::memory::{MemoryOp, MemoryRegister};
use super::state::{CalculatorState, HISTORY_LIMIT, HistoryEntry, now_millis};
use crate::input::{ButtonInput, ButtonKind, ControlOp};

/// Message shown when `equals` cannot evaluate the expression.
pub const INVALID_EXPRESSION: &str = "Invalid expression";

/// Message shown when a memory operation fails.
pub const INVALID_OPERATION: &str = "Invalid operation";

/// Owns everything the reducer needs besides the state itself: the
/// evaluator, the memory register and the clock used for history stamps.
#[derive(Clone, Debug)]
pub struct Calculator<E = FendEvaluator> {
    engine: ExpressionEngine<E>,
    memory: MemoryRegister,
    clock: fn() -> i64,
}

impl Default for Calculator<FendEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator<FendEvaluator> {
    pub fn new() -> Self {
        Self::with_evaluator(FendEvaluator)
    }
}

impl<E: Evaluator> Calculator<E> {
    pub fn with_evaluator(evaluator: E) -> Self {
        Self {
            engine: ExpressionEngine::new(evaluator),
            memory: MemoryRegister::new(),
            clock: now_millis,
        }
    }

    /// Replace the clock used to timestamp history entries.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn engine(&self) -> &ExpressionEngine<E> {
        &self.engine
    }

    pub fn memory(&self) -> &MemoryRegister {
        &self.memory
    }

    /// Apply an input given as raw `(value, kind)` text.
    ///
    /// Unknown kinds and unknown control actions leave the state unchanged;
    /// an unknown memory operation is reported like any other memory failure.
    pub fn apply_raw(&mut self, value: &str, kind: &str, state: &CalculatorState) -> CalculatorState {
        let Ok(kind) = kind.parse::<ButtonKind>() else {
            debug!(kind, value, "ignoring input of unknown kind");
            return state.clone();
        };

        match ButtonInput::from_parts(value, kind) {
            Ok(input) => self.apply_input(&input, state),
            Err(err) if kind == ButtonKind::Memory => {
                debug!(%err, "unknown memory operation");
                memory_failure(state)
            }
            Err(err) => {
                debug!(%err, "ignoring unknown input");
                state.clone()
            }
        }
    }

    /// Compute the state that follows `input`.
    pub fn apply_input(&mut self, input: &ButtonInput, state: &CalculatorState) -> CalculatorState {
        debug!(kind = %input.kind(), value = input.value(), "input");

        match input {
            ButtonInput::Number(value)
            | ButtonInput::Operator(value)
            | ButtonInput::Constant(value) => CalculatorState {
                expression: format!("{}{}", state.expression, value),
                display: if state.display == "0" {
                    value.clone()
                } else {
                    format!("{}{}", state.display, value)
                },
                error: None,
                ..state.clone()
            },
            ButtonInput::Function(value) => CalculatorState {
                expression: format!("{}{}", state.expression, value),
                display: format!("{}{}", state.display, value),
                error: None,
                ..state.clone()
            },
            ButtonInput::Memory(op) => self.apply_memory(*op, state),
            ButtonInput::Control(ControlOp::Clear) => CalculatorState {
                expression: String::new(),
                display: "0".to_string(),
                error: None,
                ..state.clone()
            },
            ButtonInput::Control(ControlOp::Backspace) => {
                let mut expression = state.expression.clone();
                expression.pop();
                let mut display = state.display.clone();
                display.pop();
                if display.is_empty() {
                    display.push('0');
                }
                CalculatorState {
                    expression,
                    display,
                    error: None,
                    ..state.clone()
                }
            }
            ButtonInput::Equals => self.apply_equals(state),
        }
    }

    fn apply_memory(&mut self, op: MemoryOp, state: &CalculatorState) -> CalculatorState {
        let current = if state.expression.is_empty() {
            &state.display
        } else {
            &state.expression
        };

        match self.memory.apply(op, current, self.engine.evaluator()) {
            Ok(recalled) if op == MemoryOp::MemoryRecall => CalculatorState {
                display: recalled.clone(),
                expression: recalled,
                error: None,
                ..state.clone()
            },
            Ok(_) => CalculatorState {
                error: None,
                ..state.clone()
            },
            Err(err) => {
                debug!(%err, %op, "memory operation failed");
                memory_failure(state)
            }
        }
    }

    fn apply_equals(&self, state: &CalculatorState) -> CalculatorState {
        match self
            .engine
            .try_evaluate(&state.expression, state.is_degree_mode)
        {
            Ok(result) => {
                let entry = HistoryEntry {
                    expression: state.expression.clone(),
                    result: result.clone(),
                    timestamp: (self.clock)(),
                };
                let history = std::iter::once(entry)
                    .chain(state.history.iter().cloned())
                    .take(HISTORY_LIMIT)
                    .collect();

                CalculatorState {
                    display: result.clone(),
                    expression: result,
                    history,
                    error: None,
                    ..state.clone()
                }
            }
            Err(err) => {
                debug!(%err, expression = %state.expression, "equals failed");
                CalculatorState {
                    error: Some(INVALID_EXPRESSION.to_string()),
                    ..state.clone()
                }
            }
        }
    }
}

fn memory_failure(state: &CalculatorState) -> CalculatorState {
    CalculatorState {
        display: ERROR_SENTINEL.to_string(),
        expression: String::new(),
        error: Some(INVALID_OPERATION.to_string()),
        ..state.clone()
    }
}
