//! Input normalization.
//!
//! Keyboard chords and on-screen buttons both resolve to a [`ButtonInput`]
//! before anything reaches the reducer.

mod buttons;
mod keyboard;

pub use buttons::{
    ButtonGroup, ButtonSpec, SCIENTIFIC_BUTTONS, STANDARD_BUTTONS, buttons_for, find_button,
};
pub use keyboard::{Key, KeyChord, Modifiers, map_key};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculator::{CalcError, MemoryOp};

/// The kind tag carried by every button and key binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonKind {
    Number,
    Operator,
    Function,
    Control,
    Memory,
    Constant,
    Equals,
}

impl ButtonKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Operator => "operator",
            Self::Function => "function",
            Self::Control => "control",
            Self::Memory => "memory",
            Self::Constant => "constant",
            Self::Equals => "equals",
        }
    }
}

impl fmt::Display for ButtonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ButtonKind {
    type Err = CalcError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "number" => Ok(Self::Number),
            "operator" => Ok(Self::Operator),
            "function" => Ok(Self::Function),
            "control" => Ok(Self::Control),
            "memory" => Ok(Self::Memory),
            "constant" => Ok(Self::Constant),
            "equals" => Ok(Self::Equals),
            _ => Err(CalcError::UnknownInput {
                kind: "button".to_string(),
                value: kind.to_string(),
            }),
        }
    }
}

/// Control actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlOp {
    Clear,
    Backspace,
}

impl ControlOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Backspace => "backspace",
        }
    }
}

/// One normalized input event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ButtonInput {
    /// Digit or decimal point.
    Number(String),
    Operator(String),
    Constant(String),
    /// A function call opener such as `sin(`.
    Function(String),
    Memory(MemoryOp),
    Control(ControlOp),
    Equals,
}

impl ButtonInput {
    /// Build an input from its `(value, kind)` pair.
    pub fn from_parts(value: &str, kind: ButtonKind) -> Result<Self, CalcError> {
        let unknown = || CalcError::UnknownInput {
            kind: kind.to_string(),
            value: value.to_string(),
        };

        Ok(match kind {
            ButtonKind::Number => Self::Number(value.to_string()),
            ButtonKind::Operator => Self::Operator(value.to_string()),
            ButtonKind::Constant => Self::Constant(value.to_string()),
            ButtonKind::Function => Self::Function(value.to_string()),
            ButtonKind::Memory => Self::Memory(value.parse().map_err(|_| unknown())?),
            ButtonKind::Control => match value {
                "clear" => Self::Control(ControlOp::Clear),
                "backspace" => Self::Control(ControlOp::Backspace),
                _ => return Err(unknown()),
            },
            ButtonKind::Equals => Self::Equals,
        })
    }

    pub fn kind(&self) -> ButtonKind {
        match self {
            Self::Number(_) => ButtonKind::Number,
            Self::Operator(_) => ButtonKind::Operator,
            Self::Constant(_) => ButtonKind::Constant,
            Self::Function(_) => ButtonKind::Function,
            Self::Memory(_) => ButtonKind::Memory,
            Self::Control(_) => ButtonKind::Control,
            Self::Equals => ButtonKind::Equals,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Number(value)
            | Self::Operator(value)
            | Self::Constant(value)
            | Self::Function(value) => value,
            Self::Memory(op) => op.as_str(),
            Self::Control(op) => op.as_str(),
            Self::Equals => "equals",
        }
    }
}
