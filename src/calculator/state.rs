//! Calculator state values.

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use super::error::CalcError;

/// Maximum number of history entries kept, newest first.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculatorMode {
    #[default]
    Standard,
    Scientific,
    Graphing,
}

impl CalculatorMode {
    pub const ALL: [CalculatorMode; 3] = [Self::Standard, Self::Scientific, Self::Graphing];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Scientific => "scientific",
            Self::Graphing => "graphing",
        }
    }
}

impl fmt::Display for CalculatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculatorMode {
    type Err = CalcError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str().eq_ignore_ascii_case(mode))
            .ok_or_else(|| CalcError::UnknownInput {
                kind: "mode".to_string(),
                value: mode.to_string(),
            })
    }
}

/// A completed calculation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub expression: String,
    pub result: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Everything the display needs.
///
/// Values are never mutated in place by the reducer; every input produces a
/// fresh state. `display` is never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorState {
    pub display: String,
    pub expression: String,
    pub history: Vec<HistoryEntry>,
    pub mode: CalculatorMode,
    pub error: Option<String>,
    pub is_shift_active: bool,
    pub is_degree_mode: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            expression: String::new(),
            history: Vec::new(),
            mode: CalculatorMode::Standard,
            error: None,
            is_shift_active: false,
            is_degree_mode: true,
        }
    }
}

impl CalculatorState {
    pub fn with_mode(&self, mode: CalculatorMode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    pub fn with_degree_mode(&self, is_degree_mode: bool) -> Self {
        Self {
            is_degree_mode,
            ..self.clone()
        }
    }

    pub fn toggled_shift(&self) -> Self {
        Self {
            is_shift_active: !self.is_shift_active,
            ..self.clone()
        }
    }

    /// Most recent history entry.
    pub fn last_entry(&self) -> Option<&HistoryEntry> {
        self.history.first()
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = CalculatorState::default();
        assert_eq!(state.display, "0");
        assert!(state.expression.is_empty());
        assert!(state.is_degree_mode);
        assert_eq!(state.mode, CalculatorMode::Standard);
        assert!(state.last_entry().is_none());
    }

    #[test]
    fn test_transitions_leave_original_untouched() {
        let state = CalculatorState::default();
        let scientific = state.with_mode(CalculatorMode::Scientific);
        let radians = scientific.with_degree_mode(false);
        let shifted = radians.toggled_shift();

        assert_eq!(state.mode, CalculatorMode::Standard);
        assert_eq!(radians.mode, CalculatorMode::Scientific);
        assert!(!radians.is_degree_mode);
        assert!(shifted.is_shift_active);
        assert!(!radians.is_shift_active);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Graphing".parse::<CalculatorMode>().unwrap(), CalculatorMode::Graphing);
        assert!("programmer".parse::<CalculatorMode>().is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(CalculatorState::default()).unwrap();
        assert_eq!(json["isDegreeMode"], true);
        assert_eq!(json["mode"], "standard");
        assert!(json["error"].is_null());
    }
}
