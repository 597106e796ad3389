//! Expression evaluation using fend.
//!
//! Wraps fend behind the [`Evaluator`] trait and layers the calculator's own
//! rules on top: algebra dispatch, degree-mode rewriting of trigonometric
//! calls and result formatting.

use fend_core::Context;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::algebra;
use super::error::{CalcError, Result};

lazy_static! {
    /// Trigonometric calls whose arguments are converted in degree mode.
    /// Hyperbolic variants never match since `(` must follow the name.
    static ref TRIG_CALL: Regex = Regex::new(r"(asin|acos|atan|sin|cos|tan)\(").unwrap();
}

/// Opaque text-expression evaluation capability.
pub trait Evaluator {
    /// Evaluate `expression` to a finite number.
    fn evaluate(&self, expression: &str) -> Result<f64>;
}

/// [`Evaluator`] backed by `fend-core`.
///
/// Every call gets a fresh fend context, so evaluation is a pure function of
/// its input.
#[derive(Clone, Copy, Debug, Default)]
pub struct FendEvaluator;

impl Evaluator for FendEvaluator {
    fn evaluate(&self, expression: &str) -> Result<f64> {
        let normalized = normalize_dialect(expression);
        let mut context = Context::new();

        let output = fend_core::evaluate(&normalized, &mut context)
            .map_err(|message| CalcError::evaluation(expression, message))?;

        parse_numeric_output(expression, output.get_main_result())
    }
}

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CalcResult {
    /// Successful calculation.
    Success {
        /// The original expression.
        expression: String,
        /// Formatted result.
        result: String,
    },
    /// The expression could not be evaluated.
    Error {
        /// The original expression.
        expression: String,
        /// Sentinel shown in place of the result.
        result: String,
        /// Why it failed.
        message: String,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the display string (result or error sentinel).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { result, .. } => result,
            Self::Error { result, .. } => result,
        }
    }
}

/// Calculator-level evaluation on top of an [`Evaluator`].
#[derive(Clone, Debug, Default)]
pub struct ExpressionEngine<E = FendEvaluator> {
    evaluator: E,
}

impl<E: Evaluator> ExpressionEngine<E> {
    pub fn new(evaluator: E) -> Self {
        Self { evaluator }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Evaluate an expression into its formatted result.
    ///
    /// An empty expression evaluates to `"0"`. Expressions starting with an
    /// algebra operation are handled symbolically and never reach the
    /// evaluator.
    pub fn try_evaluate(&self, expression: &str, degree_mode: bool) -> Result<String> {
        if expression.is_empty() {
            return Ok("0".to_string());
        }

        if let Some((operation, argument)) = algebra::detect(expression) {
            let raw = algebra::apply(operation, argument)?;
            return Ok(algebra::tidy(&raw));
        }

        let processed = if degree_mode {
            rewrite_degrees(expression)
        } else {
            expression.to_string()
        };

        let value = self.evaluator.evaluate(&processed)?;
        format_number(value).ok_or_else(|| CalcError::NotANumber {
            expression: expression.to_string(),
            output: value.to_string(),
        })
    }

    /// Evaluate an expression, collapsing any failure into its sentinel text.
    pub fn evaluate(&self, expression: &str, degree_mode: bool) -> String {
        match self.try_evaluate(expression, degree_mode) {
            Ok(result) => result,
            Err(err) => {
                debug!(%err, "evaluation failed");
                err.sentinel().to_string()
            }
        }
    }

    /// Evaluate an expression into a [`CalcResult`].
    pub fn evaluate_expression(&self, input: &str, degree_mode: bool) -> CalcResult {
        let expression = input.trim().to_string();
        match self.try_evaluate(&expression, degree_mode) {
            Ok(result) => CalcResult::Success { expression, result },
            Err(err) => CalcResult::Error {
                result: err.sentinel().to_string(),
                message: err.to_string(),
                expression,
            },
        }
    }

    /// Evaluate plain text to a number, without degree conversion or algebra.
    pub fn evaluate_number(&self, text: &str) -> Result<f64> {
        self.evaluator.evaluate(text)
    }
}

/// Format a number for display.
///
/// Integers render without a decimal point; everything else is fixed to
/// eight decimals with trailing zeros stripped. Returns `None` for
/// non-finite values.
pub fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    let formatted = if value.fract() == 0.0 {
        format!("{}", value)
    } else {
        let fixed = format!("{:.8}", value);
        fixed
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    };

    if formatted == "-0" {
        Some("0".to_string())
    } else {
        Some(formatted)
    }
}

/// Rewrite `fn(ARG)` into `fn((ARG) * pi / 180)` for the plain trig functions.
///
/// ARG runs up to the first `)`, so arguments containing their own
/// parentheses are cut short. Scanning resumes inside each rewritten
/// argument, so calls nested in it are converted as well. Calls without a
/// closing parenthesis are left alone.
pub fn rewrite_degrees(expression: &str) -> String {
    let mut text = expression.to_string();
    let mut cursor = 0;

    while let Some((start, name_len)) =
        next_trig_call(&text, cursor).map(|(start, name)| (start, name.len()))
    {
        let arg_start = start + name_len + 1;
        let Some(close) = text[arg_start..].find(')') else {
            break;
        };
        let arg_end = arg_start + close;

        let rewritten = format!(
            "{}(({}) * pi / 180)",
            &text[start..start + name_len],
            &text[arg_start..arg_end]
        );
        text.replace_range(start..=arg_end, &rewritten);

        // Continue at the start of the argument inside `name((`.
        cursor = start + name_len + 2;
    }

    text
}

/// Find the next degree-converted trig call at or after `from` that is not
/// the tail of a longer identifier.
fn next_trig_call(expression: &str, from: usize) -> Option<(usize, &str)> {
    let mut cursor = from;
    while let Some(found) = TRIG_CALL.find_at(expression, cursor) {
        if is_call_boundary(expression, found.start()) {
            return Some((found.start(), &expression[found.start()..found.end() - 1]));
        }
        cursor = found.start() + 1;
    }
    None
}

/// True when a call name may start at `index`: no identifier character
/// directly before it.
fn is_call_boundary(expression: &str, index: usize) -> bool {
    expression[..index]
        .chars()
        .next_back()
        .is_none_or(|c| !(c.is_ascii_alphabetic() || c == '_'))
}

/// Translate keypad vocabulary into fend's dialect.
fn normalize_dialect(expression: &str) -> String {
    let expression = expression.replace('×', "*").replace('÷', "/");
    let expression = rewrite_calls(&expression, "log", &|args| match args {
        [value] => Some(format!("ln({value})")),
        [value, base] => Some(format!("(ln({value}) / ln({base}))")),
        _ => None,
    });
    let expression = rewrite_calls(&expression, "nthRoot", &|args| match args {
        [value, degree] => Some(format!("(({value})^(1/({degree})))")),
        _ => None,
    });
    rewrite_calls(&expression, "mod", &|args| match args {
        [lhs, rhs] => Some(format!("(({lhs}) mod ({rhs}))")),
        _ => None,
    })
}

/// Replace every balanced call to `name` with the output of `rewrite`, which
/// receives the trimmed top-level arguments. Calls `rewrite` declines, and
/// unbalanced calls, are copied through unchanged.
fn rewrite_calls(
    expression: &str,
    name: &str,
    rewrite: &dyn Fn(&[&str]) -> Option<String>,
) -> String {
    let needle = format!("{}(", name);
    let mut out = String::with_capacity(expression.len());
    let mut rest_start = 0;
    let mut search_from = 0;

    while let Some(found) = expression[search_from..].find(&needle) {
        let start = search_from + found;
        let open = start + name.len();
        search_from = open + 1;

        if !is_call_boundary(expression, start) {
            continue;
        }
        let Some(close) = matching_paren(expression, open) else {
            break;
        };

        let inner = rewrite_calls(&expression[open + 1..close], name, rewrite);
        let args = split_top_level(&inner);
        let replacement = rewrite(&args).unwrap_or_else(|| format!("{}({})", name, inner));

        out.push_str(&expression[rest_start..start]);
        out.push_str(&replacement);
        rest_start = close + 1;
        search_from = rest_start;
    }

    out.push_str(&expression[rest_start..]);
    out
}

/// Byte index of the `)` closing the `(` at `open`.
pub(crate) fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, c) in text[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split on commas that are not nested inside parentheses.
pub(crate) fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(text[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(text[start..].trim());
    parts
}

/// Turn fend's main result into a finite number.
fn parse_numeric_output(expression: &str, output: &str) -> Result<f64> {
    let not_a_number = || CalcError::NotANumber {
        expression: expression.to_string(),
        output: output.to_string(),
    };

    let text = output.trim();
    let text = text.strip_prefix("approx.").unwrap_or(text).trim();

    let value = match text.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().map(|v| v / 100.0),
        None => text.parse::<f64>(),
    }
    .map_err(|_| not_a_number())?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(not_a_number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ExpressionEngine {
        ExpressionEngine::new(FendEvaluator)
    }

    #[test]
    fn test_basic_evaluation() {
        assert_eq!(engine().evaluate("2+2", false), "4");
        assert_eq!(engine().evaluate("10*5", false), "50");
    }

    #[test]
    fn test_empty_expression_is_zero() {
        assert_eq!(engine().evaluate("", true), "0");
    }

    #[test]
    fn test_degree_mode_trig() {
        assert_eq!(engine().evaluate("sin(90)", true), "1");
        assert_eq!(engine().evaluate("sin(30)", true), "0.5");
    }

    #[test]
    fn test_radian_mode_trig() {
        assert_eq!(engine().evaluate("sin(0)", false), "0");
    }

    #[test]
    fn test_decimal_result() {
        assert_eq!(engine().evaluate("1/3", false), "0.33333333");
        assert_eq!(engine().evaluate("1/4", false), "0.25");
    }

    #[test]
    fn test_invalid_expression() {
        assert_eq!(engine().evaluate("2+", false), "Error");
        assert!(engine().try_evaluate("2 +* 2", false).is_err());
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(engine().evaluate("1/0", false), "Error");
    }

    #[test]
    fn test_functions() {
        assert_eq!(engine().evaluate("sqrt(16)", false), "4");
        assert_eq!(engine().evaluate("5!", false), "120");
        assert_eq!(engine().evaluate("2^10", false), "1024");
    }

    #[test]
    fn test_natural_log_vocabulary() {
        assert_eq!(engine().evaluate("log(e)", false), "1");
    }

    #[test]
    fn test_algebra_dispatch() {
        assert_eq!(engine().evaluate("gcd(12, 18)", false), "6");
        assert_eq!(engine().evaluate("factor(12)", false), "2^2×3");
        assert_eq!(engine().evaluate("factor(x, y)", false), "Error: Invalid expression");
    }

    #[test]
    fn test_evaluate_expression_result() {
        let ok = engine().evaluate_expression(" 2 * 3 ", false);
        assert!(ok.is_success());
        assert_eq!(ok.expression(), "2 * 3");
        assert_eq!(ok.display(), "6");

        let err = engine().evaluate_expression("2+", false);
        assert!(!err.is_success());
        assert_eq!(err.display(), "Error");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(4.0).as_deref(), Some("4"));
        assert_eq!(format_number(-12.0).as_deref(), Some("-12"));
        assert_eq!(format_number(0.1 + 0.2).as_deref(), Some("0.3"));
        assert_eq!(format_number(2.5).as_deref(), Some("2.5"));
        assert_eq!(format_number(0.999999999).as_deref(), Some("1"));
        assert_eq!(format_number(-1e-12).as_deref(), Some("0"));
        assert_eq!(format_number(f64::NAN), None);
        assert_eq!(format_number(f64::INFINITY), None);
    }

    #[test]
    fn test_rewrite_degrees() {
        assert_eq!(rewrite_degrees("sin(30)"), "sin((30) * pi / 180)");
        assert_eq!(
            rewrite_degrees("2sin(30)+cos(60)"),
            "2sin((30) * pi / 180)+cos((60) * pi / 180)"
        );
        assert_eq!(rewrite_degrees("asin(1)"), "asin((1) * pi / 180)");
    }

    #[test]
    fn test_rewrite_degrees_skips_hyperbolic() {
        assert_eq!(rewrite_degrees("sinh(1)+tanh(2)"), "sinh(1)+tanh(2)");
    }

    #[test]
    fn test_rewrite_degrees_stops_at_first_paren() {
        assert_eq!(
            rewrite_degrees("sin(sqrt(4)+1)"),
            "sin((sqrt(4) * pi / 180)+1)"
        );
        assert_eq!(rewrite_degrees("sin(30"), "sin(30");
    }

    #[test]
    fn test_rewrite_degrees_nested_calls() {
        assert_eq!(
            rewrite_degrees("sin(cos(60))"),
            "sin((cos((60) * pi / 180) * pi / 180))"
        );
        assert_eq!(
            rewrite_degrees("cos(sin(30))"),
            "cos((sin((30) * pi / 180) * pi / 180))"
        );
        assert_eq!(
            rewrite_degrees("asin(sin(30))"),
            "asin((sin((30) * pi / 180) * pi / 180))"
        );
    }

    #[test]
    fn test_nested_trig_in_degree_mode() {
        let engine = engine();
        assert_eq!(engine.evaluate("sin(cos(60))", true), "0.00872654");
    }

    #[test]
    fn test_normalize_dialect() {
        assert_eq!(normalize_dialect("log(10)+log10(10)"), "ln(10)+log10(10)");
        assert_eq!(normalize_dialect("log(log(2))"), "ln(ln(2))");
        assert_eq!(normalize_dialect("log(8, 2)"), "(ln(8) / ln(2))");
        assert_eq!(normalize_dialect("nthRoot(27, 3)"), "((27)^(1/(3)))");
        assert_eq!(normalize_dialect("mod(7,3)"), "((7) mod (3))");
        assert_eq!(normalize_dialect("6×2÷3"), "6*2/3");
    }

    #[test]
    fn test_parse_numeric_output() {
        assert_eq!(parse_numeric_output("1/3", "approx. 0.3333333333"), Ok(0.3333333333));
        assert_eq!(parse_numeric_output("50%", "50%"), Ok(0.5));
        assert!(parse_numeric_output("sqrt(-1)", "i").is_err());
        assert!(parse_numeric_output("1 m", "1 m").is_err());
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("a, f(b, c), d"), vec!["a", "f(b, c)", "d"]);
        assert_eq!(split_top_level(""), vec![""]);
    }
}
