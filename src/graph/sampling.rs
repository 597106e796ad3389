//! Sampling scalar functions of `x` over a numeric range.

use serde::Serialize;

use crate::calculator::Evaluator;

/// Step used for central-difference derivatives.
const DERIVATIVE_STEP: f64 = 1e-3;

/// Sampled curve; `y` is `None` where evaluation failed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Points {
    pub x: Vec<f64>,
    pub y: Vec<Option<f64>>,
}

impl Points {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Pairs with a defined `y`.
    pub fn defined(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(&self.y)
            .filter_map(|(&x, &y)| y.map(|y| (x, y)))
    }
}

/// Replace every standalone `x` with `(value)`.
///
/// An `x` that is part of a longer name (`exp`, `max`) is left alone.
pub fn substitute(expression: &str, value: f64) -> String {
    let replacement = format!("({})", value);
    let chars: Vec<char> = expression.chars().collect();
    let mut out = String::with_capacity(expression.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        let standalone = c == 'x'
            && !i
                .checked_sub(1)
                .is_some_and(|prev| chars[prev].is_alphabetic())
            && !chars.get(i + 1).is_some_and(|next| next.is_alphabetic());
        if standalone {
            out.push_str(&replacement);
        } else {
            out.push(c);
        }
    }
    out
}

/// The `x` positions for `steps` equal steps across `range`, both ends
/// included.
fn grid(range: (f64, f64), steps: usize) -> impl Iterator<Item = f64> {
    let steps = steps.max(1);
    let step = (range.1 - range.0) / steps as f64;
    (0..=steps).map(move |i| range.0 + step * i as f64)
}

/// Evaluate `expression` at evenly spaced points across `range`.
pub fn sample<E: Evaluator>(
    evaluator: &E,
    expression: &str,
    range: (f64, f64),
    steps: usize,
) -> Points {
    let mut points = Points::default();
    for x in grid(range, steps) {
        points.x.push(x);
        points
            .y
            .push(evaluator.evaluate(&substitute(expression, x)).ok());
    }
    points
}

/// Sample the derivative of `expression` by central differences.
pub fn sample_derivative<E: Evaluator>(
    evaluator: &E,
    expression: &str,
    range: (f64, f64),
    steps: usize,
) -> Points {
    let at = |x: f64| evaluator.evaluate(&substitute(expression, x)).ok();

    let mut points = Points::default();
    for x in grid(range, steps) {
        let slope = at(x + DERIVATIVE_STEP)
            .zip(at(x - DERIVATIVE_STEP))
            .map(|(ahead, behind)| (ahead - behind) / (2.0 * DERIVATIVE_STEP));
        points.x.push(x);
        points.y.push(slope);
    }
    points
}
