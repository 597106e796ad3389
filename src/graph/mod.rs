//! Graphing mode: a list of plotted functions and the view settings.
//!
//! Point sampling goes through the same [`Evaluator`] the calculator uses,
//! substituting the bound variable `x`.

mod sampling;

pub use sampling::{Points, sample, sample_derivative, substitute};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::{CalcError, Evaluator, FendEvaluator, INVALID_EXPRESSION, Result};

/// Number of steps across the x range.
pub const POINTS: usize = 1000;

/// Range both axes start with.
pub const DEFAULT_RANGE: (f64, f64) = (-10.0, 10.0);

/// Range multiplier for one zoom step.
pub const ZOOM_FACTOR: f64 = 1.5;

/// Allowed grid density.
pub const GRID_DENSITY_RANGE: (u8, u8) = (5, 20);

/// Hue step between consecutive function colors (golden angle).
const HUE_STEP: f64 = 137.508;

lazy_static! {
    /// A leading `y =` or `f(x) =` in typed function input.
    static ref FUNCTION_LHS: Regex = Regex::new(r"^\s*(?:y|f\s*\(\s*x\s*\))\s*=").unwrap();
}

/// A function shown in the graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphFunction {
    pub id: String,
    pub expression: String,
    pub color: String,
    pub is_visible: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub show_grid: bool,
    pub show_derivatives: bool,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub grid_density: u8,
    /// Steps across the x range when sampling.
    pub points: usize,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            show_grid: true,
            show_derivatives: false,
            x_range: DEFAULT_RANGE,
            y_range: DEFAULT_RANGE,
            grid_density: 10,
            points: POINTS,
        }
    }
}

impl GraphSettings {
    /// Scale both ranges by `factor`.
    pub fn zoom(&mut self, factor: f64) {
        self.x_range = (self.x_range.0 * factor, self.x_range.1 * factor);
        self.y_range = (self.y_range.0 * factor, self.y_range.1 * factor);
    }

    pub fn zoom_in(&mut self) {
        self.zoom(1.0 / ZOOM_FACTOR);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(ZOOM_FACTOR);
    }

    /// Set the grid density, clamped to [`GRID_DENSITY_RANGE`].
    pub fn set_grid_density(&mut self, density: u8) {
        self.grid_density = density.clamp(GRID_DENSITY_RANGE.0, GRID_DENSITY_RANGE.1);
    }
}

/// One curve ready for drawing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub color: String,
    pub dashed: bool,
    pub points: Points,
}

/// The graphing view's model.
#[derive(Clone, Debug, Default)]
pub struct Graph<E = FendEvaluator> {
    functions: Vec<GraphFunction>,
    settings: GraphSettings,
    error: Option<String>,
    evaluator: E,
    next_id: u64,
}

impl Graph<FendEvaluator> {
    pub fn new(settings: GraphSettings) -> Self {
        Self::with_evaluator(FendEvaluator, settings)
    }
}

impl<E: Evaluator> Graph<E> {
    pub fn with_evaluator(evaluator: E, settings: GraphSettings) -> Self {
        Self {
            functions: Vec::new(),
            settings,
            error: None,
            evaluator,
            next_id: 0,
        }
    }

    pub fn functions(&self) -> &[GraphFunction] {
        &self.functions
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut GraphSettings {
        &mut self.settings
    }

    /// Error from the last rejected function input.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Add a function typed as `x^2`, `y = x^2` or `f(x) = x^2`.
    ///
    /// The input is validated by evaluating it at `x = 1`.
    pub fn add_function(&mut self, input: &str) -> Result<&GraphFunction> {
        let expression = FUNCTION_LHS.replace(input, "").replace('=', "");
        let expression = expression.trim();

        if let Err(err) = self.validate(expression) {
            debug!(%err, input, "rejected graph function");
            self.error = Some(INVALID_EXPRESSION.to_string());
            return Err(err);
        }

        let index = self.next_id;
        self.next_id += 1;
        let hue = (index as f64 * HUE_STEP) % 360.0;

        self.functions.push(GraphFunction {
            id: format!("fn-{}", index),
            expression: expression.to_string(),
            color: format!("hsl({:.0}, 70%, 50%)", hue),
            is_visible: true,
        });
        self.error = None;

        Ok(&self.functions[self.functions.len() - 1])
    }

    fn validate(&self, expression: &str) -> Result<()> {
        if expression.is_empty() {
            return Err(CalcError::evaluation(expression, "empty function"));
        }
        self.evaluator.evaluate(&substitute(expression, 1.0)).map(|_| ())
    }

    /// Remove a function by id. Returns whether it existed.
    pub fn remove_function(&mut self, id: &str) -> bool {
        let before = self.functions.len();
        self.functions.retain(|function| function.id != id);
        self.functions.len() != before
    }

    pub fn set_color(&mut self, id: &str, color: &str) -> bool {
        self.find_mut(id)
            .map(|function| function.color = color.to_string())
            .is_some()
    }

    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        self.find_mut(id)
            .map(|function| function.is_visible = !function.is_visible)
            .is_some()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut GraphFunction> {
        self.functions.iter_mut().find(|function| function.id == id)
    }

    /// Drop every function and any pending error.
    pub fn clear_all(&mut self) {
        self.functions.clear();
        self.error = None;
    }

    /// Sample `expression` over the current x range.
    pub fn points(&self, expression: &str) -> Points {
        sample(
            &self.evaluator,
            expression,
            self.settings.x_range,
            self.settings.points,
        )
    }

    /// Sample the derivative of `expression` over the current x range.
    pub fn derivative_points(&self, expression: &str) -> Points {
        sample_derivative(
            &self.evaluator,
            expression,
            self.settings.x_range,
            self.settings.points,
        )
    }

    /// Curves for every visible function, followed by their derivatives when
    /// enabled.
    pub fn plot_series(&self) -> Vec<Series> {
        let visible: Vec<&GraphFunction> = self
            .functions
            .iter()
            .filter(|function| function.is_visible)
            .collect();

        let mut series: Vec<Series> = visible
            .iter()
            .map(|function| Series {
                name: function.expression.clone(),
                color: function.color.clone(),
                dashed: false,
                points: self.points(&function.expression),
            })
            .collect();

        if self.settings.show_derivatives {
            series.extend(visible.iter().map(|function| Series {
                name: format!("d/dx({})", function.expression),
                color: function.color.clone(),
                dashed: true,
                points: self.derivative_points(&function.expression),
            }));
        }

        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_graph() -> Graph {
        Graph::new(GraphSettings {
            x_range: (-1.0, 1.0),
            points: 2,
            ..GraphSettings::default()
        })
    }

    #[test]
    fn test_add_function_strips_lhs() {
        let mut graph = small_graph();
        let added = graph.add_function("y = x^2").unwrap();
        assert_eq!(added.expression, "x^2");
        assert!(added.is_visible);

        let added = graph.add_function("f(x) = 2*x + 1").unwrap();
        assert_eq!(added.expression, "2*x + 1");
        assert_eq!(graph.functions().len(), 2);
        assert_ne!(graph.functions()[0].id, graph.functions()[1].id);
        assert_ne!(graph.functions()[0].color, graph.functions()[1].color);
    }

    #[test]
    fn test_add_invalid_function() {
        let mut graph = small_graph();
        assert!(graph.add_function("x +").is_err());
        assert_eq!(graph.error(), Some(INVALID_EXPRESSION));
        assert!(graph.add_function("   ").is_err());
        assert!(graph.functions().is_empty());

        graph.add_function("x").unwrap();
        assert!(graph.error().is_none());
    }

    #[test]
    fn test_remove_and_toggle() {
        let mut graph = small_graph();
        let id = graph.add_function("x").unwrap().id.clone();

        assert!(graph.toggle_visibility(&id));
        assert!(!graph.functions()[0].is_visible);
        assert!(graph.set_color(&id, "red"));
        assert_eq!(graph.functions()[0].color, "red");

        assert!(graph.remove_function(&id));
        assert!(!graph.remove_function(&id));
        assert!(graph.functions().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut graph = small_graph();
        graph.add_function("x").unwrap();
        let _ = graph.add_function("x +");
        graph.clear_all();
        assert!(graph.functions().is_empty());
        assert!(graph.error().is_none());
    }

    #[test]
    fn test_zoom_and_density() {
        let mut settings = GraphSettings::default();
        settings.zoom_out();
        assert_eq!(settings.x_range, (-15.0, 15.0));
        settings.zoom_in();
        assert!((settings.y_range.1 - 10.0).abs() < 1e-9);

        settings.set_grid_density(50);
        assert_eq!(settings.grid_density, 20);
        settings.set_grid_density(1);
        assert_eq!(settings.grid_density, 5);
    }

    #[test]
    fn test_plot_series() {
        let mut graph = small_graph();
        let hidden = graph.add_function("x^3").unwrap().id.clone();
        graph.add_function("2*x").unwrap();
        graph.toggle_visibility(&hidden);

        let series = graph.plot_series();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "2*x");
        assert_eq!(series[0].points.y, vec![Some(-2.0), Some(0.0), Some(2.0)]);

        graph.settings_mut().show_derivatives = true;
        let series = graph.plot_series();
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].name, "d/dx(2*x)");
        assert!(series[1].dashed);
        let slope = series[1].points.y[1].unwrap();
        assert!((slope - 2.0).abs() < 1e-6);
    }
}
