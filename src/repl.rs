//! Line-driven interactive session.
//!
//! Each typed character is one key press through the keyboard map and the
//! end of the line is Enter. Lines starting with `:` are session commands.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::calculator::{
    Calculator, CalculatorMode, CalculatorState, Evaluator, FendEvaluator, copy_to_clipboard,
};
use crate::config::Config;
use crate::graph::Graph;
use crate::input::{ButtonInput, Key, KeyChord, find_button, map_key};
use crate::ui::{
    PlotSize, render_display, render_history, render_keypad, render_plot, render_shortcuts,
    render_status,
};

const PROMPT: &str = "> ";
const HISTORY_SHOWN: usize = 10;

const HELP: &str = "\
Type keys to build an expression; the end of a line presses Enter.
Uppercase letters are Shift+letter.

:press <label>     press an on-screen button (e.g. :press sin⁻¹)
:alt <key>         press Alt+key (Alt+Shift with an uppercase key)
:mode <name>       standard, scientific or graphing
:deg / :rad        angle unit for trigonometric functions
:shift             toggle Shift for typed letters
:history           recent calculations
:keypad            buttons of the current mode
:keys              keyboard shortcuts
:state             calculator state as JSON
:copy              copy the display to the clipboard
:plot [expr]       add a function to the graph and draw it
:funcs             list graph functions
:toggle <id>       show or hide a graph function
:remove <id>       remove a graph function
:clearplot         remove every graph function
:zoom in|out       zoom the graph
:grid              toggle grid lines
:derivatives       toggle derivative curves
:quit              leave";

/// What the caller should do after a line.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct Session<E = FendEvaluator> {
    calculator: Calculator<E>,
    state: CalculatorState,
    graph: Graph<E>,
    plot_size: PlotSize,
}

impl Session<FendEvaluator> {
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            Calculator::new(),
            Graph::new(config.graph.clone()),
            config.initial_state(),
        )
    }
}

impl<E: Evaluator> Session<E> {
    pub fn with_parts(calculator: Calculator<E>, graph: Graph<E>, state: CalculatorState) -> Self {
        Self {
            calculator,
            state,
            graph,
            plot_size: PlotSize::default(),
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn graph(&self) -> &Graph<E> {
        &self.graph
    }

    pub fn set_plot_size(&mut self, size: PlotSize) {
        self.plot_size = size;
    }

    /// Run until `:quit` or end of input.
    pub fn run(&mut self, input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "{}", self.screen())?;
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        for line in input.lines() {
            match self.handle_line(&line?) {
                Outcome::Continue(text) => writeln!(output, "{}", text)?,
                Outcome::Quit => return Ok(()),
            }
            write!(output, "{}", PROMPT)?;
            output.flush()?;
        }

        writeln!(output)?;
        Ok(())
    }

    /// Process one line of input.
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        match line.trim_start().strip_prefix(':') {
            Some(command) => self.command(command.trim()),
            None => {
                self.type_line(line);
                Outcome::Continue(self.screen())
            }
        }
    }

    fn screen(&self) -> String {
        format!("[{}]\n{}", render_status(&self.state), render_display(&self.state))
    }

    fn press(&mut self, input: &ButtonInput) {
        self.state = self.calculator.apply_input(input, &self.state);
    }

    fn press_chord(&mut self, chord: KeyChord) {
        match map_key(chord) {
            Some(input) => self.press(&input),
            None => debug!(%chord, "unbound key"),
        }
    }

    fn type_line(&mut self, line: &str) {
        for c in line.chars().filter(|c| !c.is_whitespace()) {
            let chord = if self.state.is_shift_active && c.is_ascii_lowercase() {
                KeyChord::shift(c)
            } else {
                KeyChord::from_typed(c)
            };
            self.press_chord(chord);
        }
        self.press_chord(KeyChord::plain(Key::Enter));
    }

    fn command(&mut self, command: &str) -> Outcome {
        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        let text = match name {
            "q" | "quit" | "exit" => return Outcome::Quit,
            "help" | "h" => HELP.to_string(),
            "press" => self.press_label(argument),
            "alt" => self.press_alt(argument),
            "mode" => match argument.parse::<CalculatorMode>() {
                Ok(mode) => {
                    self.state = self.state.with_mode(mode);
                    self.screen()
                }
                Err(err) => err.to_string(),
            },
            "deg" => {
                self.state = self.state.with_degree_mode(true);
                self.screen()
            }
            "rad" => {
                self.state = self.state.with_degree_mode(false);
                self.screen()
            }
            "shift" => {
                self.state = self.state.toggled_shift();
                self.screen()
            }
            "history" => render_history(&self.state.history, HISTORY_SHOWN),
            "keypad" => render_keypad(self.state.mode),
            "keys" => render_shortcuts(),
            "state" => match serde_json::to_string_pretty(&self.state) {
                Ok(json) => json,
                Err(err) => format!("Failed to serialize state: {}", err),
            },
            "copy" => match copy_to_clipboard(&self.state.display) {
                Ok(()) => format!("Copied {}", self.state.display),
                Err(err) => err.to_string(),
            },
            "plot" => self.plot(argument),
            "funcs" => self.list_functions(),
            "toggle" => self.graph_edit(self.graph_has(argument), |graph| {
                graph.toggle_visibility(argument);
            }),
            "remove" => self.graph_edit(self.graph_has(argument), |graph| {
                graph.remove_function(argument);
            }),
            "clearplot" => self.graph_edit(true, Graph::clear_all),
            "zoom" => match argument {
                "in" => self.graph_edit(true, |graph| graph.settings_mut().zoom_in()),
                "out" => self.graph_edit(true, |graph| graph.settings_mut().zoom_out()),
                _ => "Usage: :zoom in|out".to_string(),
            },
            "grid" => self.graph_edit(true, |graph| {
                let settings = graph.settings_mut();
                settings.show_grid = !settings.show_grid;
            }),
            "derivatives" => self.graph_edit(true, |graph| {
                let settings = graph.settings_mut();
                settings.show_derivatives = !settings.show_derivatives;
            }),
            _ => format!("Unknown command :{} (try :help)", name),
        };

        Outcome::Continue(text)
    }

    fn press_label(&mut self, label: &str) -> String {
        let Some(button) = find_button(self.state.mode, label) else {
            return format!("No button labelled {:?} in {} mode", label, self.state.mode);
        };
        match button.input() {
            Ok(input) => {
                self.press(&input);
                self.screen()
            }
            Err(err) => err.to_string(),
        }
    }

    fn press_alt(&mut self, key: &str) -> String {
        let mut chars = key.chars();
        let chord = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => format!("Alt+Shift+{}", c),
            (Some(c), None) => format!("Alt+{}", c),
            _ => return "Usage: :alt <key>".to_string(),
        };
        match chord.parse::<KeyChord>() {
            Ok(chord) => {
                self.press_chord(chord);
                self.screen()
            }
            Err(err) => err.to_string(),
        }
    }

    fn plot(&mut self, expression: &str) -> String {
        if !expression.is_empty()
            && let Err(err) = self.graph.add_function(expression).map(|_| ())
        {
            return format!("{}: {}", self.graph.error().unwrap_or("Error"), err);
        }
        if self.graph.functions().is_empty() {
            return "Nothing to plot".to_string();
        }
        render_plot(&self.graph.plot_series(), self.graph.settings(), self.plot_size)
    }

    fn list_functions(&self) -> String {
        if self.graph.functions().is_empty() {
            return "No functions".to_string();
        }
        self.graph
            .functions()
            .iter()
            .map(|function| {
                let shown = if function.is_visible { "shown" } else { "hidden" };
                format!("{}  {}  ({})", function.id, function.expression, shown)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn graph_has(&self, id: &str) -> bool {
        self.graph.functions().iter().any(|function| function.id == id)
    }

    /// Apply `edit` to the graph and redraw it, or report an unknown id.
    fn graph_edit(&mut self, known: bool, edit: impl FnOnce(&mut Graph<E>)) -> String {
        if !known {
            return "No such function (see :funcs)".to_string();
        }
        edit(&mut self.graph);
        if self.graph.functions().is_empty() {
            return "Graph is empty".to_string();
        }
        render_plot(&self.graph.plot_series(), self.graph.settings(), self.plot_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphSettings;

    fn session() -> Session {
        let config = Config {
            graph: GraphSettings {
                points: 20,
                ..GraphSettings::default()
            },
            ..Config::default()
        };
        Session::new(&config)
    }

    #[test]
    fn test_typed_line_evaluates() {
        let mut session = session();
        session.handle_line("2+3*4");
        assert_eq!(session.state().display, "14");
        assert_eq!(session.state().history[0].expression, "2+3*4");
    }

    #[test]
    fn test_invalid_line_sets_error() {
        let mut session = session();
        let Outcome::Continue(screen) = session.handle_line("2+") else {
            panic!("session ended");
        };
        assert!(screen.ends_with("! Invalid expression"));
        assert_eq!(session.state().display, "2+");
    }

    #[test]
    fn test_press_label_and_alt() {
        let mut session = session();
        session.handle_line(":mode scientific");
        session.handle_line(":press sin⁻¹");
        assert_eq!(session.state().expression, "asin(");

        session.handle_line(":press C");
        session.handle_line(":alt S");
        assert_eq!(session.state().expression, "asinh(");

        let Outcome::Continue(text) = session.handle_line(":press nope") else {
            panic!("session ended");
        };
        assert!(text.starts_with("No button"));
    }

    #[test]
    fn test_shift_applies_to_typed_letters() {
        let mut session = session();
        session.handle_line(":shift");
        assert!(session.state().is_shift_active);
        session.handle_line("s");
        assert_eq!(session.state().error.as_deref(), Some("Invalid expression"));
        assert_eq!(session.state().expression, "asin(");
    }

    #[test]
    fn test_degree_toggle() {
        let mut session = session();
        session.handle_line(":rad");
        assert!(!session.state().is_degree_mode);
        session.handle_line(":deg");
        assert!(session.state().is_degree_mode);
    }

    #[test]
    fn test_plot_commands() {
        let mut session = session();
        session.set_plot_size(PlotSize {
            width: 20,
            height: 10,
        });

        let Outcome::Continue(plot) = session.handle_line(":plot y = x^2") else {
            panic!("session ended");
        };
        assert_eq!(plot.lines().count(), 11);
        assert!(plot.ends_with("* x^2"));
        assert_eq!(session.graph().functions().len(), 1);

        let Outcome::Continue(text) = session.handle_line(":plot x +") else {
            panic!("session ended");
        };
        assert!(text.starts_with("Invalid expression"));

        let Outcome::Continue(text) = session.handle_line(":toggle fn-9") else {
            panic!("session ended");
        };
        assert!(text.starts_with("No such function"));

        session.handle_line(":clearplot");
        assert!(session.graph().functions().is_empty());
    }

    #[test]
    fn test_state_json_and_quit() {
        let mut session = session();
        let Outcome::Continue(json) = session.handle_line(":state") else {
            panic!("session ended");
        };
        assert!(json.contains("\"isDegreeMode\": true"));
        assert_eq!(session.handle_line(":quit"), Outcome::Quit);
    }

    #[test]
    fn test_run_reads_until_quit() {
        let mut session = session();
        let mut output = Vec::new();
        session
            .run("1+1\n:quit\n9*9\n".as_bytes(), &mut output)
            .unwrap();
        assert_eq!(session.state().display, "2");
        assert!(String::from_utf8(output).unwrap().contains("[standard DEG]"));
    }
}
