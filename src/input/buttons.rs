//! On-screen keypad layouts.

use super::{ButtonInput, ButtonKind};
use crate::calculator::{CalcError, CalculatorMode};

/// Keypad section a scientific button is rendered in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonGroup {
    Control,
    Memory,
    Constant,
    Power,
    Log,
    Trig,
    Hyp,
    Algebra,
    Operator,
}

impl ButtonGroup {
    pub fn title(self) -> &'static str {
        match self {
            Self::Control => "Control",
            Self::Memory => "Memory",
            Self::Constant => "Constants",
            Self::Power => "Powers & Roots",
            Self::Log => "Logarithms",
            Self::Trig => "Trigonometric",
            Self::Hyp => "Hyperbolic",
            Self::Algebra => "Algebra",
            Self::Operator => "Operators",
        }
    }
}

/// Static descriptor of one keypad button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonSpec {
    pub label: &'static str,
    pub value: &'static str,
    pub kind: ButtonKind,
    /// Keyboard chord producing the same input, if one is bound.
    pub shortcut: Option<&'static str>,
    pub group: Option<ButtonGroup>,
}

impl ButtonSpec {
    const fn new(
        label: &'static str,
        value: &'static str,
        kind: ButtonKind,
        shortcut: Option<&'static str>,
    ) -> Self {
        Self {
            label,
            value,
            kind,
            shortcut,
            group: None,
        }
    }

    const fn grouped(self, group: ButtonGroup) -> Self {
        Self {
            group: Some(group),
            ..self
        }
    }

    /// The input a click on this button produces.
    pub fn input(&self) -> Result<ButtonInput, CalcError> {
        ButtonInput::from_parts(self.value, self.kind)
    }
}

use ButtonGroup as G;
use ButtonKind::{Constant, Control, Equals, Function, Memory, Number, Operator};

const fn b(
    label: &'static str,
    value: &'static str,
    kind: ButtonKind,
    shortcut: &'static str,
) -> ButtonSpec {
    ButtonSpec::new(label, value, kind, Some(shortcut))
}

const fn unbound(label: &'static str, value: &'static str, kind: ButtonKind) -> ButtonSpec {
    ButtonSpec::new(label, value, kind, None)
}

pub static STANDARD_BUTTONS: [ButtonSpec; 20] = [
    b("C", "clear", Control, "Esc"),
    b("⌫", "backspace", Control, "Backspace"),
    b("%", "%", Operator, "%"),
    b("÷", "/", Operator, "/"),
    b("7", "7", Number, "7"),
    b("8", "8", Number, "8"),
    b("9", "9", Number, "9"),
    b("×", "*", Operator, "*"),
    b("4", "4", Number, "4"),
    b("5", "5", Number, "5"),
    b("6", "6", Number, "6"),
    b("-", "-", Operator, "-"),
    b("1", "1", Number, "1"),
    b("2", "2", Number, "2"),
    b("3", "3", Number, "3"),
    b("+", "+", Operator, "+"),
    unbound("±", "-", Operator),
    b("0", "0", Number, "0"),
    b(".", ".", Number, "."),
    b("=", "equals", Equals, "Enter"),
];

pub static SCIENTIFIC_BUTTONS: [ButtonSpec; 42] = [
    b("C", "clear", Control, "Esc").grouped(G::Control),
    b("⌫", "backspace", Control, "Backspace").grouped(G::Control),
    b("M+", "memoryAdd", Memory, "Shift+M").grouped(G::Memory),
    b("M-", "memorySub", Memory, "Shift+N").grouped(G::Memory),
    b("MR", "memoryRecall", Memory, "m").grouped(G::Memory),
    unbound("MC", "memoryClear", Memory).grouped(G::Memory),
    b("π", "pi", Constant, "p").grouped(G::Constant),
    b("e", "e", Constant, "e").grouped(G::Constant),
    b("φ", "1.618033988749895", Constant, "g").grouped(G::Constant),
    b("∞", "Infinity", Constant, "i").grouped(G::Constant),
    b("x²", "^2", Operator, "@").grouped(G::Power),
    b("x³", "^3", Operator, "#").grouped(G::Power),
    b("xⁿ", "^", Operator, "^").grouped(G::Power),
    b("√", "sqrt(", Function, "q").grouped(G::Power),
    b("∛", "cbrt(", Function, "Shift+Q").grouped(G::Power),
    b("ⁿ√", "nthRoot(", Function, "Shift+R").grouped(G::Power),
    b("log", "log10(", Function, "l").grouped(G::Log),
    b("ln", "log(", Function, "n").grouped(G::Log),
    b("logₐ", "log(", Function, "Shift+L").grouped(G::Log),
    b("eˣ", "exp(", Function, "Shift+E").grouped(G::Log),
    b("sin", "sin(", Function, "s").grouped(G::Trig),
    b("cos", "cos(", Function, "c").grouped(G::Trig),
    b("tan", "tan(", Function, "t").grouped(G::Trig),
    b("sin⁻¹", "asin(", Function, "Shift+S").grouped(G::Trig),
    b("cos⁻¹", "acos(", Function, "Shift+C").grouped(G::Trig),
    b("tan⁻¹", "atan(", Function, "Shift+T").grouped(G::Trig),
    b("sinh", "sinh(", Function, "Alt+S").grouped(G::Hyp),
    b("cosh", "cosh(", Function, "Alt+C").grouped(G::Hyp),
    b("tanh", "tanh(", Function, "Alt+T").grouped(G::Hyp),
    b("sinh⁻¹", "asinh(", Function, "Alt+Shift+S").grouped(G::Hyp),
    b("cosh⁻¹", "acosh(", Function, "Alt+Shift+C").grouped(G::Hyp),
    b("tanh⁻¹", "atanh(", Function, "Alt+Shift+T").grouped(G::Hyp),
    b("factor", "factor(", Function, "f").grouped(G::Algebra),
    b("expand", "expand(", Function, "x").grouped(G::Algebra),
    b("gcd", "gcd(", Function, "Shift+G").grouped(G::Algebra),
    b("lcm", "lcm(", Function, "Shift+H").grouped(G::Algebra),
    unbound("mod", "mod(", Function).grouped(G::Algebra),
    b("|x|", "abs(", Function, "a").grouped(G::Algebra),
    b("(", "(", Operator, "(").grouped(G::Operator),
    b(")", ")", Operator, ")").grouped(G::Operator),
    b("!", "!", Operator, "!").grouped(G::Operator),
    b("%", "%", Operator, "%").grouped(G::Operator),
];

/// Buttons shown in `mode`; graphing mode has no keypad.
pub fn buttons_for(mode: CalculatorMode) -> &'static [ButtonSpec] {
    match mode {
        CalculatorMode::Standard => &STANDARD_BUTTONS,
        CalculatorMode::Scientific => &SCIENTIFIC_BUTTONS,
        CalculatorMode::Graphing => &[],
    }
}

/// Look a button up by its label within `mode`'s keypad.
pub fn find_button(mode: CalculatorMode, label: &str) -> Option<&'static ButtonSpec> {
    buttons_for(mode).iter().find(|button| button.label == label)
}
