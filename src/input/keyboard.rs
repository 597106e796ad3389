//! Keyboard shortcut table.
//!
//! Chords are resolved in order: Alt+Shift, Shift, Alt, then the plain key.
//! A modifier combination without a binding falls through to the plain key.

use std::fmt;
use std::str::FromStr;

use super::{ButtonInput, ButtonKind};
use crate::calculator::CalcError;

use ButtonKind::{Constant, Control, Equals, Function, Memory, Number, Operator};

/// A physical key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Backspace,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
}

/// A key together with its held modifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn shift(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers {
                shift: true,
                alt: false,
            },
        }
    }

    pub fn alt(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers {
                shift: false,
                alt: true,
            },
        }
    }

    /// The chord a terminal character stands for: uppercase letters carry
    /// Shift.
    pub fn from_typed(c: char) -> Self {
        if c.is_ascii_uppercase() {
            Self::shift(c.to_ascii_lowercase())
        } else {
            Self::plain(Key::Char(c))
        }
    }
}

impl FromStr for KeyChord {
    type Err = CalcError;

    /// Parse shortcut notation such as `q`, `Esc` or `Alt+Shift+S`.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::default();
        let mut rest = text.trim();

        loop {
            if let Some(tail) = rest.strip_prefix("Shift+") {
                modifiers.shift = true;
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("Alt+") {
                modifiers.alt = true;
                rest = tail;
            } else {
                break;
            }
        }

        let key = match rest {
            "Esc" | "Escape" => Key::Escape,
            "Enter" => Key::Enter,
            "Backspace" => Key::Backspace,
            single => {
                let mut chars = single.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if modifiers.shift || modifiers.alt => {
                        Key::Char(c.to_ascii_lowercase())
                    }
                    (Some(c), None) => Key::Char(c),
                    _ => {
                        return Err(CalcError::UnknownInput {
                            kind: "shortcut".to_string(),
                            value: text.to_string(),
                        });
                    }
                }
            }
        };

        Ok(Self { key, modifiers })
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.alt {
            f.write_str("Alt+")?;
        }
        if self.modifiers.shift {
            f.write_str("Shift+")?;
        }
        match self.key {
            Key::Char(c) if self.modifiers.shift || self.modifiers.alt => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            Key::Char(c) => write!(f, "{}", c),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Esc"),
            Key::Backspace => f.write_str("Backspace"),
        }
    }
}

type Binding = (&'static str, ButtonKind);

const PLAIN_KEYS: &[(Key, Binding)] = &[
    (Key::Char('0'), ("0", Number)),
    (Key::Char('1'), ("1", Number)),
    (Key::Char('2'), ("2", Number)),
    (Key::Char('3'), ("3", Number)),
    (Key::Char('4'), ("4", Number)),
    (Key::Char('5'), ("5", Number)),
    (Key::Char('6'), ("6", Number)),
    (Key::Char('7'), ("7", Number)),
    (Key::Char('8'), ("8", Number)),
    (Key::Char('9'), ("9", Number)),
    (Key::Char('.'), (".", Number)),
    (Key::Char('+'), ("+", Operator)),
    (Key::Char('-'), ("-", Operator)),
    (Key::Char('*'), ("*", Operator)),
    (Key::Char('/'), ("/", Operator)),
    (Key::Char('%'), ("%", Operator)),
    (Key::Enter, ("equals", Equals)),
    (Key::Escape, ("clear", Control)),
    (Key::Backspace, ("backspace", Control)),
    (Key::Char('s'), ("sin(", Function)),
    (Key::Char('c'), ("cos(", Function)),
    (Key::Char('t'), ("tan(", Function)),
    (Key::Char('p'), ("pi", Constant)),
    (Key::Char('e'), ("e", Constant)),
    (Key::Char('g'), ("1.618033988749895", Constant)),
    (Key::Char('i'), ("Infinity", Constant)),
    (Key::Char('l'), ("log10(", Function)),
    (Key::Char('n'), ("log(", Function)),
    (Key::Char('q'), ("sqrt(", Function)),
    (Key::Char('a'), ("abs(", Function)),
    (Key::Char('f'), ("factor(", Function)),
    (Key::Char('x'), ("expand(", Function)),
    (Key::Char('@'), ("^2", Operator)),
    (Key::Char('#'), ("^3", Operator)),
    (Key::Char('^'), ("^", Operator)),
    (Key::Char('('), ("(", Operator)),
    (Key::Char(')'), (")", Operator)),
    (Key::Char('!'), ("!", Operator)),
    (Key::Char('m'), ("memoryRecall", Memory)),
];

const SHIFT_KEYS: &[(char, Binding)] = &[
    ('s', ("asin(", Function)),
    ('c', ("acos(", Function)),
    ('t', ("atan(", Function)),
    ('m', ("memoryAdd", Memory)),
    ('n', ("memorySub", Memory)),
    ('q', ("cbrt(", Function)),
    ('r', ("nthRoot(", Function)),
    ('l', ("log(", Function)),
    ('e', ("exp(", Function)),
    ('g', ("gcd(", Function)),
    ('h', ("lcm(", Function)),
];

const ALT_KEYS: &[(char, Binding)] = &[
    ('s', ("sinh(", Function)),
    ('c', ("cosh(", Function)),
    ('t', ("tanh(", Function)),
];

const ALT_SHIFT_KEYS: &[(char, Binding)] = &[
    ('s', ("asinh(", Function)),
    ('c', ("acosh(", Function)),
    ('t', ("atanh(", Function)),
];

fn lookup_char(table: &[(char, Binding)], c: char) -> Option<Binding> {
    let c = c.to_ascii_lowercase();
    table
        .iter()
        .find(|(bound, _)| *bound == c)
        .map(|(_, binding)| *binding)
}

/// Resolve a chord to the input it triggers, if any.
pub fn map_key(chord: KeyChord) -> Option<ButtonInput> {
    let Modifiers { shift, alt } = chord.modifiers;

    let modified = match chord.key {
        Key::Char(c) => {
            let alt_shift = (alt && shift)
                .then(|| lookup_char(ALT_SHIFT_KEYS, c))
                .flatten();
            alt_shift
                .or_else(|| shift.then(|| lookup_char(SHIFT_KEYS, c)).flatten())
                .or_else(|| alt.then(|| lookup_char(ALT_KEYS, c)).flatten())
        }
        _ => None,
    };

    let (value, kind) = modified.or_else(|| {
        PLAIN_KEYS
            .iter()
            .find(|(key, _)| *key == chord.key)
            .map(|(_, binding)| *binding)
    })?;

    ButtonInput::from_parts(value, kind).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::MemoryOp;
    use crate::input::ControlOp;

    fn function(value: &str) -> Option<ButtonInput> {
        Some(ButtonInput::Function(value.to_string()))
    }

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            map_key(KeyChord::plain(Key::Char('7'))),
            Some(ButtonInput::Number("7".to_string()))
        );
        assert_eq!(map_key(KeyChord::plain(Key::Enter)), Some(ButtonInput::Equals));
        assert_eq!(
            map_key(KeyChord::plain(Key::Escape)),
            Some(ButtonInput::Control(ControlOp::Clear))
        );
        assert_eq!(map_key(KeyChord::plain(Key::Char('s'))), function("sin("));
        assert_eq!(
            map_key(KeyChord::plain(Key::Char('m'))),
            Some(ButtonInput::Memory(MemoryOp::MemoryRecall))
        );
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(map_key(KeyChord::plain(Key::Char('z'))), None);
        assert_eq!(map_key(KeyChord::plain(Key::Char('S'))), None);
    }

    #[test]
    fn test_shift_bindings() {
        assert_eq!(map_key(KeyChord::shift('s')), function("asin("));
        assert_eq!(map_key(KeyChord::shift('S')), function("asin("));
        assert_eq!(
            map_key(KeyChord::shift('m')),
            Some(ButtonInput::Memory(MemoryOp::MemoryAdd))
        );
        assert_eq!(
            map_key(KeyChord::shift('n')),
            Some(ButtonInput::Memory(MemoryOp::MemorySub))
        );
    }

    #[test]
    fn test_alt_bindings() {
        assert_eq!(map_key(KeyChord::alt('c')), function("cosh("));
        let chord: KeyChord = "Alt+Shift+T".parse().unwrap();
        assert_eq!(map_key(chord), function("atanh("));
    }

    #[test]
    fn test_modifier_falls_through_to_plain_key() {
        assert_eq!(
            map_key(KeyChord::shift('@')),
            Some(ButtonInput::Operator("^2".to_string()))
        );
        assert_eq!(
            map_key(KeyChord::alt('1')),
            Some(ButtonInput::Number("1".to_string()))
        );
    }

    #[test]
    fn test_from_typed() {
        assert_eq!(KeyChord::from_typed('S'), KeyChord::shift('s'));
        assert_eq!(KeyChord::from_typed('+'), KeyChord::plain(Key::Char('+')));
    }

    #[test]
    fn test_parse_and_display() {
        let chord: KeyChord = "Shift+Q".parse().unwrap();
        assert_eq!(chord, KeyChord::shift('q'));
        assert_eq!(chord.to_string(), "Shift+Q");
        assert_eq!("Esc".parse::<KeyChord>().unwrap(), KeyChord::plain(Key::Escape));
        assert_eq!("+".parse::<KeyChord>().unwrap(), KeyChord::plain(Key::Char('+')));
        assert!("Ctrl+Z".parse::<KeyChord>().is_err());
    }
}
