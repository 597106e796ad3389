//! Keyboard shortcut sheet.

/// A titled block of the shortcut sheet.
pub struct ShortcutCategory {
    pub title: &'static str,
    /// `(chords, action)`; chords are separated by `/`.
    pub shortcuts: &'static [(&'static str, &'static str)],
}

pub static SHORTCUT_CATEGORIES: &[ShortcutCategory] = &[
    ShortcutCategory {
        title: "Basic Operations",
        shortcuts: &[
            ("0/1/2/3/4/5/6/7/8/9/.", "Number input"),
            ("+/-/*//", "Basic arithmetic"),
            ("%", "Percent"),
            ("Enter", "Calculate result"),
            ("Esc", "Clear all"),
            ("Backspace", "Delete last character"),
            ("(/)", "Parentheses"),
            ("!", "Factorial"),
        ],
    },
    ShortcutCategory {
        title: "Trigonometric Functions",
        shortcuts: &[
            ("s/c/t", "sin, cos, tan"),
            ("Shift+S/Shift+C/Shift+T", "arcsin, arccos, arctan"),
            ("Alt+S/Alt+C/Alt+T", "sinh, cosh, tanh"),
            ("Alt+Shift+S/Alt+Shift+C/Alt+Shift+T", "arsinh, arcosh, artanh"),
        ],
    },
    ShortcutCategory {
        title: "Advanced Functions",
        shortcuts: &[
            ("l", "log (base 10)"),
            ("n", "natural log"),
            ("Shift+L", "log with base, log(value, base)"),
            ("Shift+E", "exponential"),
            ("q", "square root"),
            ("Shift+Q", "cube root"),
            ("Shift+R", "nth root, nthRoot(value, n)"),
            ("@", "square"),
            ("#", "cube"),
            ("^", "power"),
            ("a", "absolute value"),
        ],
    },
    ShortcutCategory {
        title: "Algebra",
        shortcuts: &[
            ("f", "factor"),
            ("x", "expand"),
            ("Shift+G/Shift+H", "gcd, lcm"),
        ],
    },
    ShortcutCategory {
        title: "Constants",
        shortcuts: &[
            ("p", "π (pi)"),
            ("e", "e (euler's number)"),
            ("g", "φ (golden ratio)"),
            ("i", "∞ (infinity)"),
        ],
    },
    ShortcutCategory {
        title: "Memory Operations",
        shortcuts: &[
            ("Shift+M", "Memory Add (M+)"),
            ("Shift+N", "Memory Subtract (M-)"),
            ("m", "Memory Recall (MR)"),
        ],
    },
];

/// Split a chord list on `/`, keeping a lone `/` as a chord of its own.
pub(crate) fn split_chords(keys: &str) -> Vec<&str> {
    let mut chords = Vec::new();
    let mut start = 0;
    let bytes = keys.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'/' && i > start {
            chords.push(&keys[start..i]);
            start = i + 1;
        } else if bytes[i] == b'/' {
            // `/` at the start of a chord is the division key itself.
            i += 1;
            chords.push(&keys[start..i]);
            start = i + 1;
        }
        i += 1;
    }
    if start < keys.len() {
        chords.push(&keys[start..]);
    }
    chords
}

/// Render the shortcut sheet as aligned text.
pub fn render_shortcuts() -> String {
    let key_width = SHORTCUT_CATEGORIES
        .iter()
        .flat_map(|category| category.shortcuts.iter())
        .map(|(keys, _)| split_chords(keys).join(" / ").chars().count())
        .max()
        .unwrap_or(0);

    SHORTCUT_CATEGORIES
        .iter()
        .map(|category| {
            let mut block = category.title.to_string();
            for (keys, action) in category.shortcuts {
                let keys = split_chords(keys).join(" / ");
                block.push_str(&format!("\n  {:<width$}  {}", keys, action, width = key_width));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{KeyChord, map_key};

    #[test]
    fn test_split_chords() {
        assert_eq!(split_chords("s/c/t"), vec!["s", "c", "t"]);
        assert_eq!(split_chords("+/-/*//"), vec!["+", "-", "*", "/"]);
        assert_eq!(split_chords("Enter"), vec!["Enter"]);
    }

    #[test]
    fn test_every_listed_chord_is_bound() {
        for category in SHORTCUT_CATEGORIES {
            for (keys, _) in category.shortcuts {
                for chord in split_chords(keys) {
                    let parsed: KeyChord = chord.parse().unwrap();
                    assert!(map_key(parsed).is_some(), "{} is not bound", chord);
                }
            }
        }
    }

    #[test]
    fn test_render_shortcuts() {
        let sheet = render_shortcuts();
        assert!(sheet.starts_with("Basic Operations\n"));
        assert!(sheet.contains("Memory Operations"));
        assert!(sheet.contains("+ / - / * / /"));
    }
}
