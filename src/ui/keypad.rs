//! Keypad rendering.

use crate::calculator::CalculatorMode;
use crate::input::{ButtonGroup, ButtonSpec, buttons_for};

const STANDARD_COLUMNS: usize = 4;
const CELL_WIDTH: usize = 7;

/// Render the keypad for `mode`.
///
/// The standard pad is a four-column grid. The scientific pad lists each
/// group on its own line with the bound shortcut after every label.
pub fn render_keypad(mode: CalculatorMode) -> String {
    let buttons = buttons_for(mode);
    match mode {
        CalculatorMode::Standard => render_grid(buttons),
        CalculatorMode::Scientific => render_groups(buttons),
        CalculatorMode::Graphing => "Graphing mode has no keypad; use :plot".to_string(),
    }
}

fn render_grid(buttons: &[ButtonSpec]) -> String {
    buttons
        .chunks(STANDARD_COLUMNS)
        .map(|row| {
            row.iter()
                .map(|button| format!("[{:^width$}]", button.label, width = CELL_WIDTH - 2))
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_groups(buttons: &[ButtonSpec]) -> String {
    let mut groups: Vec<(ButtonGroup, Vec<&ButtonSpec>)> = Vec::new();
    for button in buttons {
        let Some(group) = button.group else {
            continue;
        };
        match groups.iter_mut().find(|(existing, _)| *existing == group) {
            Some((_, members)) => members.push(button),
            None => groups.push((group, vec![button])),
        }
    }

    let title_width = groups
        .iter()
        .map(|(group, _)| group.title().chars().count())
        .max()
        .unwrap_or(0);

    groups
        .iter()
        .map(|(group, members)| {
            let cells = members
                .iter()
                .map(|button| match button.shortcut {
                    Some(shortcut) => format!("{} ({})", button.label, shortcut),
                    None => button.label.to_string(),
                })
                .collect::<Vec<_>>()
                .join("  ");
            format!("{:<width$}  {}", group.title(), cells, width = title_width)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_grid() {
        let rendered = render_keypad(CalculatorMode::Standard);
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0], "[  C  ][  ⌫  ][  %  ][  ÷  ]");
        assert_eq!(rows[4], "[  ±  ][  0  ][  .  ][  =  ]");
    }

    #[test]
    fn test_scientific_groups() {
        let rendered = render_keypad(CalculatorMode::Scientific);
        assert_eq!(rendered.lines().count(), 9);

        let hyperbolic = rendered
            .lines()
            .find(|line| line.starts_with("Hyperbolic"))
            .unwrap();
        assert!(hyperbolic.contains("sinh⁻¹ (Alt+Shift+S)"));

        let memory = rendered.lines().find(|line| line.starts_with("Memory")).unwrap();
        assert!(memory.ends_with("MC"));
    }

    #[test]
    fn test_graphing_has_no_keypad() {
        assert!(render_keypad(CalculatorMode::Graphing).contains(":plot"));
    }
}
