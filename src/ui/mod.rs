//! Terminal rendering.
//!
//! Every renderer is a pure function from model values to a `String`; the
//! REPL decides where the text goes.

mod display;
mod keypad;
mod plot;
mod shortcuts;

pub use display::{render_display, render_history, render_status};
pub use keypad::render_keypad;
pub use plot::{PlotSize, render_plot};
pub use shortcuts::{SHORTCUT_CATEGORIES, ShortcutCategory, render_shortcuts};
