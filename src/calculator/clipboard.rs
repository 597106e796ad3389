//! Clipboard functionality for copying calculator results.

use arboard::Clipboard;

use super::error::{CalcError, Result};

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| CalcError::Clipboard(format!("failed to access clipboard: {}", e)))?;

    clipboard
        .set_text(text.to_string())
        .map_err(|e| CalcError::Clipboard(format!("failed to copy to clipboard: {}", e)))
}
