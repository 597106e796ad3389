//! Keyboard-driven calculator with standard, scientific and graphing modes.

pub mod calculator;
pub mod config;
pub mod graph;
pub mod input;
pub mod repl;
pub mod ui;
