//! TUI front panel for the Enigma emulator.
//!
//! Provides an interactive terminal machine with:
//! - Rotor windows that turn as keys are pressed
//! - A QWERTZ lampboard that lights the output letter
//! - Input and output tapes in five-letter groups

mod app;
mod ui;

pub use app::{LampboardApp, run_lampboard};
