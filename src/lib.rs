//! # Enigma Emulator
//!
//! An emulator of the Enigma rotor cipher machine: the Wehrmacht Enigma I,
//! the Kriegsmarine M3 and the four-rotor M4.
//!
//! The emulator reproduces the electrical signal path (plugboard, rotors,
//! reflector and back) and the ratchet-and-pawl stepping mechanism,
//! including the middle rotor's double step, so it reads and writes
//! historical traffic.
//!
//! ```
//! use enigma::{Machine, RotorCatalog};
//!
//! let catalog = RotorCatalog::historical();
//! let mut machine = Machine::from_key_sheet(&catalog, &["I", "II", "III"], &[], "B", "").unwrap();
//! machine.set_display("AAA").unwrap();
//! assert_eq!(machine.process_text("AAAAA").unwrap(), "BDZGO");
//! ```

pub mod alpha;
pub mod machine;
pub mod data;
pub mod telemetry;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use alpha::{alpha_mod, letter_to_signal, signal_to_letter};
pub use machine::{Machine, MachineError, Plugboard, PlugboardError, Rotor, RotorError};
pub use data::{KeySheet, KeySheetError, RotorCatalog, load_key_sheet, save_key_sheet};

#[cfg(feature = "tui")]
pub use tui::run_lampboard;
