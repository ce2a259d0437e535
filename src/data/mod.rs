//! Reference data and operator paperwork.
//!
//! This module provides:
//! - The historical rotor & reflector catalog, injected into machine
//!   construction rather than compiled in as a global
//! - Parsing of plugboard settings as printed on key sheets
//! - A JSON key-sheet format for complete machine setups

pub mod catalog;
pub mod key_sheet;
pub mod settings;

pub use catalog::{RotorCatalog, RotorSpec};
pub use key_sheet::{load_catalog, load_key_sheet, save_key_sheet, KeySheet, KeySheetError};
pub use settings::{army_settings, navy_settings, parse_plugboard_settings};
