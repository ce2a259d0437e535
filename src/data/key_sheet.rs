//! Key sheets: complete machine setups stored as JSON.
//!
//! A key sheet lists what the operator needs to set up the machine for the
//! day:
//!
//! ```json
//! {
//!   "rotors": ["II", "IV", "V"],
//!   "ring_settings": [1, 20, 11],
//!   "reflector": "B",
//!   "plugboard": "AV BS CG DL FU HZ IN KM OW RX",
//!   "display": "WXC"
//! }
//! ```
//!
//! Only `rotors` is required. Ring settings default to all zero, the
//! reflector to "B", the plugboard to no cables and the display to all "A".

use crate::data::RotorCatalog;
use crate::machine::{Machine, MachineError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// One day's machine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySheet {
    /// Rotor type names, leftmost first.
    pub rotors: Vec<String>,
    /// Ring settings (0-25), leftmost first; empty means all zero.
    #[serde(default)]
    pub ring_settings: Vec<i32>,
    /// Reflector type name.
    #[serde(default = "default_reflector")]
    pub reflector: String,
    /// Plugboard settings in either key-sheet syntax.
    #[serde(default)]
    pub plugboard: String,
    /// Starting rotor window letters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

fn default_reflector() -> String {
    "B".to_string()
}

impl KeySheet {
    /// Parse a key sheet from JSON.
    pub fn from_json(json: &str) -> Result<Self, KeySheetError> {
        serde_json::from_str(json).map_err(|e| KeySheetError::ParseError(e.to_string()))
    }

    /// Serialise to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, KeySheetError> {
        serde_json::to_string_pretty(self).map_err(|e| KeySheetError::ParseError(e.to_string()))
    }

    /// Capture the current setup of a machine, window letters included.
    pub fn from_machine(machine: &Machine) -> Self {
        let rotors = (0..machine.num_rotors())
            .filter_map(|i| machine.rotor(i))
            .collect::<Vec<_>>();

        Self {
            rotors: rotors.iter().map(|r| r.name().to_string()).collect(),
            ring_settings: rotors.iter().map(|r| r.ring_setting() as i32).collect(),
            reflector: machine.reflector().name().to_string(),
            plugboard: machine.plugboard().army_str(),
            display: Some(machine.get_display()),
        }
    }

    /// Build a machine from this sheet, rotor windows set.
    pub fn build(&self, catalog: &RotorCatalog) -> Result<Machine, MachineError> {
        let mut machine = Machine::from_key_sheet(
            catalog,
            self.rotors.as_slice(),
            &self.ring_settings,
            &self.reflector,
            &self.plugboard,
        )?;
        if let Some(display) = &self.display {
            machine.set_display(display)?;
        }
        Ok(machine)
    }
}

/// Load a key sheet from disk.
pub fn load_key_sheet<P: AsRef<Path>>(path: P) -> Result<KeySheet, KeySheetError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| KeySheetError::IoError(e.to_string()))?;
    let sheet = KeySheet::from_json(&text)?;
    debug!(path = %path.as_ref().display(), rotors = ?sheet.rotors, "loaded key sheet");
    Ok(sheet)
}

/// Save a key sheet to disk.
pub fn save_key_sheet<P: AsRef<Path>>(path: P, sheet: &KeySheet) -> Result<(), KeySheetError> {
    let json = sheet.to_json()?;
    std::fs::write(path.as_ref(), json + "\n").map_err(|e| KeySheetError::IoError(e.to_string()))
}

/// Load a rotor catalog from a JSON file.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<RotorCatalog, KeySheetError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| KeySheetError::IoError(e.to_string()))?;
    let catalog =
        RotorCatalog::from_json(&text).map_err(|e| KeySheetError::ParseError(e.to_string()))?;
    debug!(
        path = %path.as_ref().display(),
        rotors = catalog.rotor_names().count(),
        reflectors = catalog.reflector_names().count(),
        "loaded rotor catalog"
    );
    Ok(catalog)
}

/// Errors that can occur while reading or applying a key sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeySheetError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("machine error: {0}")]
    Machine(#[from] MachineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = r#"{
        "rotors": ["II", "IV", "V"],
        "ring_settings": [1, 20, 11],
        "plugboard": "AV BS CG DL FU HZ IN KM OW RX",
        "display": "WXC"
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let sheet = KeySheet::from_json(SHEET).unwrap();
        assert_eq!(sheet.reflector, "B");
        assert_eq!(sheet.ring_settings, vec![1, 20, 11]);

        let minimal = KeySheet::from_json(r#"{"rotors": ["I", "II", "III"]}"#).unwrap();
        assert!(minimal.ring_settings.is_empty());
        assert_eq!(minimal.plugboard, "");
        assert_eq!(minimal.display, None);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            KeySheet::from_json(r#"{"reflector": "B"}"#),
            Err(KeySheetError::ParseError(_))
        ));
        assert!(matches!(
            KeySheet::from_json("not json"),
            Err(KeySheetError::ParseError(_))
        ));
    }

    #[test]
    fn test_build() {
        let machine = KeySheet::from_json(SHEET)
            .unwrap()
            .build(&RotorCatalog::historical())
            .unwrap();
        assert_eq!(
            machine.army_str(),
            "B II/1 IV/20 V/11 WXC AV BS CG DL FU HZ IN KM OW RX"
        );
    }

    #[test]
    fn test_build_rejects_bad_display() {
        let mut sheet = KeySheet::from_json(SHEET).unwrap();
        sheet.display = Some("WX".into());
        assert!(matches!(
            sheet.build(&RotorCatalog::historical()),
            Err(MachineError::InvalidDisplayLength { .. })
        ));
    }

    #[test]
    fn test_from_machine_roundtrip() {
        let catalog = RotorCatalog::historical();
        let sheet = KeySheet::from_json(SHEET).unwrap();
        let machine = sheet.build(&catalog).unwrap();

        let captured = KeySheet::from_machine(&machine);
        assert_eq!(captured, sheet);
        assert_eq!(captured.build(&catalog).unwrap(), machine);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_key_sheet("/nonexistent/sheet.json"),
            Err(KeySheetError::IoError(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("enigma-sheet-{}.json", std::process::id()));
        let sheet = KeySheet::from_json(SHEET).unwrap();

        save_key_sheet(&path, &sheet).unwrap();
        let loaded = load_key_sheet(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, sheet);
    }
}
