//! Rotor and reflector catalogs.
//!
//! A catalog maps a type name ("I", "Beta", "B-Thin") to wiring and notch
//! data. It is plain reference data: machines are built *from* a catalog that
//! the caller owns, so a custom or corrected table can be loaded from JSON in
//! place of [`RotorCatalog::historical`].

use crate::machine::{Rotor, RotorError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Wiring and notch data for one rotor type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorSpec {
    /// Right-to-left wiring, 26 letters.
    pub wiring: String,
    /// Notch letters; `None` for rotors that never kick their neighbour.
    #[serde(default)]
    pub stepping: Option<String>,
}

/// Rotor and reflector data keyed by type name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorCatalog {
    #[serde(default)]
    rotors: BTreeMap<String, RotorSpec>,
    /// Reflector name -> wiring.
    #[serde(default)]
    reflectors: BTreeMap<String, String>,
}

/// Wehrmacht and Kriegsmarine rotors: (name, wiring, notches).
const HISTORICAL_ROTORS: &[(&str, &str, Option<&str>)] = &[
    ("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", Some("Q")),
    ("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", Some("E")),
    ("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", Some("V")),
    ("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", Some("J")),
    ("V", "VZBRGITYUPSDNHLXAWMJQOFECK", Some("Z")),
    ("VI", "JPGVOUMFYQBENHZRDKASXLICTW", Some("ZM")),
    ("VII", "NZJHGRCXMYSWBOUFAIVLPEKQDT", Some("ZM")),
    ("VIII", "FKQHTLXOCBJSPDZRAMEWNIUYGV", Some("ZM")),
    // Thin M4 "Zusatzwalzen": they sit left of the others and never move.
    ("Beta", "LEYJVCNIXWPBQMDRTAKZGFUHOS", None),
    ("Gamma", "FSOKANUERHMBTIYCWLQPZXVGJD", None),
];

const HISTORICAL_REFLECTORS: &[(&str, &str)] = &[
    ("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT"),
    ("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL"),
    ("B-Thin", "ENKQAUYWJICOPBLMDXZVFTHRGS"),
    ("C-Thin", "RDOBJNTKVEHMLFCWZAXGYIPSUQ"),
];

impl RotorCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The rotors and reflectors issued with the Enigma I, M3 and M4.
    pub fn historical() -> Self {
        let mut catalog = Self::new();
        for &(name, wiring, stepping) in HISTORICAL_ROTORS {
            catalog.insert_rotor(name, wiring, stepping);
        }
        for &(name, wiring) in HISTORICAL_REFLECTORS {
            catalog.insert_reflector(name, wiring);
        }
        catalog
    }

    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add or replace a rotor type.
    pub fn insert_rotor(&mut self, name: &str, wiring: &str, stepping: Option<&str>) {
        self.rotors.insert(
            name.to_string(),
            RotorSpec {
                wiring: wiring.to_string(),
                stepping: stepping.map(str::to_string),
            },
        );
    }

    /// Add or replace a reflector type.
    pub fn insert_reflector(&mut self, name: &str, wiring: &str) {
        self.reflectors.insert(name.to_string(), wiring.to_string());
    }

    /// Look up a rotor type.
    pub fn rotor_spec(&self, name: &str) -> Option<&RotorSpec> {
        self.rotors.get(name)
    }

    /// Look up a reflector's wiring.
    pub fn reflector_wiring(&self, name: &str) -> Option<&str> {
        self.reflectors.get(name).map(String::as_str)
    }

    /// Rotor type names, sorted.
    pub fn rotor_names(&self) -> impl Iterator<Item = &str> {
        self.rotors.keys().map(String::as_str)
    }

    /// Reflector type names, sorted.
    pub fn reflector_names(&self) -> impl Iterator<Item = &str> {
        self.reflectors.keys().map(String::as_str)
    }

    /// Build a rotor of the named type with the given ring setting.
    pub fn create_rotor(&self, name: &str, ring_setting: i32) -> Result<Rotor, RotorError> {
        let spec = self
            .rotor_spec(name)
            .ok_or_else(|| RotorError::UnknownRotorType(name.to_string()))?;
        Rotor::new(name, &spec.wiring, ring_setting, spec.stepping.as_deref())
    }

    /// Build the named reflector.
    pub fn create_reflector(&self, name: &str) -> Result<Rotor, RotorError> {
        let wiring = self
            .reflector_wiring(name)
            .ok_or_else(|| RotorError::UnknownReflectorType(name.to_string()))?;
        Rotor::new(name, wiring, 0, None)
    }
}
