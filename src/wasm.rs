//! WebAssembly bindings for the Enigma emulator.
//!
//! This module provides JavaScript-friendly wrappers around the core machine.

use wasm_bindgen::prelude::*;
use crate::{Machine, RotorCatalog};
use crate::alpha::group_text;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly machine wrapper.
#[wasm_bindgen]
pub struct WasmMachine {
    machine: Machine,
}

#[wasm_bindgen]
impl WasmMachine {
    /// Assemble a machine from key-sheet settings.
    ///
    /// `rotors` is a space-separated list of type names, leftmost first
    /// (e.g. `"II IV V"`); `ring_settings` may be empty for all zero.
    #[wasm_bindgen(constructor)]
    pub fn new(
        rotors: &str,
        ring_settings: Vec<i32>,
        reflector: &str,
        plugboard: &str,
    ) -> Result<WasmMachine, JsError> {
        let names: Vec<&str> = rotors.split_whitespace().collect();
        let machine = Machine::from_key_sheet(
            &RotorCatalog::historical(),
            &names,
            &ring_settings,
            reflector,
            plugboard,
        )
        .map_err(|e| JsError::new(&format!("{}", e)))?;

        Ok(Self { machine })
    }

    /// Turn the rotors so the windows show `display`.
    #[wasm_bindgen]
    pub fn set_display(&mut self, display: &str) -> Result<(), JsError> {
        self.machine
            .set_display(display)
            .map_err(|e| JsError::new(&format!("{}", e)))
    }

    /// The letters in the rotor windows.
    #[wasm_bindgen]
    pub fn display(&self) -> String {
        self.machine.get_display()
    }

    /// Encrypt or decrypt text. Spaces are dropped; output comes in groups
    /// of `group` letters (0 for none).
    #[wasm_bindgen]
    pub fn process_text(&mut self, text: &str, group: usize) -> Result<String, JsError> {
        let letters = crate::alpha::remove_spaces(text);
        let out = self
            .machine
            .process_text(&letters)
            .map_err(|e| JsError::new(&format!("{}", e)))?;
        Ok(group_text(&out, group))
    }

    /// Press a single key and return the lit lamp.
    #[wasm_bindgen]
    pub fn key_press(&mut self, key: char) -> Result<char, JsError> {
        self.machine
            .key_press(key)
            .map_err(|e| JsError::new(&format!("{}", e)))
    }

    /// Machine state, plugboard in letter syntax.
    #[wasm_bindgen]
    pub fn army_str(&self) -> String {
        self.machine.army_str()
    }

    /// Machine state, plugboard in number syntax.
    #[wasm_bindgen]
    pub fn navy_str(&self) -> String {
        self.machine.navy_str()
    }

    /// Plugboard cables as an array of two-letter strings.
    #[wasm_bindgen]
    pub fn plugboard_pairs(&self) -> js_sys::Array {
        self.machine
            .plugboard()
            .army_str()
            .split_whitespace()
            .map(JsValue::from_str)
            .collect()
    }

    /// Get key presses since assembly.
    #[wasm_bindgen]
    pub fn keystrokes(&self) -> u64 {
        self.machine.keystrokes()
    }
}

/// Names of the historical rotor types.
#[wasm_bindgen]
pub fn wasm_catalog_rotors() -> js_sys::Array {
    RotorCatalog::historical()
        .rotor_names()
        .map(JsValue::from_str)
        .collect()
}

/// Names of the historical reflector types.
#[wasm_bindgen]
pub fn wasm_catalog_reflectors() -> js_sys::Array {
    RotorCatalog::historical()
        .reflector_names()
        .map(JsValue::from_str)
        .collect()
}
