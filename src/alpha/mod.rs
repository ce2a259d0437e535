//! Alphabet primitives shared by every part of the machine.
//!
//! The Enigma works on a 26-letter alphabet. Internally every letter is a
//! "signal number" in 0-25 (A = 0), the wire the simulated current travels on:
//! - [`alpha_mod`] - floor modulo 26, safe for negative intermediates
//! - [`letter_to_signal`] / [`signal_to_letter`] - conversions
//! - [`text`] - key-sheet style text helpers

mod letter;
pub mod text;

pub use letter::{alpha_mod, letter_to_signal, signal_to_letter, ALPHABET, ALPHABET_LEN};
pub use text::{group_text, preprocess_ciphertext, remove_spaces};
