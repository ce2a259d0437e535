//! The electromechanical parts of the Enigma.
//!
//! - [`Rotor`] - a wiring wheel with ring setting and notches (also used for
//!   reflectors)
//! - [`Plugboard`] - the self-inverse cable board
//! - [`Machine`] - the assembled device: stepping and the signal path

pub mod enigma;
pub mod plugboard;
pub mod rotor;

pub use enigma::{Machine, MachineError};
pub use plugboard::{Plugboard, PlugboardError, PlugboardStateSaver, WiringHost, MAX_PAIRS};
pub use rotor::{Rotor, RotorError};
