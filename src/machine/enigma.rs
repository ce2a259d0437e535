//! The assembled Enigma machine.
//!
//! Each key press first steps the rotors, then runs a signal through:
//!
//! ```text
//! keyboard -> plugboard -> rotors (right to left) -> reflector
//!          -> rotors (left to right) -> plugboard -> lamp
//! ```
//!
//! Supports the three-rotor Enigma I / M3 and the four-rotor M4.

use crate::alpha::{letter_to_signal, signal_to_letter, ALPHABET_LEN};
use crate::data::RotorCatalog;
use crate::machine::plugboard::{Plugboard, PlugboardError, PlugboardStateSaver, WiringHost};
use crate::machine::rotor::{Rotor, RotorError};
use std::fmt;
use thiserror::Error;
use tracing::{debug, trace};

/// An Enigma machine: 3 or 4 rotors, a reflector and a plugboard.
#[derive(Clone, PartialEq, Eq)]
pub struct Machine {
    /// Rotors in physical order, leftmost first. Excludes the reflector.
    rotors: Vec<Rotor>,
    reflector: Rotor,
    plugboard: Plugboard,
    /// Rightmost rotor.
    r_rotor: usize,
    /// Second rotor from the right.
    m_rotor: usize,
    /// Third rotor from the right. The M4's fourth rotor has no pawl.
    l_rotor: usize,
    /// Key presses since construction.
    keystrokes: u64,
}

impl Machine {
    /// Assemble a machine from parts.
    ///
    /// `rotors` are given leftmost first and must number 3 or 4.
    pub fn new(
        rotors: Vec<Rotor>,
        reflector: Rotor,
        plugboard: Plugboard,
    ) -> Result<Self, MachineError> {
        let count = rotors.len();
        if count != 3 && count != 4 {
            return Err(MachineError::InvalidRotorCount(count));
        }

        let machine = Self {
            rotors,
            reflector,
            plugboard,
            r_rotor: count - 1,
            m_rotor: count - 2,
            l_rotor: count - 3,
            keystrokes: 0,
        };
        debug!(machine = %machine, "assembled machine");
        Ok(machine)
    }

    /// Assemble a machine with no plugboard cables.
    pub fn with_default_plugboard(rotors: Vec<Rotor>, reflector: Rotor) -> Result<Self, MachineError> {
        Self::new(rotors, reflector, Plugboard::new())
    }

    /// Assemble a machine the way an operator would from a key sheet.
    ///
    /// - `rotor_types` - type names, leftmost first, e.g. `["II", "IV", "V"]`
    /// - `ring_settings` - one per rotor (0-25), or empty for all zero
    /// - `reflector` - reflector type name, e.g. `"B"`
    /// - `plugboard_settings` - a settings string in either key-sheet syntax
    pub fn from_key_sheet<S: AsRef<str>>(
        catalog: &RotorCatalog,
        rotor_types: &[S],
        ring_settings: &[i32],
        reflector: &str,
        plugboard_settings: &str,
    ) -> Result<Self, MachineError> {
        let reflector = catalog.create_reflector(reflector)?;
        let plugboard = Plugboard::from_settings(plugboard_settings)?;

        let count = rotor_types.len();
        if count != 3 && count != 4 {
            return Err(MachineError::InvalidRotorCount(count));
        }
        if !ring_settings.is_empty() && ring_settings.len() != count {
            return Err(MachineError::RotorRingCountMismatch {
                rotors: count,
                ring_settings: ring_settings.len(),
            });
        }

        let rotors = rotor_types
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let ring = ring_settings.get(i).copied().unwrap_or(0);
                catalog.create_rotor(name.as_ref(), ring)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rotors, reflector, plugboard)
    }

    // ==================== Rotor window ====================

    /// Set the starting position from the letters in the rotor windows.
    ///
    /// One letter per rotor, leftmost first. On error no rotor moves.
    pub fn set_display(&mut self, val: &str) -> Result<(), MachineError> {
        let letters: Vec<char> = val.chars().collect();
        if letters.len() != self.rotors.len() {
            return Err(MachineError::InvalidDisplayLength {
                expected: self.rotors.len(),
                found: letters.len(),
            });
        }
        if let Some(&bad) = letters.iter().find(|c| !c.is_ascii_alphabetic()) {
            return Err(RotorError::InvalidDisplay(bad).into());
        }

        for (rotor, &c) in self.rotors.iter_mut().zip(&letters) {
            rotor.set_display(c)?;
        }
        Ok(())
    }

    /// The letters in the rotor windows, leftmost first.
    pub fn get_display(&self) -> String {
        self.rotors.iter().map(Rotor::get_display).collect()
    }

    // ==================== Components ====================

    /// Number of rotors, not counting the reflector.
    pub fn num_rotors(&self) -> usize {
        self.rotors.len()
    }

    /// The rotor at `index`, 0 being the leftmost.
    pub fn rotor(&self, index: usize) -> Option<&Rotor> {
        self.rotors.get(index)
    }

    /// The reflector.
    pub fn reflector(&self) -> &Rotor {
        &self.reflector
    }

    /// The plugboard.
    pub fn plugboard(&self) -> &Plugboard {
        &self.plugboard
    }

    /// Mutable access to the plugboard, e.g. for hill-climbing.
    pub fn plugboard_mut(&mut self) -> &mut Plugboard {
        &mut self.plugboard
    }

    /// Capture the plugboard wiring; it is restored when the guard drops.
    ///
    /// The guard dereferences to the machine, so trial cables can be tested
    /// by processing text.
    pub fn save_plugboard(&mut self) -> PlugboardStateSaver<'_, Self> {
        PlugboardStateSaver::new(self)
    }

    /// Key presses since the machine was assembled.
    pub fn keystrokes(&self) -> u64 {
        self.keystrokes
    }

    // ==================== Ring settings ====================

    /// Ring setting of the rotor at `index` (0 = leftmost).
    pub fn ring_setting(&self, index: usize) -> Result<usize, MachineError> {
        self.rotors
            .get(index)
            .map(Rotor::ring_setting)
            .ok_or(MachineError::InvalidRotorIndex(index))
    }

    /// Change the ring setting of the rotor at `index` (0 = leftmost).
    pub fn set_ring_setting(&mut self, index: usize, ring_setting: i32) -> Result<(), MachineError> {
        let rotor = self
            .rotors
            .get_mut(index)
            .ok_or(MachineError::InvalidRotorIndex(index))?;
        rotor.set_ring_setting(ring_setting)?;
        Ok(())
    }

    /// Ring settings of all rotors, leftmost first.
    pub fn ring_settings(&self) -> Vec<usize> {
        self.rotors.iter().map(Rotor::ring_setting).collect()
    }

    /// Change all ring settings at once, leftmost first.
    ///
    /// On error no ring setting changes.
    pub fn set_ring_settings(&mut self, settings: &[i32]) -> Result<(), MachineError> {
        if settings.len() != self.rotors.len() {
            return Err(MachineError::RotorRingCountMismatch {
                rotors: self.rotors.len(),
                ring_settings: settings.len(),
            });
        }
        if let Some(&bad) = settings
            .iter()
            .find(|&&s| !(0..ALPHABET_LEN as i32).contains(&s))
        {
            return Err(RotorError::InvalidRingSetting(bad).into());
        }

        for (rotor, &s) in self.rotors.iter_mut().zip(settings) {
            rotor.set_ring_setting(s)?;
        }
        Ok(())
    }

    // ==================== Operation ====================

    /// Press a key and return the lamp that lights.
    pub fn key_press(&mut self, c: char) -> Result<char, MachineError> {
        let n = letter_to_signal(c).ok_or(MachineError::InvalidInput(c))?;
        Ok(signal_to_letter(self.step(n)))
    }

    /// Like [`key_press`](Self::key_press), but in signal numbers (0-25).
    ///
    /// This is the unchecked single-key path; [`process`](Self::process)
    /// returns [`MachineError::InvalidSignal`] instead.
    ///
    /// # Panics
    /// Panics if `n` is not in 0-25.
    pub fn step(&mut self, n: usize) -> usize {
        assert!(n < ALPHABET_LEN, "signal {} out of range (0-25)", n);
        self.step_rotors();
        self.keystrokes += 1;
        self.electric_signal(n)
    }

    /// Process a sequence of signal numbers, one key press each.
    ///
    /// The whole input is checked before any rotor moves, so unlike
    /// [`step`](Self::step) an out-of-range signal is an error, not a panic.
    pub fn process(&mut self, input: &[usize]) -> Result<Vec<usize>, MachineError> {
        if let Some(&bad) = input.iter().find(|&&n| n >= ALPHABET_LEN) {
            return Err(MachineError::InvalidSignal(bad));
        }
        Ok(input.iter().map(|&n| self.step(n)).collect())
    }

    /// Encrypt or decrypt a string of letters (the same operation).
    ///
    /// Letters may be lower case; output is upper case. Anything else,
    /// spaces included, is rejected before any rotor moves.
    pub fn process_text(&mut self, input: &str) -> Result<String, MachineError> {
        let signals = input
            .chars()
            .map(|c| letter_to_signal(c).ok_or(MachineError::InvalidInput(c)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(signals
            .into_iter()
            .map(|n| signal_to_letter(self.step(n)))
            .collect())
    }

    /// Advance the rotors for one key press.
    ///
    /// The rightmost rotor's ratchet is always engaged, so it always moves.
    /// The middle rotor moves if the rightmost rotor's notch is over the
    /// second pawl, or if its own notch is over the third pawl; in the
    /// second case the third pawl pushes both it and its left neighbour,
    /// which is the double step. All notches are read before anything moves.
    fn step_rotors(&mut self) {
        let l_rotate = self.rotors[self.m_rotor].notch_over_pawl();
        let m_rotate = l_rotate || self.rotors[self.r_rotor].notch_over_pawl();

        self.rotors[self.r_rotor].rotate();
        if m_rotate {
            self.rotors[self.m_rotor].rotate();
        }
        if l_rotate {
            self.rotors[self.l_rotor].rotate();
        }

        trace!(m_rotate, l_rotate, display = %self.get_display(), "stepped rotors");
    }

    /// Run a signal from key `n` through the machine and return the lamp.
    fn electric_signal(&self, n: usize) -> usize {
        let mut n = self.plugboard.signal(n);

        for rotor in self.rotors.iter().rev() {
            n = rotor.signal_in(n);
        }

        n = self.reflector.signal_in(n);

        for rotor in &self.rotors {
            n = rotor.signal_out(n);
        }

        self.plugboard.signal(n)
    }

    // ==================== State dumps ====================

    /// Machine state with the plugboard in Heer syntax, e.g.
    /// `"B II/1 IV/20 V/11 AAA AV BS CG DL FU HZ IN KM OW RX"`.
    pub fn army_str(&self) -> String {
        self.state_str(self.plugboard.army_str())
    }

    /// Machine state with the plugboard in Kriegsmarine syntax.
    pub fn navy_str(&self) -> String {
        self.state_str(self.plugboard.navy_str())
    }

    fn state_str(&self, plugboard: String) -> String {
        let mut parts = vec![self.reflector.name().to_string()];
        parts.extend(
            self.rotors
                .iter()
                .map(|r| format!("{}/{}", r.name(), r.ring_setting())),
        );
        parts.push(self.get_display());
        if !plugboard.is_empty() {
            parts.push(plugboard);
        }
        parts.join(" ")
    }
}

impl WiringHost for Machine {
    fn plugboard_mut(&mut self) -> &mut Plugboard {
        &mut self.plugboard
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.army_str())
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("state", &self.army_str())
            .field("keystrokes", &self.keystrokes)
            .finish()
    }
}

/// Errors raised while assembling or operating a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("invalid rotor count {0} (must be 3 or 4)")]
    InvalidRotorCount(usize),

    #[error("{ring_settings} ring settings given for {rotors} rotors")]
    RotorRingCountMismatch { rotors: usize, ring_settings: usize },

    #[error("display needs {expected} letters, got {found}")]
    InvalidDisplayLength { expected: usize, found: usize },

    #[error("invalid input character {0:?}")]
    InvalidInput(char),

    #[error("invalid signal {0} (must be 0-25)")]
    InvalidSignal(usize),

    #[error("no rotor at index {0}")]
    InvalidRotorIndex(usize),

    #[error("rotor error: {0}")]
    Rotor(#[from] RotorError),

    #[error("plugboard error: {0}")]
    Plugboard(#[from] PlugboardError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(rotors: &[&str], rings: &[i32], reflector: &str, plugs: &str) -> Machine {
        Machine::from_key_sheet(&RotorCatalog::historical(), rotors, rings, reflector, plugs)
            .unwrap()
    }

    #[test]
    fn test_double_stepping() {
        let mut m = machine(&["III", "II", "I"], &[], "B", "");
        m.set_display("KDO").unwrap();

        for expected in ["KDP", "KDQ", "KER", "LFS", "LFT", "LFU"] {
            m.key_press('A').unwrap();
            assert_eq!(m.get_display(), expected);
        }
    }

    #[test]
    fn test_simple_encrypt_decrypt() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "");
        m.set_display("AAA").unwrap();
        assert_eq!(m.process_text("AAAAA").unwrap(), "BDZGO");

        m.set_display("AAA").unwrap();
        assert_eq!(m.process_text("BDZGO").unwrap(), "AAAAA");
    }

    #[test]
    fn test_fourth_rotor_never_steps() {
        let mut m = machine(&["Beta", "I", "II", "III"], &[], "B-Thin", "");
        m.set_display("ZZZZ").unwrap();
        for _ in 0..26 * 26 * 3 {
            m.step(0);
        }
        assert!(m.get_display().starts_with('Z'));
        assert_eq!(m.keystrokes(), 26 * 26 * 3);
    }

    #[test]
    fn test_m4_with_beta_at_a_matches_m3() {
        // Beta at A with B-Thin is wired to behave like reflector B.
        let mut m3 = machine(&["I", "II", "III"], &[], "B", "AB CD");
        let mut m4 = machine(&["Beta", "I", "II", "III"], &[], "B-Thin", "AB CD");
        m3.set_display("QEV").unwrap();
        m4.set_display("AQEV").unwrap();

        let text = "THEQUICKBROWNFOXJUMPSOVERTHELAZYDOG";
        assert_eq!(m3.process_text(text).unwrap(), m4.process_text(text).unwrap());
    }

    #[test]
    fn test_rotor_count() {
        let catalog = RotorCatalog::historical();
        let reflector = || catalog.create_reflector("B").unwrap();
        let rotor = || catalog.create_rotor("I", 0).unwrap();

        for count in [0, 1, 2, 5] {
            let rotors = (0..count).map(|_| rotor()).collect();
            assert_eq!(
                Machine::with_default_plugboard(rotors, reflector()),
                Err(MachineError::InvalidRotorCount(count))
            );
        }
        for count in [3, 4] {
            let rotors = (0..count).map(|_| rotor()).collect();
            assert!(Machine::with_default_plugboard(rotors, reflector()).is_ok());
        }
    }

    #[test]
    fn test_key_sheet_errors() {
        let catalog = RotorCatalog::historical();
        assert_eq!(
            Machine::from_key_sheet(&catalog, &["I", "II", "III"], &[1, 2], "B", ""),
            Err(MachineError::RotorRingCountMismatch { rotors: 3, ring_settings: 2 })
        );
        assert_eq!(
            Machine::from_key_sheet(&catalog, &["I", "II"], &[], "B", ""),
            Err(MachineError::InvalidRotorCount(2))
        );
        assert_eq!(
            Machine::from_key_sheet(&catalog, &["I", "II", "IX"], &[], "B", ""),
            Err(MachineError::Rotor(RotorError::UnknownRotorType("IX".into())))
        );
        assert_eq!(
            Machine::from_key_sheet(&catalog, &["I", "II", "III"], &[], "D", ""),
            Err(MachineError::Rotor(RotorError::UnknownReflectorType("D".into())))
        );
        assert!(matches!(
            Machine::from_key_sheet(&catalog, &["I", "II", "III"], &[], "B", "AB AC"),
            Err(MachineError::Plugboard(PlugboardError::DuplicateConnection(0)))
        ));
    }

    #[test]
    fn test_set_display_length() {
        let mut m = machine(&["II", "IV", "V"], &[], "B", "");
        assert_eq!(
            m.set_display("ABCD"),
            Err(MachineError::InvalidDisplayLength { expected: 3, found: 4 })
        );
        assert!(m.set_display("ABC").is_ok());

        let mut m4 = machine(&["Gamma", "II", "IV", "V"], &[], "B-Thin", "");
        assert!(m4.set_display("BCD").is_err());
        assert!(m4.set_display("ABCD").is_ok());
        assert_eq!(m4.get_display(), "ABCD");
    }

    #[test]
    fn test_set_display_is_atomic() {
        let mut m = machine(&["II", "IV", "V"], &[], "B", "");
        m.set_display("XYZ").unwrap();
        assert!(m.set_display("AB3").is_err());
        assert_eq!(m.get_display(), "XYZ");
    }

    #[test]
    fn test_army_and_navy_str() {
        let m = machine(&["II", "IV", "V"], &[1, 20, 11], "B", "AV BS CG DL FU HZ IN KM OW RX");
        assert_eq!(
            m.army_str(),
            "B II/1 IV/20 V/11 AAA AV BS CG DL FU HZ IN KM OW RX"
        );
        assert_eq!(m.to_string(), m.army_str());

        let stecker = "1/20 2/12 4/6 7/10 8/13 14/23 15/16 17/25 18/26 22/24";
        let m = machine(&["Beta", "II", "IV", "I"], &[0, 0, 0, 21], "B-Thin", stecker);
        assert_eq!(
            m.navy_str(),
            format!("B-Thin Beta/0 II/0 IV/0 I/21 AAAA {}", stecker)
        );

        let m = machine(&["I", "II", "III"], &[], "B", "");
        assert_eq!(m.army_str(), "B I/0 II/0 III/0 AAA");
    }

    #[test]
    fn test_fresh_machine_shows_a_whatever_the_rings() {
        let mut fresh = machine(&["II", "IV", "V"], &[1, 20, 11], "B", "AV BS CG");
        assert_eq!(fresh.get_display(), "AAA");

        let mut reset = fresh.clone();
        reset.set_display("AAA").unwrap();
        assert_eq!(fresh.process_text("HELLO").unwrap(), reset.process_text("HELLO").unwrap());

        let m4 = machine(&["Gamma", "I", "II", "III"], &[5, 6, 7, 8], "C-Thin", "");
        assert_eq!(m4.get_display(), "AAAA");
    }

    #[test]
    fn test_ring_change_keeps_windows() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "");
        m.set_display("QEV").unwrap();
        m.set_ring_settings(&[4, 9, 17]).unwrap();
        assert_eq!(m.get_display(), "QEV");
        m.set_ring_setting(1, 0).unwrap();
        assert_eq!(m.get_display(), "QEV");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_step_rejects_bad_signal() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "");
        m.step(26);
    }

    #[test]
    fn test_ring_settings() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "");
        m.set_ring_settings(&[1, 2, 3]).unwrap();
        assert_eq!(m.ring_settings(), vec![1, 2, 3]);
        assert_eq!(m.ring_setting(2), Ok(3));

        assert!(m.set_ring_settings(&[1, 2]).is_err());
        assert!(m.set_ring_settings(&[4, 5, 26]).is_err());
        assert_eq!(m.ring_settings(), vec![1, 2, 3]);

        m.set_ring_setting(0, 25).unwrap();
        assert_eq!(m.ring_setting(0), Ok(25));
        assert_eq!(m.set_ring_setting(3, 0), Err(MachineError::InvalidRotorIndex(3)));
        assert_eq!(m.ring_setting(7), Err(MachineError::InvalidRotorIndex(7)));
    }

    #[test]
    fn test_invalid_input_leaves_state() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "");
        assert_eq!(m.process_text("ABC D"), Err(MachineError::InvalidInput(' ')));
        assert_eq!(m.process(&[1, 2, 26]), Err(MachineError::InvalidSignal(26)));
        assert_eq!(m.get_display(), "AAA");
        assert_eq!(m.keystrokes(), 0);
    }

    #[test]
    fn test_process_matches_process_text() {
        let mut a = machine(&["I", "II", "III"], &[], "B", "");
        let mut b = a.clone();
        let out = a.process(&[0, 0, 0, 0, 0]).unwrap();
        let text: String = out.into_iter().map(signal_to_letter).collect();
        assert_eq!(text, b.process_text("aaaaa").unwrap());
    }

    #[test]
    fn test_no_letter_encrypts_to_itself() {
        let mut m = machine(&["I", "II", "III"], &[3, 7, 11], "C", "QW ER TY");
        for _ in 0..500 {
            for n in 0..26 {
                let mut copy = m.clone();
                assert_ne!(copy.step(n), n);
            }
            m.step(0);
        }
    }

    #[test]
    fn test_save_plugboard_restores() {
        let mut m = machine(&["I", "II", "III"], &[], "B", "AB");
        let before = *m.plugboard();
        {
            let mut trial = m.save_plugboard();
            trial.plugboard_mut().connect(2, 3).unwrap();
            trial.set_display("AAA").unwrap();
            let _ = trial.process_text("HELLO").unwrap();
        }
        assert_eq!(m.plugboard(), &before);
        assert_eq!(m.get_display(), "AAF", "rotor state is not part of the guard");
    }
}
