//! Enigma rotors (Walzen), reflectors and entry wheels.
//!
//! A rotor has 26 pins on its right (entry) side and 26 contacts on its left
//! side. Each pin is wired to exactly one contact, forming a substitution.
//! Pins and contacts are numbered 0-25 clockwise, 0 being the "top".
//!
//! The alphabet ring clipped around the rotor can be fixed in one of 26
//! positions (the ring setting, Ringstellung). The ring letter visible in the
//! operator window therefore differs from the rotor's mechanical position by
//! the ring setting:
//!
//! ```text
//! position = display - ring_setting   (mod 26)
//! ```
//!
//! The notches that kick the left-hand neighbour are cut into the ring, so
//! notches are expressed as display letters and follow the ring setting.
//! A rotor without notches never steps its neighbour; reflectors and the
//! non-moving fourth rotor of the M4 are modelled that way.

use crate::alpha::{alpha_mod, signal_to_letter, ALPHABET_LEN};
use std::fmt;
use thiserror::Error;

/// A single rotor, reflector or entry wheel.
#[derive(Clone, PartialEq, Eq)]
pub struct Rotor {
    name: String,
    wiring: String,
    ring_setting: usize,
    /// Mechanical position on the spindle (0-25).
    pos: usize,
    /// Right-to-left lookup: pin -> contact.
    entry_map: [usize; ALPHABET_LEN],
    /// Left-to-right lookup: contact -> pin.
    exit_map: [usize; ALPHABET_LEN],
    display_to_pos: [usize; ALPHABET_LEN],
    pos_to_display: [usize; ALPHABET_LEN],
    /// Indexed by display letter.
    notches: [bool; ALPHABET_LEN],
}

impl Rotor {
    /// Build a rotor.
    ///
    /// - `name` - a label such as "I" or "Beta"; only used for display.
    /// - `wiring` - 26 upper-case letters giving the contact each pin is wired
    ///   to, e.g. `"EKMFLGDQVZNTOWYHXUSPAIBRCJ"` for rotor I.
    /// - `ring_setting` - 0-25, where 0 fixes "A" over pin 0.
    /// - `stepping` - the display letters at which a notch sits over the
    ///   pawl, e.g. `"Q"` or `"ZM"`. `None` or an empty string builds a
    ///   rotor that never kicks its neighbour.
    pub fn new(
        name: &str,
        wiring: &str,
        ring_setting: i32,
        stepping: Option<&str>,
    ) -> Result<Self, RotorError> {
        let entry_map = parse_wiring(wiring)?;
        let mut exit_map = [0; ALPHABET_LEN];
        for (pin, &contact) in entry_map.iter().enumerate() {
            exit_map[contact] = pin;
        }

        let mut notches = [false; ALPHABET_LEN];
        for c in stepping.unwrap_or("").chars() {
            if !c.is_ascii_uppercase() {
                return Err(RotorError::InvalidStepping(stepping.unwrap_or("").to_string()));
            }
            notches[c as usize - 'A' as usize] = true;
        }

        let mut rotor = Self {
            name: name.to_string(),
            wiring: wiring.to_string(),
            ring_setting: 0,
            pos: 0,
            entry_map,
            exit_map,
            display_to_pos: [0; ALPHABET_LEN],
            pos_to_display: [0; ALPHABET_LEN],
            notches,
        };
        rotor.set_ring_setting(ring_setting)?;
        rotor.pos = rotor.display_to_pos[0];
        Ok(rotor)
    }

    /// The rotor's label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The wiring string the rotor was built from.
    pub fn wiring(&self) -> &str {
        &self.wiring
    }

    /// Current ring setting (0-25).
    pub fn ring_setting(&self) -> usize {
        self.ring_setting
    }

    /// Change the ring setting.
    ///
    /// The letter in the window is kept; the rotor core turns under the ring.
    pub fn set_ring_setting(&mut self, ring_setting: i32) -> Result<(), RotorError> {
        if !(0..ALPHABET_LEN as i32).contains(&ring_setting) {
            return Err(RotorError::InvalidRingSetting(ring_setting));
        }

        let window = self.pos_to_display[self.pos];
        self.ring_setting = ring_setting as usize;
        for display in 0..ALPHABET_LEN {
            let pos = alpha_mod(display as i32 - ring_setting);
            self.display_to_pos[display] = pos;
            self.pos_to_display[pos] = display;
        }
        self.pos = self.display_to_pos[window];
        Ok(())
    }

    /// Spin the rotor so that `letter` shows in the operator window.
    pub fn set_display(&mut self, letter: char) -> Result<(), RotorError> {
        if !letter.is_ascii_alphabetic() {
            return Err(RotorError::InvalidDisplay(letter));
        }
        let display = letter.to_ascii_uppercase() as usize - 'A' as usize;
        self.pos = self.display_to_pos[display];
        Ok(())
    }

    /// The letter currently showing in the operator window.
    pub fn get_display(&self) -> char {
        signal_to_letter(self.pos_to_display[self.pos])
    }

    /// Mechanical position on the spindle (0-25).
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Simulate a signal entering from the right on pin `n`.
    ///
    /// Returns the contact (0-25) the signal leaves on.
    ///
    /// `n` must be in 0-25; this is checked only in debug builds.
    #[inline]
    pub fn signal_in(&self, n: usize) -> usize {
        debug_assert!(n < ALPHABET_LEN, "signal {} out of range (0-25)", n);
        let pin = (n + self.pos) % ALPHABET_LEN;
        let contact = self.entry_map[pin];
        alpha_mod(contact as i32 - self.pos as i32)
    }

    /// Simulate a signal entering from the left on contact `n`.
    ///
    /// Returns the pin (0-25) the signal leaves on.
    ///
    /// `n` must be in 0-25; this is checked only in debug builds.
    #[inline]
    pub fn signal_out(&self, n: usize) -> usize {
        debug_assert!(n < ALPHABET_LEN, "signal {} out of range (0-25)", n);
        let contact = (n + self.pos) % ALPHABET_LEN;
        let pin = self.exit_map[contact];
        alpha_mod(pin as i32 - self.pos as i32)
    }

    /// True if a notch is lined up with the pawl on the rotor's left side.
    #[inline]
    pub fn notch_over_pawl(&self) -> bool {
        self.notches[self.pos_to_display[self.pos]]
    }

    /// True if the rotor has at least one notch.
    pub fn is_stepping(&self) -> bool {
        self.notches.iter().any(|&n| n)
    }

    /// Advance the rotor one step.
    #[inline]
    pub fn rotate(&mut self) {
        self.pos = (self.pos + 1) % ALPHABET_LEN;
    }
}

impl fmt::Debug for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notches: String = self
            .notches
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n)
            .map(|(i, _)| signal_to_letter(i))
            .collect();

        f.debug_struct("Rotor")
            .field("name", &self.name)
            .field("ring_setting", &self.ring_setting)
            .field("display", &self.get_display())
            .field("notches", &notches)
            .finish()
    }
}

/// Check a wiring string and turn it into a pin -> contact table.
fn parse_wiring(wiring: &str) -> Result<[usize; ALPHABET_LEN], RotorError> {
    let count = wiring.chars().count();
    if count != ALPHABET_LEN {
        return Err(RotorError::InvalidWiringLength(count));
    }

    let mut map = [0; ALPHABET_LEN];
    let mut seen = [false; ALPHABET_LEN];
    for (pin, c) in wiring.chars().enumerate() {
        if !c.is_ascii_uppercase() {
            return Err(RotorError::InvalidWiring(wiring.to_string()));
        }
        let contact = c as usize - 'A' as usize;
        if seen[contact] {
            return Err(RotorError::InvalidWiring(wiring.to_string()));
        }
        seen[contact] = true;
        map[pin] = contact;
    }

    Ok(map)
}

/// Errors raised while building or adjusting a rotor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RotorError {
    #[error("invalid wiring length {0} (expected 26)")]
    InvalidWiringLength(usize),

    #[error("invalid wiring {0:?}: every letter A-Z must appear exactly once")]
    InvalidWiring(String),

    #[error("invalid ring setting {0} (must be 0-25)")]
    InvalidRingSetting(i32),

    #[error("invalid stepping {0:?}: notches must be letters A-Z")]
    InvalidStepping(String),

    #[error("invalid display letter {0:?}")]
    InvalidDisplay(char),

    #[error("unknown rotor type: {0}")]
    UnknownRotorType(String),

    #[error("unknown reflector type: {0}")]
    UnknownReflectorType(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alpha::ALPHABET;
    use std::collections::VecDeque;

    const WIRING: &str = "EKMFLGDQVZNTOWYHXUSPAIBRCJ";

    #[test]
    fn test_bad_wiring() {
        assert_eq!(
            Rotor::new("I", "", 0, None),
            Err(RotorError::InvalidWiringLength(0))
        );
        assert_eq!(
            Rotor::new("I", "ABC", 0, None),
            Err(RotorError::InvalidWiringLength(3))
        );
        assert!(matches!(
            Rotor::new("I", "!\"#$%&'()*+,-./:;<=>?@[\\]^", 0, None),
            Err(RotorError::InvalidWiring(_))
        ));
        assert!(matches!(
            Rotor::new("I", "ABCDABCDABCDABCDABCDABCDAB", 0, None),
            Err(RotorError::InvalidWiring(_))
        ));
        assert!(matches!(
            Rotor::new("I", "ekmflgdqvzntowyhxuspaibrcj", 0, None),
            Err(RotorError::InvalidWiring(_))
        ));
    }

    #[test]
    fn test_ring_setting_bounds() {
        assert!(Rotor::new("I", WIRING, 0, None).is_ok());
        assert!(Rotor::new("I", WIRING, 25, None).is_ok());
        assert_eq!(
            Rotor::new("I", WIRING, -1, None),
            Err(RotorError::InvalidRingSetting(-1))
        );
        assert_eq!(
            Rotor::new("I", WIRING, 26, None),
            Err(RotorError::InvalidRingSetting(26))
        );

        let mut r = Rotor::new("I", WIRING, 3, None).unwrap();
        assert!(r.set_ring_setting(26).is_err());
        assert_eq!(r.ring_setting(), 3, "failed update must not change state");
    }

    #[test]
    fn test_bad_stepping() {
        for stepping in ["0", "-", "A%", "A%14", "q"] {
            assert!(
                matches!(
                    Rotor::new("I", WIRING, 1, Some(stepping)),
                    Err(RotorError::InvalidStepping(_))
                ),
                "stepping {:?} should be rejected",
                stepping
            );
        }
        assert!(Rotor::new("VI", WIRING, 1, Some("ZM")).is_ok());
        assert!(Rotor::new("Beta", WIRING, 1, Some("")).is_ok());
    }

    #[test]
    fn test_display() {
        for ring in 0..26 {
            let mut r = Rotor::new("I", WIRING, ring, None).unwrap();
            for c in ALPHABET.chars() {
                r.set_display(c).unwrap();
                assert_eq!(r.get_display(), c);
            }
        }
    }

    #[test]
    fn test_display_lowercase_and_invalid() {
        let mut r = Rotor::new("I", WIRING, 0, None).unwrap();
        r.set_display('k').unwrap();
        assert_eq!(r.get_display(), 'K');
        assert_eq!(r.set_display('?'), Err(RotorError::InvalidDisplay('?')));
        assert_eq!(r.get_display(), 'K');
    }

    /// Compare against rotating the wiring string itself, for every ring
    /// setting and window letter.
    #[test]
    fn test_wiring() {
        for ring in 0..26i32 {
            let mut rotor = Rotor::new("I", WIRING, ring, None).unwrap();

            for n in 0..26i32 {
                rotor.set_display(signal_to_letter(n as usize)).unwrap();

                let mut deque: VecDeque<char> = WIRING.chars().collect();
                let shift = ring - n;
                if shift >= 0 {
                    deque.rotate_right(shift as usize);
                } else {
                    deque.rotate_left((-shift) as usize);
                }

                for i in 0..26 {
                    let expected = alpha_mod(deque[i] as i32 - 'A' as i32 + ring - n);
                    assert_eq!(rotor.signal_in(i), expected);
                    assert_eq!(rotor.signal_out(expected), i);
                }
            }
        }
    }

    #[test]
    fn test_notches_follow_ring() {
        for ring in 0..26 {
            let mut r = Rotor::new("VI", WIRING, ring, Some("ZM")).unwrap();
            r.set_display('A').unwrap();
            for _ in 0..26 {
                let expected = matches!(r.get_display(), 'Z' | 'M');
                assert_eq!(r.notch_over_pawl(), expected);
                r.rotate();
            }
        }
    }

    #[test]
    fn test_no_notches_never_over_pawl() {
        let mut r = Rotor::new("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT", 0, None).unwrap();
        assert!(!r.is_stepping());
        for _ in 0..26 {
            assert!(!r.notch_over_pawl());
            r.rotate();
        }
    }

    #[test]
    fn test_rotate() {
        for ring in 0..26 {
            let mut r1 = Rotor::new("X", WIRING, ring, None).unwrap();
            let mut r2 = Rotor::new("Y", WIRING, ring, None).unwrap();

            r2.set_display('A').unwrap();
            for c in ALPHABET.chars() {
                r1.set_display(c).unwrap();
                assert_eq!(r1.get_display(), r2.get_display());
                r2.rotate();
            }
            assert_eq!(r2.get_display(), 'A', "26 steps is a full revolution");
        }
    }

    #[test]
    fn test_new_rotor_shows_a() {
        for ring in 0..26 {
            let r = Rotor::new("I", WIRING, ring, None).unwrap();
            assert_eq!(r.get_display(), 'A', "ring setting {}", ring);
            assert_eq!(r.position(), alpha_mod(-ring));
        }
    }

    #[test]
    fn test_set_ring_setting_keeps_display() {
        let mut r = Rotor::new("I", WIRING, 0, None).unwrap();
        r.set_display('C').unwrap();
        assert_eq!(r.position(), 2);

        r.set_ring_setting(2).unwrap();
        assert_eq!(r.get_display(), 'C');
        assert_eq!(r.position(), 0);

        let mut fresh = Rotor::new("I", WIRING, 2, None).unwrap();
        fresh.set_display('C').unwrap();
        assert_eq!(fresh, r);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "out of range")]
    fn test_signal_in_out_of_range() {
        let r = Rotor::new("I", WIRING, 0, None).unwrap();
        r.signal_in(26);
    }
}
