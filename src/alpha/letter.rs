//! Letters, signal numbers and modulo-26 arithmetic.

/// Number of letters (and wires) in the machine alphabet.
pub const ALPHABET_LEN: usize = 26;

/// The alphabet in signal order.
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Floor modulo 26.
///
/// Unlike `%`, negative dividends wrap into 0-25: `alpha_mod(-1) == 25`.
/// Ring-setting and position offsets are subtracted all over the rotor
/// code, so every wrap goes through here.
#[inline]
pub fn alpha_mod(dividend: i32) -> usize {
    dividend.rem_euclid(ALPHABET_LEN as i32) as usize
}

/// Convert a letter to its signal number (A = 0 ... Z = 25).
///
/// Lower-case letters are accepted. Returns `None` for anything else.
#[inline]
pub fn letter_to_signal(c: char) -> Option<usize> {
    let upper = c.to_ascii_uppercase();
    if upper.is_ascii_uppercase() {
        Some(upper as usize - 'A' as usize)
    } else {
        None
    }
}

/// Convert a signal number to its (upper-case) letter.
///
/// # Panics
/// Panics if `n` is not in 0-25.
#[inline]
pub fn signal_to_letter(n: usize) -> char {
    assert!(n < ALPHABET_LEN, "signal {} out of range (0-25)", n);
    (b'A' + n as u8) as char
}
