//! Plugboard settings strings.
//!
//! Two key-sheet syntaxes are supported:
//!
//! ```text
//! PO ML IU KJ NH YT GB VF RE DC               ; Heer / Luftwaffe (letters)
//! 18/26 17/4 21/6 3/16 19/14 22/7 8/1 12/25   ; Kriegsmarine (numbers, 1-26)
//! ```
//!
//! The Kriegsmarine form is recognised by the presence of a `/`.

use crate::alpha::{letter_to_signal, signal_to_letter};
use crate::machine::PlugboardError;

/// Parse a settings string into zero-based socket pairs.
///
/// Only the syntax is checked here; pair limits and duplicate sockets are
/// the plugboard's business.
pub fn parse_plugboard_settings(s: &str) -> Result<Vec<(usize, usize)>, PlugboardError> {
    if s.contains('/') {
        s.split_whitespace().map(parse_navy_pair).collect()
    } else {
        s.split_whitespace().map(parse_army_pair).collect()
    }
}

fn parse_army_pair(token: &str) -> Result<(usize, usize), PlugboardError> {
    let invalid = || PlugboardError::InvalidSettings(token.to_string());

    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) => {
            let m = letter_to_signal(a).ok_or_else(invalid)?;
            let n = letter_to_signal(b).ok_or_else(invalid)?;
            Ok((m, n))
        }
        _ => Err(invalid()),
    }
}

fn parse_navy_pair(token: &str) -> Result<(usize, usize), PlugboardError> {
    let invalid = || PlugboardError::InvalidSettings(token.to_string());

    let (left, right) = token.split_once('/').ok_or_else(invalid)?;
    let m: usize = left.parse().map_err(|_| invalid())?;
    let n: usize = right.parse().map_err(|_| invalid())?;
    if m == 0 || n == 0 {
        return Err(invalid());
    }
    Ok((m - 1, n - 1))
}

/// Render pairs in Heer/Luftwaffe syntax.
pub fn army_settings(pairs: &[(usize, usize)]) -> String {
    pairs
        .iter()
        .map(|&(a, b)| format!("{}{}", signal_to_letter(a), signal_to_letter(b)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render pairs in Kriegsmarine syntax.
pub fn navy_settings(pairs: &[(usize, usize)]) -> String {
    pairs
        .iter()
        .map(|&(a, b)| format!("{}/{}", a + 1, b + 1))
        .collect::<Vec<_>>()
        .join(" ")
}
