//! Text helpers for working with key-sheet style messages.
//!
//! Radio traffic was written in groups of four or five letters; these helpers
//! go between that form and the plain letter stream the machine consumes.

use crate::alpha::letter_to_signal;

/// Remove all whitespace from a string.
pub fn remove_spaces(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Remove whitespace and convert the remaining letters to signal numbers.
///
/// Returns the first character that is not a letter as the error.
pub fn preprocess_ciphertext(s: &str) -> Result<Vec<usize>, char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| letter_to_signal(c).ok_or(c))
        .collect()
}

/// Split text into space-separated groups of `size` characters.
///
/// A `size` of zero returns the text unchanged.
pub fn group_text(s: &str, size: usize) -> String {
    if size == 0 {
        return s.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    chars
        .chunks(size)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
