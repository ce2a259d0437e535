//! The plugboard (Steckerbrett).
//!
//! The operator swaps letters before and after the rotors by plugging cables
//! between pairs of sockets. Ten cables were issued with each machine, so at
//! most 10 pairs can be connected. A cable swaps the signal in both
//! directions, which makes the plugboard its own inverse: the same lookup
//! serves the keyboard -> rotor and rotor -> lamp paths.

use crate::alpha::ALPHABET_LEN;
use crate::data::settings;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of cables that can be connected.
pub const MAX_PAIRS: usize = 10;

/// A socket-to-socket wiring table.
pub type Wiring = [usize; ALPHABET_LEN];

/// A plugboard: a self-inverse permutation of the 26 signals.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Plugboard {
    wiring_map: Wiring,
}

impl Plugboard {
    /// Create a plugboard with no cables connected.
    pub fn new() -> Self {
        Self {
            wiring_map: straight_through(),
        }
    }

    /// Create a plugboard from (socket, socket) pairs, each 0-25.
    ///
    /// At most [`MAX_PAIRS`] pairs are allowed and every socket may appear
    /// at most once.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Result<Self, PlugboardError> {
        let mut pb = Self::new();
        pb.construct_wiring(pairs)?;
        Ok(pb)
    }

    /// Create a plugboard from a key-sheet settings string.
    ///
    /// Both the Heer/Luftwaffe letter syntax (`"PO ML IU KJ"`) and the
    /// Kriegsmarine number syntax (`"18/26 17/4 21/6"`, 1-based) are accepted.
    /// An empty string means no cables.
    pub fn from_settings(s: &str) -> Result<Self, PlugboardError> {
        let pairs = settings::parse_plugboard_settings(s)?;
        Self::from_pairs(&pairs)
    }

    fn construct_wiring(&mut self, pairs: &[(usize, usize)]) -> Result<(), PlugboardError> {
        if pairs.len() > MAX_PAIRS {
            return Err(PlugboardError::TooManyPairs(pairs.len()));
        }

        let mut counts = [0u8; ALPHABET_LEN];
        for &(a, b) in pairs {
            if a >= ALPHABET_LEN || b >= ALPHABET_LEN {
                return Err(PlugboardError::InvalidPair(a, b));
            }
            counts[a] += 1;
            counts[b] += 1;
        }

        if let Some(dup) = counts.iter().position(|&n| n > 1) {
            return Err(PlugboardError::DuplicateConnection(dup));
        }

        for &(a, b) in pairs {
            self.wiring_map[a] = b;
            self.wiring_map[b] = a;
        }
        Ok(())
    }

    /// Simulate a signal entering on wire `n`. Direction does not matter.
    ///
    /// # Panics
    /// Panics if `n` is not in 0-25.
    #[inline]
    pub fn signal(&self, n: usize) -> usize {
        self.wiring_map[n]
    }

    /// The connected pairs, lower socket first, sorted.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        (0..ALPHABET_LEN)
            .filter_map(|i| {
                let j = self.wiring_map[i];
                (i < j).then_some((i, j))
            })
            .collect()
    }

    /// Number of cables in use.
    pub fn cable_count(&self) -> usize {
        self.pairs().len()
    }

    /// Settings in Heer/Luftwaffe syntax, e.g. `"AV BS CG"`.
    pub fn army_str(&self) -> String {
        settings::army_settings(&self.pairs())
    }

    /// Settings in Kriegsmarine syntax, e.g. `"1/22 2/19 3/7"`.
    pub fn navy_str(&self) -> String {
        settings::navy_settings(&self.pairs())
    }

    // ==================== Hill-climbing support ====================

    /// A copy of the internal wiring table.
    pub fn wiring(&self) -> Wiring {
        self.wiring_map
    }

    /// Replace the internal wiring table.
    ///
    /// The table must be a self-inverse permutation with at most
    /// [`MAX_PAIRS`] swapped pairs.
    pub fn set_wiring(&mut self, wiring: Wiring) -> Result<(), PlugboardError> {
        let mut swapped = 0;
        for (i, &j) in wiring.iter().enumerate() {
            if j >= ALPHABET_LEN || wiring[j] != i {
                return Err(PlugboardError::InvalidWiring);
            }
            if i < j {
                swapped += 1;
            }
        }
        if swapped > MAX_PAIRS {
            return Err(PlugboardError::TooManyPairs(swapped));
        }

        self.wiring_map = wiring;
        Ok(())
    }

    // Queries answer false for sockets outside 0-25; mutators reject them
    // with `InvalidPair`.

    /// True if socket `n` has a cable in it.
    pub fn is_wired(&self, n: usize) -> bool {
        self.wiring_map.get(n).is_some_and(|&m| m != n)
    }

    /// True if socket `n` exists and is empty.
    pub fn is_free(&self, n: usize) -> bool {
        self.wiring_map.get(n).is_some_and(|&m| m == n)
    }

    /// True if sockets `x` and `y` are joined by a cable.
    pub fn is_connected(&self, x: usize, y: usize) -> bool {
        x != y && self.wiring_map.get(x) == Some(&y) && self.wiring_map.get(y) == Some(&x)
    }

    /// Pull the cable out of socket `n` (both ends).
    pub fn disconnect(&mut self, n: usize) -> Result<(), PlugboardError> {
        if n >= ALPHABET_LEN {
            return Err(PlugboardError::InvalidPair(n, n));
        }
        let other = self.wiring_map[n];
        self.wiring_map[other] = other;
        self.wiring_map[n] = n;
        Ok(())
    }

    /// Connect `x` to `y`, removing any cables already in either socket.
    ///
    /// Fails if the new cable would be the eleventh.
    pub fn connect(&mut self, x: usize, y: usize) -> Result<(), PlugboardError> {
        if x >= ALPHABET_LEN || y >= ALPHABET_LEN {
            return Err(PlugboardError::InvalidPair(x, y));
        }
        if x == y {
            // Connecting a socket to itself just empties it.
            return self.disconnect(x);
        }
        if self.is_connected(x, y) {
            return Ok(());
        }

        let freed = [x, y].iter().filter(|&&n| self.is_wired(n)).count();
        if self.cable_count() + 1 - freed > MAX_PAIRS {
            return Err(PlugboardError::TooManyPairs(MAX_PAIRS + 1));
        }

        let m = self.wiring_map[x];
        let n = self.wiring_map[y];
        self.wiring_map[m] = m;
        self.wiring_map[n] = n;

        self.wiring_map[x] = y;
        self.wiring_map[y] = x;
        Ok(())
    }

    /// Remove every cable.
    pub fn unplug_all(&mut self) {
        self.wiring_map = straight_through();
    }

    /// Capture the wiring; it is restored when the returned guard drops.
    pub fn save_state(&mut self) -> PlugboardStateSaver<'_, Self> {
        PlugboardStateSaver::new(self)
    }
}

impl Default for Plugboard {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for Plugboard {
    type Err = PlugboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_settings(s)
    }
}

impl fmt::Display for Plugboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.army_str())
    }
}

impl fmt::Debug for Plugboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugboard")
            .field("pairs", &self.army_str())
            .finish()
    }
}

fn straight_through() -> Wiring {
    let mut map = [0; ALPHABET_LEN];
    for (i, slot) in map.iter_mut().enumerate() {
        *slot = i;
    }
    map
}

// ============================================================================
// Scoped save/restore
// ============================================================================

/// Anything that owns a plugboard whose wiring can be saved and restored.
pub trait WiringHost {
    /// The plugboard owned by this host.
    fn plugboard_mut(&mut self) -> &mut Plugboard;
}

impl WiringHost for Plugboard {
    fn plugboard_mut(&mut self) -> &mut Plugboard {
        self
    }
}

/// Saves a plugboard's wiring on creation and restores it on drop.
///
/// The guard dereferences to its host, so trial connections can be made (and
/// text run through a whole machine) while it is alive. Whatever the exit
/// path, including `?` and panics, the original wiring comes back.
pub struct PlugboardStateSaver<'a, H: WiringHost> {
    host: &'a mut H,
    saved: Wiring,
}

impl<'a, H: WiringHost> PlugboardStateSaver<'a, H> {
    /// Capture the host's current wiring.
    pub fn new(host: &'a mut H) -> Self {
        let saved = host.plugboard_mut().wiring();
        Self { host, saved }
    }

    /// The wiring that will be restored.
    pub fn saved_wiring(&self) -> Wiring {
        self.saved
    }
}

impl<H: WiringHost> Deref for PlugboardStateSaver<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.host
    }
}

impl<H: WiringHost> DerefMut for PlugboardStateSaver<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.host
    }
}

impl<H: WiringHost> Drop for PlugboardStateSaver<'_, H> {
    fn drop(&mut self) {
        self.host.plugboard_mut().wiring_map = self.saved;
    }
}

/// Errors raised while configuring a plugboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlugboardError {
    #[error("too many pairs: {0} (at most 10 cables)")]
    TooManyPairs(usize),

    #[error("invalid wiring pair ({0}, {1}): sockets must be 0-25")]
    InvalidPair(usize, usize),

    #[error("duplicate connection on socket {0}")]
    DuplicateConnection(usize),

    #[error("invalid settings string: {0}")]
    InvalidSettings(String),

    #[error("wiring table is not a self-inverse permutation")]
    InvalidWiring,
}
