//! Dice sources.
//!
//! The engine never reaches for randomness on its own: every roll goes through
//! a `DiceSource` handed in by the caller.
//!
//! ## Sources
//!
//! - `SystemDice`: OS cryptographic generator, with a ChaCha8 fallback if the
//!   OS source fails. Used by live games.
//! - `SeededDice`: ChaCha8 from a fixed seed. Same seed, same rolls; its state
//!   can be captured and restored for replays.
//! - `ScriptedDice`: replays a fixed list of faces. Useful in tests and when
//!   re-running a recorded game.
//!
//! ```
//! use parcheesi_engine::core::{DiceSource, SeededDice};
//!
//! let mut a = SeededDice::new(7);
//! let mut b = SeededDice::new(7);
//! assert_eq!(a.roll_die(), b.roll_die());
//! ```

use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

use super::config::DIE_FACES;

/// Anything that can throw a fair six-sided die.
pub trait DiceSource {
    /// Roll one die. Must be uniform over `1..=6`.
    fn roll_die(&mut self) -> u8;
}

impl<T: DiceSource + ?Sized> DiceSource for &mut T {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

impl<T: DiceSource + ?Sized> DiceSource for Box<T> {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

/// Largest byte value that maps evenly onto six faces (252 = 6 * 42).
const UNBIASED_BYTE_LIMIT: u8 = u8::MAX - (u8::MAX % DIE_FACES) - 1;

/// Draw a die from the OS generator.
///
/// Rejection sampling keeps the result uniform. Returns `None` when the OS
/// source reports an error.
fn os_die() -> Option<u8> {
    let mut byte = [0u8; 1];
    loop {
        OsRng.try_fill_bytes(&mut byte).ok()?;
        if byte[0] <= UNBIASED_BYTE_LIMIT {
            return Some(byte[0] % DIE_FACES + 1);
        }
    }
}

/// Production dice: OS cryptographic randomness with a PRNG fallback.
#[derive(Clone, Debug)]
pub struct SystemDice {
    fallback: ChaCha8Rng,
}

impl SystemDice {
    /// Create system dice. The fallback PRNG is seeded from the wall clock.
    #[must_use]
    pub fn new() -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x9E37_79B9_7F4A_7C15);
        Self::with_fallback_seed(seed)
    }

    /// Create system dice with an explicit fallback seed.
    #[must_use]
    pub fn with_fallback_seed(seed: u64) -> Self {
        Self {
            fallback: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SystemDice {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSource for SystemDice {
    fn roll_die(&mut self) -> u8 {
        match os_die() {
            Some(face) => face,
            None => {
                warn!("OS random source unavailable, rolling with fallback PRNG");
                self.fallback.gen_range(1..=DIE_FACES)
            }
        }
    }
}

/// Deterministic dice from a seed.
#[derive(Clone, Debug)]
pub struct SeededDice {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    /// Create seeded dice.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed these dice were created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> SeededDiceState {
        SeededDiceState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &SeededDiceState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl DiceSource for SeededDice {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }
}

/// Serializable `SeededDice` state.
///
/// Uses the ChaCha8 word position, so capture is O(1) regardless of how many
/// dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededDiceState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Dice that replay a fixed sequence of faces, cycling when exhausted.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Create scripted dice.
    ///
    /// Panics if `faces` is empty or contains a value outside `1..=6`.
    #[must_use]
    pub fn new(faces: impl Into<Vec<u8>>) -> Self {
        let faces = faces.into();
        assert!(!faces.is_empty(), "Scripted dice need at least one face");
        assert!(
            faces.iter().all(|f| (1..=DIE_FACES).contains(f)),
            "Scripted faces must be 1-6"
        );
        Self { faces, next: 0 }
    }

    /// Number of dice rolled so far.
    #[must_use]
    pub fn rolled(&self) -> usize {
        self.next
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        let face = self.faces[self.next % self.faces.len()];
        self.next += 1;
        face
    }
}
