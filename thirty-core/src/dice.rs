//! Six-sided dice and the random sources that roll them.
//!
//! A [`Die`] never touches a global RNG. Every roll goes through a
//! [`RandomSource`], so tests can script exact faces and play can use any
//! `rand` generator through [`RngSource`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of faces on every die in the game.
pub const FACES: u8 = 6;

/// Anything that can produce a uniformly random die face in `1..=6`.
pub trait RandomSource {
    fn roll_face(&mut self) -> u8;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn roll_face(&mut self) -> u8 {
        (**self).roll_face()
    }
}

impl<S: RandomSource + ?Sized> RandomSource for Box<S> {
    fn roll_face(&mut self) -> u8 {
        (**self).roll_face()
    }
}

/// Adapter that rolls faces from a `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RngSource<StdRng> {
    /// Deterministic source, useful for replays and reproducible tests.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_face(&mut self) -> u8 {
        self.rng.gen_range(1..=FACES)
    }
}

/// A single die: a face value plus the rolled/selected flags.
///
/// `selected` implies `rolled`. The fields are private so that invariant
/// can only be broken from inside the crate. Persisted dice come back
/// through [`GameSnapshot`](crate::persist::GameSnapshot), never by
/// deserializing a `Die` directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Die {
    placeholder: u8,
    face: u8,
    rolled: bool,
    selected: bool,
}

impl Die {
    /// Create an unrolled die showing `placeholder` until its first roll.
    pub fn new(placeholder: u8) -> Self {
        let placeholder = placeholder.clamp(1, FACES);
        Self {
            placeholder,
            face: placeholder,
            rolled: false,
            selected: false,
        }
    }

    pub fn face(&self) -> u8 {
        self.face
    }

    pub fn is_rolled(&self) -> bool {
        self.rolled
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Roll a new face. Rolling always clears the selection.
    pub fn roll<S: RandomSource + ?Sized>(&mut self, source: &mut S) {
        self.face = source.roll_face().clamp(1, FACES);
        self.rolled = true;
        self.selected = false;
    }

    /// Flip the selection. Unrolled dice silently ignore this.
    pub fn toggle_selected(&mut self) {
        if self.rolled {
            self.selected = !self.selected;
        }
    }

    pub fn deselect(&mut self) {
        self.selected = false;
    }

    /// Back to the pre-roll placeholder state.
    pub fn reset(&mut self) {
        self.face = self.placeholder;
        self.rolled = false;
        self.selected = false;
    }

    /// Overwrite the die from persisted values.
    ///
    /// Returns `false` and leaves the die untouched if `face` is not a real
    /// die face. A `selected` flag on an unrolled die is dropped.
    pub(crate) fn restore(&mut self, face: u8, rolled: bool, selected: bool) -> bool {
        if !(1..=FACES).contains(&face) {
            return false;
        }
        self.face = face;
        self.rolled = rolled;
        self.selected = selected && rolled;
        true
    }

    /// How a presentation layer should show this die.
    pub fn status(&self, roll_limit_reached: bool) -> DieStatus {
        if !self.rolled {
            DieStatus::Inactive
        } else if self.selected {
            DieStatus::Selected
        } else if roll_limit_reached {
            DieStatus::Inactive
        } else {
            DieStatus::Active
        }
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.rolled {
            write!(f, "-")
        } else if self.selected {
            write!(f, "[{}]", self.face)
        } else {
            write!(f, "{}", self.face)
        }
    }
}

/// Display hint for a die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieStatus {
    /// Not rolled yet, or the round has no rolls left.
    Inactive,
    /// Picked by the player.
    Selected,
    /// Rolled and available to pick.
    Active,
}
