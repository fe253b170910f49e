//! Testing utilities for the game.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedDice` for exact die faces instead of random ones
//! - `TestHarness` for scripted rounds through the real controller
//! - Assertion helpers for verifying game state

use crate::category::Category;
use crate::controller::{CommitOutcome, ControllerError, GameController};
use crate::dice::{RandomSource, FACES};
use crate::game::GameConfig;
use crate::round::MAX_ROLLS;
use std::collections::VecDeque;

/// A random source that returns scripted faces.
///
/// Queued faces are handed out first. After that the pattern repeats
/// forever. Faces outside `1..=6` are clamped.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    queue: VecDeque<u8>,
    pattern: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Repeat `pattern` forever. An empty pattern always rolls 1.
    pub fn new(pattern: impl IntoIterator<Item = u8>) -> Self {
        Self {
            queue: VecDeque::new(),
            pattern: pattern.into_iter().collect(),
            next: 0,
        }
    }

    /// Hand out these faces before going back to the pattern.
    pub fn push(&mut self, faces: impl IntoIterator<Item = u8>) {
        self.queue.extend(faces);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }
}

impl RandomSource for ScriptedDice {
    fn roll_face(&mut self) -> u8 {
        let face = if let Some(face) = self.queue.pop_front() {
            face
        } else if self.pattern.is_empty() {
            1
        } else {
            let face = self.pattern[self.next % self.pattern.len()];
            self.next += 1;
            face
        };
        face.clamp(1, FACES)
    }
}

/// Test harness for running game scenarios.
pub struct TestHarness {
    /// The controller under test.
    pub controller: GameController<ScriptedDice>,
}

impl TestHarness {
    /// Default rules, dice roll 1 through 6 in order unless scripted.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Self {
            controller: GameController::with_source(config, ScriptedDice::new(1..=FACES)),
        }
    }

    /// Roll, with the next dice rolled showing `faces` in order.
    ///
    /// The first roll of a round consumes six faces; later rolls consume
    /// one per re-rolled die.
    pub fn roll_with(&mut self, faces: impl IntoIterator<Item = u8>) -> Result<(), ControllerError> {
        self.controller.source_mut().push(faces);
        self.controller.roll()
    }

    /// Toggle each listed die.
    pub fn select(&mut self, indices: &[usize]) -> Result<(), ControllerError> {
        for &i in indices {
            self.controller.toggle_die(i)?;
        }
        Ok(())
    }

    pub fn commit(&mut self, category: Category) -> Result<CommitOutcome, ControllerError> {
        self.controller.commit_round(category)
    }

    /// One-roll round: roll `faces`, select `indices`, score in `category`.
    pub fn play_round(
        &mut self,
        faces: [u8; 6],
        indices: &[usize],
        category: Category,
    ) -> Result<CommitOutcome, ControllerError> {
        self.roll_with(faces)?;
        self.select(indices)?;
        self.commit(category)
    }

    pub fn faces(&self) -> Vec<u8> {
        self.controller.dice().iter().map(|d| d.face()).collect()
    }

    pub fn selected_faces(&self) -> Vec<u8> {
        self.controller.game().current_round().selected_faces()
    }

    pub fn round_number(&self) -> usize {
        self.controller.round_number()
    }

    pub fn total_score(&self) -> u32 {
        self.controller.total_score()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the round number.
#[track_caller]
pub fn assert_round(harness: &TestHarness, expected: usize) {
    let actual = harness.round_number();
    assert_eq!(actual, expected, "Expected round {expected}, got {actual}");
}

/// Assert a category is still open.
#[track_caller]
pub fn assert_available(harness: &TestHarness, category: Category) {
    assert!(
        harness.controller.available_categories().contains(&category),
        "Expected {category} to be available"
    );
}

/// Assert a category was scored with `score`.
#[track_caller]
pub fn assert_consumed(harness: &TestHarness, category: Category, score: u32) {
    let actual = harness.controller.game().ledger().score(category);
    assert_eq!(
        actual,
        Some(score),
        "Expected {category} scored {score}, got {actual:?}"
    );
}

/// Assert the structural invariants that must hold after any operation.
#[track_caller]
pub fn assert_invariants(harness: &TestHarness) {
    let game = harness.controller.game();
    let round = game.current_round();

    assert!(
        round.roll_count() <= MAX_ROLLS,
        "Roll count {} exceeds {MAX_ROLLS}",
        round.roll_count()
    );

    for (i, die) in round.dice().iter().enumerate() {
        assert!(
            !die.is_selected() || die.is_rolled(),
            "Die {i} is selected but was never rolled"
        );
        assert!((1..=FACES).contains(&die.face()), "Die {i} shows {}", die.face());
    }

    let ledger = game.ledger();
    for category in Category::ALL {
        let open = ledger.is_available(category);
        let scored = ledger.score(category).is_some();
        assert!(
            open != scored,
            "{category} must be exactly one of available or consumed"
        );
    }

    assert_eq!(game.round_number(), game.completed_rounds().len() + 1);
}
