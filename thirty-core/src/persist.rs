//! Session snapshots for save/restore.
//!
//! A [`GameSnapshot`] is the flat record a host keeps across process death.
//! Restoring is forgiving: bad records are logged and skipped, and the rest
//! of the snapshot still loads.

use crate::category::Category;
use crate::controller::GameController;
use crate::dice::{Die, RandomSource};
use crate::game::{Game, GameConfig};
use crate::ledger::CategoryLedger;
use crate::round::{DICE_PER_ROUND, MAX_ROLLS};
use crate::score::Score;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from snapshot encoding and file access.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted state of one session.
///
/// Numbers are signed and categories are plain strings so that a damaged
/// record still decodes and can be repaired during restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSnapshot {
    /// Category identifier to score.
    pub consumed_scores: BTreeMap<String, i64>,

    /// Open category identifiers, in display order.
    pub remaining_categories: Vec<String>,

    pub rolls_left_in_round: i64,

    pub round_number: i64,

    pub dice: Vec<DieSnapshot>,

    /// Presentation hint, passed through untouched.
    pub score_buttons_enabled: bool,
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            consumed_scores: BTreeMap::new(),
            remaining_categories: Category::ALL
                .iter()
                .map(|c| c.identifier().to_string())
                .collect(),
            rolls_left_in_round: i64::from(MAX_ROLLS),
            round_number: 1,
            dice: Vec::new(),
            score_buttons_enabled: false,
        }
    }
}

/// Persisted state of one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DieSnapshot {
    pub face: i64,
    pub selected: bool,
    pub rolled: bool,
}

impl Default for DieSnapshot {
    fn default() -> Self {
        Self {
            face: 1,
            selected: false,
            rolled: false,
        }
    }
}

impl From<&Die> for DieSnapshot {
    fn from(die: &Die) -> Self {
        Self {
            face: i64::from(die.face()),
            selected: die.is_selected(),
            rolled: die.is_rolled(),
        }
    }
}

impl GameSnapshot {
    pub fn to_json(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = self.to_json()?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Decode the consumed scores, skipping unknown categories and scores
    /// that do not fit.
    fn consumed(&self) -> Vec<(Category, Score)> {
        let mut consumed = Vec::new();
        for (id, &score) in &self.consumed_scores {
            let Some(category) = Category::from_identifier(id) else {
                warn!("restore: skipping unknown category {id:?}");
                continue;
            };
            let Ok(score) = Score::try_from(score) else {
                warn!("restore: skipping out-of-range score {score} for {category}");
                continue;
            };
            consumed.push((category, score));
        }
        consumed
    }

    /// Log where the remaining list disagrees with the consumed scores.
    /// The consumed scores are authoritative.
    fn check_remaining(&self, ledger: &CategoryLedger) {
        for id in &self.remaining_categories {
            match Category::from_identifier(id) {
                None => warn!("restore: skipping unknown category {id:?}"),
                Some(c) if !ledger.is_available(c) => {
                    warn!("restore: {c} listed as remaining but already scored")
                }
                Some(_) => {}
            }
        }
        for category in ledger.available() {
            if !self
                .remaining_categories
                .iter()
                .any(|id| id == category.identifier())
            {
                warn!("restore: {category} missing from remaining, keeping it open");
            }
        }
    }
}

impl<S: RandomSource> GameController<S> {
    /// Capture the session.
    pub fn snapshot(&self) -> GameSnapshot {
        let ledger = self.game.ledger();
        GameSnapshot {
            consumed_scores: ledger
                .consumed()
                .iter()
                .map(|(c, &s)| (c.identifier().to_string(), i64::from(s)))
                .collect(),
            remaining_categories: ledger
                .available()
                .iter()
                .map(|c| c.identifier().to_string())
                .collect(),
            rolls_left_in_round: i64::from(self.rolls_left()),
            round_number: self.round_number() as i64,
            dice: self.dice().iter().map(DieSnapshot::from).collect(),
            score_buttons_enabled: self.score_buttons_enabled,
        }
    }

    /// Rebuild a session from a snapshot.
    ///
    /// Round history is rebuilt from the consumed scores, so the round
    /// number follows from the ledger; a different persisted round number
    /// is logged and ignored. The roll count is clamped into range and
    /// malformed dice keep their fresh state. With no rolls left to account
    /// for, the persisted dice are ignored entirely.
    pub fn restore(config: GameConfig, source: S, snapshot: &GameSnapshot) -> Self {
        let ledger = CategoryLedger::from_consumed(snapshot.consumed());
        snapshot.check_remaining(&ledger);

        let mut game = Game::from_ledger(config, ledger);
        if snapshot.round_number != game.round_number() as i64 {
            warn!(
                "restore: round number {} disagrees with {} scored categories, using {}",
                snapshot.round_number,
                game.completed_rounds().len(),
                game.round_number()
            );
        }

        let round = game.current_round_mut();
        let roll_count = (i64::from(MAX_ROLLS) - snapshot.rolls_left_in_round)
            .clamp(0, i64::from(MAX_ROLLS));
        round.restore_roll_count(roll_count as u8);

        let dice: &[DieSnapshot] = if roll_count == 0 {
            if snapshot.dice.iter().any(|d| d.rolled || d.selected) {
                warn!("restore: dice marked rolled before any roll, keeping fresh dice");
            }
            &[]
        } else {
            &snapshot.dice
        };

        for (i, saved) in dice.iter().enumerate() {
            if i >= DICE_PER_ROUND {
                warn!("restore: ignoring extra die at index {i}");
                continue;
            }
            let restored = u8::try_from(saved.face)
                .ok()
                .zip(round.die_mut(i))
                .is_some_and(|(face, die)| die.restore(face, saved.rolled, saved.selected));
            if !restored {
                warn!("restore: skipping die {i} with face {}", saved.face);
            }
        }

        Self {
            game,
            source,
            pending_category: None,
            score_buttons_enabled: snapshot.score_buttons_enabled,
        }
    }
}
