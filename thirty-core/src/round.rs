//! A single round: six dice, up to three rolls, one commit.

use crate::category::Category;
use crate::dice::{Die, RandomSource};
use crate::score::Score;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rolls allowed per round.
pub const MAX_ROLLS: u8 = 3;

/// Dice owned by every round.
pub const DICE_PER_ROUND: usize = 6;

/// Errors from round operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoundError {
    #[error("Round already committed")]
    AlreadyCommitted,

    #[error("No die at index {0}")]
    DieOutOfRange(usize),
}

/// Which dice a second or third roll re-rolls.
///
/// The first roll of a round always rolls every die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RerollPolicy {
    /// Selected dice are re-rolled; unselected dice are kept.
    #[default]
    Selected,
    /// Selected dice are kept; unselected dice are re-rolled.
    Unselected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Round {
    dice: [Die; DICE_PER_ROUND],
    roll_count: u8,
    committed: Option<(Category, Score)>,
}

impl Round {
    pub fn new() -> Self {
        Self {
            dice: std::array::from_fn(|i| Die::new(i as u8 + 1)),
            roll_count: 0,
            committed: None,
        }
    }

    pub fn dice(&self) -> &[Die] {
        &self.dice
    }

    pub fn roll_count(&self) -> u8 {
        self.roll_count
    }

    pub fn rolls_left(&self) -> u8 {
        MAX_ROLLS.saturating_sub(self.roll_count)
    }

    pub fn committed(&self) -> Option<(Category, Score)> {
        self.committed
    }

    pub fn is_committed(&self) -> bool {
        self.committed.is_some()
    }

    pub fn can_roll(&self) -> bool {
        self.roll_count < MAX_ROLLS && self.committed.is_none()
    }

    pub fn is_roll_limit_reached(&self) -> bool {
        self.roll_count >= MAX_ROLLS
    }

    /// Roll for this round. Does nothing once the limit is reached.
    ///
    /// The first roll rolls all six dice. Later rolls re-roll the dice
    /// picked out by `policy`. Every die is deselected afterwards.
    pub fn roll<S: RandomSource + ?Sized>(&mut self, source: &mut S, policy: RerollPolicy) {
        if !self.can_roll() {
            return;
        }

        let first = self.roll_count == 0;
        for die in self.dice.iter_mut() {
            let reroll = first
                || match policy {
                    RerollPolicy::Selected => die.is_selected(),
                    RerollPolicy::Unselected => !die.is_selected(),
                };
            if reroll {
                die.roll(source);
            }
            die.deselect();
        }

        self.roll_count += 1;
        debug!(
            "roll {}/{}: {:?}",
            self.roll_count,
            MAX_ROLLS,
            self.faces()
        );
    }

    pub fn toggle_die(&mut self, index: usize) -> Result<(), RoundError> {
        if self.committed.is_some() {
            return Err(RoundError::AlreadyCommitted);
        }
        let die = self
            .dice
            .get_mut(index)
            .ok_or(RoundError::DieOutOfRange(index))?;
        die.toggle_selected();
        Ok(())
    }

    pub fn selected_dice(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter().filter(|d| d.is_selected())
    }

    /// Faces of the selected dice, in die order.
    pub fn selected_faces(&self) -> Vec<u8> {
        self.selected_dice().map(Die::face).collect()
    }

    pub fn has_selection(&self) -> bool {
        self.dice.iter().any(Die::is_selected)
    }

    pub fn faces(&self) -> Vec<u8> {
        self.dice.iter().map(Die::face).collect()
    }

    pub fn commit(&mut self, category: Category, score: Score) -> Result<(), RoundError> {
        if self.committed.is_some() {
            return Err(RoundError::AlreadyCommitted);
        }
        self.committed = Some((category, score));
        Ok(())
    }

    pub(crate) fn restore_roll_count(&mut self, count: u8) {
        self.roll_count = count.min(MAX_ROLLS);
    }

    pub(crate) fn die_mut(&mut self, index: usize) -> Option<&mut Die> {
        self.dice.get_mut(index)
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}
