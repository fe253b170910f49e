//! Game state: the current round, finished rounds and the category ledger.

use crate::category::Category;
use crate::ledger::{CategoryLedger, LedgerError};
use crate::round::{RerollPolicy, Round, RoundError};
use crate::score::Score;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rounds in a standard game, one per category.
pub const MAX_ROUNDS: u8 = 10;

/// When the game ends.
///
/// With the defaults (ten rounds, one category per round) both rules end
/// the game at the same moment. They only differ for shortened games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameOverRule {
    /// Over once `max_rounds` rounds have been scored.
    #[default]
    RoundLimit,
    /// Over once every category has been scored.
    LedgerExhausted,
}

/// Configuration for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Rounds before the game ends under [`GameOverRule::RoundLimit`].
    pub max_rounds: u8,

    /// Which termination rule applies.
    pub game_over_rule: GameOverRule,

    /// Which dice are re-rolled after the first roll.
    pub reroll_policy: RerollPolicy,
}

impl GameConfig {
    pub fn new() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            game_over_rule: GameOverRule::RoundLimit,
            reroll_policy: RerollPolicy::Selected,
        }
    }

    /// Set the round cap. Clamped to `1..=10`; there are only ten categories.
    pub fn with_max_rounds(mut self, rounds: u8) -> Self {
        self.max_rounds = rounds.clamp(1, MAX_ROUNDS);
        self
    }

    pub fn with_game_over_rule(mut self, rule: GameOverRule) -> Self {
        self.game_over_rule = rule;
        self
    }

    pub fn with_reroll_policy(mut self, policy: RerollPolicy) -> Self {
        self.reroll_policy = policy;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors from committing a round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("The game is over")]
    GameOver,
}

/// One play session.
///
/// `round_number() == completed_rounds().len() + 1` always holds; after the
/// final commit the round number is one past the last round played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    config: GameConfig,
    current: Round,
    completed: Vec<Round>,
    ledger: CategoryLedger,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            current: Round::new(),
            completed: Vec::new(),
            ledger: CategoryLedger::new(),
        }
    }

    /// Rebuild a game from a ledger. Each consumed category becomes an
    /// archived round, so the round number follows from the ledger.
    pub fn from_ledger(config: GameConfig, ledger: CategoryLedger) -> Self {
        let completed = ledger
            .consumed()
            .iter()
            .map(|(&category, &score)| {
                let mut round = Round::new();
                // A fresh round cannot already be committed.
                let _ = round.commit(category, score);
                round
            })
            .collect();

        Self {
            config,
            current: Round::new(),
            completed,
            ledger,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn current_round(&self) -> &Round {
        &self.current
    }

    pub fn current_round_mut(&mut self) -> &mut Round {
        &mut self.current
    }

    pub fn completed_rounds(&self) -> &[Round] {
        &self.completed
    }

    pub fn ledger(&self) -> &CategoryLedger {
        &self.ledger
    }

    /// 1-based number of the round being played.
    pub fn round_number(&self) -> usize {
        self.completed.len() + 1
    }

    pub fn is_over(&self) -> bool {
        match self.config.game_over_rule {
            GameOverRule::RoundLimit => {
                self.completed.len() >= usize::from(self.config.max_rounds)
            }
            GameOverRule::LedgerExhausted => self.ledger.is_exhausted(),
        }
    }

    pub fn can_roll(&self) -> bool {
        !self.is_over() && self.current.can_roll()
    }

    /// Score the current round in `category` and start the next one.
    ///
    /// Nothing changes unless every check passes.
    pub fn commit_round(&mut self, category: Category, score: Score) -> Result<(), GameError> {
        if self.is_over() {
            return Err(GameError::GameOver);
        }
        self.ledger.check_available(category)?;
        if self.current.is_committed() {
            return Err(RoundError::AlreadyCommitted.into());
        }

        self.current.commit(category, score)?;
        self.ledger.commit(category, score)?;

        let finished = std::mem::take(&mut self.current);
        self.completed.push(finished);

        info!(
            "round {} scored {} in {}, total {}",
            self.completed.len(),
            score,
            category,
            self.ledger.total_score()
        );
        if self.is_over() {
            info!("game over, final score {}", self.ledger.total_score());
        }

        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
