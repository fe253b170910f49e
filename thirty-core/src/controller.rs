//! GameController - the API a presentation layer drives.
//!
//! The controller owns the [`Game`] and the random source for one session.
//! Every "can I do X" flag it exposes is derived from game state on demand,
//! never stored, so it cannot drift from what the operations accept.

use crate::category::Category;
use crate::dice::{Die, DieStatus, RandomSource, RngSource};
use crate::game::{Game, GameConfig, GameError};
use crate::ledger::{LedgerError, ScoreExport};
use crate::round::{RoundError, MAX_ROLLS};
use crate::score::{Score, ScoreCalculator, ScoreError};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from controller operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("The game is over")]
    GameOver,

    #[error("No rolls left this round")]
    RollLimitReached,

    #[error("Roll the dice before selecting them")]
    NotRolledYet,

    #[error("No category selected")]
    NoCategorySelected,

    #[error("Rolls remain; a category can only be scratched after the last roll")]
    RollsRemaining,
}

impl ControllerError {
    /// Whether the player should see this error.
    ///
    /// Score rejections are the player's to fix. Everything else means the
    /// caller ignored a `can_*` flag and is only worth logging.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, ControllerError::Score(_))
    }
}

impl From<GameError> for ControllerError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::Round(e) => ControllerError::Round(e),
            GameError::Ledger(e) => ControllerError::Ledger(e),
            GameError::GameOver => ControllerError::GameOver,
        }
    }
}

/// Where the session is in the round cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// New round, dice not rolled yet.
    AwaitingFirstRoll,
    /// Rolled `rolls` times; more rolls or a commit are allowed.
    Rolling { rolls: u8 },
    /// Out of rolls; only a commit moves the game on.
    AwaitingCategoryCommit,
    /// Terminal.
    GameOver,
}

/// What the player should be told to do next.
///
/// A key for the presentation layer to localize, not text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    RollToStart,
    ScoringIn(Category),
    RoundOver,
    SelectDiceOrScore,
    GameOver,
}

/// Result of a successful commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOutcome {
    /// The round that was scored.
    pub round: usize,
    pub category: Category,
    pub score: Score,
    /// Running total after this commit.
    pub total: Score,
    pub game_over: bool,
}

/// Drives one game session.
pub struct GameController<S = RngSource<StdRng>> {
    pub(crate) game: Game,
    pub(crate) source: S,
    pub(crate) pending_category: Option<Category>,
    pub(crate) score_buttons_enabled: bool,
}

impl GameController {
    /// New session rolling from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_source(config, RngSource::from_entropy())
    }

    /// New session with a reproducible dice sequence.
    pub fn seeded(config: GameConfig, seed: u64) -> Self {
        Self::with_source(config, RngSource::seeded(seed))
    }
}

impl<S: RandomSource> GameController<S> {
    pub fn with_source(config: GameConfig, source: S) -> Self {
        Self {
            game: Game::new(config),
            source,
            pending_category: None,
            score_buttons_enabled: false,
        }
    }

    /// Throw the session away and start over with the same config.
    pub fn restart(&mut self) {
        info!(
            "restarting game, previous total {}",
            self.game.ledger().total_score()
        );
        self.game = Game::new(*self.game.config());
        self.pending_category = None;
        self.score_buttons_enabled = false;
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn config(&self) -> &GameConfig {
        self.game.config()
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn dice(&self) -> &[Die] {
        self.game.current_round().dice()
    }

    pub fn round_number(&self) -> usize {
        self.game.round_number()
    }

    pub fn roll_count(&self) -> u8 {
        self.game.current_round().roll_count()
    }

    pub fn rolls_left(&self) -> u8 {
        self.game.current_round().rolls_left()
    }

    pub fn available_categories(&self) -> &[Category] {
        self.game.ledger().available()
    }

    pub fn total_score(&self) -> Score {
        self.game.ledger().total_score()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_over()
    }

    pub fn pending_category(&self) -> Option<Category> {
        self.pending_category
    }

    pub fn score_buttons_enabled(&self) -> bool {
        self.score_buttons_enabled
    }

    /// Presentation hint, stored and persisted but never interpreted.
    pub fn set_score_buttons_enabled(&mut self, enabled: bool) {
        self.score_buttons_enabled = enabled;
    }

    pub fn phase(&self) -> Phase {
        let round = self.game.current_round();
        if self.game.is_over() {
            Phase::GameOver
        } else if round.roll_count() == 0 {
            Phase::AwaitingFirstRoll
        } else if round.roll_count() >= MAX_ROLLS {
            Phase::AwaitingCategoryCommit
        } else {
            Phase::Rolling {
                rolls: round.roll_count(),
            }
        }
    }

    pub fn instruction(&self) -> Instruction {
        match (self.phase(), self.pending_category) {
            (Phase::GameOver, _) => Instruction::GameOver,
            (Phase::AwaitingFirstRoll, _) => Instruction::RollToStart,
            (_, Some(category)) => Instruction::ScoringIn(category),
            (Phase::AwaitingCategoryCommit, None) => Instruction::RoundOver,
            (Phase::Rolling { .. }, None) => Instruction::SelectDiceOrScore,
        }
    }

    pub fn can_roll(&self) -> bool {
        self.game.can_roll()
    }

    /// A category is picked, at least one die is selected and the game is
    /// still running.
    pub fn can_commit(&self) -> bool {
        !self.game.is_over()
            && self.pending_category.is_some()
            && self.game.current_round().has_selection()
    }

    pub fn has_selection(&self) -> bool {
        self.game.current_round().has_selection()
    }

    pub fn die_status(&self, index: usize) -> Option<DieStatus> {
        let round = self.game.current_round();
        let limit = round.is_roll_limit_reached() || self.game.is_over();
        round.dice().get(index).map(|d| d.status(limit))
    }

    pub fn die_statuses(&self) -> Vec<DieStatus> {
        (0..self.dice().len())
            .filter_map(|i| self.die_status(i))
            .collect()
    }

    pub fn roll(&mut self) -> Result<(), ControllerError> {
        if self.game.is_over() {
            warn!("roll rejected: game is over");
            return Err(ControllerError::GameOver);
        }
        if !self.game.current_round().can_roll() {
            warn!("roll rejected: no rolls left in round {}", self.round_number());
            return Err(ControllerError::RollLimitReached);
        }

        let policy = self.game.config().reroll_policy;
        self.game
            .current_round_mut()
            .roll(&mut self.source, policy);
        Ok(())
    }

    pub fn toggle_die(&mut self, index: usize) -> Result<(), ControllerError> {
        if self.game.is_over() {
            warn!("toggle rejected: game is over");
            return Err(ControllerError::GameOver);
        }
        if self.roll_count() == 0 {
            warn!("toggle rejected: die {index} has not been rolled");
            return Err(ControllerError::NotRolledYet);
        }

        self.game.current_round_mut().toggle_die(index).map_err(|e| {
            warn!("toggle rejected: {e}");
            e
        })?;
        debug!("toggled die {index}: {:?}", self.dice()[index]);
        Ok(())
    }

    /// Pick the category the next `commit_selected` will score.
    pub fn select_category(&mut self, category: Category) -> Result<(), ControllerError> {
        if self.game.is_over() {
            warn!("category selection rejected: game is over");
            return Err(ControllerError::GameOver);
        }
        if let Err(e) = self.game.ledger().check_available(category) {
            warn!("category selection rejected: {e}");
            return Err(e.into());
        }
        self.pending_category = Some(category);
        Ok(())
    }

    pub fn clear_category(&mut self) {
        self.pending_category = None;
    }

    /// What committing the current selection in `category` would score.
    pub fn preview_score(&self, category: Category) -> Result<Score, ScoreError> {
        let faces = self.game.current_round().selected_faces();
        ScoreCalculator::calculate(category, &faces)
    }

    /// Every open category the current selection could be scored in.
    pub fn scoring_options(&self) -> Vec<(Category, Score)> {
        let faces = self.game.current_round().selected_faces();
        ScoreCalculator::valid_categories(self.game.ledger().available(), &faces)
    }

    /// Score the selected dice in the pending category.
    pub fn commit_selected(&mut self) -> Result<CommitOutcome, ControllerError> {
        let category = self
            .pending_category
            .ok_or(ControllerError::NoCategorySelected)?;
        self.commit_round(category)
    }

    /// Score the selected dice in `category`, archive the round and move
    /// on. On any error the session is left exactly as it was.
    pub fn commit_round(&mut self, category: Category) -> Result<CommitOutcome, ControllerError> {
        if self.game.is_over() {
            warn!("commit rejected: game is over");
            return Err(ControllerError::GameOver);
        }
        if let Err(e) = self.game.ledger().check_available(category) {
            warn!("commit rejected: {e}");
            return Err(e.into());
        }

        let score = self.preview_score(category)?;
        let round = self.round_number();
        self.game.commit_round(category, score)?;
        self.pending_category = None;

        Ok(CommitOutcome {
            round,
            category,
            score,
            total: self.total_score(),
            game_over: self.game.is_over(),
        })
    }

    /// Give up on the round: score 0 in `category`.
    ///
    /// Only allowed once the roll limit is reached, so a player whose dice
    /// fit no open category is never stuck.
    pub fn scratch_round(&mut self, category: Category) -> Result<CommitOutcome, ControllerError> {
        if self.game.is_over() {
            warn!("scratch rejected: game is over");
            return Err(ControllerError::GameOver);
        }
        if !self.game.current_round().is_roll_limit_reached() {
            warn!(
                "scratch rejected: {} rolls left in round {}",
                self.rolls_left(),
                self.round_number()
            );
            return Err(ControllerError::RollsRemaining);
        }

        let round = self.round_number();
        self.game.commit_round(category, 0)?;
        self.pending_category = None;

        Ok(CommitOutcome {
            round,
            category,
            score: 0,
            total: self.total_score(),
            game_over: self.game.is_over(),
        })
    }

    pub fn export(&self) -> ScoreExport {
        self.game.ledger().export_scores()
    }
}
