//! Rule engine for Thirty, a solitaire dice game.
//!
//! Each round the player rolls six dice up to three times, picks a set of
//! dice and scores them in one of ten categories. Every category can be used
//! once; the game lasts ten rounds.
//!
//! This crate provides:
//! - Dice, rounds and the game state machine
//! - The score calculator, including the exact-cover search for the
//!   numeric categories
//! - The category ledger
//! - A controller API for presentation layers, with snapshot save/restore
//!
//! Re-rolls use "selected means reroll": after the first roll, only the
//! dice the player has selected are rolled again. This is the opposite of
//! the "selected means keep" convention some versions of the game use,
//! which is available as [`RerollPolicy::Unselected`].
//!
//! # Quick Start
//!
//! ```ignore
//! use thirty_core::{Category, GameConfig, GameController};
//!
//! let mut game = GameController::new(GameConfig::default());
//!
//! game.roll()?;
//! game.toggle_die(0)?;
//! game.toggle_die(3)?;
//!
//! match game.commit_round(Category::Low) {
//!     Ok(outcome) => println!("scored {}", outcome.score),
//!     Err(e) if e.is_user_facing() => println!("{e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

pub mod category;
pub mod controller;
pub mod dice;
pub mod game;
pub mod ledger;
pub mod persist;
pub mod round;
pub mod score;
pub mod testing;

// Primary public API
pub use category::Category;
pub use controller::{CommitOutcome, ControllerError, GameController, Instruction, Phase};
pub use dice::{Die, DieStatus, RandomSource, RngSource};
pub use game::{Game, GameConfig, GameOverRule, MAX_ROUNDS};
pub use ledger::{CategoryLedger, ScoreExport, ScoreRow};
pub use persist::{GameSnapshot, PersistError};
pub use round::{RerollPolicy, Round, DICE_PER_ROUND, MAX_ROLLS};
pub use score::{Score, ScoreCalculator, ScoreError};
pub use testing::{ScriptedDice, TestHarness};
