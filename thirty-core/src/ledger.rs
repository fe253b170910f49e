//! Category bookkeeping: which categories are still open and what the
//! consumed ones scored.

use crate::category::Category;
use crate::score::Score;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Category {0} has already been scored")]
    AlreadyConsumed(Category),

    #[error("Not a scoring category: {0}")]
    NotACategory(Category),
}

/// Tracks the ten categories. Each one is either remaining or consumed,
/// never both and never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLedger {
    remaining: Vec<Category>,
    consumed: BTreeMap<Category, Score>,
}

impl CategoryLedger {
    pub fn new() -> Self {
        Self {
            remaining: Category::ALL.to_vec(),
            consumed: BTreeMap::new(),
        }
    }

    /// Build a ledger from already consumed scores. Everything else is
    /// remaining, in canonical order. Invalid categories are dropped.
    pub fn from_consumed(consumed: impl IntoIterator<Item = (Category, Score)>) -> Self {
        let consumed: BTreeMap<Category, Score> = consumed
            .into_iter()
            .filter(|(c, _)| c.is_valid())
            .collect();
        let remaining = Category::ALL
            .into_iter()
            .filter(|c| !consumed.contains_key(c))
            .collect();
        Self {
            remaining,
            consumed,
        }
    }

    /// Remaining categories in canonical order.
    pub fn available(&self) -> &[Category] {
        &self.remaining
    }

    pub fn is_available(&self, category: Category) -> bool {
        self.remaining.contains(&category)
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    pub fn consumed(&self) -> &BTreeMap<Category, Score> {
        &self.consumed
    }

    pub fn score(&self, category: Category) -> Option<Score> {
        self.consumed.get(&category).copied()
    }

    /// Record `score` for `category` and close it.
    pub fn commit(&mut self, category: Category, score: Score) -> Result<(), LedgerError> {
        self.check_available(category)?;
        self.remaining.retain(|&c| c != category);
        self.consumed.insert(category, score);
        Ok(())
    }

    /// The checks `commit` makes, without mutating anything.
    pub fn check_available(&self, category: Category) -> Result<(), LedgerError> {
        if self.consumed.contains_key(&category) {
            return Err(LedgerError::AlreadyConsumed(category));
        }
        if !self.remaining.contains(&category) {
            return Err(LedgerError::NotACategory(category));
        }
        Ok(())
    }

    pub fn total_score(&self) -> Score {
        self.consumed.values().sum()
    }

    pub fn export_scores(&self) -> ScoreExport {
        ScoreExport {
            scores: self
                .consumed
                .iter()
                .map(|(c, &s)| (c.identifier().to_string(), s))
                .collect(),
            total: self.total_score(),
        }
    }
}

impl Default for CategoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Scores handed to a results display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreExport {
    /// Category identifier to score, for consumed categories only.
    pub scores: BTreeMap<String, Score>,
    pub total: Score,
}

/// One line of a results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub category: Category,
    pub label: String,
    pub score: Score,
}

impl ScoreExport {
    /// All ten categories in canonical order, unscored ones as 0.
    ///
    /// Unknown identifiers in `scores` are ignored.
    pub fn rows(&self) -> Vec<ScoreRow> {
        Category::ALL
            .into_iter()
            .map(|category| ScoreRow {
                category,
                label: category.label(),
                score: self
                    .scores
                    .get(category.identifier())
                    .copied()
                    .unwrap_or(0),
            })
            .collect()
    }
}
