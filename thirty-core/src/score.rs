//! Score calculation.
//!
//! `Low` is a simple filter-and-sum. Numeric categories are an exact-cover
//! problem: the selected dice must split into disjoint groups that each sum
//! to the target and together use every die once. The search runs in two
//! phases:
//!
//! 1. Enumerate every subset of die *indices* summing to the target,
//!    pruning once a partial sum passes it. Indices keep duplicate faces
//!    distinct.
//! 2. Backtrack over those candidates for a pairwise-disjoint set covering
//!    all indices.
//!
//! At most six dice are ever selected, so exponential search is fine. The
//! score is the sum of all selected faces whichever grouping is found.

use crate::category::{Category, LOW_MAX_FACE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points scored in one category.
pub type Score = u32;

/// Why a selection cannot be scored in a category.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("No dice selected")]
    NoSelection,

    #[error("Only dice showing 3 or less can be scored as Low")]
    InvalidForLow,

    #[error("Dice cannot be split into groups that each sum to {0}")]
    NoValidPartition(u8),

    #[error("Not a scoring category: {0}")]
    InvalidCategory(Category),
}

/// One exact cover of the selected dice, as groups of faces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub target: u8,
    pub groups: Vec<Vec<u8>>,
}

impl Partition {
    pub fn total(&self) -> Score {
        self.groups.iter().flatten().map(|&f| Score::from(f)).sum()
    }
}

/// Stateless scorer. All functions are pure and deterministic.
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Score `faces` in `category`.
    pub fn calculate(category: Category, faces: &[u8]) -> Result<Score, ScoreError> {
        if !category.is_valid() {
            return Err(ScoreError::InvalidCategory(category));
        }
        if faces.is_empty() {
            return Err(ScoreError::NoSelection);
        }

        match category {
            Category::Low => Self::score_low(faces),
            Category::Numeric(target) => Self::partition(faces, target)
                .map(|p| p.total())
                .ok_or(ScoreError::NoValidPartition(target)),
        }
    }

    fn score_low(faces: &[u8]) -> Result<Score, ScoreError> {
        if faces.iter().any(|&f| f > LOW_MAX_FACE) {
            return Err(ScoreError::InvalidForLow);
        }
        Ok(faces.iter().map(|&f| Score::from(f)).sum())
    }

    /// Find one exact cover of `faces` by groups summing to `target`.
    pub fn partition(faces: &[u8], target: u8) -> Option<Partition> {
        if faces.is_empty() || target == 0 {
            return None;
        }

        let total: u32 = faces.iter().map(|&f| u32::from(f)).sum();
        if total % u32::from(target) != 0 {
            return None;
        }

        let candidates = target_subsets(faces, target);
        let mut covered = vec![false; faces.len()];
        let mut chosen = Vec::new();

        if !cover(&candidates, &mut covered, &mut chosen) {
            return None;
        }

        let groups = chosen
            .into_iter()
            .map(|i| candidates[i].iter().map(|&d| faces[d]).collect())
            .collect();

        Some(Partition { target, groups })
    }

    /// Every category from `available` that `faces` can be scored in,
    /// with the score it would get, in the order given.
    pub fn valid_categories(
        available: &[Category],
        faces: &[u8],
    ) -> Vec<(Category, Score)> {
        available
            .iter()
            .filter_map(|&c| Self::calculate(c, faces).ok().map(|s| (c, s)))
            .collect()
    }
}

/// Phase one: index sets whose faces sum to exactly `target`.
fn target_subsets(faces: &[u8], target: u8) -> Vec<Vec<usize>> {
    fn walk(
        faces: &[u8],
        target: u32,
        start: usize,
        sum: u32,
        current: &mut Vec<usize>,
        out: &mut Vec<Vec<usize>>,
    ) {
        if sum == target && !current.is_empty() {
            out.push(current.clone());
            return;
        }
        for i in start..faces.len() {
            let next = sum + u32::from(faces[i]);
            if next > target {
                continue;
            }
            current.push(i);
            walk(faces, target, i + 1, next, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    walk(faces, u32::from(target), 0, 0, &mut Vec::new(), &mut out);
    out
}

/// Phase two: pick disjoint candidates until every index is covered.
///
/// Always branches on the lowest uncovered index, so each grouping is
/// visited once and the search order is fixed.
fn cover(candidates: &[Vec<usize>], covered: &mut [bool], chosen: &mut Vec<usize>) -> bool {
    let Some(first_open) = covered.iter().position(|c| !c) else {
        return true;
    };

    for (i, subset) in candidates.iter().enumerate() {
        if !subset.contains(&first_open) || subset.iter().any(|&d| covered[d]) {
            continue;
        }

        for &d in subset {
            covered[d] = true;
        }
        chosen.push(i);

        if cover(candidates, covered, chosen) {
            return true;
        }

        chosen.pop();
        for &d in subset {
            covered[d] = false;
        }
    }

    false
}
