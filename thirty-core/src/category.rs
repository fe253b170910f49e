//! Scoring categories.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lowest numeric target.
pub const MIN_TARGET: u8 = 4;
/// Highest numeric target.
pub const MAX_TARGET: u8 = 12;
/// Highest face allowed in [`Category::Low`].
pub const LOW_MAX_FACE: u8 = 3;

/// Error for category identifiers that name nothing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown category: {0}")]
pub struct UnknownCategory(pub String);

/// A scoring rule.
///
/// `Low` sums dice showing at most 3. `Numeric(t)` scores dice that split
/// into groups each summing to `t`. Only targets `4..=12` are real
/// categories; use [`Category::numeric`] to build one safely.
///
/// The derived ordering is the canonical display order: `Low`, then the
/// targets ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Low,
    Numeric(u8),
}

impl Category {
    /// All ten categories in canonical order.
    pub const ALL: [Category; 10] = [
        Category::Low,
        Category::Numeric(4),
        Category::Numeric(5),
        Category::Numeric(6),
        Category::Numeric(7),
        Category::Numeric(8),
        Category::Numeric(9),
        Category::Numeric(10),
        Category::Numeric(11),
        Category::Numeric(12),
    ];

    pub fn numeric(target: u8) -> Option<Category> {
        (MIN_TARGET..=MAX_TARGET)
            .contains(&target)
            .then_some(Category::Numeric(target))
    }

    /// Target sum for numeric categories.
    pub fn target(&self) -> Option<u8> {
        match self {
            Category::Low => None,
            Category::Numeric(t) => Some(*t),
        }
    }

    /// Whether this is one of the ten real categories.
    pub fn is_valid(&self) -> bool {
        match self {
            Category::Low => true,
            Category::Numeric(t) => (MIN_TARGET..=MAX_TARGET).contains(t),
        }
    }

    /// Player-facing label: "Low", "4", ..., "12".
    pub fn label(&self) -> String {
        match self {
            Category::Low => "Low".to_string(),
            Category::Numeric(t) => t.to_string(),
        }
    }

    /// Stable identifier used in snapshots and exports: "LOW", "FOUR", ...
    pub fn identifier(&self) -> &'static str {
        match self {
            Category::Low => "LOW",
            Category::Numeric(4) => "FOUR",
            Category::Numeric(5) => "FIVE",
            Category::Numeric(6) => "SIX",
            Category::Numeric(7) => "SEVEN",
            Category::Numeric(8) => "EIGHT",
            Category::Numeric(9) => "NINE",
            Category::Numeric(10) => "TEN",
            Category::Numeric(11) => "ELEVEN",
            Category::Numeric(12) => "TWELVE",
            Category::Numeric(_) => "INVALID",
        }
    }

    pub fn from_identifier(id: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.identifier() == id)
    }

    /// Parse a display label ("Low", "7").
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Accepts either an identifier or a label, case-insensitively for "low".
impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::from_identifier(&s.to_uppercase())
            .or_else(|| Category::from_label(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identifier())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Category::from_identifier(&id)
            .ok_or_else(|| serde::de::Error::custom(UnknownCategory(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert_eq!(Category::ALL[0], Category::Low);
        assert_eq!(Category::ALL[9], Category::Numeric(12));
    }

    #[test]
    fn test_numeric_bounds() {
        assert_eq!(Category::numeric(4), Some(Category::Numeric(4)));
        assert_eq!(Category::numeric(12), Some(Category::Numeric(12)));
        assert_eq!(Category::numeric(3), None);
        assert_eq!(Category::numeric(13), None);
        assert!(!Category::Numeric(2).is_valid());
    }

    #[test]
    fn test_identifiers_round_trip() {
        for category in Category::ALL {
            assert_eq!(
                Category::from_identifier(category.identifier()),
                Some(category)
            );
        }
        assert_eq!(Category::from_identifier("THIRTEEN"), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Category::Low.label(), "Low");
        assert_eq!(Category::Numeric(11).label(), "11");
        assert_eq!(Category::from_label("9"), Some(Category::Numeric(9)));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("low".parse::<Category>(), Ok(Category::Low));
        assert_eq!("SEVEN".parse::<Category>(), Ok(Category::Numeric(7)));
        assert_eq!(" 10 ".parse::<Category>(), Ok(Category::Numeric(10)));
        assert!("3".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_identifier() {
        let json = serde_json::to_string(&Category::Numeric(8)).unwrap();
        assert_eq!(json, "\"EIGHT\"");

        let parsed: Category = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(parsed, Category::Low);

        assert!(serde_json::from_str::<Category>("\"NOPE\"").is_err());
    }
}
