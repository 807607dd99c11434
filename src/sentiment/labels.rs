// The five-point star scale and its closed label table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Classifier labels in ascending order of positivity.
pub const STAR_LABELS: [&str; 5] = ["1 star", "2 stars", "3 stars", "4 stars", "5 stars"];

const STAR_GLYPH: &str = "⭐";

/// An ordinal sentiment rating from 1 (most negative) to 5 (most positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarRating(u8);

impl StarRating {
    pub const MAX: StarRating = StarRating(5);

    pub fn new(stars: u8) -> Option<Self> {
        (1..=5).contains(&stars).then_some(StarRating(stars))
    }

    /// Map a classifier label to its rating. Anything outside the table is a
    /// broken classifier, never a default rating.
    pub fn from_label(label: &str) -> EngineResult<Self> {
        match label {
            "1 star" => Ok(StarRating(1)),
            "2 stars" => Ok(StarRating(2)),
            "3 stars" => Ok(StarRating(3)),
            "4 stars" => Ok(StarRating(4)),
            "5 stars" => Ok(StarRating(5)),
            other => Err(EngineError::ClassifierContractViolation {
                label: other.to_string(),
            }),
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn label(&self) -> &'static str {
        STAR_LABELS[usize::from(self.0 - 1)]
    }

    /// The rating as repeated star glyphs.
    pub fn glyphs(&self) -> String {
        star_glyphs(self.0)
    }
}

impl TryFrom<u8> for StarRating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StarRating::new(value).ok_or_else(|| format!("star rating out of range: {value}"))
    }
}

impl From<StarRating> for u8 {
    fn from(rating: StarRating) -> u8 {
        rating.0
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.0)
    }
}

/// Render `count` star glyphs. Purely cosmetic.
pub fn star_glyphs(count: u8) -> String {
    STAR_GLYPH.repeat(usize::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_table_is_exhaustive_and_ordered() {
        for (i, label) in STAR_LABELS.iter().enumerate() {
            let rating = StarRating::from_label(label).unwrap();
            assert_eq!(usize::from(rating.value()), i + 1);
            assert_eq!(rating.label(), *label);
        }
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(StarRating::new(0).is_none());
        assert!(StarRating::new(6).is_none());
        assert_eq!(StarRating::new(3).unwrap().value(), 3);
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<StarRating>("9").is_err());
        let r: StarRating = serde_json::from_str("2").unwrap();
        assert_eq!(r.value(), 2);
    }
}
