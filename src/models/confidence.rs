//! Confidence levels for catalog name resolution.

use serde::{Deserialize, Serialize};

/// How a requested unit was reconciled against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    /// Normalized key present verbatim in the catalog
    Exact,
    /// Closest catalog key at or above the similarity cutoff
    Approximate,
    /// Nothing in the catalog was close enough
    #[default]
    Unresolved,
}

impl MatchConfidence {
    /// Numeric match score shown to the player.
    pub fn score(&self) -> f64 {
        match self {
            MatchConfidence::Exact => 1.0,
            MatchConfidence::Approximate => 0.9,
            MatchConfidence::Unresolved => 0.0,
        }
    }

    /// Returns true if a catalog entry was attached.
    pub fn is_resolved(&self) -> bool {
        matches!(self, MatchConfidence::Exact | MatchConfidence::Approximate)
    }

    /// Returns true if the player should double-check the match.
    pub fn needs_review(&self) -> bool {
        !matches!(self, MatchConfidence::Exact)
    }
}

impl std::fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchConfidence::Exact => write!(f, "exact"),
            MatchConfidence::Approximate => write!(f, "approximate"),
            MatchConfidence::Unresolved => write!(f, "unresolved"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_scores() {
        assert_eq!(MatchConfidence::Exact.score(), 1.0);
        assert_eq!(MatchConfidence::Approximate.score(), 0.9);
        assert_eq!(MatchConfidence::Unresolved.score(), 0.0);
    }

    #[test]
    fn test_confidence_resolved() {
        assert!(MatchConfidence::Exact.is_resolved());
        assert!(MatchConfidence::Approximate.is_resolved());
        assert!(!MatchConfidence::Unresolved.is_resolved());
    }

    #[test]
    fn test_confidence_needs_review() {
        assert!(!MatchConfidence::Exact.needs_review());
        assert!(MatchConfidence::Approximate.needs_review());
        assert!(MatchConfidence::Unresolved.needs_review());
    }

    #[test]
    fn test_confidence_serialization() {
        let json = serde_json::to_string(&MatchConfidence::Approximate).unwrap();
        assert_eq!(json, "\"approximate\"");

        let deserialized: MatchConfidence = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, MatchConfidence::Approximate);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(format!("{}", MatchConfidence::Exact), "exact");
        assert_eq!(format!("{}", MatchConfidence::Unresolved), "unresolved");
    }
}
