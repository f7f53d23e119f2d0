//! Join of a requested unit with its catalog entry.

use serde::Serialize;

use super::{CatalogUnit, MatchConfidence, RequestedUnit};

/// A requested unit after catalog resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedUnit {
    pub requested: RequestedUnit,

    /// Catalog key the unit resolved to
    pub matched_key: Option<String>,

    /// Resolved datasheet, absent when unresolved
    pub unit: Option<CatalogUnit>,

    pub confidence: MatchConfidence,
}

impl MatchedUnit {
    /// A unit the catalog knows nothing about.
    pub fn unresolved(requested: RequestedUnit) -> Self {
        Self {
            requested,
            matched_key: None,
            unit: None,
            confidence: MatchConfidence::Unresolved,
        }
    }

    /// A unit resolved to `key` with the given confidence.
    pub fn resolved(
        requested: RequestedUnit,
        key: String,
        unit: CatalogUnit,
        confidence: MatchConfidence,
    ) -> Self {
        Self {
            requested,
            matched_key: Some(key),
            unit: Some(unit),
            confidence,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.unit.is_some()
    }

    /// Name as written in the export.
    pub fn display_name(&self) -> &str {
        &self.requested.display_name
    }

    /// Canonical name when resolved, export name otherwise.
    pub fn canonical_name(&self) -> &str {
        match &self.unit {
            Some(unit) if !unit.name.is_empty() => &unit.name,
            _ => &self.requested.display_name,
        }
    }

    pub fn score(&self) -> f64 {
        self.confidence.score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requested() -> RequestedUnit {
        RequestedUnit::new(
            "intercesor squad".to_string(),
            "Intercesor Squad".to_string(),
            80,
        )
    }

    #[test]
    fn test_unresolved_unit() {
        let matched = MatchedUnit::unresolved(requested());

        assert!(!matched.is_resolved());
        assert_eq!(matched.score(), 0.0);
        assert_eq!(matched.canonical_name(), "Intercesor Squad");
    }

    #[test]
    fn test_resolved_unit_names() {
        let matched = MatchedUnit::resolved(
            requested(),
            "intercessor squad".to_string(),
            CatalogUnit::new("Intercessor Squad"),
            MatchConfidence::Approximate,
        );

        assert!(matched.is_resolved());
        assert_eq!(matched.score(), 0.9);
        assert_eq!(matched.display_name(), "Intercesor Squad");
        assert_eq!(matched.canonical_name(), "Intercessor Squad");
    }
}
