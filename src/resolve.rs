//! Fuzzy resolution of requested units against the catalog.

use std::cmp::Ordering;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::models::{MatchConfidence, MatchedUnit, RequestedUnit};
use crate::normalize::{normalize_name, AliasTable};

/// Minimum similarity for an approximate match.
pub const DEFAULT_CUTOFF: f64 = 0.72;

/// Rank of list sections on the sheet; unknown sections sort last.
const SECTION_ORDER: &[(&str, u8)] = &[
    ("CHARACTERS", 0),
    ("BATTLELINE", 1),
    ("DEDICATED TRANSPORTS", 2),
    ("OTHER DATASHEETS", 3),
];
const UNKNOWN_SECTION_RANK: u8 = 9;

/// Outcome of resolving one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub matched_key: Option<String>,
    pub confidence: MatchConfidence,
}

impl Resolution {
    fn exact(key: &str) -> Self {
        Self {
            matched_key: Some(key.to_string()),
            confidence: MatchConfidence::Exact,
        }
    }

    fn unresolved() -> Self {
        Self {
            matched_key: None,
            confidence: MatchConfidence::Unresolved,
        }
    }
}

/// Normalized Levenshtein ratio in `[0, 1]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Sort rank of a list section label.
pub fn section_rank(section: Option<&str>) -> u8 {
    let Some(section) = section else {
        return UNKNOWN_SECTION_RANK;
    };
    let section = section.trim().to_uppercase();
    SECTION_ORDER
        .iter()
        .find(|(name, _)| *name == section)
        .map_or(UNKNOWN_SECTION_RANK, |(_, rank)| *rank)
}

/// Resolves normalized unit keys to catalog keys.
#[derive(Debug, Clone)]
pub struct FuzzyResolver {
    cutoff: f64,
    aliases: AliasTable,
}

impl Default for FuzzyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CUTOFF, AliasTable::builtin())
    }
}

impl FuzzyResolver {
    pub fn new(cutoff: f64, aliases: AliasTable) -> Self {
        Self { cutoff, aliases }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Resolve one key.
    ///
    /// Aliases are applied first. An exact catalog key gives
    /// [`MatchConfidence::Exact`]; otherwise the most similar key at or above
    /// the cutoff gives [`MatchConfidence::Approximate`]. Ties go to the
    /// lexicographically first key.
    pub fn resolve(&self, key: &str, catalog: &Catalog) -> Resolution {
        let raw = normalize_name(key);
        if raw.is_empty() {
            return Resolution::unresolved();
        }

        let aliased = self.aliases.canonical_key(&raw);
        if catalog.contains_key(&aliased) {
            return Resolution::exact(&aliased);
        }
        if catalog.contains_key(&raw) {
            return Resolution::exact(&raw);
        }

        let mut best: Option<(&str, f64)> = None;
        for candidate in catalog.keys() {
            let score = similarity(&aliased, candidate);
            // strictly greater keeps the first key on ties
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        match best {
            Some((candidate, score)) if score >= self.cutoff => {
                debug!(
                    "Approximate match '{}' -> '{}' ({:.3})",
                    aliased, candidate, score
                );
                Resolution {
                    matched_key: Some(candidate.to_string()),
                    confidence: MatchConfidence::Approximate,
                }
            }
            Some((candidate, score)) => {
                debug!(
                    "No match for '{}' (best '{}' at {:.3} < {:.2})",
                    aliased, candidate, score, self.cutoff
                );
                Resolution::unresolved()
            }
            None => Resolution::unresolved(),
        }
    }

    /// Resolve every requested unit and order the result for display:
    /// by list section, then by descending confidence, keeping export order
    /// for ties.
    pub fn resolve_roster(&self, units: &[RequestedUnit], catalog: &Catalog) -> Vec<MatchedUnit> {
        let mut matched: Vec<MatchedUnit> = units
            .iter()
            .map(|requested| self.resolve_unit(requested, catalog))
            .collect();

        matched.sort_by(|a, b| {
            section_rank(a.requested.section.as_deref())
                .cmp(&section_rank(b.requested.section.as_deref()))
                .then_with(|| b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal))
        });

        let unresolved = matched.iter().filter(|m| !m.is_resolved()).count();
        info!(
            "Resolved {}/{} units ({} not found)",
            matched.len() - unresolved,
            matched.len(),
            unresolved
        );

        matched
    }

    fn resolve_unit(&self, requested: &RequestedUnit, catalog: &Catalog) -> MatchedUnit {
        let resolution = self.resolve(&requested.key, catalog);
        let found = resolution
            .matched_key
            .and_then(|key| catalog.get(&key).cloned().map(|unit| (key, unit)));

        match found {
            Some((key, unit)) => {
                MatchedUnit::resolved(requested.clone(), key, unit, resolution.confidence)
            }
            None => {
                warn!("Unit not found in catalog: {}", requested.display_name);
                MatchedUnit::unresolved(requested.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogLoader, CatalogSource};

    const UNITS: &str = r#"
units:
  - name: Intercessor Squad
  - name: Assault Intercessor Squad
  - name: Captain with Jump Pack
  - name: Rhino
"#;

    fn catalog() -> Catalog {
        CatalogLoader::default()
            .load_sources(vec![CatalogSource::new("units.yaml", UNITS)])
            .unwrap()
    }

    fn requested(name: &str, section: Option<&str>) -> RequestedUnit {
        RequestedUnit::new(normalize_name(name), name.to_string(), 100)
            .with_section(section.map(str::to_string))
    }

    #[test]
    fn test_exact_match_ignores_cutoff() {
        let catalog = catalog();
        for cutoff in [0.1, 0.72, 1.0] {
            let resolver = FuzzyResolver::new(cutoff, AliasTable::new());
            let res = resolver.resolve("intercessor squad", &catalog);
            assert_eq!(res.matched_key.as_deref(), Some("intercessor squad"));
            assert_eq!(res.confidence, MatchConfidence::Exact);
        }
    }

    #[test]
    fn test_single_typo_is_approximate() {
        let res = FuzzyResolver::default().resolve("intercesor squad", &catalog());

        assert_eq!(res.matched_key.as_deref(), Some("intercessor squad"));
        assert_eq!(res.confidence, MatchConfidence::Approximate);
        assert_eq!(res.confidence.score(), 0.9);
    }

    #[test]
    fn test_unrelated_key_is_unresolved() {
        let res = FuzzyResolver::default().resolve("xenos blob", &catalog());

        assert_eq!(res.matched_key, None);
        assert_eq!(res.confidence, MatchConfidence::Unresolved);
        assert_eq!(res.confidence.score(), 0.0);
    }

    #[test]
    fn test_cutoff_above_similarity_rejects() {
        let resolver = FuzzyResolver::new(0.99, AliasTable::new());
        let res = resolver.resolve("intercesor squad", &catalog());
        assert_eq!(res.confidence, MatchConfidence::Unresolved);
    }

    #[test]
    fn test_alias_gives_exact_match() {
        let res = FuzzyResolver::default().resolve("Captain with Jump Packs", &catalog());

        assert_eq!(res.matched_key.as_deref(), Some("captain with jump pack"));
        assert_eq!(res.confidence, MatchConfidence::Exact);
    }

    #[test]
    fn test_tie_prefers_lexicographically_first() {
        let units = r#"
units:
  - name: abcd
  - name: abce
"#;
        let catalog = CatalogLoader::default()
            .load_sources(vec![CatalogSource::new("t.yaml", units)])
            .unwrap();
        let resolver = FuzzyResolver::new(0.5, AliasTable::new());

        assert_eq!(similarity("abcx", "abcd"), similarity("abcx", "abce"));
        let res = resolver.resolve("abcx", &catalog);
        assert_eq!(res.matched_key.as_deref(), Some("abcd"));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let catalog = catalog();
        let resolver = FuzzyResolver::default();
        let first = resolver.resolve("assault intercesor", &catalog);
        for _ in 0..10 {
            assert_eq!(resolver.resolve("assault intercesor", &catalog), first);
        }
    }

    #[test]
    fn test_empty_key_is_unresolved() {
        let res = FuzzyResolver::default().resolve("", &catalog());
        assert_eq!(res, Resolution::unresolved());
    }

    #[test]
    fn test_empty_catalog() {
        let res = FuzzyResolver::default().resolve("rhino", &Catalog::default());
        assert_eq!(res.confidence, MatchConfidence::Unresolved);
    }

    #[test]
    fn test_section_rank() {
        assert_eq!(section_rank(Some("CHARACTERS")), 0);
        assert_eq!(section_rank(Some("battleline")), 1);
        assert_eq!(section_rank(Some("ALLIED UNITS")), 9);
        assert_eq!(section_rank(None), 9);
    }

    #[test]
    fn test_resolve_roster_orders_by_section_then_score() {
        let units = vec![
            requested("Xenos Blob", Some("OTHER DATASHEETS")),
            requested("Rhino", Some("DEDICATED TRANSPORTS")),
            requested("Intercesor Squad", Some("BATTLELINE")),
            requested("Assault Intercessor Squad", Some("OTHER DATASHEETS")),
            requested("Captain with Jump Pack", Some("CHARACTERS")),
        ];

        let matched = FuzzyResolver::default().resolve_roster(&units, &catalog());
        let order: Vec<(&str, MatchConfidence)> = matched
            .iter()
            .map(|m| (m.display_name(), m.confidence))
            .collect();

        assert_eq!(
            order,
            vec![
                ("Captain with Jump Pack", MatchConfidence::Exact),
                ("Intercesor Squad", MatchConfidence::Approximate),
                ("Rhino", MatchConfidence::Exact),
                ("Assault Intercessor Squad", MatchConfidence::Exact),
                ("Xenos Blob", MatchConfidence::Unresolved),
            ]
        );
        assert!(matched[4].unit.is_none());
        assert_eq!(matched[1].matched_key.as_deref(), Some("intercessor squad"));
    }
}
