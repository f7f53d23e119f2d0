//! Known names used to recognise metadata lines in an export.

use serde::{Deserialize, Serialize};

const FACTIONS: &[&str] = &[
    "Space Marines",
    "Adeptus Astartes",
    "Blood Angels",
    "Dark Angels",
    "Space Wolves",
    "Black Templars",
    "Deathwatch",
    "Grey Knights",
    "Adepta Sororitas",
    "Adeptus Custodes",
    "Adeptus Mechanicus",
    "Astra Militarum",
    "Imperial Knights",
    "Agents of the Imperium",
    "Chaos Space Marines",
    "Death Guard",
    "Thousand Sons",
    "World Eaters",
    "Emperor's Children",
    "Chaos Daemons",
    "Chaos Knights",
    "Aeldari",
    "Drukhari",
    "Tyranids",
    "Genestealer Cults",
    "Leagues of Votann",
    "Necrons",
    "Orks",
    "T'au Empire",
];

const CHAPTERS: &[&str] = &[
    "Ultramarines",
    "Iron Hands",
    "Salamanders",
    "Imperial Fists",
    "Raven Guard",
    "White Scars",
    "Crimson Fists",
    "Flesh Tearers",
];

const DETACHMENTS: &[&str] = &[
    "Gladius Task Force",
    "Anvil Siege Force",
    "Ironstorm Spearhead",
    "Firestorm Assault Force",
    "Stormlance Task Force",
    "Vanguard Spearhead",
    "1st Company Task Force",
    "Librarius Conclave",
    "Blade of Ultramar",
    "Forgefather's Seekers",
    "Emperor's Shield",
];

const FORMATS: &[&str] = &["Combat Patrol", "Incursion", "Strike Force", "Onslaught"];

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Faction, chapter, detachment and format names the parser recognises.
///
/// Lists missing from a deserialized value keep their built-in contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportVocabulary {
    pub factions: Vec<String>,
    pub chapters: Vec<String>,
    pub detachments: Vec<String>,
    pub formats: Vec<String>,
}

impl Default for ExportVocabulary {
    fn default() -> Self {
        Self {
            factions: owned(FACTIONS),
            chapters: owned(CHAPTERS),
            detachments: owned(DETACHMENTS),
            formats: owned(FORMATS),
        }
    }
}

/// Longest entry of `names` contained in `line`.
fn longest_contained<'a>(names: &'a [String], line: &str) -> Option<&'a str> {
    names
        .iter()
        .filter(|name| !name.is_empty() && line.contains(name.as_str()))
        .max_by_key(|name| name.len())
        .map(String::as_str)
}

impl ExportVocabulary {
    pub fn find_faction(&self, line: &str) -> Option<&str> {
        longest_contained(&self.factions, line)
    }

    pub fn find_chapter(&self, line: &str) -> Option<&str> {
        longest_contained(&self.chapters, line)
    }

    pub fn find_detachment(&self, line: &str) -> Option<&str> {
        longest_contained(&self.detachments, line)
    }

    /// Canonical spelling of a format name, compared case-insensitively.
    pub fn format_name(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.formats
            .iter()
            .find(|f| f.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    /// Whether the whole line is a faction, chapter or detachment name.
    pub fn is_roster_name(&self, line: &str) -> bool {
        let line = line.trim();
        self.factions
            .iter()
            .chain(self.chapters.iter())
            .chain(self.detachments.iter())
            .any(|name| name.eq_ignore_ascii_case(line))
    }

    /// Add a detachment name if not already known.
    pub fn add_detachment(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.detachments.iter().any(|d| d.eq_ignore_ascii_case(name)) {
            return;
        }
        self.detachments.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_faction_wins() {
        let vocab = ExportVocabulary::default();
        assert_eq!(vocab.find_faction("Chaos Space Marines"), Some("Chaos Space Marines"));
        assert_eq!(vocab.find_faction("Space Marines"), Some("Space Marines"));
        assert_eq!(vocab.find_faction("Intercessor Squad"), None);
    }

    #[test]
    fn test_substring_detection() {
        let vocab = ExportVocabulary::default();
        assert_eq!(
            vocab.find_detachment("Detachment: Gladius Task Force"),
            Some("Gladius Task Force")
        );
        assert_eq!(vocab.find_chapter("Ultramarines 2nd Company"), Some("Ultramarines"));
    }

    #[test]
    fn test_format_name_case_insensitive() {
        let vocab = ExportVocabulary::default();
        assert_eq!(vocab.format_name("strike force"), Some("Strike Force"));
        assert_eq!(vocab.format_name("INCURSION"), Some("Incursion"));
        assert_eq!(vocab.format_name("Apocalypse"), None);
    }

    #[test]
    fn test_roster_names() {
        let vocab = ExportVocabulary::default();
        assert!(vocab.is_roster_name("Gladius Task Force"));
        assert!(vocab.is_roster_name("ultramarines"));
        assert!(!vocab.is_roster_name("Gladius Task Force Extra"));
    }

    #[test]
    fn test_add_detachment() {
        let mut vocab = ExportVocabulary::default();
        let before = vocab.detachments.len();
        vocab.add_detachment("Unforgiven Task Force");
        vocab.add_detachment("gladius task force");

        assert_eq!(vocab.detachments.len(), before + 1);
        assert!(vocab.is_roster_name("Unforgiven Task Force"));
    }
}
