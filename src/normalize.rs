//! Name normalization and alias lookup.
//!
//! Export text and catalog documents spell the same datasheet in slightly
//! different ways (typographic apostrophes, stray punctuation, case). Every
//! lookup goes through [`normalize_name`] on both sides.

use std::collections::HashMap;

/// Apostrophe variants folded away before anything else.
const APOSTROPHES: &[char] = &['\'', '\u{2019}', '\u{2018}', '\u{02bc}', '`'];

fn is_key_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '+' | '&' | '/' | ' ' | '-')
}

/// Canonical lookup key for a unit or ability name.
///
/// Lower-cases, drops apostrophes, turns anything outside `[a-z0-9+&/ -]`
/// into a space, then collapses and trims whitespace. Idempotent.
pub fn normalize_name(raw: &str) -> String {
    let mapped: String = raw
        .to_lowercase()
        .chars()
        .filter(|c| !APOSTROPHES.contains(c))
        .map(|c| if is_key_char(c) { c } else { ' ' })
        .collect();

    mapped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical phase/step identifier: `"After enemy selects-targets"` →
/// `"after_enemy_selects_targets"`.
pub fn normalize_timing_key(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Known naming mismatches between export vocabulary and catalog vocabulary.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    (
        "Assault Intercessors with Jump Pack",
        "Assault Intercessors with Jump Packs",
    ),
    ("Assault Intercessor Squad with Jump Packs", "Assault Intercessors with Jump Packs"),
    ("Captain with Jump Packs", "Captain with Jump Pack"),
    ("Captain w/ Jump Pack", "Captain with Jump Pack"),
    ("Chaplain with Jump Packs", "Chaplain with Jump Pack"),
    ("Bladeguard Veterans", "Bladeguard Veteran Squad"),
    ("Intercessors", "Intercessor Squad"),
    ("Terminators", "Terminator Squad"),
    ("Ballistus", "Ballistus Dreadnought"),
];

/// Variant name → canonical name, consulted before catalog lookup.
///
/// Both sides are stored normalized, so callers may pass raw or already
/// normalized names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in alias set.
    pub fn builtin() -> Self {
        BUILTIN_ALIASES.iter().copied().collect()
    }

    /// Add or replace an alias.
    pub fn insert(&mut self, variant: &str, canonical: &str) {
        let variant = normalize_name(variant);
        let canonical = normalize_name(canonical);
        if variant.is_empty() || canonical.is_empty() || variant == canonical {
            return;
        }
        self.entries.insert(variant, canonical);
    }

    /// Builder method to add an alias.
    pub fn with_alias(mut self, variant: &str, canonical: &str) -> Self {
        self.insert(variant, canonical);
        self
    }

    /// Normalized canonical key for a name, or the name's own key when no
    /// alias applies.
    pub fn canonical_key(&self, name: &str) -> String {
        let key = normalize_name(name);
        self.entries.get(&key).cloned().unwrap_or(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for AliasTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = AliasTable::new();
        for (variant, canonical) in iter {
            table.insert(variant.as_ref(), canonical.as_ref());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_name("Intercessor Squad"), "intercessor squad");
        assert_eq!(normalize_name("  Intercessor   Squad  "), "intercessor squad");
    }

    #[test]
    fn test_normalize_apostrophes() {
        assert_eq!(
            normalize_name("Captain's Honour"),
            normalize_name("captains honour")
        );
        assert_eq!(normalize_name("Vulkan He\u{2019}stan"), "vulkan hestan");
    }

    #[test]
    fn test_normalize_punctuation_to_space() {
        assert_eq!(normalize_name("Lieutenant (Combi-weapon)"), "lieutenant combi-weapon");
        assert_eq!(normalize_name("Repulsor Executioner!"), "repulsor executioner");
        assert_eq!(normalize_name("Rhino,Razorback"), "rhino razorback");
    }

    #[test]
    fn test_normalize_keeps_allowed_symbols() {
        assert_eq!(normalize_name("Hammer & Anvil"), "hammer & anvil");
        assert_eq!(normalize_name("Bolt Rifle +1"), "bolt rifle +1");
        assert_eq!(normalize_name("w/ Jump Pack"), "w/ jump pack");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("!!!"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "Captain's Honour",
            "  Space   Marines\t(Ultramarines) ",
            "Ça Va Über Alles",
            "1st Company Task Force",
            "—",
            "Émile's ‘Bolter’",
        ];
        for raw in samples {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "not idempotent for {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_timing_key() {
        assert_eq!(
            normalize_timing_key("After enemy selects-targets"),
            "after_enemy_selects_targets"
        );
        assert_eq!(normalize_timing_key(" Command "), "command");
        assert_eq!(normalize_timing_key("battle_shock"), "battle_shock");
    }

    #[test]
    fn test_alias_table_lookup() {
        let aliases = AliasTable::new().with_alias("Captain with Jump Packs", "Captain with Jump Pack");

        assert_eq!(
            aliases.canonical_key("Captain with Jump Packs"),
            "captain with jump pack"
        );
        assert_eq!(
            aliases.canonical_key("captain with jump packs"),
            "captain with jump pack"
        );
        assert_eq!(aliases.canonical_key("Rhino"), "rhino");
    }

    #[test]
    fn test_alias_table_skips_identity() {
        let aliases = AliasTable::new().with_alias("Rhino", "RHINO");
        assert!(aliases.is_empty());
    }

    #[test]
    fn test_builtin_aliases() {
        let aliases = AliasTable::builtin();
        assert!(!aliases.is_empty());
        assert_eq!(aliases.canonical_key("Intercessors"), "intercessor squad");
    }
}
