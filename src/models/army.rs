//! Army list export model.

use serde::{Deserialize, Serialize};

/// Metadata recovered from the head of an army list export.
///
/// Every field is optional: exports are free text and any of these lines
/// may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmyMeta {
    /// List title (first non-empty line, points suffix stripped)
    pub title: Option<String>,

    /// Total points from the title line
    pub points_total: Option<u32>,

    /// Faction (e.g. "Space Marines")
    pub faction: Option<String>,

    /// Chapter or other sub-faction
    pub chapter: Option<String>,

    /// Detachment name
    pub detachment: Option<String>,

    /// Play-size format (e.g. "Incursion")
    pub format: Option<String>,

    /// Points limit of the format
    pub format_points: Option<u32>,
}

impl ArmyMeta {
    /// Title to show on the sheet.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Cheat Sheet")
    }

    /// Returns true if nothing at all was recovered.
    pub fn is_empty(&self) -> bool {
        *self == ArmyMeta::default()
    }
}

/// A unit requested by the export, aggregated over identical lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedUnit {
    /// Normalized lookup key
    pub key: String,

    /// Name as written in the export
    pub display_name: String,

    /// Number of times the unit appears (always >= 1)
    pub count: u32,

    /// Points cost of one entry
    pub points_each: u32,

    /// Section header the unit was listed under
    pub section: Option<String>,
}

impl RequestedUnit {
    /// Create a unit seen once.
    pub fn new(key: String, display_name: String, points_each: u32) -> Self {
        Self {
            key,
            display_name,
            count: 1,
            points_each,
            section: None,
        }
    }

    /// Builder method to set the list section.
    pub fn with_section(mut self, section: Option<String>) -> Self {
        self.section = section;
        self
    }

    /// Record another occurrence of the same unit.
    pub fn add_occurrence(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    /// Points spent on all occurrences.
    pub fn total_points(&self) -> u64 {
        u64::from(self.points_each) * u64::from(self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_unit_creation() {
        let unit = RequestedUnit::new(
            "intercessor squad".to_string(),
            "Intercessor Squad".to_string(),
            80,
        )
        .with_section(Some("BATTLELINE".to_string()));

        assert_eq!(unit.count, 1);
        assert_eq!(unit.points_each, 80);
        assert_eq!(unit.section.as_deref(), Some("BATTLELINE"));
    }

    #[test]
    fn test_requested_unit_occurrences() {
        let mut unit = RequestedUnit::new("rhino".to_string(), "Rhino".to_string(), 75);
        unit.add_occurrence();
        unit.add_occurrence();

        assert_eq!(unit.count, 3);
        assert_eq!(unit.total_points(), 225);
    }

    #[test]
    fn test_total_points_large_costs() {
        let mut unit = RequestedUnit::new("rhino".to_string(), "Rhino".to_string(), 4_000_000_000);
        unit.add_occurrence();

        assert_eq!(unit.total_points(), 8_000_000_000);
    }

    #[test]
    fn test_army_meta_default_is_empty() {
        let meta = ArmyMeta::default();
        assert!(meta.is_empty());
        assert_eq!(meta.display_title(), "Cheat Sheet");
    }

    #[test]
    fn test_army_meta_display_title() {
        let meta = ArmyMeta {
            title: Some("Hammer of Macragge".to_string()),
            ..Default::default()
        };
        assert!(!meta.is_empty());
        assert_eq!(meta.display_title(), "Hammer of Macragge");
    }
}
