//! Army list export parsing.
//!
//! Exports are free text copied out of list-building apps. There is no
//! grammar; each line is run through the classification rules in
//! [`rules`] top to bottom and anything unrecognised is skipped.

pub mod rules;
pub mod vocabulary;

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::{ArmyMeta, RequestedUnit};
use crate::normalize::normalize_name;

pub use vocabulary::ExportVocabulary;

/// Lines from the top of the export, title included, searched for
/// faction/chapter/detachment and format.
pub const METADATA_SCAN_LINES: usize = 30;

/// Result of parsing one export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedExport {
    pub meta: ArmyMeta,
    /// One entry per distinct normalized name, in first-seen order
    pub units: Vec<RequestedUnit>,
}

impl ParsedExport {
    /// Look up a unit by normalized key.
    pub fn unit(&self, key: &str) -> Option<&RequestedUnit> {
        self.units.iter().find(|u| u.key == key)
    }

    /// Total model entries across all units.
    pub fn entry_count(&self) -> u32 {
        self.units.iter().map(|u| u.count).sum()
    }
}

/// Heuristic line-oriented export parser.
#[derive(Debug, Clone, Default)]
pub struct ExportParser {
    vocabulary: ExportVocabulary,
}

impl ExportParser {
    pub fn new(vocabulary: ExportVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Parse raw export text. Never fails; unrecognised lines are ignored.
    pub fn parse(&self, raw_text: &str) -> ParsedExport {
        let lines: Vec<&str> = raw_text.lines().map(str::trim).collect();
        let title_index = lines.iter().position(|l| !l.is_empty());

        let mut meta = ArmyMeta::default();
        if let Some(i) = title_index {
            let (title, points) = rules::split_title(lines[i]);
            meta.title = Some(title);
            meta.points_total = points;
        }

        for line in lines.iter().take(METADATA_SCAN_LINES) {
            if !line.is_empty() {
                self.scan_metadata(line, &mut meta);
            }
        }

        let units = self.collect_units(&lines, title_index);

        info!(
            "Parsed export '{}': {} distinct units, detachment {:?}",
            meta.display_title(),
            units.len(),
            meta.detachment
        );

        ParsedExport { meta, units }
    }

    fn scan_metadata(&self, line: &str, meta: &mut ArmyMeta) {
        if let Some(faction) = self.vocabulary.find_faction(line) {
            meta.faction = Some(faction.to_string());
        }
        if let Some(chapter) = self.vocabulary.find_chapter(line) {
            meta.chapter = Some(chapter.to_string());
        }
        if let Some(detachment) = self.vocabulary.find_detachment(line) {
            meta.detachment = Some(detachment.to_string());
        }
        if let Some((format, points)) = self.match_format(line) {
            meta.format = Some(format.to_string());
            meta.format_points = Some(points);
        }
    }

    /// `<Format> (<N> points)` with a known format name.
    fn match_format(&self, line: &str) -> Option<(&str, u32)> {
        let (name, points) = rules::parse_points_line(line)?;
        let format = self.vocabulary.format_name(&name)?;
        Some((format, points))
    }

    fn collect_units(&self, lines: &[&str], title_index: Option<usize>) -> Vec<RequestedUnit> {
        let mut units: Vec<RequestedUnit> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut section: Option<String> = None;

        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() || Some(i) == title_index {
                continue;
            }

            if rules::is_section_header(line) {
                section = Some(line.to_uppercase());
                continue;
            }

            if self.match_format(line).is_some() || self.vocabulary.is_roster_name(line) {
                continue;
            }

            let Some((name, points)) = rules::parse_points_line(line) else {
                continue;
            };

            let key = normalize_name(&name);
            if key.is_empty() {
                debug!("Skipping unit line without a usable name: {}", line);
                continue;
            }

            match index.get(&key) {
                Some(&pos) => units[pos].add_occurrence(),
                None => {
                    index.insert(key.clone(), units.len());
                    units.push(RequestedUnit::new(key, name, points).with_section(section.clone()));
                }
            }
        }

        units
    }
}
