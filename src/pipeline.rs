//! End-to-end pipeline: export text + catalog → cheat sheet.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::{Catalog, CatalogError, CatalogLoader};
use crate::config::AppConfig;
use crate::export::{ExportParser, ParsedExport};
use crate::models::{ArmyMeta, MatchedUnit, PhaseTimeline};
use crate::resolve::FuzzyResolver;
use crate::timeline;

/// Errors that stop a sheet from being produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything a renderer needs for one army list.
#[derive(Debug, Clone, Serialize)]
pub struct CheatSheet {
    pub meta: ArmyMeta,
    /// Units in display order
    pub units: Vec<MatchedUnit>,
    pub timeline: PhaseTimeline,
    pub generated_at: DateTime<Utc>,
}

impl CheatSheet {
    /// Units the catalog could not resolve.
    pub fn unresolved(&self) -> impl Iterator<Item = &MatchedUnit> {
        self.units.iter().filter(|u| !u.is_resolved())
    }

    pub fn resolved_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_resolved()).count()
    }

    /// Human-readable resolution summary, one line per unresolved unit.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}/{} units resolved",
            self.resolved_count(),
            self.units.len()
        );
        for missing in self.unresolved() {
            out.push_str(&format!("\n  not found: {}", missing.display_name()));
        }
        out
    }
}

/// Parser and resolver configured once, reused for any number of exports.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    parser: ExportParser,
    resolver: FuzzyResolver,
}

impl Pipeline {
    pub fn new(parser: ExportParser, resolver: FuzzyResolver) -> Self {
        Self { parser, resolver }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ExportParser::new(config.vocabulary.clone()),
            FuzzyResolver::new(config.matching.cutoff, config.alias_table()),
        )
    }

    pub fn resolver(&self) -> &FuzzyResolver {
        &self.resolver
    }

    /// Parse an export without touching the catalog.
    pub fn parse(&self, export_text: &str) -> ParsedExport {
        self.parser.parse(export_text)
    }

    /// Run the whole pipeline against an already loaded catalog.
    pub fn build(&self, export_text: &str, catalog: &Catalog) -> CheatSheet {
        let ParsedExport { meta, units } = self.parser.parse(export_text);
        let matched = self.resolver.resolve_roster(&units, catalog);
        let timeline = timeline::aggregate(
            &catalog.phases,
            &catalog.faction_reminders,
            &matched,
            &catalog.stratagems,
            meta.detachment.as_deref(),
        );

        CheatSheet {
            meta,
            units: matched,
            timeline,
            generated_at: Utc::now(),
        }
    }
}

/// Read an export file.
pub fn read_export(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the catalog from `config.data_dir` and build the sheet for the
/// export at `export_path`.
pub fn generate(config: &AppConfig, export_path: &Path) -> Result<CheatSheet, PipelineError> {
    let catalog = CatalogLoader::default().load_dir(&config.data_dir)?;
    let export_text = read_export(export_path)?;
    let sheet = Pipeline::from_config(config).build(&export_text, &catalog);

    info!(
        "Sheet '{}': {}/{} units resolved",
        sheet.meta.display_title(),
        sheet.resolved_count(),
        sheet.units.len()
    );
    Ok(sheet)
}

/// Write rendered output, creating parent directories as needed.
pub fn write_output(path: &Path, contents: &str) -> Result<(), PipelineError> {
    let io_err = |source: std::io::Error| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, contents).map_err(io_err)
}
