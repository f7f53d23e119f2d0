//! Catalog loading.
//!
//! Aggregates a set of YAML rule references into one read-only catalog:
//! - units keyed by normalized name (later documents overwrite earlier ones)
//! - phase/step definitions (first document that has them)
//! - faction-wide reminders (first document that has them)
//! - stratagems (concatenated)
//!
//! Documents are always processed in lexicographic order of their path or
//! label, so the merge is reproducible.

pub mod defaults;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    CatalogUnit, FactionHelpers, FactionReminders, PhaseDefinitions, Reminders, Stratagem,
};
use crate::normalize::{normalize_name, normalize_timing_key};

/// Errors that abort a catalog load.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed catalog document {label}: {source}")]
    Yaml {
        label: String,
        source: serde_yaml::Error,
    },

    #[error("Catalog directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Invalid catalog glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to list catalog directory: {0}")]
    Glob(#[from] glob::GlobError),
}

/// One catalog document, either read from disk or supplied in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    /// Path or upload name; defines processing order
    pub label: String,
    pub contents: String,
}

impl CatalogSource {
    pub fn new(label: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            contents: contents.into(),
        }
    }

    /// Read a document from disk.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path.display().to_string(), contents))
    }
}

/// Top-level keys a catalog document may carry. Anything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    units: Option<Vec<CatalogUnit>>,

    #[serde(default)]
    phases: Option<PhaseDefinitions>,

    #[serde(default)]
    faction_helpers: Option<FactionHelpers>,

    #[serde(default)]
    stratagems: Option<Vec<Stratagem>>,
}

impl CatalogDocument {
    /// Empty documents and documents whose top level is not a mapping
    /// contribute nothing.
    fn parse(source: &CatalogSource) -> Result<Self, CatalogError> {
        if source.contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let yaml_err = |source_err: serde_yaml::Error| CatalogError::Yaml {
            label: source.label.clone(),
            source: source_err,
        };

        let value: serde_yaml::Value = serde_yaml::from_str(&source.contents).map_err(yaml_err)?;
        match value {
            // typed parse from the text keeps line/column in errors
            serde_yaml::Value::Mapping(_) => {
                serde_yaml::from_str(&source.contents).map_err(yaml_err)
            }
            serde_yaml::Value::Null => Ok(Self::default()),
            _ => {
                warn!("Ignoring {}: top level is not a mapping", source.label);
                Ok(Self::default())
            }
        }
    }
}

/// Fallbacks for blocks no document provides.
#[derive(Debug, Clone)]
pub struct CatalogDefaults {
    pub phases: PhaseDefinitions,
    pub faction_helpers: FactionHelpers,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            phases: defaults::phase_definitions(),
            faction_helpers: defaults::faction_helpers(),
        }
    }
}

/// The loaded, read-only catalog.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Datasheets keyed by normalized name
    pub units: BTreeMap<String, CatalogUnit>,
    pub phases: PhaseDefinitions,
    pub faction_reminders: FactionReminders,
    pub stratagems: Vec<Stratagem>,
}

impl Catalog {
    pub fn get(&self, key: &str) -> Option<&CatalogUnit> {
        self.units.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.units.contains_key(key)
    }

    /// Normalized unit keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Distinct detachment names mentioned by stratagems, wildcards excluded.
    pub fn detachments(&self) -> Vec<String> {
        let mut seen: BTreeMap<String, String> = BTreeMap::new();
        for strat in &self.stratagems {
            for d in &strat.detachments {
                let key = normalize_name(d);
                if key.is_empty() || key == "all" {
                    continue;
                }
                seen.entry(key).or_insert_with(|| d.trim().to_string());
            }
        }
        seen.into_values().collect()
    }
}

/// Builds a [`Catalog`] from documents.
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    defaults: CatalogDefaults,
}

impl CatalogLoader {
    pub fn new(defaults: CatalogDefaults) -> Self {
        Self { defaults }
    }

    /// Load every `*.yaml` / `*.yml` file directly inside `dir`.
    pub fn load_dir(&self, dir: &Path) -> Result<Catalog, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(dir.to_path_buf()));
        }

        let base = glob::Pattern::escape(&dir.to_string_lossy());
        let mut paths = Vec::new();
        for ext in ["yaml", "yml"] {
            let pattern = format!("{}/*.{}", base, ext);
            for entry in glob::glob(&pattern)? {
                paths.push(entry?);
            }
        }

        info!("Found {} catalog documents in {:?}", paths.len(), dir);
        self.load_paths(&paths)
    }

    /// Load the given files (order of the slice does not matter).
    pub fn load_paths(&self, paths: &[PathBuf]) -> Result<Catalog, CatalogError> {
        let mut sorted = paths.to_vec();
        sorted.sort();
        sorted.dedup();

        let sources = sorted
            .iter()
            .map(|p| CatalogSource::from_path(p))
            .collect::<Result<Vec<_>, _>>()?;
        self.load_sources(sources)
    }

    /// Load in-memory documents, processed in lexicographic label order.
    pub fn load_sources(&self, mut sources: Vec<CatalogSource>) -> Result<Catalog, CatalogError> {
        sources.sort_by(|a, b| a.label.cmp(&b.label));

        // Parse everything first: one bad document fails the whole load.
        let documents = sources
            .iter()
            .map(|s| CatalogDocument::parse(s).map(|doc| (s.label.as_str(), doc)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut units: BTreeMap<String, CatalogUnit> = BTreeMap::new();
        let mut phases: Option<PhaseDefinitions> = None;
        let mut helpers: Option<FactionHelpers> = None;
        let mut stratagems: Vec<Stratagem> = Vec::new();

        for (label, doc) in documents {
            if helpers.is_none() {
                if let Some(h) = doc.faction_helpers {
                    debug!("Faction helpers taken from {}", label);
                    helpers = Some(h);
                }
            }

            if phases.is_none() {
                if let Some(p) = doc.phases {
                    debug!("Phase definitions taken from {}", label);
                    phases = Some(p);
                }
            }

            for unit in doc.units.unwrap_or_default() {
                let key = normalize_name(&unit.name);
                if key.is_empty() {
                    warn!("Skipping unit without a name in {}", label);
                    continue;
                }
                if units.insert(key.clone(), unit).is_some() {
                    debug!("Unit '{}' redefined by {}", key, label);
                }
            }

            if let Some(list) = doc.stratagems {
                debug!("{} stratagems from {}", list.len(), label);
                stratagems.extend(list);
            }
        }

        let phases = phases
            .unwrap_or_else(|| self.defaults.phases.clone())
            .normalized();
        let faction_reminders = helpers
            .unwrap_or_else(|| self.defaults.faction_helpers.clone())
            .into_reminders(&phases);

        for unit in units.values_mut() {
            normalize_play_tips(unit, &phases);
        }

        info!(
            "Catalog loaded: {} units, {} stratagems, {} phases",
            units.len(),
            stratagems.len(),
            phases.order.len()
        );

        Ok(Catalog {
            units,
            phases,
            faction_reminders,
            stratagems,
        })
    }
}

/// Rewrite a unit's tips into stepped form with canonical phase keys.
fn normalize_play_tips(unit: &mut CatalogUnit, phases: &PhaseDefinitions) {
    let raw = std::mem::take(&mut unit.play_tips.phases);
    let mut merged: BTreeMap<String, BTreeMap<String, Vec<String>>> = BTreeMap::new();

    for (phase, reminders) in raw {
        let phase = normalize_timing_key(&phase);
        let default_step = phases.default_step(&phase);
        let entry = merged.entry(phase).or_default();
        for (step, items) in reminders.into_stepped(&default_step) {
            entry.entry(step).or_default().extend(items);
        }
    }

    unit.play_tips.phases = merged
        .into_iter()
        .map(|(phase, steps)| (phase, Reminders::Stepped(steps)))
        .collect();
}
