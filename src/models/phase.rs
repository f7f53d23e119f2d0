//! Phase/step definitions, reminder payloads, and the aggregated timeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::normalize_timing_key;

/// Step used when a phase declares none, and the usual home of
/// non-step-specific reminders.
pub const DEFAULT_STEP: &str = "start";

/// Shown in place of an empty phase/step bucket.
pub const EMPTY_BUCKET_PLACEHOLDER: &str = "—";

/// Reminder strings keyed by step.
pub type StepReminders = BTreeMap<String, Vec<String>>;

/// A phase's reminders as authored: a flat list, or lists keyed by step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reminders {
    Flat(Vec<String>),
    #[serde(deserialize_with = "deserialize_step_lists")]
    Stepped(StepReminders),
    /// Phase key present with no value
    Empty,
}

/// Step lists where a step key may be present with no value.
fn deserialize_step_lists<'de, D>(deserializer: D) -> Result<StepReminders, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, Option<Vec<String>>> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(step, items)| (step, items.unwrap_or_default()))
        .collect())
}

/// `null` reads as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Reminders {
    /// Convert to the stepped form. Flat lists land in `default_step`;
    /// step names are canonicalised.
    pub fn into_stepped(self, default_step: &str) -> StepReminders {
        let mut stepped = StepReminders::new();
        match self {
            Reminders::Flat(items) => {
                if !items.is_empty() {
                    stepped.insert(default_step.to_string(), items);
                }
            }
            Reminders::Stepped(map) => {
                for (step, items) in map {
                    stepped
                        .entry(normalize_timing_key(&step))
                        .or_default()
                        .extend(items);
                }
            }
            Reminders::Empty => {}
        }
        stepped
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Reminders::Flat(items) => items.is_empty(),
            Reminders::Stepped(map) => map.values().all(Vec::is_empty),
            Reminders::Empty => true,
        }
    }
}

/// Ordered phases and their ordered steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDefinitions {
    #[serde(default)]
    pub order: Vec<String>,

    #[serde(default)]
    pub steps: BTreeMap<String, Vec<String>>,
}

impl PhaseDefinitions {
    /// Canonicalise phase and step names so lookups from stratagems and tips
    /// agree with the definition.
    pub fn normalized(self) -> Self {
        let mut order: Vec<String> = Vec::new();
        for phase in self.order {
            let phase = normalize_timing_key(&phase);
            if !phase.is_empty() && !order.contains(&phase) {
                order.push(phase);
            }
        }

        let mut steps: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (phase, list) in self.steps {
            let entry = steps.entry(normalize_timing_key(&phase)).or_default();
            for step in list {
                let step = normalize_timing_key(&step);
                if !step.is_empty() && !entry.contains(&step) {
                    entry.push(step);
                }
            }
        }

        Self { order, steps }
    }

    /// Ordered steps of a phase; a phase without declared steps has the
    /// single default step.
    pub fn steps_for(&self, phase: &str) -> Vec<String> {
        match self.steps.get(phase) {
            Some(list) if !list.is_empty() => list.clone(),
            _ => vec![DEFAULT_STEP.to_string()],
        }
    }

    /// Step that receives reminders not tied to a declared step.
    pub fn default_step(&self, phase: &str) -> String {
        let steps = self.steps_for(phase);
        if steps.iter().any(|s| s == DEFAULT_STEP) {
            DEFAULT_STEP.to_string()
        } else {
            steps
                .into_iter()
                .next()
                .unwrap_or_else(|| DEFAULT_STEP.to_string())
        }
    }

    pub fn contains_phase(&self, phase: &str) -> bool {
        self.order.iter().any(|p| p == phase)
    }
}

/// Faction-wide helper block as authored in a catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionHelpers {
    #[serde(default, deserialize_with = "null_as_default")]
    pub turn_start: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub generic_reminders: BTreeMap<String, Reminders>,
}

impl FactionHelpers {
    /// Normalize every phase payload to the stepped form.
    pub fn into_reminders(self, phases: &PhaseDefinitions) -> FactionReminders {
        let mut by_phase: BTreeMap<String, StepReminders> = BTreeMap::new();
        for (phase, reminders) in self.generic_reminders {
            let phase = normalize_timing_key(&phase);
            let default_step = phases.default_step(&phase);
            let entry = by_phase.entry(phase).or_default();
            for (step, items) in reminders.into_stepped(&default_step) {
                entry.entry(step).or_default().extend(items);
            }
        }
        FactionReminders {
            turn_start: self.turn_start,
            by_phase,
        }
    }
}

/// Faction-wide reminders after load, always in stepped form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FactionReminders {
    pub turn_start: Vec<String>,
    pub by_phase: BTreeMap<String, StepReminders>,
}

/// Reminders for one step of one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepBucket {
    pub step: String,
    pub reminders: Vec<String>,
}

impl StepBucket {
    pub fn new(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            reminders: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Lines to print: the reminders, or the placeholder when there are none.
    pub fn lines(&self) -> Vec<&str> {
        if self.reminders.is_empty() {
            vec![EMPTY_BUCKET_PLACEHOLDER]
        } else {
            self.reminders.iter().map(String::as_str).collect()
        }
    }
}

/// All steps of one phase, in declared order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseBucket {
    pub phase: String,
    pub steps: Vec<StepBucket>,
}

impl PhaseBucket {
    pub fn step(&self, step: &str) -> Option<&StepBucket> {
        self.steps.iter().find(|s| s.step == step)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.iter().all(StepBucket::is_empty)
    }
}

/// Phase → step → reminders, rebuilt for every sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseTimeline {
    pub turn_start: Vec<String>,
    pub phases: Vec<PhaseBucket>,
}

impl PhaseTimeline {
    pub fn phase(&self, phase: &str) -> Option<&PhaseBucket> {
        self.phases.iter().find(|p| p.phase == phase)
    }

    pub fn bucket(&self, phase: &str, step: &str) -> Option<&StepBucket> {
        self.phase(phase).and_then(|p| p.step(step))
    }

    /// Total reminders across every bucket.
    pub fn reminder_count(&self) -> usize {
        self.phases
            .iter()
            .flat_map(|p| p.steps.iter())
            .map(|s| s.reminders.len())
            .sum()
    }
}
