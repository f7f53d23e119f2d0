//! Stratagem model.

use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::normalize_name;

/// Detachment entries that make a stratagem available to every detachment.
pub const WILDCARD_DETACHMENTS: &[&str] = &["all", "*"];

/// Who may use a stratagem in a timing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Actor {
    /// The player owning the sheet
    #[default]
    #[serde(rename = "you", alias = "self", alias = "player")]
    Player,
    #[serde(rename = "opponent", alias = "enemy")]
    Opponent,
    #[serde(rename = "any", alias = "either", alias = "both")]
    Either,
}

impl Actor {
    /// Colour marker printed in front of the stratagem.
    pub fn marker(&self) -> &'static str {
        match self {
            Actor::Player => "🟦",
            Actor::Opponent => "🟥",
            Actor::Either => "🟨",
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actor::Player => write!(f, "your turn"),
            Actor::Opponent => write!(f, "opponent's turn"),
            Actor::Either => write!(f, "either turn"),
        }
    }
}

fn default_phase() -> String {
    "command".to_string()
}

fn default_step() -> String {
    "start".to_string()
}

/// A (phase, step, actor) window in which a stratagem can be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingWindow {
    #[serde(default = "default_phase")]
    pub phase: String,

    #[serde(default = "default_step")]
    pub step: String,

    #[serde(default, rename = "player", alias = "actor")]
    pub actor: Actor,
}

impl TimingWindow {
    pub fn new(phase: impl Into<String>, step: impl Into<String>, actor: Actor) -> Self {
        Self {
            phase: phase.into(),
            step: step.into(),
            actor,
        }
    }
}

/// Accept `detachment: Gladius Task Force` as well as a list.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
        Nothing,
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
        OneOrMany::Nothing => Vec::new(),
    })
}

/// A stratagem from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stratagem {
    pub name: String,

    /// Command point cost
    #[serde(default, alias = "cost")]
    pub cp: Option<u32>,

    #[serde(default)]
    pub effect: String,

    /// Owning detachments; may contain a wildcard
    #[serde(
        default,
        rename = "detachment",
        alias = "detachments",
        deserialize_with = "one_or_many"
    )]
    pub detachments: Vec<String>,

    #[serde(default, rename = "when")]
    pub timings: Vec<TimingWindow>,
}

impl Stratagem {
    /// Create a stratagem with no detachments and no timing windows.
    pub fn new(name: impl Into<String>, cp: u32, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cp: Some(cp),
            effect: effect.into(),
            detachments: Vec::new(),
            timings: Vec::new(),
        }
    }

    /// Builder method to add an owning detachment.
    pub fn for_detachment(mut self, detachment: impl Into<String>) -> Self {
        self.detachments.push(detachment.into());
        self
    }

    /// Builder method to add a timing window.
    pub fn usable(mut self, window: TimingWindow) -> Self {
        self.timings.push(window);
        self
    }

    /// Returns true if any owning detachment is a wildcard.
    pub fn is_universal(&self) -> bool {
        self.detachments.iter().any(|d| {
            let d = d.trim().to_lowercase();
            WILDCARD_DETACHMENTS.contains(&d.as_str())
        })
    }

    /// Whether the stratagem may be used with the given detachment.
    /// Without a detachment only universal stratagems apply.
    pub fn applies_to(&self, detachment: Option<&str>) -> bool {
        if self.is_universal() {
            return true;
        }
        let Some(detachment) = detachment else {
            return false;
        };
        let wanted = normalize_name(detachment);
        self.detachments.iter().any(|d| normalize_name(d) == wanted)
    }

    /// Cost as printed on the sheet.
    pub fn cost_label(&self) -> String {
        match self.cp {
            Some(cp) => format!("{}CP", cp),
            None => "?CP".to_string(),
        }
    }
}
