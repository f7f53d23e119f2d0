//! Phase aggregation.
//!
//! Builds the phase → step → reminders board for one sheet. Every bucket is
//! filled from three sources in a fixed order: faction-wide reminders, tips
//! of resolved units (in roster order), then stratagems usable by the
//! detachment.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::models::{
    FactionReminders, MatchedUnit, PhaseBucket, PhaseDefinitions, PhaseTimeline, StepBucket,
    Stratagem,
};
use crate::normalize::normalize_timing_key;

/// Narrative timing steps used by stratagem authors, mapped onto the step
/// vocabulary of the phase board.
const STEP_ALIASES: &[(&str, &str)] = &[
    ("after_enemy_selects_targets", "start"),
    ("after_enemy_resolves_attacks", "end"),
    ("after_enemy_ends_move", "start"),
    ("after_enemy_declares_charge", "declare"),
    ("after_enemy_ends_charge_move", "move"),
    ("reinforcements", "start"),
    ("any", "start"),
];

/// Canonical board step for a stratagem timing step.
pub fn canonical_step(step: &str) -> String {
    let key = normalize_timing_key(step);
    STEP_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| canonical.to_string())
}

/// Sheet line for a unit play tip.
pub fn format_unit_tip(unit_name: &str, tip: &str) -> String {
    format!("{} — {}", unit_name, tip)
}

/// Sheet line for a stratagem, with the actor marker in front.
pub fn format_stratagem(strat: &Stratagem, marker: &str) -> String {
    let head = format!("{} Strat · {} ({})", marker, strat.name, strat.cost_label());
    let effect = strat.effect.trim();
    if effect.is_empty() {
        head
    } else {
        format!("{} — {}", head, effect)
    }
}

/// Mutable board with every declared phase/step present from the start.
struct Board<'a> {
    phases: &'a PhaseDefinitions,
    buckets: BTreeMap<String, Vec<StepBucket>>,
}

impl<'a> Board<'a> {
    fn new(phases: &'a PhaseDefinitions) -> Self {
        let buckets = phases
            .order
            .iter()
            .map(|phase| {
                let steps = phases
                    .steps_for(phase)
                    .into_iter()
                    .map(StepBucket::new)
                    .collect();
                (phase.clone(), steps)
            })
            .collect();
        Self { phases, buckets }
    }

    /// Step a line for `phase`/`step` lands in: the step itself when
    /// declared, else the phase's default step. `None` for undeclared phases.
    fn landing_step(&self, phase: &str, step: &str) -> Option<String> {
        let steps = self.buckets.get(phase)?;
        if steps.iter().any(|b| b.step == step) {
            return Some(step.to_string());
        }
        let fallback = self.phases.default_step(phase);
        steps.iter().any(|b| b.step == fallback).then_some(fallback)
    }

    /// Append a line. Lines landing in a fallback step get a `[step]`
    /// prefix; undeclared phases are dropped.
    fn place(&mut self, phase: &str, step: &str, line: String) -> bool {
        let Some(landing) = self.landing_step(phase, step) else {
            debug!("Dropping reminder for undeclared phase '{}': {}", phase, line);
            return false;
        };

        let line = if landing == step {
            line
        } else {
            debug!(
                "Step '{}' not declared for phase '{}', using '{}'",
                step, phase, landing
            );
            format!("[{}] {}", step, line)
        };

        match self
            .buckets
            .get_mut(phase)
            .and_then(|steps| steps.iter_mut().find(|b| b.step == landing))
        {
            Some(bucket) => {
                bucket.reminders.push(line);
                true
            }
            None => false,
        }
    }

    fn finish(mut self, turn_start: Vec<String>) -> PhaseTimeline {
        let definitions = self.phases;
        let phases = definitions
            .order
            .iter()
            .map(|phase| PhaseBucket {
                phase: phase.clone(),
                steps: self.buckets.remove(phase).unwrap_or_default(),
            })
            .collect();
        PhaseTimeline { turn_start, phases }
    }
}

/// Aggregate every reminder source into a complete phase timeline.
///
/// Unresolved units contribute nothing. Stratagems are filtered with
/// [`Stratagem::applies_to`]; a stratagem lands at most once per bucket.
pub fn aggregate(
    phases: &PhaseDefinitions,
    faction: &FactionReminders,
    units: &[MatchedUnit],
    stratagems: &[Stratagem],
    detachment: Option<&str>,
) -> PhaseTimeline {
    let mut board = Board::new(phases);

    // faction-wide
    for phase in &phases.order {
        if let Some(steps) = faction.by_phase.get(phase) {
            for (step, items) in steps {
                for item in items {
                    board.place(phase, step, item.clone());
                }
            }
        }
    }

    // unit tips
    for matched in units {
        let Some(unit) = &matched.unit else {
            continue;
        };
        for (phase, reminders) in &unit.play_tips.phases {
            let phase = normalize_timing_key(phase);
            let default_step = phases.default_step(&phase);
            for (step, tips) in reminders.clone().into_stepped(&default_step) {
                for tip in tips {
                    board.place(&phase, &step, format_unit_tip(matched.display_name(), &tip));
                }
            }
        }
    }

    // stratagems
    let mut placed_strats = 0usize;
    for strat in stratagems.iter().filter(|s| s.applies_to(detachment)) {
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
        for window in &strat.timings {
            let phase = normalize_timing_key(&window.phase);
            let step = canonical_step(&window.step);
            if let Some(landing) = board.landing_step(&phase, &step) {
                if !seen.insert((phase.clone(), landing)) {
                    continue;
                }
            }
            if board.place(&phase, &step, format_stratagem(strat, window.actor.marker())) {
                placed_strats += 1;
            }
        }
    }

    let timeline = board.finish(faction.turn_start.clone());
    info!(
        "Timeline built: {} phases, {} reminders ({} stratagem entries)",
        timeline.phases.len(),
        timeline.reminder_count(),
        placed_strats
    );
    timeline
}
