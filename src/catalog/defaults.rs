//! Built-in reminders and phase layout used when the catalog provides none.

use std::collections::BTreeMap;

use crate::models::{FactionHelpers, PhaseDefinitions, Reminders};

const PHASE_STEPS: &[(&str, &[&str])] = &[
    ("command", &["start", "end"]),
    ("movement", &["start", "move", "end"]),
    ("shooting", &["start", "end"]),
    ("charge", &["start", "declare", "move", "end"]),
    ("fight", &["start", "end"]),
    ("end", &["start", "end"]),
];

const TURN_START: &[&str] = &["Declare or update detachment and faction effects."];

const GENERIC_REMINDERS: &[(&str, &[&str])] = &[
    (
        "command",
        &["Gain CP, take Battle-shock tests, set up auras and buffs."],
    ),
    (
        "movement",
        &["Measure threat ranges; stay in cover and out of line of sight."],
    ),
    ("shooting", &["Pick targets deliberately before rolling."]),
    (
        "charge",
        &["Consider multi-charges; keep 1 CP for a critical re-roll."],
    ),
    (
        "fight",
        &["Activate in the right order; pile in and consolidate to steal OC."],
    ),
    (
        "end",
        &["Count OC, score primary and secondary objectives, complete actions."],
    ),
];

/// Default turn structure.
pub fn phase_definitions() -> PhaseDefinitions {
    PhaseDefinitions {
        order: PHASE_STEPS.iter().map(|(p, _)| p.to_string()).collect(),
        steps: PHASE_STEPS
            .iter()
            .map(|(p, steps)| (p.to_string(), steps.iter().map(|s| s.to_string()).collect()))
            .collect(),
    }
}

/// Default faction-wide reminders.
pub fn faction_helpers() -> FactionHelpers {
    let generic_reminders: BTreeMap<String, Reminders> = GENERIC_REMINDERS
        .iter()
        .map(|(phase, items)| {
            (
                phase.to_string(),
                Reminders::Flat(items.iter().map(|s| s.to_string()).collect()),
            )
        })
        .collect();

    FactionHelpers {
        turn_start: TURN_START.iter().map(|s| s.to_string()).collect(),
        generic_reminders,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phases_cover_every_reminder() {
        let phases = phase_definitions();
        let helpers = faction_helpers();

        assert_eq!(phases.order.len(), 6);
        for phase in helpers.generic_reminders.keys() {
            assert!(phases.contains_phase(phase), "missing phase {}", phase);
        }
    }

    #[test]
    fn test_default_steps() {
        let phases = phase_definitions();
        assert_eq!(phases.steps_for("charge"), vec!["start", "declare", "move", "end"]);
        assert_eq!(phases.default_step("fight"), "start");
    }

    #[test]
    fn test_default_helpers_have_turn_start() {
        assert!(!faction_helpers().turn_start.is_empty());
    }
}
