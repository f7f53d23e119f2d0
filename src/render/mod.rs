//! HTML rendering of a [`CheatSheet`].
//!
//! Produces one self-contained printable page. All catalog and export text
//! is escaped; nothing here interprets the content.

use crate::models::{
    Actor, ArmyMeta, CatalogUnit, MatchedUnit, PhaseTimeline, Reminders, DEFAULT_STEP,
};
use crate::normalize::normalize_timing_key;
use crate::pipeline::CheatSheet;

const CSS: &str = r#"<style>
  @page { size: A4; margin: 10mm; }
  body { font-family: system-ui, sans-serif; color: #0e1326; }
  h1 { font-size: 18px; margin: 0 0 6px; }
  h2 { font-size: 14px; margin: 10px 0 6px; border-bottom: 1px solid #ddd; }
  .meta, .small { font-size: 11px; color: #6b7280; }
  .board { display: grid; grid-template-columns: 1fr 1fr; gap: 10px; }
  .phase { border: 1px solid #e5e7eb; border-radius: 6px; padding: 6px; break-inside: avoid; }
  .phase h3 { font-size: 12px; margin: 0; }
  .step { font-size: 11px; font-weight: 600; margin-top: 4px; }
  .grid { column-count: 2; column-gap: 14px; }
  .card { break-inside: avoid; border: 1px solid #e5e7eb; border-radius: 8px; padding: 8px; margin: 0 0 10px; }
  .card.missing { border-color: #fca5a5; }
  .head { display: flex; justify-content: space-between; align-items: baseline; }
  .name { font-weight: 700; font-size: 13px; }
  .pill { display: inline-block; font-size: 10px; padding: 1px 6px; border: 1px solid #e5e7eb; border-radius: 999px; margin-right: 4px; }
  .warn { color: #b91c1c; font-weight: 600; }
  ul { margin: 2px 0 2px 16px; padding: 0; font-size: 11px; }
</style>"#;

/// Tips shown per phase on a unit card.
const CARD_TIPS_PER_PHASE: usize = 2;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `"after_enemy_move"` → `"After enemy move"`.
fn label(key: &str) -> String {
    let words = key.replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Meta summary line: format, detachment, faction, list total.
pub fn subtitle(meta: &ArmyMeta) -> String {
    let mut bits: Vec<String> = Vec::new();
    if let Some(format) = &meta.format {
        match meta.format_points {
            Some(points) => bits.push(format!("{} ({} pts)", format, points)),
            None => bits.push(format.clone()),
        }
    }
    match (&meta.faction, &meta.chapter) {
        (Some(faction), Some(chapter)) => bits.push(format!("{} · {}", faction, chapter)),
        (Some(faction), None) => bits.push(faction.clone()),
        (None, Some(chapter)) => bits.push(chapter.clone()),
        (None, None) => {}
    }
    if let Some(detachment) = &meta.detachment {
        bits.push(format!("Detachment: {}", detachment));
    }
    if let Some(points) = meta.points_total {
        bits.push(format!("List total: {} pts", points));
    }
    bits.join(" · ")
}

fn render_list(items: &[&str]) -> String {
    let mut html = String::from("<ul>");
    for item in items {
        html.push_str(&format!("<li>{}</li>", escape_html(item)));
    }
    html.push_str("</ul>");
    html
}

fn render_timeline(timeline: &PhaseTimeline) -> String {
    let mut html = String::new();

    if !timeline.turn_start.is_empty() {
        html.push_str("<h2>Start of turn</h2>");
        let items: Vec<&str> = timeline.turn_start.iter().map(String::as_str).collect();
        html.push_str(&render_list(&items));
    }

    let legend = [Actor::Player, Actor::Opponent, Actor::Either]
        .iter()
        .map(|actor| format!("{} {}", actor.marker(), actor))
        .collect::<Vec<_>>()
        .join(" · ");
    html.push_str(&format!(
        "<h2>Timeline by phase</h2><div class=\"small\">Stratagems: {}</div><div class=\"board\">",
        escape_html(&legend)
    ));
    for phase in &timeline.phases {
        html.push_str(&format!(
            "<div class=\"phase\"><h3>{} phase</h3>",
            escape_html(&label(&phase.phase))
        ));
        for step in &phase.steps {
            html.push_str(&format!(
                "<div class=\"step\">{}</div>",
                escape_html(&label(&step.step))
            ));
            html.push_str(&render_list(&step.lines()));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn render_weapons(unit: &CatalogUnit) -> String {
    if unit.weapons.is_empty() {
        return String::new();
    }
    let mut html = String::from("<div><b>Weapons</b><ul>");
    for (kind, list) in [("Ranged", &unit.weapons.ranged), ("Melee", &unit.weapons.melee)] {
        for weapon in list {
            let profile = weapon.profile();
            html.push_str(&format!(
                "<li>{}: <b>{}</b>{}</li>",
                kind,
                escape_html(&weapon.name),
                if profile.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", escape_html(&profile))
                }
            ));
        }
    }
    html.push_str("</ul></div>");
    html
}

fn render_abilities(unit: &CatalogUnit) -> String {
    let abilities = &unit.abilities;
    let mut items: Vec<String> = Vec::new();

    let rules: Vec<&str> = abilities
        .core
        .iter()
        .chain(abilities.faction.iter())
        .map(String::as_str)
        .collect();
    if !rules.is_empty() {
        items.push(format!("<li>{}</li>", escape_html(&rules.join(", "))));
    }
    for ability in &abilities.unit {
        if ability.text.is_empty() {
            items.push(format!("<li><b>{}</b></li>", escape_html(&ability.name)));
        } else {
            items.push(format!(
                "<li><b>{}.</b> {}</li>",
                escape_html(&ability.name),
                escape_html(&ability.text)
            ));
        }
    }

    if items.is_empty() {
        return String::new();
    }
    format!("<div><b>Abilities</b><ul>{}</ul></div>", items.concat())
}

/// A few tips per phase for the unit card, in board phase order.
fn render_card_tips(unit: &CatalogUnit, phase_order: &[&str]) -> String {
    let mut items: Vec<String> = Vec::new();
    for phase in phase_order {
        let Some(reminders) = unit
            .play_tips
            .phases
            .iter()
            .find(|(key, _)| normalize_timing_key(key) == *phase)
            .map(|(_, r)| r)
        else {
            continue;
        };

        let tips: Vec<String> = match reminders {
            Reminders::Flat(list) => list.clone(),
            Reminders::Stepped(steps) => steps
                .iter()
                .flat_map(|(step, list)| {
                    list.iter().map(move |tip| {
                        if step == DEFAULT_STEP {
                            tip.clone()
                        } else {
                            format!("[{}] {}", step, tip)
                        }
                    })
                })
                .collect(),
            Reminders::Empty => Vec::new(),
        };
        if tips.is_empty() {
            continue;
        }

        let shown: Vec<String> = tips
            .iter()
            .take(CARD_TIPS_PER_PHASE)
            .map(|t| escape_html(t))
            .collect();
        items.push(format!(
            "<li><b>{}:</b> {}</li>",
            escape_html(&label(phase)),
            shown.join(" | ")
        ));
    }

    if items.is_empty() {
        return String::new();
    }
    format!("<div><b>Key moments</b><ul>{}</ul></div>", items.concat())
}

fn render_missing_card(matched: &MatchedUnit) -> String {
    format!(
        "<div class=\"card missing\"><div class=\"head\"><span class=\"name\">{}</span>\
         <span class=\"warn small\">Not found in catalog</span></div>\
         <div class=\"small\">Check the datasheet spelling or add it to the YAML catalog.</div></div>",
        escape_html(matched.display_name())
    )
}

fn render_card(matched: &MatchedUnit, meta: &ArmyMeta, phase_order: &[&str]) -> String {
    let Some(unit) = &matched.unit else {
        return render_missing_card(matched);
    };

    let mut pills: Vec<String> = Vec::new();
    if let Some(role) = &unit.role {
        pills.push(role.clone());
    }
    if let Some(chapter) = &meta.chapter {
        if unit.has_keyword(chapter) {
            pills.push(chapter.clone());
        }
    }
    if matched.requested.count > 1 {
        pills.push(format!("x{}", matched.requested.count));
    }
    pills.push(format!("{} pts", matched.requested.total_points()));

    let stats = unit
        .base
        .stat_line()
        .into_iter()
        .map(|(name, value)| format!("<b>{}</b> {}", name, escape_html(&value)))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut html = String::from("<div class=\"card\">");
    html.push_str(&format!(
        "<div class=\"head\"><span class=\"name\">{}</span><span class=\"small\">match {}%</span></div>",
        escape_html(matched.canonical_name()),
        (matched.score() * 100.0).round() as u32
    ));
    if matched.confidence.needs_review() {
        html.push_str(&format!(
            "<div class=\"small\">Listed as \"{}\"</div>",
            escape_html(matched.display_name())
        ));
    }
    html.push_str("<div>");
    for pill in &pills {
        html.push_str(&format!("<span class=\"pill\">{}</span>", escape_html(pill)));
    }
    html.push_str("</div>");
    html.push_str(&format!("<div class=\"small\">{}</div>", stats));
    html.push_str(&render_weapons(unit));
    html.push_str(&render_abilities(unit));
    html.push_str(&render_card_tips(unit, phase_order));
    html.push_str("</div>");
    html
}

/// Render the full page.
pub fn render_html(sheet: &CheatSheet) -> String {
    let title = escape_html(sheet.meta.display_title());
    let phase_order: Vec<&str> = sheet
        .timeline
        .phases
        .iter()
        .map(|p| p.phase.as_str())
        .collect();

    let mut html = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title>{}</head><body>",
        title, CSS
    );
    html.push_str(&format!("<h1>{}</h1>", title));
    html.push_str(&format!(
        "<div class=\"meta\">{}</div>",
        escape_html(&subtitle(&sheet.meta))
    ));

    html.push_str(&render_timeline(&sheet.timeline));

    html.push_str("<h2>Units</h2><div class=\"grid\">");
    for matched in &sheet.units {
        html.push_str(&render_card(matched, &sheet.meta, &phase_order));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        "<div class=\"small\">Generated {}</div></body></html>",
        sheet.generated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html
}
