//! Catalog unit datasheets as loaded from YAML rule references.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::phase::null_as_default;
use super::Reminders;

/// Shown wherever a statistic is missing from the datasheet.
pub const MISSING_STAT: &str = "–";

/// A statistic value. Datasheets mix plain numbers (`6`), dice and
/// thresholds (`D6`, `3+`) and inch marks (`6"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(n) => write!(f, "{}", n),
            StatValue::Decimal(n) => write!(f, "{}", n),
            StatValue::Text(s) => write!(f, "{}", s),
        }
    }
}

fn show(value: &Option<StatValue>) -> String {
    value
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| MISSING_STAT.to_string())
}

/// Base profile of a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(rename = "M", alias = "m", default)]
    pub movement: Option<StatValue>,

    #[serde(rename = "T", alias = "t", default)]
    pub toughness: Option<StatValue>,

    #[serde(rename = "Sv", alias = "sv", default)]
    pub save: Option<StatValue>,

    #[serde(rename = "W", alias = "w", default)]
    pub wounds: Option<StatValue>,

    #[serde(rename = "Ld", alias = "ld", default)]
    pub leadership: Option<StatValue>,

    #[serde(rename = "OC", alias = "oc", default)]
    pub objective_control: Option<StatValue>,

    #[serde(rename = "Inv", alias = "inv", default)]
    pub invulnerable_save: Option<StatValue>,

    #[serde(rename = "FnP", alias = "fnp", default)]
    pub feel_no_pain: Option<StatValue>,
}

impl BaseStats {
    /// Label/value pairs for a stat line. The six core characteristics are
    /// always present (placeholder when missing); Inv and FnP only when set.
    pub fn stat_line(&self) -> Vec<(&'static str, String)> {
        let mut line = vec![
            ("M", show(&self.movement)),
            ("T", show(&self.toughness)),
            ("Sv", show(&self.save)),
            ("W", show(&self.wounds)),
            ("Ld", show(&self.leadership)),
            ("OC", show(&self.objective_control)),
        ];
        if self.invulnerable_save.is_some() {
            line.push(("Inv", show(&self.invulnerable_save)));
        }
        if self.feel_no_pain.is_some() {
            line.push(("FnP", show(&self.feel_no_pain)));
        }
        line
    }
}

/// A weapon profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub range: Option<StatValue>,

    #[serde(rename = "A", alias = "attacks", default)]
    pub attacks: Option<StatValue>,

    #[serde(rename = "BS", alias = "bs", default)]
    pub ballistic_skill: Option<StatValue>,

    #[serde(rename = "WS", alias = "ws", default)]
    pub weapon_skill: Option<StatValue>,

    #[serde(rename = "S", alias = "strength", default)]
    pub strength: Option<StatValue>,

    #[serde(rename = "AP", alias = "ap", default)]
    pub armour_penetration: Option<StatValue>,

    #[serde(rename = "D", alias = "damage", default)]
    pub damage: Option<StatValue>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

impl Weapon {
    /// Compact profile, skipping fields the datasheet leaves out.
    pub fn profile(&self) -> String {
        let skill = self
            .ballistic_skill
            .as_ref()
            .map(|v| ("BS", v))
            .or_else(|| self.weapon_skill.as_ref().map(|v| ("WS", v)));

        let mut parts = Vec::new();
        if let Some(range) = &self.range {
            parts.push(range.to_string());
        }
        if let Some(a) = &self.attacks {
            parts.push(format!("A {}", a));
        }
        if let Some((label, v)) = skill {
            parts.push(format!("{} {}", label, v));
        }
        if let Some(s) = &self.strength {
            parts.push(format!("S {}", s));
        }
        if let Some(ap) = &self.armour_penetration {
            parts.push(format!("AP {}", ap));
        }
        if let Some(d) = &self.damage {
            parts.push(format!("D {}", d));
        }
        parts.join(", ")
    }
}

/// Ranged and melee weapon lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapons {
    #[serde(default)]
    pub ranged: Vec<Weapon>,

    #[serde(default)]
    pub melee: Vec<Weapon>,
}

impl Weapons {
    pub fn is_empty(&self) -> bool {
        self.ranged.is_empty() && self.melee.is_empty()
    }
}

/// A named datasheet ability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "description")]
    pub text: String,
}

/// Abilities grouped the way datasheets print them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    /// Core rule names (e.g. "Deep Strike")
    #[serde(default)]
    pub core: Vec<String>,

    /// Faction rule names (e.g. "Oath of Moment")
    #[serde(default)]
    pub faction: Vec<String>,

    /// Datasheet-specific abilities
    #[serde(default)]
    pub unit: Vec<Ability>,
}

/// Phase-keyed play tips for a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayTips {
    #[serde(default, deserialize_with = "null_as_default")]
    pub phases: BTreeMap<String, Reminders>,
}

/// A unit datasheet from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogUnit {
    /// Canonical name
    #[serde(default)]
    pub name: String,

    /// Battlefield role (e.g. "Battleline")
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub base: BaseStats,

    #[serde(default, deserialize_with = "null_as_default")]
    pub weapons: Weapons,

    #[serde(default, deserialize_with = "null_as_default")]
    pub abilities: Abilities,

    #[serde(default, deserialize_with = "null_as_default")]
    pub play_tips: PlayTips,
}

impl CatalogUnit {
    /// Create a bare datasheet with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder method to add play tips for a phase.
    pub fn with_tips(mut self, phase: impl Into<String>, tips: Reminders) -> Self {
        self.play_tips.phases.insert(phase.into(), tips);
        self
    }

    /// Check for a keyword, ignoring case.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| k.eq_ignore_ascii_case(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERCESSORS: &str = r#"
name: Intercessor Squad
role: Battleline
keywords: [Infantry, Battleline, Imperium, Tacticus]
base: { M: 6", T: 4, Sv: 3+, W: 2, Ld: 6+, OC: 2 }
weapons:
  ranged:
    - { name: Bolt rifle, range: 24", A: 2, BS: 3+, S: 4, AP: -1, D: 1, keywords: [Assault, Heavy] }
  melee:
    - { name: Close combat weapon, range: Melee, A: 3, WS: 3+, S: 4, AP: 0, D: 1 }
abilities:
  core: [Deep Strike]
  faction: [Oath of Moment]
  unit:
    - { name: Objective Secured, text: Sticky objectives. }
play_tips:
  phases:
    shooting:
      start: [Pick the Oath target first.]
    end: [Hold the home objective.]
"#;

    #[test]
    fn test_catalog_unit_deserialize() {
        let unit: CatalogUnit = serde_yaml::from_str(INTERCESSORS).unwrap();

        assert_eq!(unit.name, "Intercessor Squad");
        assert_eq!(unit.role.as_deref(), Some("Battleline"));
        assert_eq!(unit.base.toughness, Some(StatValue::Integer(4)));
        assert_eq!(unit.base.save, Some(StatValue::Text("3+".to_string())));
        assert_eq!(unit.weapons.ranged.len(), 1);
        assert_eq!(unit.weapons.melee[0].weapon_skill.as_ref().unwrap().to_string(), "3+");
        assert_eq!(unit.abilities.unit[0].name, "Objective Secured");
        assert_eq!(unit.play_tips.phases.len(), 2);
        assert!(unit.has_keyword("battleline"));
    }

    #[test]
    fn test_stat_line_placeholders() {
        let base = BaseStats {
            movement: Some(StatValue::Integer(6)),
            toughness: Some(StatValue::Integer(4)),
            ..Default::default()
        };
        let line = base.stat_line();

        assert_eq!(line.len(), 6);
        assert_eq!(line[0], ("M", "6".to_string()));
        assert_eq!(line[2], ("Sv", MISSING_STAT.to_string()));
    }

    #[test]
    fn test_stat_line_optional_saves() {
        let base = BaseStats {
            invulnerable_save: Some(StatValue::Text("4+".to_string())),
            feel_no_pain: Some(StatValue::Text("5+".to_string())),
            ..Default::default()
        };
        let line = base.stat_line();

        assert_eq!(line.len(), 8);
        assert_eq!(line[6], ("Inv", "4+".to_string()));
        assert_eq!(line[7], ("FnP", "5+".to_string()));
    }

    #[test]
    fn test_weapon_profile() {
        let unit: CatalogUnit = serde_yaml::from_str(INTERCESSORS).unwrap();

        assert_eq!(
            unit.weapons.ranged[0].profile(),
            "24\", A 2, BS 3+, S 4, AP -1, D 1"
        );
        assert_eq!(
            unit.weapons.melee[0].profile(),
            "Melee, A 3, WS 3+, S 4, AP 0, D 1"
        );
    }

    #[test]
    fn test_stat_value_display() {
        assert_eq!(StatValue::Integer(12).to_string(), "12");
        assert_eq!(StatValue::Decimal(2.5).to_string(), "2.5");
        assert_eq!(StatValue::Text("D6".to_string()).to_string(), "D6");
    }
}
