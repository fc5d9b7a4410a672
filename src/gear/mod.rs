//! Gear sets and the derived combat stats the simulator consumes.
//!
//! The formulas are level-100 approximations with the same floor-tiered shape
//! as the game's: substat points only matter in whole tiers, so two sets in
//! the same speed tier produce the identical GCD.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base value of the main attribute at level 100.
const LEVEL_MAIN: i64 = 440;
/// Base value of every substat at level 100.
const LEVEL_SUB: i64 = 420;
/// Level divisor used by all substat tier formulas.
const LEVEL_DIV: i64 = 2780;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearSet {
    pub name: String,
    pub weapon_damage: i64,
    pub strength: i64,
    pub critical_hit: i64,
    pub direct_hit: i64,
    pub determination: i64,
    pub skill_speed: i64,
}

impl GearSet {
    /// A representative fully-pentamelded 2.50 set, used as the CLI default.
    pub fn baseline() -> Self {
        Self {
            name: "2.50 baseline".to_string(),
            weapon_damage: 146,
            strength: 4842,
            critical_hit: 3174,
            direct_hit: 1470,
            determination: 2310,
            skill_speed: 420,
        }
    }
}

/// Stats derived from a gear set: the physical GCD and a scalar expected
/// damage multiplier folding in weapon damage, attack power, determination,
/// and the two crit-style substats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComputedStats {
    pub gcd: f64,
    pub damage_multiplier: f64,
}

impl ComputedStats {
    pub fn from_gear(set: &GearSet) -> Self {
        Self {
            gcd: gcd_phys(set.skill_speed),
            damage_multiplier: damage_multiplier(set),
        }
    }
}

/// Physical GCD in seconds for a 2.50s base recast.
pub fn gcd_phys(skill_speed: i64) -> f64 {
    let tier = 130 * (skill_speed - LEVEL_SUB).max(0) / LEVEL_DIV;
    let recast_ms = 2500 * (1000 - tier) / 1000;
    // Displayed GCDs truncate to 10ms.
    (recast_ms / 10) as f64 / 100.0
}

fn damage_multiplier(set: &GearSet) -> f64 {
    let weapon = (set.weapon_damage + LEVEL_MAIN * 195 / 1000) as f64 / 100.0;
    let attack = 1.0 + (190 * (set.strength - LEVEL_MAIN).max(0) / LEVEL_MAIN) as f64 / 100.0;
    let determination =
        1.0 + (140 * (set.determination - LEVEL_MAIN).max(0) / LEVEL_DIV) as f64 / 1000.0;

    let crit_tier = (200 * (set.critical_hit - LEVEL_SUB).max(0) / LEVEL_DIV) as f64 / 1000.0;
    let crit_rate = 0.05 + crit_tier;
    let crit_bonus = 0.35 + crit_tier;
    let crit = 1.0 + crit_rate * crit_bonus;

    let dh_rate = (550 * (set.direct_hit - LEVEL_SUB).max(0) / LEVEL_DIV) as f64 / 1000.0;
    let direct_hit = 1.0 + dh_rate * 0.25;

    weapon * attack * determination * crit * direct_hit
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read gear roster: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse gear roster: {0}")]
    Parse(#[from] csv::Error),
}

/// Loads candidate gear sets from a CSV roster, one set per row with a
/// header matching the [GearSet] field names.
pub fn load_roster_csv(path: &Path) -> Result<Vec<GearSet>, RosterError> {
    let raw = fs::read_to_string(path)?;
    let mut reader = csv::Reader::from_reader(raw.as_bytes());
    let mut sets = Vec::new();
    for row in reader.deserialize() {
        sets.push(row?);
    }
    Ok(sets)
}
