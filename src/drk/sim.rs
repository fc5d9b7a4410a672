//! The per-use gate and rotation driver for the Dark Knight simulator.
//!
//! [DrkSim::use_ability] is the single authoritative entry point for one
//! scripted ability: it resolves MP regeneration, validates the blood cost,
//! opportunistically advances time to avoid clipping, applies gauge deltas,
//! and commits the use to the timeline. Illegal or premature uses return a
//! no-op outcome and never raise an error.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::drk::actions::{BLOODSPILLER_COST, BLOODSPILLER_ID, UNMEND};
use crate::drk::buffs::{BLOOD_WEAPON, DARKSIDE};
use crate::drk::gauge::DrkGauge;
use crate::drk::rotations::{select_rotation, RotationData};
use crate::gear::{ComputedStats, GearSet};
use crate::sim::{
    Ability, AbilityKind, AbilityUseRecord, BuffWindow, CycleProcessor, CycleSettings, NoOpReason,
    UseOutcome, STANDARD_ANIMATION_LOCK,
};
use crate::util::format_duration;

pub const SIM_DISPLAY_NAME: &str = "DRK Sim";

const MP_PER_TICK: i32 = 200;
const TICK_SECONDS: i64 = 3;
/// Blood granted per weaponskill while Blood Weapon is active.
const BLOOD_WEAPON_BLOOD: i32 = 10;
/// MP granted per weaponskill while Blood Weapon is active.
const BLOOD_WEAPON_MP: i32 = 200;
/// The fight counts as "ending soon" within this many seconds of the end.
const FIGHT_END_WINDOW: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrkSimSettings {
    pub use_potion: bool,
    /// Seconds before the pull at which Unmend is used.
    pub prepull_unmend: f64,
    /// Fight length in seconds.
    pub fight_time: f64,
}

impl Default for DrkSimSettings {
    fn default() -> Self {
        Self {
            use_potion: true,
            prepull_unmend: 1.0,
            // 8 minutes and 30s: two potions, five burst windows, and close
            // to even between the two tuned GCD speeds.
            fight_time: (8 * 60) as f64 + 30.0,
        }
    }
}

/// Buff-adjusted view of one ability's gauge deltas for a single use
/// instant. Built per use and discarded; the template is never touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveAbility {
    pub blood_delta: Option<i32>,
    pub mp_delta: Option<i32>,
}

/// Folds Blood Weapon's per-weaponskill blood and MP gains into the
/// ability's own deltas when the buff is active.
pub fn with_blood_weapon(ability: &Ability, active_buffs: &[BuffWindow]) -> EffectiveAbility {
    let mut effective = EffectiveAbility {
        blood_delta: ability.blood_delta,
        mp_delta: ability.mp_delta,
    };
    let blood_weapon_up = active_buffs
        .iter()
        .any(|window| window.name == BLOOD_WEAPON.name);
    if blood_weapon_up && ability.kind == AbilityKind::Gcd {
        effective.blood_delta = Some(effective.blood_delta.unwrap_or(0) + BLOOD_WEAPON_BLOOD);
        effective.mp_delta = Some(effective.mp_delta.unwrap_or(0) + BLOOD_WEAPON_MP);
    }
    effective
}

/// Timeline plus the job state owned by exactly one simulation run: the
/// blood/MP gauge and the MP-tick counter. Keeping the counter here (rather
/// than on the sim) is what lets gear sets be evaluated in parallel.
#[derive(Debug, Clone)]
pub struct DrkCycleProcessor {
    pub processor: CycleProcessor,
    pub gauge: DrkGauge,
    mp_ticks: i64,
}

impl DrkCycleProcessor {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            processor: CycleProcessor::new(settings),
            gauge: DrkGauge::new(),
            mp_ticks: 0,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.processor.current_time()
    }

    pub fn total_time(&self) -> f64 {
        self.processor.total_time()
    }

    /// Whether the fight ends within the resource-dump window.
    pub fn fight_ending_soon(&self) -> bool {
        self.current_time() > self.total_time() - FIGHT_END_WINDOW
    }

    /// Credits MP regeneration owed since the last evaluation in discrete
    /// 3-second ticks, exactly once per tick index. Floor is deliberate:
    /// worst-case mana ticks.
    pub fn credit_mp_regen(&mut self) {
        let ticks_owed = (self.current_time().round() as i64) / TICK_SECONDS;
        if ticks_owed == 0 {
            self.mp_ticks = 0;
        }
        let difference = ticks_owed - self.mp_ticks;
        if difference > 0 {
            self.mp_ticks += difference;
            self.gauge.apply_mp(difference as i32 * MP_PER_TICK);
        }
    }

    /// Repeats `body` until the clock reaches the end of the fight, bailing
    /// out if a full pass makes no progress.
    pub fn remaining_cycles<F>(&mut self, mut body: F)
    where
        F: FnMut(&mut Self),
    {
        while self.current_time() < self.total_time() {
            let before = self.current_time();
            body(self);
            if self.current_time() <= before {
                break;
            }
        }
    }

    /// Attaches the post-mutation gauge snapshot and, when Darkside is up,
    /// its rounded remaining duration to a just-committed record.
    fn annotate(&mut self, record: usize, used_at: f64) {
        let snapshot = self.gauge.snapshot();
        let darkside = self
            .processor
            .active_buff_data(DARKSIDE.name, used_at)
            .map(|window| (window.end - used_at).round());
        if let Some(entry) = self.processor.record_mut(record) {
            entry.gauge = Some(snapshot);
            entry.darkside_remaining = darkside;
        }
    }

    pub fn into_records(self) -> Vec<AbilityUseRecord> {
        self.processor.into_records()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DrkSimResult {
    pub main_dps_result: f64,
    pub rotation: String,
    pub records: Vec<AbilityUseRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct DrkSim {
    pub settings: DrkSimSettings,
}

impl DrkSim {
    pub fn new(settings: Option<DrkSimSettings>) -> Self {
        Self {
            settings: settings.unwrap_or_default(),
        }
    }

    /// Settings as a plain serializable record, round-trippable through
    /// [DrkSim::new].
    pub fn export_settings(&self) -> DrkSimSettings {
        self.settings
    }

    /// Attempts to execute one scripted ability at the current instant.
    pub fn use_ability(&self, cp: &mut DrkCycleProcessor, ability: &'static Ability) -> UseOutcome {
        if cp.current_time() >= cp.total_time() {
            return UseOutcome::NoOp(NoOpReason::FightOver);
        }

        cp.credit_mp_regen();

        if ability.id == BLOODSPILLER_ID && cp.gauge.blood < BLOODSPILLER_COST {
            warn!(
                "[{}][{}] Attempted to use {} when you only have {} blood",
                format_duration(cp.current_time()),
                SIM_DISPLAY_NAME,
                ability.name,
                cp.gauge.blood
            );
            return UseOutcome::NoOp(NoOpReason::InsufficientBlood);
        }

        // An off-GCD ability that is not ready yet but still fits in the
        // current weave window: jump ahead to its ready time instead of
        // wasting cooldown.
        if ability.kind == AbilityKind::Ogcd && cp.processor.can_use_without_clipping(ability) {
            let ready_at = cp.processor.status_of(ability).ready_at;
            if ready_at > cp.current_time() && cp.total_time() > ready_at {
                cp.processor.advance_to(ready_at);
            }
        }

        if !self.settings.use_potion && ability.name.to_ascii_lowercase().contains("of strength") {
            return UseOutcome::NoOp(NoOpReason::PotionDisabled);
        }

        let active = cp.processor.active_buffs_at(cp.current_time());
        let effective = with_blood_weapon(ability, &active);

        if effective.blood_delta.is_some() || effective.mp_delta.is_some() {
            // Snap to the GCD slot first so the gauge change is not
            // timestamped onto an auto-attack that lands before it.
            if ability.kind == AbilityKind::Gcd && cp.processor.next_gcd_time() > cp.current_time()
            {
                let next_gcd = cp.processor.next_gcd_time();
                cp.processor.advance_to(next_gcd);
            }
            if let Some(delta) = effective.blood_delta {
                cp.gauge.apply_blood(delta);
            }
            if let Some(delta) = effective.mp_delta {
                cp.gauge.apply_mp(delta);
            }
        }

        let outcome = cp.processor.use_ability(ability);
        if let UseOutcome::Committed { used_at, record } = outcome {
            cp.annotate(record, used_at);
        }

        if ability.kind == AbilityKind::Gcd && cp.fight_ending_soon() {
            self.dump_resources_before_end(cp);
        }

        outcome
    }

    /// Hook for spending banked resources as the fight closes. Intentionally
    /// inert until the dump policy is decided; callers may rely on it having
    /// no timeline effect today.
    /// TODO: spend remaining Blood and spare Shadowbringer charges here once
    /// the dump order is settled.
    fn dump_resources_before_end(&self, _cp: &mut DrkCycleProcessor) {}

    /// Replays one rotation: pre-pull filler, then the opener in order, then
    /// the loop for the remainder of the fight. Per-ability rejections are
    /// absorbed by [use_ability](Self::use_ability).
    pub fn apply_rotation(&self, cp: &mut DrkCycleProcessor, rotation: &RotationData) {
        let mut opener = rotation.opener.iter();
        if let Some(&first) = opener.next() {
            self.use_ability(cp, first);
            if first.id == UNMEND.id && self.settings.prepull_unmend > STANDARD_ANIMATION_LOCK {
                cp.processor
                    .advance_to(self.settings.prepull_unmend - STANDARD_ANIMATION_LOCK);
            }
        }
        for &ability in opener {
            self.use_ability(cp, ability);
        }
        if !rotation.loop_body.is_empty() {
            cp.remaining_cycles(|cp| {
                for &ability in &rotation.loop_body {
                    self.use_ability(cp, ability);
                }
            });
        }
    }

    /// Runs one full fight for a gear set on a fresh timeline and gauge.
    pub fn simulate(&self, set: &GearSet) -> DrkSimResult {
        let stats = ComputedStats::from_gear(set);
        let rotation = select_rotation(stats.gcd);
        info!("[{SIM_DISPLAY_NAME}] Running {}...", rotation.name);

        let mut cp = DrkCycleProcessor::new(CycleSettings {
            total_time: self.settings.fight_time,
            gcd_recast: stats.gcd,
            ..CycleSettings::default()
        });
        self.apply_rotation(&mut cp, &rotation);

        DrkSimResult {
            main_dps_result: cp.processor.potency_per_second() * stats.damage_multiplier,
            rotation: rotation.name.to_string(),
            records: cp.into_records(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drk::actions::{BLOODSPILLER, HARD_SLASH, SYPHON_STRIKE};

    fn processor_for(fight_time: f64) -> DrkCycleProcessor {
        DrkCycleProcessor::new(CycleSettings {
            total_time: fight_time,
            use_autos: false,
            ..CycleSettings::default()
        })
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = DrkSimSettings {
            use_potion: false,
            prepull_unmend: 2.0,
            fight_time: 300.0,
        };
        let raw = serde_json::to_string(&settings).unwrap();
        let restored: DrkSimSettings = serde_json::from_str(&raw).unwrap();
        assert_eq!(restored, settings);
        assert_eq!(DrkSim::new(Some(restored)).export_settings(), settings);
    }

    #[test]
    fn default_settings_match_the_default_sim() {
        let settings = DrkSimSettings::default();
        assert!(settings.use_potion);
        assert_eq!(settings.prepull_unmend, 1.0);
        assert_eq!(settings.fight_time, 510.0);
    }

    #[test]
    fn decorator_leaves_abilities_alone_without_blood_weapon() {
        let effective = with_blood_weapon(&SYPHON_STRIKE, &[]);
        assert_eq!(effective.blood_delta, None);
        assert_eq!(effective.mp_delta, Some(600));
    }

    #[test]
    fn decorator_adds_blood_weapon_gains_to_weaponskills() {
        let window = BuffWindow {
            name: BLOOD_WEAPON.name,
            damage_multiplier: 1.0,
            start: 0.0,
            end: 15.0,
        };
        let effective = with_blood_weapon(&SYPHON_STRIKE, &[window]);
        assert_eq!(effective.blood_delta, Some(10));
        assert_eq!(effective.mp_delta, Some(800));

        // The template itself is untouched.
        assert_eq!(SYPHON_STRIKE.blood_delta, None);
        assert_eq!(SYPHON_STRIKE.mp_delta, Some(600));
    }

    #[test]
    fn decorator_ignores_off_gcd_abilities() {
        let window = BuffWindow {
            name: BLOOD_WEAPON.name,
            damage_multiplier: 1.0,
            start: 0.0,
            end: 15.0,
        };
        let effective = with_blood_weapon(&crate::drk::actions::EDGE_OF_SHADOW, &[window]);
        assert_eq!(effective.blood_delta, None);
        assert_eq!(effective.mp_delta, Some(-3000));
    }

    #[test]
    fn mp_regen_is_idempotent_per_tick_index() {
        let sim = DrkSim::default();
        let mut cp = processor_for(300.0);
        cp.gauge.apply_mp(-9000);
        cp.processor.advance_to(9.0);

        // Two gated rejections at the same instant: ticks credit only once.
        let first = sim.use_ability(&mut cp, &BLOODSPILLER);
        let mp_after_first = cp.gauge.magic_points;
        let second = sim.use_ability(&mut cp, &BLOODSPILLER);

        assert_eq!(first, UseOutcome::NoOp(NoOpReason::InsufficientBlood));
        assert_eq!(second, UseOutcome::NoOp(NoOpReason::InsufficientBlood));
        assert_eq!(mp_after_first, 1000 + 3 * 200);
        assert_eq!(cp.gauge.magic_points, mp_after_first);
    }

    #[test]
    fn mp_tick_counter_resets_for_a_new_fight() {
        let sim = DrkSim::default();
        let mut cp = processor_for(300.0);
        cp.processor.advance_to(30.0);
        sim.use_ability(&mut cp, &HARD_SLASH);
        assert!(cp.mp_ticks > 0);

        // A fresh processor at time zero starts the counter over.
        let mut fresh = processor_for(300.0);
        sim.use_ability(&mut fresh, &HARD_SLASH);
        assert_eq!(fresh.mp_ticks, 0);
    }

    #[test]
    fn gated_bloodspiller_leaves_all_state_unchanged() {
        let sim = DrkSim::default();
        let mut cp = processor_for(300.0);
        let time_before = cp.current_time();

        let outcome = sim.use_ability(&mut cp, &BLOODSPILLER);

        assert_eq!(outcome, UseOutcome::NoOp(NoOpReason::InsufficientBlood));
        assert_eq!(cp.gauge.blood, 0);
        assert_eq!(cp.current_time(), time_before);
        assert!(cp.processor.records().is_empty());
    }

    #[test]
    fn fight_over_rejects_before_any_bookkeeping() {
        let sim = DrkSim::default();
        let mut cp = processor_for(10.0);
        cp.processor.advance_to(10.0);

        let outcome = sim.use_ability(&mut cp, &HARD_SLASH);
        assert_eq!(outcome, UseOutcome::NoOp(NoOpReason::FightOver));
        // MP regen was not resolved: the fight-over check comes first.
        assert_eq!(cp.mp_ticks, 0);
    }

    #[test]
    fn potion_gate_rejects_only_potions() {
        let sim = DrkSim::new(Some(DrkSimSettings {
            use_potion: false,
            ..DrkSimSettings::default()
        }));
        let mut cp = processor_for(300.0);

        let potion = sim.use_ability(&mut cp, &crate::drk::actions::POTION);
        assert_eq!(potion, UseOutcome::NoOp(NoOpReason::PotionDisabled));

        let slash = sim.use_ability(&mut cp, &HARD_SLASH);
        assert!(slash.is_committed());
    }

    #[test]
    fn committed_uses_carry_gauge_snapshots() {
        let sim = DrkSim::default();
        let mut cp = processor_for(300.0);

        let outcome = sim.use_ability(&mut cp, &crate::drk::actions::SOULEATER);
        let UseOutcome::Committed { record, .. } = outcome else {
            panic!("souleater should commit");
        };
        let entry = &cp.processor.records()[record];
        let gauge = entry.gauge.expect("gauge snapshot");
        assert_eq!(gauge.blood, 20);
    }

    #[test]
    fn committed_uses_under_darkside_record_its_remaining_duration() {
        let sim = DrkSim::default();
        let mut cp = processor_for(300.0);

        sim.use_ability(&mut cp, &crate::drk::actions::EDGE_OF_SHADOW);
        let outcome = sim.use_ability(&mut cp, &HARD_SLASH);
        let UseOutcome::Committed { used_at, record } = outcome else {
            panic!("hard slash should commit");
        };
        let entry = &cp.processor.records()[record];
        let expected = (30.0 - used_at).round();
        assert_eq!(entry.darkside_remaining, Some(expected));
    }
}
