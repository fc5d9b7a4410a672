//! The cycle-processing timeline: simulated clock, GCD pacing, cooldown and
//! buff-window bookkeeping, auto-attack scheduling, and the committed-use log.
//!
//! One processor is owned by exactly one simulation run. The clock only moves
//! forward; uses are committed in non-decreasing `used_at` order, and a use
//! whose instant would land at or past `total_time` is rejected as a no-op.

use crate::sim::cooldown::{CooldownStatus, CooldownTracker};
use crate::sim::types::{
    Ability, AbilityKind, AbilityUseRecord, Buff, BuffWindow, NoOpReason, UseOutcome,
};

pub const AUTO_ATTACK_ID: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSettings {
    pub total_time: f64,
    /// GCD recast in seconds, as computed from the gear's speed stat.
    pub gcd_recast: f64,
    pub use_autos: bool,
    pub auto_attack_interval: f64,
    pub auto_attack_potency: f64,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            total_time: 510.0,
            gcd_recast: 2.5,
            use_autos: true,
            auto_attack_interval: 3.0,
            auto_attack_potency: 90.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CycleProcessor {
    current_time: f64,
    total_time: f64,
    gcd_recast: f64,
    next_gcd_time: f64,
    use_autos: bool,
    auto_attack_interval: f64,
    auto_attack_potency: f64,
    next_auto_at: f64,
    cooldowns: CooldownTracker,
    buffs: Vec<BuffWindow>,
    records: Vec<AbilityUseRecord>,
    total_damage: f64,
}

impl CycleProcessor {
    pub fn new(settings: CycleSettings) -> Self {
        Self {
            current_time: 0.0,
            total_time: settings.total_time,
            gcd_recast: settings.gcd_recast,
            next_gcd_time: 0.0,
            use_autos: settings.use_autos,
            auto_attack_interval: settings.auto_attack_interval,
            auto_attack_potency: settings.auto_attack_potency,
            next_auto_at: 0.0,
            cooldowns: CooldownTracker::new(),
            buffs: Vec::new(),
            records: Vec::new(),
            total_damage: 0.0,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn next_gcd_time(&self) -> f64 {
        self.next_gcd_time
    }

    pub fn records(&self) -> &[AbilityUseRecord] {
        &self.records
    }

    pub fn record_mut(&mut self, index: usize) -> Option<&mut AbilityUseRecord> {
        self.records.get_mut(index)
    }

    pub fn into_records(self) -> Vec<AbilityUseRecord> {
        self.records
    }

    pub fn total_damage(&self) -> f64 {
        self.total_damage
    }

    /// Accumulated potency-weighted damage per second of fight length.
    pub fn potency_per_second(&self) -> f64 {
        if self.total_time <= 0.0 {
            0.0
        } else {
            self.total_damage / self.total_time
        }
    }

    pub fn status_of(&self, ability: &Ability) -> CooldownStatus {
        self.cooldowns.status_of(ability, self.current_time)
    }

    /// Moves the clock forward to `target`, committing any auto-attack swings
    /// crossed on the way. Targets at or before the current instant are
    /// ignored: the clock never moves backward.
    pub fn advance_to(&mut self, target: f64) {
        if target <= self.current_time {
            return;
        }
        if self.use_autos {
            while self.next_auto_at <= target && self.next_auto_at < self.total_time {
                let swing_at = self.next_auto_at;
                self.commit(
                    AUTO_ATTACK_ID,
                    "Attack",
                    AbilityKind::AutoAttack,
                    self.auto_attack_potency,
                    swing_at,
                );
                self.next_auto_at = swing_at + self.auto_attack_interval;
            }
        }
        self.current_time = target;
    }

    /// Whether an off-GCD ability can be used at its ready time without
    /// pushing the next GCD back.
    pub fn can_use_without_clipping(&self, ability: &Ability) -> bool {
        if ability.kind != AbilityKind::Ogcd {
            return false;
        }
        let ready = self
            .cooldowns
            .ready_at(ability, self.current_time)
            .max(self.current_time);
        ready + ability.animation_lock <= self.next_gcd_time && ready < self.total_time
    }

    /// Attempts to commit one ability use at the current instant, waiting for
    /// its cooldown (and, for GCD abilities, the next GCD slot) first.
    pub fn use_ability(&mut self, ability: &'static Ability) -> UseOutcome {
        if self.current_time >= self.total_time {
            return UseOutcome::NoOp(NoOpReason::FightOver);
        }

        let ready = self.cooldowns.ready_at(ability, self.current_time);
        if ready > self.current_time {
            self.advance_to(ready);
        }
        if ability.kind == AbilityKind::Gcd && self.next_gcd_time > self.current_time {
            self.advance_to(self.next_gcd_time);
        }
        if self.current_time >= self.total_time {
            return UseOutcome::NoOp(NoOpReason::FightOver);
        }

        let used_at = self.current_time;
        let record = self.commit(
            ability.id,
            ability.name,
            ability.kind,
            ability.potency,
            used_at,
        );
        self.cooldowns.consume(ability, used_at);
        if let Some(buff) = ability.applies {
            self.apply_buff(buff, used_at);
        }
        if ability.kind == AbilityKind::Gcd {
            self.next_gcd_time = used_at + self.gcd_recast;
        }
        self.advance_to(used_at + ability.cast_time.max(ability.animation_lock));

        UseOutcome::Committed { used_at, record }
    }

    /// Repeats `body` until the clock reaches the end of the fight. Bails out
    /// if a full pass fails to advance the clock, so a rotation whose every
    /// step is rejected cannot spin forever.
    pub fn remaining_cycles<F>(&mut self, mut body: F)
    where
        F: FnMut(&mut Self),
    {
        while self.current_time < self.total_time {
            let before = self.current_time;
            body(self);
            if self.current_time <= before {
                break;
            }
        }
    }

    pub fn apply_buff(&mut self, buff: &Buff, now: f64) {
        if let Some(cap) = buff.extend_to_cap {
            if let Some(window) = self
                .buffs
                .iter_mut()
                .find(|window| window.name == buff.name && window.end > now)
            {
                window.end = (window.end + buff.duration).min(now + cap);
                return;
            }
        }
        self.buffs.push(BuffWindow {
            name: buff.name,
            damage_multiplier: buff.damage_multiplier,
            start: now,
            end: now + buff.duration,
        });
    }

    pub fn active_buffs_at(&self, at: f64) -> Vec<BuffWindow> {
        self.buffs
            .iter()
            .copied()
            .filter(|window| window.active_at(at))
            .collect()
    }

    /// The realized window for a named buff if it is active at `at`.
    pub fn active_buff_data(&self, name: &str, at: f64) -> Option<BuffWindow> {
        self.buffs
            .iter()
            .copied()
            .find(|window| window.name == name && window.active_at(at))
    }

    fn damage_multiplier_at(&self, at: f64) -> f64 {
        self.buffs
            .iter()
            .filter(|window| window.active_at(at))
            .map(|window| window.damage_multiplier)
            .product()
    }

    fn commit(
        &mut self,
        ability_id: u32,
        ability_name: &'static str,
        kind: AbilityKind,
        potency: f64,
        used_at: f64,
    ) -> usize {
        let buffs = self.active_buffs_at(used_at);
        let damage_multiplier = self.damage_multiplier_at(used_at);
        let damage = potency * damage_multiplier;
        self.total_damage += damage;
        self.records.push(AbilityUseRecord {
            ability_id,
            ability_name,
            kind,
            used_at,
            potency,
            damage_multiplier,
            damage,
            buffs,
            gauge: None,
            darkside_remaining: None,
        });
        self.records.len() - 1
    }
}
