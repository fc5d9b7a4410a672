//! Charge-based cooldown tracking for off-GCD abilities.
//!
//! Charges recharge sequentially: a spent charge begins recharging only once
//! the previously spent one has come back. Abilities without a declared
//! cooldown are always ready.

use std::collections::{HashMap, VecDeque};

use crate::sim::types::{Ability, CooldownSpec};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooldownStatus {
    pub ready: bool,
    /// Absolute timestamp at which at least one charge is available.
    pub ready_at: f64,
}

#[derive(Debug, Clone)]
struct CooldownState {
    spec: CooldownSpec,
    /// Completion times of in-flight recharges, oldest first.
    pending: VecDeque<f64>,
}

impl CooldownState {
    fn new(spec: CooldownSpec) -> Self {
        Self {
            spec,
            pending: VecDeque::new(),
        }
    }

    fn ready_at(&self, now: f64) -> f64 {
        let mut outstanding = self
            .pending
            .iter()
            .copied()
            .filter(|&completes| completes > now);
        let in_flight = outstanding.clone().count() as u8;
        if in_flight < self.spec.charges {
            now
        } else {
            outstanding.next().expect("at least one in-flight recharge")
        }
    }

    fn consume(&mut self, now: f64) {
        while self
            .pending
            .front()
            .is_some_and(|&completes| completes <= now)
        {
            self.pending.pop_front();
        }
        let recharge_base = self.pending.back().copied().unwrap_or(now).max(now);
        self.pending.push_back(recharge_base + self.spec.duration);
    }
}

#[derive(Debug, Clone, Default)]
pub struct CooldownTracker {
    states: HashMap<u32, CooldownState>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_of(&self, ability: &Ability, now: f64) -> CooldownStatus {
        let ready_at = self.ready_at(ability, now);
        CooldownStatus {
            ready: ready_at <= now,
            ready_at,
        }
    }

    /// Absolute time the ability next has a charge. `now` for abilities with
    /// no cooldown or a free charge.
    pub fn ready_at(&self, ability: &Ability, now: f64) -> f64 {
        match self.states.get(&ability.id) {
            Some(state) => state.ready_at(now),
            None => now,
        }
    }

    /// Spends a charge at `now`. The caller is responsible for having waited
    /// until [ready_at](Self::ready_at).
    pub fn consume(&mut self, ability: &Ability, now: f64) {
        let Some(spec) = ability.cooldown else {
            return;
        };
        self.states
            .entry(ability.id)
            .or_insert_with(|| CooldownState::new(spec))
            .consume(now);
    }
}
