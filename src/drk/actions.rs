//! The level 100 single-target Dark Knight kit, as immutable templates.
//!
//! Potencies are flat approximations of the in-game values; combo bonuses are
//! folded into the finisher since the scripted rotations never break combo.

use crate::drk::buffs::{BLOOD_WEAPON, DARKSIDE, MEDICATED};
use crate::sim::{Ability, AbilityKind, CooldownSpec};

pub const BLOODSPILLER_ID: u32 = 7392;
pub const BLOODSPILLER_COST: i32 = 50;

pub static UNMEND: Ability = Ability {
    id: 3624,
    name: "Unmend",
    kind: AbilityKind::Gcd,
    potency: 150.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: None,
    blood_delta: None,
    mp_delta: None,
    applies: None,
};

pub static HARD_SLASH: Ability = Ability {
    id: 3617,
    name: "Hard Slash",
    kind: AbilityKind::Gcd,
    potency: 300.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: None,
    blood_delta: None,
    mp_delta: None,
    applies: None,
};

pub static SYPHON_STRIKE: Ability = Ability {
    id: 3623,
    name: "Syphon Strike",
    kind: AbilityKind::Gcd,
    potency: 380.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: None,
    blood_delta: None,
    mp_delta: Some(600),
    applies: None,
};

pub static SOULEATER: Ability = Ability {
    id: 3632,
    name: "Souleater",
    kind: AbilityKind::Gcd,
    potency: 480.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: None,
    blood_delta: Some(20),
    mp_delta: None,
    applies: None,
};

pub static BLOODSPILLER: Ability = Ability {
    id: BLOODSPILLER_ID,
    name: "Bloodspiller",
    kind: AbilityKind::Gcd,
    potency: 580.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: None,
    blood_delta: Some(-BLOODSPILLER_COST),
    mp_delta: None,
    applies: None,
};

pub static EDGE_OF_SHADOW: Ability = Ability {
    id: 16470,
    name: "Edge of Shadow",
    kind: AbilityKind::Ogcd,
    potency: 460.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec::single(1.0)),
    blood_delta: None,
    mp_delta: Some(-3000),
    applies: Some(&DARKSIDE),
};

pub static DELIRIUM: Ability = Ability {
    id: 7390,
    name: "Delirium",
    kind: AbilityKind::Ogcd,
    potency: 0.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec::single(60.0)),
    blood_delta: None,
    mp_delta: None,
    applies: Some(&BLOOD_WEAPON),
};

pub static CARVE_AND_SPIT: Ability = Ability {
    id: 3643,
    name: "Carve and Spit",
    kind: AbilityKind::Ogcd,
    potency: 540.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec::single(60.0)),
    blood_delta: None,
    mp_delta: Some(600),
    applies: None,
};

/// Ground effect; the full ticking damage is folded into one potency lump.
pub static SALTED_EARTH: Ability = Ability {
    id: 3639,
    name: "Salted Earth",
    kind: AbilityKind::Ogcd,
    potency: 450.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec::single(90.0)),
    blood_delta: None,
    mp_delta: None,
    applies: None,
};

pub static SHADOWBRINGER: Ability = Ability {
    id: 25757,
    name: "Shadowbringer",
    kind: AbilityKind::Ogcd,
    potency: 600.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec {
        duration: 60.0,
        charges: 2,
    }),
    blood_delta: None,
    mp_delta: None,
    applies: None,
};

/// Summon; the pet's full contribution is folded into one potency lump.
pub static LIVING_SHADOW: Ability = Ability {
    id: 16472,
    name: "Living Shadow",
    kind: AbilityKind::Ogcd,
    potency: 2450.0,
    cast_time: 0.0,
    animation_lock: 0.6,
    cooldown: Some(CooldownSpec::single(120.0)),
    blood_delta: None,
    mp_delta: None,
    applies: None,
};

pub static POTION: Ability = Ability {
    id: 39730,
    name: "Grade 2 Gemdraught of Strength",
    kind: AbilityKind::Ogcd,
    potency: 0.0,
    cast_time: 0.0,
    animation_lock: 1.1,
    cooldown: Some(CooldownSpec::single(270.0)),
    blood_delta: None,
    mp_delta: None,
    applies: Some(&MEDICATED),
};
