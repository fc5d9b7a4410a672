//! Status effects tracked by the Dark Knight timeline.

use crate::sim::Buff;

/// Persistent damage stance. Edge of Shadow applies or extends it; each
/// application adds 30s up to a 60s cap from the moment of application.
pub static DARKSIDE: Buff = Buff {
    name: "Darkside",
    duration: 30.0,
    damage_multiplier: 1.10,
    extend_to_cap: Some(60.0),
};

/// Granted by Delirium. While active, each weaponskill additionally grants
/// 10 Blood and 200 MP; the decorator folds those into the effective ability.
pub static BLOOD_WEAPON: Buff = Buff {
    name: "Blood Weapon",
    duration: 15.0,
    damage_multiplier: 1.0,
    extend_to_cap: None,
};

/// Strength potion effect.
pub static MEDICATED: Buff = Buff {
    name: "Medicated",
    duration: 30.0,
    damage_multiplier: 1.05,
    extend_to_cap: None,
};
